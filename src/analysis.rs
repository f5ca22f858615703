/*
    MIT License

    Copyright (c) 2020 Lars Krueger <lars_e_krueger@gmx.de>

    Permission is hereby granted, free of charge, to any person obtaining a copy
    of this software and associated documentation files (the "Software"), to deal
    in the Software without restriction, including without limitation the rights
    to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
    copies of the Software, and to permit persons to whom the Software is
    furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in all
    copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
    OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
    SOFTWARE.
*/

//! Nullable-symbol computation (for the Earley recognizer) and FIRST-set
//! computation (for the LR(1) constructor).

use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use crate::grammar::Grammar;
use crate::symbol::{is_nonterminal, SymbolId, AUXILIARY, EPSILON};

/// Least set of nonterminal ids whose language contains epsilon, per §4.3:
/// seeded from explicit epsilon rules, then grown by a monotone fixpoint
/// over rhs that become all-nullable. The result does not depend on
/// iteration order.
pub fn compute_nullable(grammar: &Grammar) -> HashSet<SymbolId> {
    let mut nullable: HashSet<SymbolId> = HashSet::new();
    for nt in grammar.symbols().nonterminal_ids() {
        for &ridx in grammar.rules_for(nt) {
            if grammar.rule(ridx).is_epsilon() {
                nullable.insert(nt);
            }
        }
    }

    let mut round = 0;
    let mut changed = true;
    while changed {
        changed = false;
        round += 1;
        for nt in grammar.symbols().nonterminal_ids() {
            if nullable.contains(&nt) {
                continue;
            }
            for &ridx in grammar.rules_for(nt) {
                let rule = grammar.rule(ridx);
                let syms = rule.symbols();
                if !syms.is_empty() && syms.iter().all(|s| is_nonterminal(*s) && nullable.contains(s)) {
                    nullable.insert(nt);
                    changed = true;
                    break;
                }
            }
        }
        trace!("nullable fixpoint round {}: {} symbols", round, nullable.len());
    }
    debug!("nullable set stabilized with {} nonterminals", nullable.len());
    nullable
}

/// FIRST sets over every symbol id (terminals, epsilon, nonterminals),
/// computed by fixpoint per §4.4.
#[derive(Debug, Clone)]
pub struct FirstSets {
    table: HashMap<SymbolId, HashSet<SymbolId>>,
}

impl FirstSets {
    /// FIRST(sym); empty for any id never registered (there are none for a
    /// well-formed grammar).
    pub fn of(&self, sym: SymbolId) -> HashSet<SymbolId> {
        self.table.get(&sym).cloned().unwrap_or_default()
    }

    /// `FIRST_β_a(β, a)` from §4.4: walk `beta` left to right accumulating
    /// FIRST sets (minus epsilon), stopping at the first non-nullable
    /// symbol; if every symbol in `beta` is nullable, add `lookahead`
    /// instead. Never contains epsilon.
    pub fn first_of_seq(&self, beta: &[SymbolId], lookahead: SymbolId) -> HashSet<SymbolId> {
        let mut result = HashSet::new();
        let mut all_nullable = true;
        for &sym in beta {
            let f = self.of(sym);
            for &x in f.iter() {
                if x != EPSILON {
                    result.insert(x);
                }
            }
            if !f.contains(&EPSILON) {
                all_nullable = false;
                break;
            }
        }
        if all_nullable {
            result.insert(lookahead);
        }
        result
    }
}

pub fn compute_first_sets(grammar: &Grammar) -> FirstSets {
    let mut table: HashMap<SymbolId, HashSet<SymbolId>> = HashMap::new();
    for t in grammar.symbols().terminal_ids() {
        table.insert(t, [t].into_iter().collect());
    }
    table.insert(EPSILON, [EPSILON].into_iter().collect());
    for nt in grammar.symbols().nonterminal_ids() {
        table.entry(nt).or_default();
    }
    table.entry(AUXILIARY).or_default();

    let nonterminals: Vec<SymbolId> = grammar
        .symbols()
        .nonterminal_ids()
        .chain(std::iter::once(AUXILIARY))
        .collect();

    let mut round = 0;
    let mut changed = true;
    while changed {
        changed = false;
        round += 1;
        for &nt in &nonterminals {
            for &ridx in grammar.rules_for(nt) {
                let rule = grammar.rule(ridx);
                let seq = rule.symbols();
                if seq.is_empty() {
                    if table.get_mut(&nt).unwrap().insert(EPSILON) {
                        changed = true;
                    }
                    continue;
                }
                let mut all_nullable = true;
                for &sym in seq {
                    let f = table.get(&sym).cloned().unwrap_or_default();
                    for &x in f.iter() {
                        if x != EPSILON && table.get_mut(&nt).unwrap().insert(x) {
                            changed = true;
                        }
                    }
                    if !f.contains(&EPSILON) {
                        all_nullable = false;
                        break;
                    }
                }
                if all_nullable && table.get_mut(&nt).unwrap().insert(EPSILON) {
                    changed = true;
                }
            }
        }
        trace!("FIRST fixpoint round {}", round);
    }
    debug!("FIRST sets stabilized for {} symbols", table.len());
    FirstSets { table }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use crate::symbol::START;

    fn nullable_grammar() -> Grammar {
        Grammar::load_str("S`e\nA`B`C\nabc\nS -> A B C\nA -> a | e\nB -> b | e\nC -> c | e\n").unwrap()
    }

    #[test]
    fn nullable_propagates_through_all_nullable_rhs() {
        let g = nullable_grammar();
        let nullable = compute_nullable(&g);
        assert!(nullable.contains(&START));
        let a = g.symbols().id("A").unwrap();
        let b = g.symbols().id("B").unwrap();
        let c = g.symbols().id("C").unwrap();
        assert!(nullable.contains(&a));
        assert!(nullable.contains(&b));
        assert!(nullable.contains(&c));
    }

    #[test]
    fn nullable_is_idempotent() {
        let g = nullable_grammar();
        let first = compute_nullable(&g);
        let second = compute_nullable(&g);
        assert_eq!(first, second);
    }

    #[test]
    fn non_nullable_grammar_has_empty_nullable_set() {
        let g = Grammar::load_str("S`e\n\nab\nS -> a S b | a b\n").unwrap();
        assert!(compute_nullable(&g).is_empty());
    }

    #[test]
    fn first_set_of_terminal_is_itself() {
        let g = nullable_grammar();
        let first = compute_first_sets(&g);
        let a = g.symbols().id("a").unwrap();
        assert_eq!(first.of(a), [a].into_iter().collect());
    }

    #[test]
    fn first_set_of_start_includes_every_possible_leading_terminal() {
        let g = nullable_grammar();
        let first = compute_first_sets(&g);
        let start_first = first.of(START);
        for name in ["a", "b", "c"] {
            let id = g.symbols().id(name).unwrap();
            assert!(start_first.contains(&id), "missing FIRST({})", name);
        }
        assert!(start_first.contains(&crate::symbol::EPSILON));
    }

    #[test]
    fn first_is_monotone_across_reruns() {
        let g = nullable_grammar();
        let first1 = compute_first_sets(&g);
        let first2 = compute_first_sets(&g);
        assert_eq!(first1.of(START), first2.of(START));
    }
}
