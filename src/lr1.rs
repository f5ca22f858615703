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

//! Canonical LR(1) automaton construction and table-driven acceptor, per
//! §4.6/§4.7. Accepts only grammars that are LR(1); any shift/reduce or
//! reduce/reduce conflict is reported rather than silently resolved.

use std::collections::{BTreeSet, HashMap, VecDeque};

use log::{debug, warn};

use crate::analysis::{compute_first_sets, FirstSets};
use crate::error::{GrammarError, LrConflict, Result};
use crate::grammar::{Grammar, AUXILIARY_RULE};
use crate::symbol::{is_nonterminal, SymbolId, SymbolTable, AUXILIARY, EPSILON};

/// `[rule, dot, lookahead]`, a "situation" in spec terms. `lookahead` is a
/// terminal id or `EPSILON` (meaning end-of-input).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Item {
    rule: usize,
    dot: usize,
    lookahead: SymbolId,
}

/// A bucket: a closed LR(1) item set. Two buckets are equal iff their item
/// sets are equal, which is exactly the `BTreeSet` equality used as the
/// discovery-map key below.
type Bucket = BTreeSet<Item>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce { len: usize, lhs: SymbolId },
    Accept,
}

#[derive(Debug)]
struct Table {
    actions: Vec<HashMap<SymbolId, Action>>,
    gotos: Vec<HashMap<SymbolId, usize>>,
}

/// A canonical LR(1) recognizer: a fixed table built once from a grammar,
/// then driven by the stack machine in §4.7. Immutable after construction.
pub struct Lr1Recognizer {
    symbols: SymbolTable,
    table: Table,
}

impl Lr1Recognizer {
    /// Build the canonical LR(1) table for `grammar`. Fails with
    /// `GrammarNotLR1` on the first shift/reduce or reduce/reduce conflict
    /// encountered while filling the action table, in bucket discovery
    /// order.
    pub fn build(grammar: &Grammar) -> Result<Lr1Recognizer> {
        Self::build_k(grammar, 1)
    }

    /// Build an LR(k) table. Only `k = 1` (canonical LR(1)) is implemented;
    /// any other `k` is refused outright with `NotImplemented`, and no
    /// partial state is retained (§4.6).
    pub fn build_k(grammar: &Grammar, k: u32) -> Result<Lr1Recognizer> {
        if k != 1 {
            return Err(GrammarError::NotImplemented(k));
        }
        let first = compute_first_sets(grammar);
        let buckets = build_canonical_collection(grammar, &first);
        debug!("canonical collection has {} states", buckets.len());

        let mut actions: Vec<HashMap<SymbolId, Action>> = vec![HashMap::new(); buckets.len()];
        let mut gotos: Vec<HashMap<SymbolId, usize>> = vec![HashMap::new(); buckets.len()];

        for (state_id, bucket) in buckets.items.iter().enumerate() {
            for item in bucket {
                let rule = grammar.rule(item.rule);
                let syms = rule.symbols();
                if item.dot < syms.len() {
                    let x = syms[item.dot];
                    let target = buckets.goto_of(state_id, x).expect("goto must exist for a symbol after the dot");
                    if is_nonterminal(x) {
                        gotos[state_id].insert(x, target);
                    } else {
                        set_action(&mut actions, grammar, state_id, x, Action::Shift(target))?;
                    }
                } else if rule.lhs == AUXILIARY {
                    set_action(&mut actions, grammar, state_id, EPSILON, Action::Accept)?;
                } else {
                    let action = Action::Reduce { len: syms.len(), lhs: rule.lhs };
                    set_action(&mut actions, grammar, state_id, item.lookahead, action)?;
                }
            }
        }

        Ok(Lr1Recognizer {
            symbols: grammar.symbols().clone(),
            table: Table { actions, gotos },
        })
    }

    /// Drive the stack machine of §4.7 over `word`. Unknown characters (no
    /// grammar id) and missing table entries both reject immediately.
    pub fn parse(&self, word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        let mut stack = vec![0usize];
        let mut pos = 0usize;

        loop {
            let state = *stack.last().expect("stack is never empty");
            let lookahead = if pos < chars.len() {
                match self.symbols.id(&chars[pos].to_string()) {
                    Some(id) if id < 0 => id,
                    _ => return false,
                }
            } else {
                EPSILON
            };

            match self.table.actions[state].get(&lookahead) {
                None => return false,
                Some(Action::Shift(target)) => {
                    stack.push(*target);
                    pos += 1;
                }
                Some(Action::Reduce { len, lhs }) => {
                    let new_len = stack.len() - len;
                    stack.truncate(new_len);
                    let top = *stack.last().expect("stack is never empty");
                    match self.table.gotos[top].get(lhs) {
                        Some(&target) => stack.push(target),
                        None => return false,
                    }
                }
                Some(Action::Accept) => return true,
            }
        }
    }
}

fn name_of(symbols: &SymbolTable, id: SymbolId) -> String {
    if id == EPSILON {
        "end-of-input".to_string()
    } else {
        symbols.name(id).unwrap_or("?").to_string()
    }
}

fn rule_label(grammar: &Grammar, lhs: SymbolId, len: usize) -> String {
    format!("{} (rhs length {})", grammar.symbols().name(lhs).unwrap_or("?"), len)
}

/// Install `action` under `key` in `actions[state]`, reporting a conflict
/// (and leaving the table's previous entry untouched) if one already
/// exists. Per the §9 open question, an identical reduce re-derived for the
/// same lookahead is a no-op, not a conflict.
fn set_action(
    actions: &mut [HashMap<SymbolId, Action>],
    grammar: &Grammar,
    state: usize,
    key: SymbolId,
    action: Action,
) -> Result<()> {
    match actions[state].get(&key).copied() {
        None => {
            actions[state].insert(key, action);
            Ok(())
        }
        Some(existing) if existing == action => Ok(()),
        Some(existing) => {
            let symbols = grammar.symbols();
            let conflict = match (existing, action) {
                (Action::Reduce { len, lhs }, Action::Shift(target))
                | (Action::Shift(target), Action::Reduce { len, lhs }) => LrConflict::ShiftReduce {
                    lookahead: name_of(symbols, key),
                    shift_to_state: target,
                    reduce_rule: rule_label(grammar, lhs, len),
                },
                (Action::Reduce { len: l1, lhs: lhs1 }, Action::Reduce { len: l2, lhs: lhs2 }) => {
                    LrConflict::ReduceReduce {
                        lookahead: name_of(symbols, key),
                        reduce_rule_a: rule_label(grammar, lhs1, l1),
                        reduce_rule_b: rule_label(grammar, lhs2, l2),
                    }
                }
                // Accept only ever competes with a shift or reduce on end-of-input,
                // which is itself such a conflict one level up the grammar.
                (Action::Accept, other) | (other, Action::Accept) => match other {
                    Action::Shift(target) => LrConflict::ShiftReduce {
                        lookahead: name_of(symbols, key),
                        shift_to_state: target,
                        reduce_rule: "accept".to_string(),
                    },
                    Action::Reduce { len, lhs } => LrConflict::ReduceReduce {
                        lookahead: name_of(symbols, key),
                        reduce_rule_a: "accept".to_string(),
                        reduce_rule_b: rule_label(grammar, lhs, len),
                    },
                    Action::Accept => unreachable!("equal actions are handled above"),
                },
            };
            warn!("LR(1) conflict in state {}: {}", state, conflict);
            Err(GrammarError::GrammarNotLR1(conflict))
        }
    }
}

struct CanonicalCollection {
    items: Vec<Bucket>,
    goto: Vec<HashMap<SymbolId, usize>>,
}

impl CanonicalCollection {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn goto_of(&self, state: usize, symbol: SymbolId) -> Option<usize> {
        self.goto[state].get(&symbol).copied()
    }
}

fn closure(grammar: &Grammar, first: &FirstSets, seed: Bucket) -> Bucket {
    let mut items = seed;
    let mut worklist: Vec<Item> = items.iter().copied().collect();
    while let Some(it) = worklist.pop() {
        let rule = grammar.rule(it.rule);
        let syms = rule.symbols();
        if it.dot >= syms.len() {
            continue;
        }
        let b = syms[it.dot];
        if !is_nonterminal(b) {
            continue;
        }
        let beta = &syms[it.dot + 1..];
        let lookaheads = first.first_of_seq(beta, it.lookahead);
        for &ridx in grammar.rules_for(b) {
            for &la in &lookaheads {
                let new_item = Item { rule: ridx, dot: 0, lookahead: la };
                if items.insert(new_item) {
                    worklist.push(new_item);
                }
            }
        }
    }
    items
}

fn build_canonical_collection(grammar: &Grammar, first: &FirstSets) -> CanonicalCollection {
    let seed: Bucket = [Item { rule: AUXILIARY_RULE, dot: 0, lookahead: EPSILON }].into_iter().collect();
    let start_state = closure(grammar, first, seed);

    let mut buckets: Vec<Bucket> = vec![start_state.clone()];
    let mut index: HashMap<Bucket, usize> = HashMap::new();
    index.insert(start_state, 0);
    let mut goto: Vec<HashMap<SymbolId, usize>> = vec![HashMap::new()];

    let mut queue: VecDeque<usize> = VecDeque::new();
    queue.push_back(0);

    while let Some(state_id) = queue.pop_front() {
        let mut symbols_after_dot: BTreeSet<SymbolId> = BTreeSet::new();
        for it in &buckets[state_id] {
            let rule = grammar.rule(it.rule);
            let syms = rule.symbols();
            if it.dot < syms.len() {
                symbols_after_dot.insert(syms[it.dot]);
            }
        }

        for x in symbols_after_dot {
            let mut seed: Bucket = BTreeSet::new();
            for it in &buckets[state_id] {
                let rule = grammar.rule(it.rule);
                let syms = rule.symbols();
                if it.dot < syms.len() && syms[it.dot] == x {
                    seed.insert(Item { rule: it.rule, dot: it.dot + 1, lookahead: it.lookahead });
                }
            }
            let target_set = closure(grammar, first, seed);
            let target_id = match index.get(&target_set) {
                Some(&id) => id,
                None => {
                    let id = buckets.len();
                    index.insert(target_set.clone(), id);
                    buckets.push(target_set);
                    goto.push(HashMap::new());
                    queue.push_back(id);
                    id
                }
            };
            goto[state_id].insert(x, target_id);
        }
    }

    CanonicalCollection { items: buckets, goto }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    fn build(text: &str) -> Result<Lr1Recognizer> {
        Lr1Recognizer::build(&Grammar::load_str(text).unwrap())
    }

    #[test]
    fn nullable_alternatives_scenario_agrees_with_earley() {
        let r = build("S`e\nA`B`C\nabc\nS -> A B C\nA -> a | e\nB -> b | e\nC -> c | e\n").unwrap();
        for word in ["", "a", "b", "c", "ab", "ac", "bc", "abc"] {
            assert!(r.parse(word), "expected accept for {:?}", word);
        }
        for word in ["aabcc", "cba", "aba", "abcd"] {
            assert!(!r.parse(word), "expected reject for {:?}", word);
        }
    }

    #[test]
    fn recursive_counting_scenario() {
        let r = build("S`e\nA`B`C\nabc\nS -> A B C\nA -> a A | e\nB -> b B | e\nC -> c C | e\n").unwrap();
        for word in ["", "aaa", "ccc", "aaabbbccc"] {
            assert!(r.parse(word));
        }
        for word in ["cba", "aabbcca"] {
            assert!(!r.parse(word));
        }
    }

    #[test]
    fn balanced_parens_scenario() {
        let r = build("S`e\n\n()\nS -> (`S`)`S | e\n").unwrap();
        for word in ["", "()", "()()", "(())", "(()())", "(())(())"] {
            assert!(r.parse(word), "expected accept for {:?}", word);
        }
        for word in ["(", ")(", "(()))"] {
            assert!(!r.parse(word), "expected reject for {:?}", word);
        }
    }

    #[test]
    fn palindrome_grammar_is_not_lr1() {
        let err = build("S`e\n\nab\nS -> aSa | bSb | a | b | e\n").unwrap_err();
        assert!(matches!(err, GrammarError::GrammarNotLR1(_)));
    }

    #[test]
    fn left_recursive_ambiguous_start_rule_is_not_lr1() {
        let err = build("S`e\n\na\nS -> S | a\n").unwrap_err();
        assert!(matches!(err, GrammarError::GrammarNotLR1(_)));
    }

    #[test]
    fn lr_of_k_greater_than_one_is_refused() {
        let g = Grammar::load_str("S`e\n\na\nS -> a\n").unwrap();
        let err = Lr1Recognizer::build_k(&g, 2).unwrap_err();
        assert!(matches!(err, GrammarError::NotImplemented(2)));
    }

    #[test]
    fn unknown_character_is_rejected() {
        let r = build("S`e\n\na\nS -> a\n").unwrap();
        assert!(!r.parse("z"));
    }
}
