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

//! Chart-based Earley recognizer, specialized for nullable symbols per §4.5.
//!
//! Accepts any context-free grammar, including ambiguous and
//! epsilon-producing ones. Only membership is answered: no parse forest or
//! derivation is built, matching the Non-goals of the crate this recognizer
//! belongs to.

use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use crate::analysis::compute_nullable;
use crate::grammar::{Grammar, AUXILIARY_RULE};
use crate::symbol::{is_nonterminal, SymbolId, START};

/// `(rule, dot, origin_column)`, identified by this triple alone (see §9:
/// an arena index replaces the source's pointer-equality items).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Item {
    rule: usize,
    dot: usize,
    origin: usize,
}

#[derive(Debug, Default)]
struct Column {
    items: Vec<Item>,
    seen: HashSet<Item>,
    /// For each nonterminal, the indices (into `items`) of items whose dot
    /// sits immediately before that nonterminal; consumed by Complete.
    predicted_at: HashMap<SymbolId, Vec<usize>>,
}

/// Recognizer over a loaded grammar. Immutable once built: `parse` takes
/// `&self` and allocates its chart on the call stack, so concurrent `parse`
/// calls on the same instance never interact (§5).
pub struct EarleyRecognizer {
    grammar: Grammar,
    nullable: HashSet<SymbolId>,
}

impl EarleyRecognizer {
    pub fn new(grammar: Grammar) -> Self {
        let nullable = compute_nullable(&grammar);
        debug!("Earley recognizer ready, {} nullable nonterminals", nullable.len());
        EarleyRecognizer { grammar, nullable }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Does `word` belong to the grammar's language?
    ///
    /// Empty input is handled directly: it is accepted iff the start symbol
    /// is nullable (§4.5 edge case). Otherwise the chart spans
    /// `0..=word.len()` inclusive — exactly `word.len() + 1` columns, not
    /// one past that (§9 open question about the source's off-by-one).
    pub fn parse(&self, word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        if chars.is_empty() {
            let accepted = self.nullable.contains(&START);
            debug!("parse(\"\") -> {}", accepted);
            return accepted;
        }

        let n = chars.len();
        let mut columns: Vec<Column> = (0..=n).map(|_| Column::default()).collect();
        self.add_item(&mut columns, 0, Item { rule: AUXILIARY_RULE, dot: 0, origin: 0 });

        for i in 0..=n {
            let mut cursor = 0;
            while cursor < columns[i].items.len() {
                let item = columns[i].items[cursor];
                cursor += 1;
                let rule = self.grammar.rule(item.rule);
                let syms = rule.symbols();

                if item.dot < syms.len() {
                    let next = syms[item.dot];
                    if is_nonterminal(next) {
                        for &ridx in self.grammar.rules_for(next) {
                            self.add_item(&mut columns, i, Item { rule: ridx, dot: 0, origin: i });
                        }
                        if self.nullable.contains(&next) {
                            self.add_item(
                                &mut columns,
                                i,
                                Item { rule: item.rule, dot: item.dot + 1, origin: item.origin },
                            );
                        }
                    } else if i < n {
                        let name = self.grammar.symbols().name(next).expect("terminal must be named");
                        if name.chars().next() == Some(chars[i]) {
                            self.add_item(
                                &mut columns,
                                i + 1,
                                Item { rule: item.rule, dot: item.dot + 1, origin: item.origin },
                            );
                        }
                    }
                } else {
                    let completed_lhs = rule.lhs;
                    let origin = item.origin;
                    let waiting: Vec<Item> = columns[origin]
                        .predicted_at
                        .get(&completed_lhs)
                        .map(|idxs| idxs.iter().map(|&j| columns[origin].items[j]).collect())
                        .unwrap_or_default();
                    for w in waiting {
                        self.add_item(&mut columns, i, Item { rule: w.rule, dot: w.dot + 1, origin: w.origin });
                    }
                }
            }
            trace!("column {} has {} items", i, columns[i].items.len());
        }

        let accepted = columns[n].seen.contains(&Item { rule: AUXILIARY_RULE, dot: 1, origin: 0 });
        debug!("parse(len={}) -> {}", n, accepted);
        accepted
    }

    fn add_item(&self, columns: &mut [Column], col: usize, item: Item) {
        if columns[col].seen.insert(item) {
            let idx = columns[col].items.len();
            columns[col].items.push(item);
            let rule = self.grammar.rule(item.rule);
            let syms = rule.symbols();
            if item.dot < syms.len() {
                let next = syms[item.dot];
                if is_nonterminal(next) {
                    columns[col].predicted_at.entry(next).or_default().push(idx);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    fn recognizer(text: &str) -> EarleyRecognizer {
        EarleyRecognizer::new(Grammar::load_str(text).unwrap())
    }

    #[test]
    fn nullable_alternatives_scenario() {
        let r = recognizer("S`e\nA`B`C\nabc\nS -> A B C\nA -> a | e\nB -> b | e\nC -> c | e\n");
        for word in ["", "a", "b", "c", "ab", "ac", "bc", "abc"] {
            assert!(r.parse(word), "expected accept for {:?}", word);
        }
        for word in ["aabcc", "cba", "aba", "abcd"] {
            assert!(!r.parse(word), "expected reject for {:?}", word);
        }
    }

    #[test]
    fn recursive_counting_scenario() {
        let r = recognizer("S`e\nA`B`C\nabc\nS -> A B C\nA -> a A | e\nB -> b B | e\nC -> c C | e\n");
        for word in ["", "aaa", "ccc", "aaabbbccc"] {
            assert!(r.parse(word), "expected accept for {:?}", word);
        }
        for word in ["cba", "aabbcca"] {
            assert!(!r.parse(word), "expected reject for {:?}", word);
        }
    }

    #[test]
    fn palindrome_scenario_is_ambiguous_but_earley_handles_it() {
        let r = recognizer("S`e\n\nab\nS -> aSa | bSb | a | b | e\n");
        for word in ["", "a", "bb", "aba", "aaaaaa", "bbbaaabbb", "babababababababab"] {
            assert!(r.parse(word), "expected accept for {:?}", word);
        }
        for word in ["ba", "abab"] {
            assert!(!r.parse(word), "expected reject for {:?}", word);
        }
    }

    #[test]
    fn balanced_parens_scenario() {
        let r = recognizer("S`e\n\n()\nS -> (`S`)`S | e\n");
        for word in ["", "()", "()()", "(())", "(()())", "(())(())"] {
            assert!(r.parse(word), "expected accept for {:?}", word);
        }
        for word in ["(", ")(", "(()))"] {
            assert!(!r.parse(word), "expected reject for {:?}", word);
        }
    }

    #[test]
    fn three_family_brackets_scenario() {
        let r = recognizer("S`e\n\n()[]{}\nS -> (`S`) | [`S`] | {`S`} | S`S | e\n");
        for word in ["[]", "()[]{}", "({[]})", "[[]]{{}}[]()"] {
            assert!(r.parse(word), "expected accept for {:?}", word);
        }
        for word in ["[}", "()[][}", "[{()})", "[[][]"] {
            assert!(!r.parse(word), "expected reject for {:?}", word);
        }
    }

    #[test]
    fn precondition_free_rejection_of_unknown_characters() {
        let r = recognizer("S`e\n\na\nS -> a\n");
        assert!(!r.parse("z"));
    }
}
