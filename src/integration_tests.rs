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

//! End-to-end scenarios run against both recognizers together, confirming
//! they agree on every grammar that is LR(1) and that the LR(1) engine
//! refuses the grammars that are not.

use crate::earley::EarleyRecognizer;
use crate::error::GrammarError;
use crate::grammar::Grammar;
use crate::lr1::Lr1Recognizer;

struct Scenario {
    grammar: &'static str,
    accept: &'static [&'static str],
    reject: &'static [&'static str],
}

const LR1_SCENARIOS: &[Scenario] = &[
    Scenario {
        grammar: "S`e\nA`B`C\nabc\nS -> A B C\nA -> a | e\nB -> b | e\nC -> c | e\n",
        accept: &["", "a", "b", "c", "ab", "ac", "bc", "abc"],
        reject: &["aabcc", "cba", "aba", "abcd"],
    },
    Scenario {
        grammar: "S`e\nA`B`C\nabc\nS -> A B C\nA -> a A | e\nB -> b B | e\nC -> c C | e\n",
        accept: &["", "aaa", "ccc", "aaabbbccc"],
        reject: &["cba", "aabbcca"],
    },
    Scenario {
        grammar: "S`e\n\n()\nS -> (`S`)`S | e\n",
        accept: &["", "()", "()()", "(())", "(()())", "(())(())"],
        reject: &["(", ")(", "(()))"],
    },
];

#[test]
fn earley_and_lr1_agree_on_every_lr1_scenario() {
    for scenario in LR1_SCENARIOS {
        let grammar = Grammar::load_str(scenario.grammar).expect("scenario grammar must load");
        let earley = EarleyRecognizer::new(grammar.clone());
        let lr1 = Lr1Recognizer::build(&grammar).expect("scenario grammar must be LR(1)");

        for word in scenario.accept {
            assert!(earley.parse(word), "earley should accept {:?}", word);
            assert!(lr1.parse(word), "lr1 should accept {:?}", word);
        }
        for word in scenario.reject {
            assert!(!earley.parse(word), "earley should reject {:?}", word);
            assert!(!lr1.parse(word), "lr1 should reject {:?}", word);
        }
    }
}

#[test]
fn ambiguous_palindrome_grammar_is_earley_only() {
    let grammar = Grammar::load_str("S`e\n\nab\nS -> aSa | bSb | a | b | e\n").unwrap();
    let earley = EarleyRecognizer::new(grammar.clone());
    for word in ["", "a", "bb", "aba", "bbbaaabbb"] {
        assert!(earley.parse(word));
    }

    let err = Lr1Recognizer::build(&grammar).unwrap_err();
    assert!(matches!(err, GrammarError::GrammarNotLR1(_)));
}

#[test]
fn three_family_brackets_grammar_is_earley_only() {
    // S -> (S) | [S] | {S} | S S | e: nullable S folds FIRST(S) onto the
    // `S -> .` reduce item in state 0, clashing with the shift items for
    // `(`/`[`/`{` — a shift/reduce conflict, so this grammar is not LR(1).
    let grammar = Grammar::load_str("S`e\n\n()[]{}\nS -> (`S`) | [`S`] | {`S`} | S`S | e\n").unwrap();
    let earley = EarleyRecognizer::new(grammar.clone());
    for word in ["[]", "()[]{}", "({[]})", "[[]]{{}}[]()"] {
        assert!(earley.parse(word), "earley should accept {:?}", word);
    }
    for word in ["[}", "()[][}", "[{()})", "[[][]"] {
        assert!(!earley.parse(word), "earley should reject {:?}", word);
    }

    let err = Lr1Recognizer::build(&grammar).unwrap_err();
    assert!(matches!(err, GrammarError::GrammarNotLR1(_)));
}
