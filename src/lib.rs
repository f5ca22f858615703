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

//! Membership checking for context-free grammars: a chart-based Earley
//! recognizer that accepts any grammar, and a canonical LR(1) recognizer
//! that only accepts grammars without shift/reduce or reduce/reduce
//! conflicts.

mod analysis;
mod earley;
mod error;
mod grammar;
#[cfg(test)]
mod integration_tests;
mod lr1;
mod split;
mod symbol;

pub use analysis::{compute_first_sets, compute_nullable, FirstSets};
pub use earley::EarleyRecognizer;
pub use error::{GrammarError, LrConflict, Result};
pub use grammar::{Grammar, Rule, AUXILIARY_RULE};
pub use lr1::{Action, Lr1Recognizer};
pub use symbol::{is_nonterminal, is_terminal, SymbolId, SymbolTable, AUXILIARY, AUXILIARY_NAME, EPSILON, START};
