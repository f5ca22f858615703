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

//! Shared error type for grammar loading and LR(1) table construction.

use std::fmt;

/// One half of a shift/reduce or reduce/reduce conflict, named well enough to
/// print a useful diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LrConflict {
    /// A state has both a shift and a reduce action for the same lookahead.
    ShiftReduce {
        lookahead: String,
        shift_to_state: usize,
        reduce_rule: String,
    },
    /// A state has two different reduce actions for the same lookahead.
    ReduceReduce {
        lookahead: String,
        reduce_rule_a: String,
        reduce_rule_b: String,
    },
}

impl fmt::Display for LrConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LrConflict::ShiftReduce {
                lookahead,
                shift_to_state,
                reduce_rule,
            } => write!(
                f,
                "shift/reduce conflict on lookahead `{}`: shift to state {} vs reduce {}",
                lookahead, shift_to_state, reduce_rule
            ),
            LrConflict::ReduceReduce {
                lookahead,
                reduce_rule_a,
                reduce_rule_b,
            } => write!(
                f,
                "reduce/reduce conflict on lookahead `{}`: {} vs {}",
                lookahead, reduce_rule_a, reduce_rule_b
            ),
        }
    }
}

/// Errors surfaced by the grammar loader, the LR(1) constructor and the
/// recognizers' preconditions.
///
/// This replaces the process-exit-on-error style of the original tool: the
/// loader and the LR(1) constructor return `Result`, and the exit codes
/// fixed by the format (11, 2, 12) are applied only at the CLI boundary.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// The grammar text is malformed: unexpected empty line, unknown symbol
    /// in a right-hand side, unescaped special character, missing spaces
    /// around the arrow, or a terminal longer than one character outside the
    /// three escape forms.
    #[error("incorrect grammar input at line {line}, column {column}: {message}\n{pointer}")]
    IncorrectGrammarInput {
        message: String,
        line: usize,
        column: usize,
        /// The offending source line with a caret under `column`.
        pointer: String,
    },

    /// LR(1) table construction found a shift/reduce or reduce/reduce
    /// conflict: the grammar is not LR(1).
    #[error("grammar is not LR(1): {0}")]
    GrammarNotLR1(LrConflict),

    /// LR(k) with k > 1 was requested; only k = 1 is implemented.
    #[error("LR({0}) is not implemented, only LR(1)")]
    NotImplemented(u32),

    /// `parse` was called before a grammar was successfully loaded.
    #[error("parse called before a grammar was loaded")]
    PreconditionViolated,
}

pub type Result<T> = std::result::Result<T, GrammarError>;
