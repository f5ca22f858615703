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

//! Grammar symbol identifiers and the name/id symbol table.
//!
//! Identifiers partition as laid out by the format: `0` is the epsilon
//! sentinel, `1` is the synthetic auxiliary start `S'`, `2` is the declared
//! start nonterminal, `3..=2+(N-1)` are the remaining declared nonterminals
//! in file order, and `-1..=-T` are the declared terminals in file order. A
//! symbol is a nonterminal iff its id is positive, a terminal iff negative.

use std::collections::HashMap;

/// Stable integer identifier for a grammar symbol.
pub type SymbolId = i32;

/// The empty-string sentinel.
pub const EPSILON: SymbolId = 0;
/// The synthetic auxiliary start symbol `S'`.
pub const AUXILIARY: SymbolId = 1;
/// The declared start nonterminal.
pub const START: SymbolId = 2;
/// Reserved name for the auxiliary start symbol; a user grammar may not
/// declare a nonterminal with this name.
pub const AUXILIARY_NAME: &str = "AUXILIARY";

/// Returns true if `id` names a nonterminal (including `S'`).
pub fn is_nonterminal(id: SymbolId) -> bool {
    id > 0
}

/// Returns true if `id` names a terminal.
pub fn is_terminal(id: SymbolId) -> bool {
    id < 0
}

/// Bidirectional mapping between symbol names and ids, plus the symbol
/// counts needed to iterate nonterminal/terminal ranges.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    names: HashMap<SymbolId, String>,
    ids: HashMap<String, SymbolId>,
    /// Number of declared nonterminals, including the start symbol but not
    /// the synthetic `S'`.
    nonterminal_count: usize,
    /// Number of declared terminals.
    terminal_count: usize,
}

impl SymbolTable {
    /// Builds a table from the start symbol name, the epsilon alias, the
    /// remaining nonterminal names (declaration order) and the terminal
    /// names (declaration order). Ids are assigned per the module doc.
    pub fn new(
        start_name: &str,
        epsilon_name: &str,
        other_nonterminals: &[String],
        terminals: &[String],
    ) -> Self {
        let mut names = HashMap::new();
        let mut ids = HashMap::new();

        names.insert(EPSILON, epsilon_name.to_string());
        ids.insert(epsilon_name.to_string(), EPSILON);

        names.insert(AUXILIARY, AUXILIARY_NAME.to_string());
        ids.insert(AUXILIARY_NAME.to_string(), AUXILIARY);

        names.insert(START, start_name.to_string());
        ids.insert(start_name.to_string(), START);

        let mut next_id = START + 1;
        for name in other_nonterminals {
            names.insert(next_id, name.clone());
            ids.insert(name.clone(), next_id);
            next_id += 1;
        }
        let nonterminal_count = 1 + other_nonterminals.len();

        for (i, name) in terminals.iter().enumerate() {
            let id = -(i as SymbolId) - 1;
            names.insert(id, name.clone());
            ids.insert(name.clone(), id);
        }
        let terminal_count = terminals.len();

        SymbolTable {
            names,
            ids,
            nonterminal_count,
            terminal_count,
        }
    }

    pub fn name(&self, id: SymbolId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn id(&self, name: &str) -> Option<SymbolId> {
        self.ids.get(name).copied()
    }

    pub fn epsilon_name(&self) -> &str {
        self.name(EPSILON).expect("epsilon is always registered")
    }

    /// Number of declared nonterminals, including the start symbol, not
    /// counting the synthetic `S'`.
    pub fn nonterminal_count(&self) -> usize {
        self.nonterminal_count
    }

    pub fn terminal_count(&self) -> usize {
        self.terminal_count
    }

    /// Ids of all declared nonterminals (start first, then file order),
    /// excluding the synthetic `S'`.
    pub fn nonterminal_ids(&self) -> impl Iterator<Item = SymbolId> {
        (START..START + self.nonterminal_count as SymbolId).into_iter()
    }

    /// Ids of all declared terminals, in declaration order.
    pub fn terminal_ids(&self) -> impl Iterator<Item = SymbolId> {
        (1..=self.terminal_count as SymbolId).map(|i| -i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_assignment_follows_declaration_order() {
        let table = SymbolTable::new(
            "S",
            "e",
            &["A".to_string(), "B".to_string()],
            &["a".to_string(), "b".to_string()],
        );
        assert_eq!(table.id("e"), Some(EPSILON));
        assert_eq!(table.id(AUXILIARY_NAME), Some(AUXILIARY));
        assert_eq!(table.id("S"), Some(START));
        assert_eq!(table.id("A"), Some(3));
        assert_eq!(table.id("B"), Some(4));
        assert_eq!(table.id("a"), Some(-1));
        assert_eq!(table.id("b"), Some(-2));
        assert_eq!(table.nonterminal_count(), 3);
        assert_eq!(table.terminal_count(), 2);
        assert!(is_nonterminal(table.id("B").unwrap()));
        assert!(is_terminal(table.id("b").unwrap()));
    }

    #[test]
    fn reverse_lookup_is_total_over_declared_symbols() {
        let table = SymbolTable::new("S", "e", &[], &["a".to_string()]);
        assert_eq!(table.name(START), Some("S"));
        assert_eq!(table.name(EPSILON), Some("e"));
        assert_eq!(table.name(AUXILIARY), Some(AUXILIARY_NAME));
        assert_eq!(table.name(-1), Some("a"));
    }
}
