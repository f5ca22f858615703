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

//! Grammar model and loader.
//!
//! Parses the four-section, back-tick delimited grammar text described in
//! the crate's file-format documentation into a [`Grammar`]: a symbol table
//! plus a flat rule list. Both recognizers build on top of this model and
//! never re-parse text themselves.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use log::{debug, warn};

use crate::error::{GrammarError, Result};
use crate::split::split;
use crate::symbol::{is_nonterminal, is_terminal, SymbolId, SymbolTable, AUXILIARY, EPSILON, START};

const ARROW: &str = " -> ";
const ALT_SEP: &str = " | ";

/// Index of the injected `S' -> S` rule, always the first entry in the rule
/// arena of any loaded [`Grammar`].
pub const AUXILIARY_RULE: usize = 0;

/// One right-hand side of one nonterminal's rule.
///
/// `rhs` is stored exactly as spec'd: the empty production is the
/// single-element sequence `[EPSILON]`, never mixed with other symbols.
/// [`Rule::symbols`] hides this detail and returns an empty slice for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub lhs: SymbolId,
    rhs: Vec<SymbolId>,
}

impl Rule {
    pub fn is_epsilon(&self) -> bool {
        self.rhs == [EPSILON]
    }

    /// The rule's right-hand side, with the epsilon placeholder collapsed to
    /// an empty slice so callers never special-case `[EPSILON]`.
    pub fn symbols(&self) -> &[SymbolId] {
        if self.is_epsilon() {
            &[]
        } else {
            &self.rhs
        }
    }
}

/// A loaded, checked context-free grammar: a symbol table plus every rule,
/// flattened into a single arena and indexed by nonterminal.
#[derive(Debug, Clone)]
pub struct Grammar {
    symbols: SymbolTable,
    rules: Vec<Rule>,
    rules_by_lhs: HashMap<SymbolId, Vec<usize>>,
}

impl Grammar {
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn rule(&self, id: usize) -> &Rule {
        &self.rules[id]
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Indices into the rule arena of every right-hand side of `lhs`, in
    /// declaration order. `AUXILIARY` yields the single injected `S' -> S`
    /// rule at index 0.
    pub fn rules_for(&self, lhs: SymbolId) -> &[usize] {
        self.rules_by_lhs
            .get(&lhs)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn load_str(text: &str) -> Result<Grammar> {
        load(text)
    }

    pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Grammar> {
        let text = fs::read_to_string(path.as_ref()).map_err(|e| io_error(path.as_ref(), e))?;
        load(&text)
    }

    /// Render the grammar back to text following the file format, with the
    /// print-time escaping rules of §4.2: single-character terminals inside
    /// an rhs get no back-tick between them; a back-tick is inserted only
    /// before a nonterminal, before a terminal that follows a nonterminal,
    /// or around an escaped literal back-tick.
    pub fn print<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        let s = &self.symbols;
        writeln!(out, "{}`{}", s.name(START).unwrap(), s.epsilon_name())?;

        let others: Vec<&str> = ((START + 1)..(START + s.nonterminal_count() as SymbolId))
            .map(|id| s.name(id).unwrap())
            .collect();
        writeln!(out, "{}", others.join("`"))?;

        let mut term_fragments: Vec<String> = Vec::new();
        for id in s.terminal_ids() {
            term_fragments.extend(terminal_print_fragments(s.name(id).unwrap()));
        }
        writeln!(out, "{}", term_fragments.join("`"))?;

        for nt in s.nonterminal_ids() {
            let alts: Vec<String> = self
                .rules_for(nt)
                .iter()
                .map(|&idx| {
                    let rule = &self.rules[idx];
                    if rule.is_epsilon() {
                        s.epsilon_name().to_string()
                    } else {
                        render_rhs(s, rule.symbols())
                    }
                })
                .collect();
            writeln!(out, "{}{}{}", s.name(nt).unwrap(), ARROW, alts.join(ALT_SEP))?;
        }
        Ok(())
    }
}

fn io_error(path: &Path, e: io::Error) -> GrammarError {
    GrammarError::IncorrectGrammarInput {
        message: format!("could not read grammar file {}: {}", path.display(), e),
        line: 0,
        column: 0,
        pointer: String::new(),
    }
}

fn syntax_error(line_text: &str, line_no: usize, column: usize, message: impl Into<String>) -> GrammarError {
    let pointer = format!("{}\n{}^", line_text, " ".repeat(column));
    GrammarError::IncorrectGrammarInput {
        message: message.into(),
        line: line_no,
        column,
        pointer,
    }
}

fn terminal_print_fragments(name: &str) -> Vec<String> {
    match name {
        "`" => vec!["\\".to_string(), String::new()],
        "\\" => vec!["\\\\".to_string()],
        "|" => vec!["\\|".to_string()],
        other => vec![other.to_string()],
    }
}

/// Render one rhs, grounded in `GrammarBase::PrintRules` (original_source):
/// a leading back-tick is emitted before a symbol iff that symbol is a
/// nonterminal, or it is a terminal immediately following a nonterminal, or
/// its name is the literal back-tick character.
fn render_rhs(table: &SymbolTable, syms: &[SymbolId]) -> String {
    let mut out = String::new();
    let mut prev_is_nonterm = false;
    for (p, &sym) in syms.iter().enumerate() {
        let name = table.name(sym).unwrap();
        let is_nt = is_nonterminal(sym);
        if p > 0 {
            let need_delim = is_nt || (!is_nt && prev_is_nonterm) || name == "`";
            if need_delim {
                out.push('`');
            }
        }
        match name {
            "`" => {
                out.push_str("\\`");
                prev_is_nonterm = true;
            }
            "\\" => {
                out.push_str("\\\\");
                prev_is_nonterm = is_nt;
            }
            "|" => {
                out.push_str("\\|");
                prev_is_nonterm = is_nt;
            }
            other => {
                out.push_str(other);
                prev_is_nonterm = is_nt;
            }
        }
    }
    out
}

fn load(text: &str) -> Result<Grammar> {
    let mut lines = text.lines();

    let line1 = lines
        .next()
        .ok_or_else(|| syntax_error("", 1, 0, "grammar text is empty, expected the start/epsilon line"))?;
    let header = split(line1, "`");
    if header.len() != 2 || header[0].is_empty() {
        return Err(syntax_error(
            line1,
            1,
            0,
            "line 1 must be `<start-nonterminal>`<epsilon-name>`",
        ));
    }
    let start_name = header[0].clone();
    let epsilon_name = header[1].clone();
    debug!("grammar header: start=`{}` epsilon=`{}`", start_name, epsilon_name);

    let line2 = lines
        .next()
        .ok_or_else(|| syntax_error("", 2, 0, "missing line 2 (additional nonterminals)"))?;
    let other_nts: Vec<String> = if line2.is_empty() {
        warn!("line 2 is empty: start symbol is the only nonterminal");
        Vec::new()
    } else {
        split(line2, "`")
    };
    for name in &other_nts {
        if name.is_empty() {
            return Err(syntax_error(line2, 2, 0, "empty nonterminal name in line 2"));
        }
    }

    let line3 = lines
        .next()
        .ok_or_else(|| syntax_error("", 3, 0, "missing line 3 (terminals)"))?;
    let term_fragments = split(line3, "`");
    let terminal_names = parse_terminal_names(&term_fragments, line3)?;
    if terminal_names.is_empty() {
        return Err(syntax_error(line3, 3, 0, "at least one terminal must be declared"));
    }
    debug!(
        "grammar symbols: {} nonterminals, {} terminals",
        1 + other_nts.len(),
        terminal_names.len()
    );

    let table = SymbolTable::new(&start_name, &epsilon_name, &other_nts, &terminal_names);

    let mut rules: Vec<Rule> = vec![Rule {
        lhs: AUXILIARY,
        rhs: vec![START],
    }];
    let mut rules_by_lhs: HashMap<SymbolId, Vec<usize>> = HashMap::new();
    rules_by_lhs.insert(AUXILIARY, vec![0]);

    let declaration_order: Vec<String> = std::iter::once(start_name.clone())
        .chain(other_nts.iter().cloned())
        .collect();

    for (i, nt_name) in declaration_order.iter().enumerate() {
        let line_no = 4 + i;
        let line = lines
            .next()
            .ok_or_else(|| syntax_error("", line_no, 0, format!("missing rule line for `{}`", nt_name)))?;
        parse_rule_line(&table, nt_name, line, line_no, &mut rules, &mut rules_by_lhs)?;
    }

    for nt in table.nonterminal_ids() {
        if rules_by_lhs.get(&nt).map(Vec::is_empty).unwrap_or(true) {
            return Err(GrammarError::IncorrectGrammarInput {
                message: format!("nonterminal `{}` has no rule", table.name(nt).unwrap()),
                line: 0,
                column: 0,
                pointer: String::new(),
            });
        }
    }

    debug!("loaded grammar with {} rules", rules.len());
    Ok(Grammar {
        symbols: table,
        rules,
        rules_by_lhs,
    })
}

fn parse_terminal_names(fragments: &[String], line: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let mut i = 0;
    while i < fragments.len() {
        let frag = &fragments[i];
        if frag == "\\" && i + 1 < fragments.len() && fragments[i + 1].is_empty() {
            names.push("`".to_string());
            i += 2;
            continue;
        }
        match frag.as_str() {
            "\\|" => names.push("|".to_string()),
            "\\\\" => names.push("\\".to_string()),
            s if !s.is_empty() && s.chars().count() == 1 => names.push(s.to_string()),
            s => {
                return Err(syntax_error(
                    line,
                    3,
                    0,
                    format!("terminal `{}` is not a single character or a valid escape", s),
                ))
            }
        }
        i += 1;
    }
    Ok(names)
}

fn parse_rule_line(
    table: &SymbolTable,
    nt_name: &str,
    line: &str,
    line_no: usize,
    rules: &mut Vec<Rule>,
    rules_by_lhs: &mut HashMap<SymbolId, Vec<usize>>,
) -> Result<()> {
    let arrow_at = line
        .find(ARROW)
        .ok_or_else(|| syntax_error(line, line_no, 0, "missing ` -> ` (spaces around the arrow are required)"))?;
    let lhs_text = &line[..arrow_at];
    if lhs_text != nt_name {
        return Err(syntax_error(
            line,
            line_no,
            0,
            format!("expected left-hand side `{}`, found `{}`", nt_name, lhs_text),
        ));
    }
    let lhs_id = table
        .id(nt_name)
        .expect("declared nonterminal must already be registered");

    let rhs_text = &line[arrow_at + ARROW.len()..];
    if rhs_text.is_empty() {
        return Err(syntax_error(line, line_no, arrow_at + ARROW.len(), "rule has no right-hand sides"));
    }

    for alt in split(rhs_text, ALT_SEP) {
        if alt == table.epsilon_name() {
            let idx = rules.len();
            rules.push(Rule {
                lhs: lhs_id,
                rhs: vec![EPSILON],
            });
            rules_by_lhs.entry(lhs_id).or_default().push(idx);
            continue;
        }
        if alt.is_empty() {
            return Err(syntax_error(line, line_no, arrow_at, "empty right-hand side"));
        }
        let fragments = split(&alt, "`");
        let rhs_ids = parse_rhs_fragments(table, &fragments, line, line_no)?;
        if rhs_ids.is_empty() {
            return Err(syntax_error(line, line_no, arrow_at, "right-hand side resolved to no symbols"));
        }
        if rhs_ids.contains(&EPSILON) {
            return Err(syntax_error(
                line,
                line_no,
                arrow_at,
                "epsilon may only appear as a standalone right-hand side",
            ));
        }
        let idx = rules.len();
        rules.push(Rule { lhs: lhs_id, rhs: rhs_ids });
        rules_by_lhs.entry(lhs_id).or_default().push(idx);
    }
    Ok(())
}

/// Parse the symbols of one right-hand side from its back-tick split
/// fragments: option (a) an explicit named token that matches the whole
/// fragment (a multi-character nonterminal name, or a single-character
/// terminal name), option (b) a run of single-character terminals scanned
/// left to right, option (c) the three escape sequences. A fragment split
/// first, matched second, preserves longest-match behavior even when one
/// nonterminal name is a prefix of another (see §9 design notes).
fn parse_rhs_fragments(table: &SymbolTable, fragments: &[String], line: &str, line_no: usize) -> Result<Vec<SymbolId>> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < fragments.len() {
        let frag = &fragments[i];
        if frag == "\\" && i + 1 < fragments.len() && fragments[i + 1].is_empty() {
            let id = table
                .id("`")
                .ok_or_else(|| syntax_error(line, line_no, 0, "back-tick used but not declared as a terminal"))?;
            out.push(id);
            i += 2;
            continue;
        }
        if frag.is_empty() {
            return Err(syntax_error(line, line_no, 0, "unexpected empty fragment (stray back-tick pair)"));
        }
        if let Some(id) = table.id(frag) {
            out.push(id);
        } else {
            out.extend(parse_terminal_run(table, frag, line, line_no)?);
        }
        i += 1;
    }
    Ok(out)
}

fn parse_terminal_run(table: &SymbolTable, frag: &str, line: &str, line_no: usize) -> Result<Vec<SymbolId>> {
    let chars: Vec<char> = frag.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            let escaped = match chars.get(i + 1) {
                Some('|') => '|',
                Some('\\') => '\\',
                _ => {
                    return Err(syntax_error(line, line_no, i, "dangling `\\` in right-hand side"));
                }
            };
            let id = table
                .id(&escaped.to_string())
                .ok_or_else(|| syntax_error(line, line_no, i, format!("`{}` is not a declared terminal", escaped)))?;
            out.push(id);
            i += 2;
        } else {
            let name = c.to_string();
            let id = table
                .id(&name)
                .ok_or_else(|| syntax_error(line, line_no, i, format!("unknown symbol `{}`", name)))?;
            if is_nonterminal(id) {
                return Err(syntax_error(
                    line,
                    line_no,
                    i,
                    format!("nonterminal `{}` must not appear as a bare character", name),
                ));
            }
            if id == EPSILON {
                return Err(syntax_error(
                    line,
                    line_no,
                    i,
                    "epsilon may only appear as a standalone right-hand side",
                ));
            }
            debug_assert!(is_terminal(id));
            out.push(id);
            i += 1;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palindrome_grammar() -> &'static str {
        "S`e\n\nab\nS -> aSa | bSb | a | b | e\n"
    }

    #[test]
    fn loads_simple_grammar() {
        let g = Grammar::load_str(palindrome_grammar()).expect("should load");
        assert_eq!(g.symbols().nonterminal_count(), 1);
        assert_eq!(g.symbols().terminal_count(), 2);
        assert_eq!(g.rules_for(START).len(), 5);
    }

    #[test]
    fn nested_nonterminal_grammar() {
        let text = "S`e\nA`B`C\nabc\nS -> A B C\nA -> a A | e\nB -> b B | e\nC -> c C | e\n";
        let g = Grammar::load_str(text).expect("should load");
        assert_eq!(g.symbols().nonterminal_count(), 4);
        assert_eq!(g.symbols().terminal_count(), 3);
        assert_eq!(g.rules_for(g.symbols().id("A").unwrap()).len(), 2);
    }

    #[test]
    fn missing_arrow_spacing_is_rejected() {
        let text = "S`e\n\na\nS->a\n";
        let err = Grammar::load_str(text).unwrap_err();
        assert!(matches!(err, GrammarError::IncorrectGrammarInput { .. }));
    }

    #[test]
    fn epsilon_alias_mixed_into_rhs_is_rejected_not_panicked() {
        // "e" is the epsilon alias here, so "ae" must not silently resolve
        // epsilon as a bare character inside a non-epsilon rhs.
        let text = "S`e\n\na\nS -> ae\n";
        let err = Grammar::load_str(text).unwrap_err();
        assert!(matches!(err, GrammarError::IncorrectGrammarInput { .. }));
    }

    #[test]
    fn undeclared_symbol_in_rhs_is_rejected() {
        let text = "S`e\n\na\nS -> b\n";
        let err = Grammar::load_str(text).unwrap_err();
        assert!(matches!(err, GrammarError::IncorrectGrammarInput { .. }));
    }

    #[test]
    fn nonterminal_without_rule_is_rejected() {
        let text = "S`e\nA\na\nS -> a\n";
        let err = Grammar::load_str(text).unwrap_err();
        assert!(matches!(err, GrammarError::IncorrectGrammarInput { .. }));
    }

    #[test]
    fn escape_forms_round_trip() {
        // Terminals: `|`, `\`, the back-tick itself, and `a`.
        let terminals_line = r"\|`\\`\``a";
        let rule_line = r"S -> \| | \\ | \` | a";
        let text = format!("S`e\n\n{}\n{}\n", terminals_line, rule_line);
        let g = Grammar::load_str(&text).expect("should load");
        assert_eq!(g.symbols().terminal_count(), 4);
        assert_eq!(g.rules_for(START).len(), 4);

        let mut out = Vec::new();
        g.print(&mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();
        let reloaded = Grammar::load_str(&printed).expect("round-trip should reload");
        assert_eq!(reloaded.symbols().terminal_count(), g.symbols().terminal_count());
        assert_eq!(reloaded.rules_for(START).len(), g.rules_for(START).len());
    }

    #[test]
    fn print_then_reload_preserves_rule_shape() {
        let g = Grammar::load_str(palindrome_grammar()).unwrap();
        let mut out = Vec::new();
        g.print(&mut out).unwrap();
        let reloaded = Grammar::load_str(&String::from_utf8(out).unwrap()).unwrap();
        assert_eq!(reloaded.rules_for(START).len(), g.rules_for(START).len());
    }
}
