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

//! Knuth-Morris-Pratt string splitting.
//!
//! Splits a string on a literal, possibly multi-character delimiter, keeping
//! every fragment between matches, including empty ones. Used by the
//! grammar loader to tokenize the back-tick delimited sections of a grammar
//! file (see the `grammar` module).

/// Build the KMP failure table (longest proper prefix which is also a
/// suffix) for `pattern`, indexed by character.
fn failure_table(pattern: &[char]) -> Vec<usize> {
    let mut table = vec![0usize; pattern.len()];
    let mut k = 0;
    for i in 1..pattern.len() {
        while k > 0 && pattern[k] != pattern[i] {
            k = table[k - 1];
        }
        if pattern[k] == pattern[i] {
            k += 1;
        }
        table[i] = k;
    }
    table
}

/// Find every non-overlapping, leftmost occurrence of `pattern` in `text`,
/// returning the starting index (in `char` units) of each match.
fn find_all(text: &[char], pattern: &[char]) -> Vec<usize> {
    let mut matches = Vec::new();
    if pattern.is_empty() || text.len() < pattern.len() {
        return matches;
    }
    let table = failure_table(pattern);
    let mut k = 0;
    let mut i = 0;
    while i < text.len() {
        while k > 0 && pattern[k] != text[i] {
            k = table[k - 1];
        }
        if pattern[k] == text[i] {
            k += 1;
        }
        if k == pattern.len() {
            let start = i + 1 - k;
            matches.push(start);
            k = 0;
            i = start + pattern.len() - 1;
        }
        i += 1;
    }
    matches
}

/// Split `src` on every non-overlapping occurrence of `delim`, returning the
/// fragments between matches (including empty ones). If `src` is shorter
/// than `delim`, the result is `[src]`. A trailing delimiter yields a
/// trailing empty fragment; consecutive delimiters yield empty fragments
/// between them.
pub fn split(src: &str, delim: &str) -> Vec<String> {
    if delim.is_empty() || src.len() < delim.len() {
        return vec![src.to_string()];
    }

    let text: Vec<char> = src.chars().collect();
    let pattern: Vec<char> = delim.chars().collect();
    let matches = find_all(&text, &pattern);

    let mut fragments = Vec::with_capacity(matches.len() + 1);
    let mut start = 0usize;
    for m in matches {
        fragments.push(text[start..m].iter().collect());
        start = m + pattern.len();
    }
    fragments.push(text[start..].iter().collect());
    fragments
}
