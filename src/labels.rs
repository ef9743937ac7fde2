//! Best-effort label inference.
//!
//! LC-3 source has no reliable marker for a label, so every word-like token
//! in the document that is not a number, a branch mnemonic or a known keyword
//! is treated as one. String literal contents are skipped.

use std::collections::HashSet;

use crate::tables;

/// Returns `line` with everything from the first `;` removed.
pub fn strip_comment(line: &str) -> &str {
    match line.find(';') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$')
}

// A run of only `.` and `$` is punctuation, not a word.
fn is_word(run: &str) -> bool {
    run.chars().any(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split a comment-free line into word tokens.
///
/// Characters inside double quotes never form tokens. A `\"` inside a string
/// does not close it, and an unterminated string runs to the end of the line.
pub fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, c) in line.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        if is_word_char(c) {
            if start.is_none() {
                start = Some(idx);
            }
            continue;
        }

        if let Some(s) = start.take() {
            if is_word(&line[s..idx]) {
                tokens.push(&line[s..idx]);
            }
        }
        if c == '"' {
            in_string = true;
        }
    }

    if let Some(s) = start.filter(|&s| is_word(&line[s..])) {
        tokens.push(&line[s..]);
    }
    tokens
}

/// `x` followed by one or more hex digits, any case.
fn is_hex_literal(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(chars.next(), Some('x' | 'X'))
        && !chars.as_str().is_empty()
        && chars.all(|c| c.is_ascii_hexdigit())
}

fn is_decimal_literal(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// `BR` with optional `n`, `z`, `p` flags in that order, any case.
fn is_branch_mnemonic(token: &str) -> bool {
    let lower = token.to_ascii_lowercase();
    let Some(mut rest) = lower.strip_prefix("br") else {
        return false;
    };
    for flag in ["n", "z", "p"] {
        rest = rest.strip_prefix(flag).unwrap_or(rest);
    }
    rest.is_empty()
}

/// Whether `token` could name a label, given the word currently being typed.
pub fn is_label_candidate(token: &str, prefix: &str) -> bool {
    !(token == prefix
        || is_hex_literal(token)
        || is_decimal_literal(token)
        || is_branch_mnemonic(token)
        || tables::is_keyword(token))
}

/// Collect distinct label candidates from `lines`, in order of first appearance.
pub fn infer_labels<S: AsRef<str>>(lines: &[S], prefix: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut labels = Vec::new();

    for line in lines {
        for token in tokenize(strip_comment(line.as_ref())) {
            if !is_label_candidate(token, prefix) {
                continue;
            }
            if seen.insert(token) {
                labels.push(token.to_string());
            }
        }
    }

    labels
}
