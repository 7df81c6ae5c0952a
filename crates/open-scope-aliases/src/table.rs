//! # Alias table
//!
//! Parses alias definition lines into a lookup table. A definition line
//! names a dot command and the text it expands to, with `$1`..`$n`
//! placeholders for arguments supplied at the prompt:
//!
//! ```text
//! .ho handoff $1
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::tokens::tokenize;

static DEFINITION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\.\w+)\s+(.+)$").expect("valid alias definition pattern"));

/// A parsed alias definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasDefinition {
    /// How many `$n` placeholders the replacement consumes, counted
    /// upward from `$1` until the first gap.
    pub argument_count: usize,
    /// The replacement text, tokenized on whitespace.
    pub replacement_tokens: Vec<String>,
}

/// Lookup table of alias definitions, keyed case-insensitively by the
/// dot command.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<String, AliasDefinition>,
}

impl AliasTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of aliases defined.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the definition a token invokes, if any.
    pub fn get(&self, token: &str) -> Option<&AliasDefinition> {
        self.entries.get(&token.to_lowercase())
    }

    /// Replace the table contents with definitions parsed from `lines`.
    pub fn load<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) {
        self.entries.clear();
        self.extend(lines);
    }

    /// Parse `lines` into the table without clearing it. A definition
    /// for an already-known alias replaces the earlier one.
    pub fn extend<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) {
        for line in lines {
            self.add_line(line);
        }
    }

    fn add_line(&mut self, line: &str) {
        let trimmed = line.trim();
        if !trimmed.starts_with('.') || trimmed.len() < 4 {
            return;
        }
        let Some(captures) = DEFINITION_LINE.captures(trimmed) else {
            return;
        };
        let alias = captures[1].to_lowercase();
        let replacement = &captures[2];
        self.entries.insert(
            alias,
            AliasDefinition {
                argument_count: count_placeholders(replacement),
                replacement_tokens: tokenize(replacement),
            },
        );
    }
}

/// Count `$1`..`$n` placeholders by literal presence, stopping at the
/// first number that does not appear.
fn count_placeholders(replacement: &str) -> usize {
    let mut count = 0;
    loop {
        let placeholder = format!("${}", count + 1);
        if !replacement.contains(&placeholder) {
            break;
        }
        count += 1;
    }
    count
}

// ─────────────────────── Tests ───────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_basic_definition() {
        let mut table = AliasTable::new();
        table.load([".wx metar is $metar($1)"]);
        assert_eq!(table.len(), 1);

        let definition = table.get(".wx").unwrap();
        assert_eq!(definition.argument_count, 1);
        assert_eq!(definition.replacement_tokens, vec!["metar", "is", "$metar($1)"]);
    }

    #[test]
    fn test_lookup_ignores_case() {
        let mut table = AliasTable::new();
        table.load([".Ho handoff $1"]);
        assert!(table.get(".ho").is_some());
        assert!(table.get(".HO").is_some());
    }

    #[test]
    fn test_skips_unparseable_lines() {
        let mut table = AliasTable::new();
        table.load([
            "climb and maintain",
            "",
            ".ho",
            ".wx",
            ". spaced out",
            ".solitary",
        ]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_accepts_indented_definitions() {
        let mut table = AliasTable::new();
        table.load(["   .ho handoff $1   "]);
        let definition = table.get(".ho").unwrap();
        assert_eq!(definition.replacement_tokens, vec!["handoff", "$1"]);
    }

    #[test]
    fn test_counts_contiguous_placeholders() {
        let mut table = AliasTable::new();
        table.load([".a $1 then $2 then $3", ".b $1 skip to $3", ".c only $2"]);
        assert_eq!(table.get(".a").unwrap().argument_count, 3);
        assert_eq!(table.get(".b").unwrap().argument_count, 1);
        assert_eq!(table.get(".c").unwrap().argument_count, 0);
    }

    #[test]
    fn test_placeholder_count_matches_on_literal_text() {
        let mut table = AliasTable::new();
        table.load([".rwy expect runway $1x2"]);
        assert_eq!(table.get(".rwy").unwrap().argument_count, 1);
    }

    #[test]
    fn test_later_definition_overrides_earlier() {
        let mut table = AliasTable::new();
        table.load([".gc ground point seven", ".gc ground point eight"]);
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.get(".gc").unwrap().replacement_tokens,
            vec!["ground", "point", "eight"]
        );
    }

    #[test]
    fn test_load_clears_but_extend_accumulates() {
        let mut table = AliasTable::new();
        table.load([".a one"]);
        table.extend([".b two"]);
        assert_eq!(table.len(), 2);

        table.load([".c three"]);
        assert_eq!(table.len(), 1);
        assert!(table.get(".a").is_none());
    }

    #[test]
    fn test_replacement_whitespace_collapses() {
        let mut table = AliasTable::new();
        table.load([".pd  proceed   direct  $1"]);
        assert_eq!(
            table.get(".pd").unwrap().replacement_tokens,
            vec!["proceed", "direct", "$1"]
        );
    }
}
