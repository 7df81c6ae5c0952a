//! # Alias expansion
//!
//! Expands dot commands in a token stream against an [`AliasTable`].
//! The scan walks right to left and restarts from the back after every
//! expansion, so replacement text that names further aliases expands
//! too. A shared pass budget bounds the rescans and turns
//! self-referential definitions into an error instead of a hang.

use crate::error::{ParseError, Result};
use crate::table::AliasTable;

/// Token visits allowed while expanding a single command.
pub const MAX_EXPANSION_PASSES: u32 = 1_000;

/// Expand every alias in `tokens` in place.
pub fn expand_aliases(tokens: &mut Vec<String>, table: &AliasTable) -> Result<()> {
    let mut passes_left = MAX_EXPANSION_PASSES;
    let mut index = tokens.len();
    while index > 0 {
        index -= 1;
        passes_left -= 1;
        if passes_left == 0 {
            return Err(ParseError::AliasRecursion(MAX_EXPANSION_PASSES));
        }

        let Some(definition) = table.get(&tokens[index]) else {
            continue;
        };

        // Take the tokens after the alias to fill its argument list,
        // padding with empties when the line runs short.
        let available = tokens.len() - index - 1;
        let consumed = definition.argument_count.min(available);
        let mut arguments = tokens[index + 1..index + 1 + consumed].to_vec();
        arguments.resize(definition.argument_count, String::new());

        let replacement = if definition.argument_count == 0 {
            definition.replacement_tokens.clone()
        } else {
            substitute_placeholders(&definition.replacement_tokens, &arguments)
        };

        // Splice the replacement over the alias and its consumed
        // arguments, then rescan from the back.
        tokens.splice(index..=index + consumed, replacement);
        index = tokens.len();
    }
    Ok(())
}

fn substitute_placeholders(template: &[String], arguments: &[String]) -> Vec<String> {
    let mut result = template.to_vec();
    for (position, argument) in arguments.iter().enumerate() {
        let placeholder = format!("${}", position + 1);
        for token in &mut result {
            *token = token.replace(&placeholder, argument);
        }
    }
    result
}

// ─────────────────────── Tests ───────────────────────
