//! # Command parser
//!
//! Ties the pieces together: tokenize the typed command, expand aliases
//! against the loaded table, then resolve dynamic variables against the
//! client environment. Reloading the alias table swaps it wholesale
//! under a lock, so commands parse against either the old table or the
//! new one, never a half-built mix.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{error, info};

use crate::bridge::{
    FlightPlanRepository, GeneralSettings, MetarRepository, NavDataRepository,
    OpenPositionRepository, SessionProvider, TargetContextProvider,
};
use crate::error::Result;
use crate::expand::expand_aliases;
use crate::io::AliasSource;
use crate::table::AliasTable;
use crate::tokens::{join, tokenize};
use crate::variables::VariableResolver;

/// Parses typed radio commands.
pub struct AliasParser {
    table: RwLock<AliasTable>,
    resolver: VariableResolver,
}

impl AliasParser {
    pub fn new(
        session: Arc<dyn SessionProvider>,
        flight_plans: Arc<dyn FlightPlanRepository>,
        settings: GeneralSettings,
        metars: Arc<dyn MetarRepository>,
        nav_data: Arc<dyn NavDataRepository>,
        open_positions: Arc<dyn OpenPositionRepository>,
        contexts: Arc<dyn TargetContextProvider>,
    ) -> Self {
        Self {
            table: RwLock::new(AliasTable::new()),
            resolver: VariableResolver::new(
                session,
                flight_plans,
                settings,
                metars,
                nav_data,
                open_positions,
                contexts,
            ),
        }
    }

    /// Expand aliases and resolve dynamic variables in one command.
    ///
    /// `aircraft_id` names the aircraft the command is about, unless the
    /// command itself leads with a `$context(ID)` directive. Text with
    /// no tokens passes through verbatim.
    pub fn parse(&self, user_text: &str, aircraft_id: Option<&str>) -> Result<String> {
        let mut tokens = tokenize(user_text);
        if tokens.is_empty() {
            return Ok(user_text.to_string());
        }

        {
            let table = self.read_table();
            expand_aliases(&mut tokens, &table)?;
        }

        let expanded = join(&tokens);
        Ok(self.resolver.resolve(&expanded, aircraft_id))
    }

    /// Rebuild the alias table from `sources`, in order.
    ///
    /// Later sources override earlier ones, so a personal alias file
    /// listed after the facility file wins on conflicts. A source that
    /// fails to read is logged and skipped.
    pub fn load_aliases(&self, sources: &[&dyn AliasSource]) {
        let mut table = AliasTable::new();
        for source in sources {
            match source.read_lines() {
                Ok(lines) => {
                    info!(origin = %source.origin(), lines = lines.len(), "Loading alias definitions");
                    table.extend(lines.iter().map(String::as_str));
                }
                Err(err) => {
                    error!(origin = %source.origin(), error = %err, "Failed to read alias source");
                }
            }
        }
        info!(aliases = table.len(), "Alias table rebuilt");
        *self.write_table() = table;
    }

    /// Number of aliases currently loaded.
    pub fn alias_count(&self) -> usize {
        self.read_table().len()
    }

    fn read_table(&self) -> RwLockReadGuard<'_, AliasTable> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_table(&self) -> RwLockWriteGuard<'_, AliasTable> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// ─────────────────────── Tests ───────────────────────
