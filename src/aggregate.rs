// src/aggregate.rs
//! Cross-file aggregation: per-file counts become per-symbol breakdowns.

use crate::counter::FileCount;
use crate::types::{Symbol, UsageKind};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Aggregate usage of one symbol across the files of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolBreakdown {
    pub total: usize,
    /// `(filename, count)`, highest count first, ties in file order.
    pub breakdown: Vec<(String, usize)>,
}

impl SymbolBreakdown {
    fn from_entries(mut entries: Vec<(String, usize)>) -> Self {
        // Stable: equal counts keep the order files were ingested in.
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Self {
            total: entries.iter().map(|(_, n)| n).sum(),
            breakdown: entries,
        }
    }
}

/// Symbol number to breakdown, sorted by symbol.
pub type SymbolTable = BTreeMap<Symbol, SymbolBreakdown>;

/// Game to symbol table, sorted by game.
pub type GameTables = BTreeMap<String, SymbolTable>;

#[derive(Debug, Default)]
struct GameAccumulator {
    opcodes: HashMap<Symbol, Vec<(String, usize)>>,
    registers: HashMap<Symbol, Vec<(String, usize)>>,
}

impl GameAccumulator {
    fn table_mut(&mut self, kind: UsageKind) -> &mut HashMap<Symbol, Vec<(String, usize)>> {
        match kind {
            UsageKind::Opcode => &mut self.opcodes,
            UsageKind::Register => &mut self.registers,
        }
    }
}

/// Accumulates file counts for one format, keyed by game.
///
/// Files must be ingested in the order the corpus walker produced them;
/// that order is what breaks ties between equal counts.
#[derive(Debug, Default)]
pub struct Aggregator {
    games: BTreeMap<String, GameAccumulator>,
}

impl Aggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `game` appear in the output even if none of its files use anything.
    pub fn register_game(&mut self, game: &str) {
        if !self.games.contains_key(game) {
            self.games.insert(game.to_string(), GameAccumulator::default());
        }
    }

    /// Folds one file's counts into the accumulator.
    pub fn ingest(&mut self, game: &str, filename: &str, counts: FileCount) {
        self.register_game(game);
        let Some(acc) = self.games.get_mut(game) else {
            return;
        };
        for (kind, table) in [
            (UsageKind::Opcode, counts.opcodes),
            (UsageKind::Register, counts.registers),
        ] {
            let target = acc.table_mut(kind);
            for (symbol, n) in table {
                if n > 0 {
                    target.entry(symbol).or_default().push((filename.to_string(), n));
                }
            }
        }
    }

    /// Sorts every breakdown and returns `(opcode tables, register tables)`.
    #[must_use]
    pub fn finish(self) -> (GameTables, GameTables) {
        let mut ins = GameTables::new();
        let mut var = GameTables::new();
        for (game, acc) in self.games {
            ins.insert(game.clone(), finish_table(acc.opcodes));
            var.insert(game, finish_table(acc.registers));
        }
        (ins, var)
    }
}

fn finish_table(raw: HashMap<Symbol, Vec<(String, usize)>>) -> SymbolTable {
    raw.into_iter()
        .map(|(symbol, entries)| (symbol, SymbolBreakdown::from_entries(entries)))
        .collect()
}
