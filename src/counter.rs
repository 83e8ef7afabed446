// src/counter.rs
//! Per-file occurrence counting.

use crate::error::Result;
use crate::types::{Symbol, UsageEvent, UsageKind};
use std::collections::HashMap;

/// Occurrence counts for one file, split by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileCount {
    pub opcodes: HashMap<Symbol, usize>,
    pub registers: HashMap<Symbol, usize>,
}

impl FileCount {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a sequence of events into counts.
    #[must_use]
    pub fn from_events<I>(events: I) -> Self
    where
        I: IntoIterator<Item = UsageEvent>,
    {
        let mut counts = Self::new();
        for event in events {
            counts.record(event);
        }
        counts
    }

    /// Scans `source` and counts every usage.
    ///
    /// # Errors
    /// Propagates scanner invariant violations.
    pub fn from_source(source: &str) -> Result<Self> {
        Ok(Self::from_events(crate::scanner::scan_all(source)?))
    }

    pub fn record(&mut self, event: UsageEvent) {
        let (kind, number) = event.into_parts();
        *self.of_kind_mut(kind).entry(number).or_insert(0) += 1;
    }

    #[must_use]
    pub fn of_kind(&self, kind: UsageKind) -> &HashMap<Symbol, usize> {
        match kind {
            UsageKind::Opcode => &self.opcodes,
            UsageKind::Register => &self.registers,
        }
    }

    fn of_kind_mut(&mut self, kind: UsageKind) -> &mut HashMap<Symbol, usize> {
        match kind {
            UsageKind::Opcode => &mut self.opcodes,
            UsageKind::Register => &mut self.registers,
        }
    }

    #[must_use]
    pub fn get(&self, kind: UsageKind, number: &str) -> usize {
        self.of_kind(kind)
            .get(&Symbol::new(number))
            .copied()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.opcodes.is_empty() && self.registers.is_empty()
    }
}
