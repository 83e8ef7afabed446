//! JSON output for corpus statistics, plus stderr progress lines.
//!
//! The default encoding is pretty-printed. The compact encoding is minified
//! and replaces every filename in a breakdown with an index into a
//! per-format `filenames` table.

use crate::aggregate::GameTables;
use crate::stats::{CorpusResult, FormatStats, FormatSummary};
use crate::types::{Format, Location, Symbol};
use anyhow::Result;
use colored::Colorize;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Pretty,
    Compact,
}

/// Renders `result` in the chosen encoding.
///
/// # Errors
/// Returns error if serialization fails.
pub fn render(result: &CorpusResult, encoding: Encoding) -> Result<String> {
    Ok(match encoding {
        Encoding::Pretty => serde_json::to_string_pretty(result)?,
        Encoding::Compact => serde_json::to_string(&CompactCorpus(result))?,
    })
}

/// Writes `result` followed by a newline.
///
/// # Errors
/// Returns error if serialization or the write fails.
pub fn write_json<W: Write>(out: &mut W, result: &CorpusResult, encoding: Encoding) -> Result<()> {
    let json = render(result, encoding)?;
    writeln!(out, "{json}")?;
    Ok(())
}

/// Progress line for one file, shown in verbose mode.
pub fn print_location(loc: &Location) {
    eprintln!(
        "{}",
        format!("  {}/{}/{}", loc.game, loc.format, loc.filename).dimmed()
    );
}

/// One-line summary for a finished format.
pub fn print_summary(format: Format, summary: &FormatSummary, elapsed: Duration) {
    eprintln!(
        "{} {} files in {} games, {} opcodes, {} registers, {} uses ({}ms)",
        format!("[{format}]").cyan().bold(),
        summary.files,
        summary.games,
        summary.distinct_opcodes,
        summary.distinct_registers,
        summary.occurrences,
        elapsed.as_millis()
    );
}

struct CompactCorpus<'a>(&'a CorpusResult);

impl Serialize for CompactCorpus<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (format, stats) in self.0.iter() {
            map.serialize_entry(format.as_str(), &CompactFormat::new(stats))?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct CompactFormat<'a> {
    filenames: Vec<&'a str>,
    #[serde(rename = "num-files")]
    num_files: &'a BTreeMap<String, usize>,
    ins: CompactTables<'a>,
    var: CompactTables<'a>,
}

type CompactTables<'a> = BTreeMap<&'a str, BTreeMap<&'a Symbol, CompactBreakdown>>;

#[derive(Serialize)]
struct CompactBreakdown {
    total: usize,
    breakdown: Vec<(usize, usize)>,
}

#[derive(Default)]
struct Interner<'a> {
    ids: HashMap<&'a str, usize>,
    names: Vec<&'a str>,
}

impl<'a> Interner<'a> {
    fn intern(&mut self, name: &'a str) -> usize {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len();
        self.ids.insert(name, id);
        self.names.push(name);
        id
    }
}

impl<'a> CompactFormat<'a> {
    fn new(stats: &'a FormatStats) -> Self {
        let mut interner = Interner::default();
        let ins = compact_tables(&stats.ins, &mut interner);
        let var = compact_tables(&stats.var, &mut interner);
        Self {
            filenames: interner.names,
            num_files: &stats.num_files,
            ins,
            var,
        }
    }
}

fn compact_tables<'a>(tables: &'a GameTables, interner: &mut Interner<'a>) -> CompactTables<'a> {
    tables
        .iter()
        .map(|(game, table)| {
            let symbols = table
                .iter()
                .map(|(symbol, b)| {
                    let breakdown = b
                        .breakdown
                        .iter()
                        .map(|(file, n)| (interner.intern(file), *n))
                        .collect();
                    (symbol, CompactBreakdown { total: b.total, breakdown })
                })
                .collect();
            (game.as_str(), symbols)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Aggregator;
    use crate::counter::FileCount;
    use serde_json::Value;

    fn sample() -> FormatStats {
        let mut agg = Aggregator::new();
        agg.ingest("06", "b.anm", FileCount::from_source("ins_1 ins_1 REG[100]").unwrap());
        agg.ingest("06", "a.anm", FileCount::from_source("ins_1 ins_2 REG[100]").unwrap());
        let (ins, var) = agg.finish();
        FormatStats {
            num_files: BTreeMap::from([("06".to_string(), 2)]),
            ins,
            var,
        }
    }

    fn result() -> CorpusResult {
        let mut r = CorpusResult::default();
        r.push(Format::Anm, sample());
        r
    }

    #[test]
    fn pretty_uses_filenames() {
        let v: Value = serde_json::from_str(&render(&result(), Encoding::Pretty).unwrap()).unwrap();
        assert_eq!(v["anm"]["num-files"]["06"], 2);
        assert_eq!(v["anm"]["ins"]["06"]["1"]["total"], 3);
        assert_eq!(v["anm"]["ins"]["06"]["1"]["breakdown"][0][0], "b.anm");
        assert_eq!(v["anm"]["var"]["06"]["100"]["breakdown"][1][0], "a.anm");
        assert!(v["anm"].get("filenames").is_none());
    }

    #[test]
    fn compact_interns_filenames() {
        let text = render(&result(), Encoding::Compact).unwrap();
        assert!(!text.contains('\n'));
        let v: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["anm"]["filenames"], serde_json::json!(["b.anm", "a.anm"]));
        assert_eq!(v["anm"]["ins"]["06"]["1"]["breakdown"], serde_json::json!([[0, 2], [1, 1]]));
        assert_eq!(v["anm"]["ins"]["06"]["2"]["breakdown"], serde_json::json!([[1, 1]]));
        assert_eq!(v["anm"]["var"]["06"]["100"]["total"], 2);
    }

    #[test]
    fn write_json_appends_newline() {
        let mut buf = Vec::new();
        write_json(&mut buf, &CorpusResult::default(), Encoding::Compact).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "{}\n");
    }
}
