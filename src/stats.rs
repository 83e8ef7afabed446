// src/stats.rs
//! Drives walk -> decompile -> scan -> count -> aggregate for each format.

use crate::aggregate::{Aggregator, GameTables};
use crate::counter::FileCount;
use crate::decompile::Decompile;
use crate::discovery;
use crate::error::{OpstatError, Result};
use crate::types::{Format, Location};
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use rayon::ThreadPool;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::Path;

/// Usage statistics for one format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormatStats {
    #[serde(rename = "num-files")]
    pub num_files: BTreeMap<String, usize>,
    pub ins: GameTables,
    pub var: GameTables,
}

/// Headline numbers for one format, used for progress output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatSummary {
    pub games: usize,
    pub files: usize,
    pub distinct_opcodes: usize,
    pub distinct_registers: usize,
    pub occurrences: usize,
}

impl FormatStats {
    #[must_use]
    pub fn summary(&self) -> FormatSummary {
        let distinct = |tables: &GameTables| {
            let mut all: Vec<_> = tables.values().flat_map(|t| t.keys()).collect();
            all.sort();
            all.dedup();
            all.len()
        };
        let occurrences = self
            .ins
            .values()
            .chain(self.var.values())
            .flat_map(|t| t.values())
            .map(|b| b.total)
            .sum();

        FormatSummary {
            games: self.num_files.len(),
            files: self.num_files.values().sum(),
            distinct_opcodes: distinct(&self.ins),
            distinct_registers: distinct(&self.var),
            occurrences,
        }
    }
}

/// Statistics for every requested format, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusResult {
    formats: Vec<(Format, FormatStats)>,
}

impl CorpusResult {
    #[must_use]
    pub fn get(&self, format: Format) -> Option<&FormatStats> {
        self.formats.iter().find(|(f, _)| *f == format).map(|(_, s)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Format, &FormatStats)> {
        self.formats.iter().map(|(f, s)| (*f, s))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Appends statistics for `format`, replacing any earlier entry for it.
    pub fn push(&mut self, format: Format, stats: FormatStats) {
        self.formats.retain(|(f, _)| *f != format);
        self.formats.push((format, stats));
    }
}

impl Serialize for CorpusResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.formats.len()))?;
        for (format, stats) in &self.formats {
            map.serialize_entry(format.as_str(), stats)?;
        }
        map.end()
    }
}

/// Orchestrates the statistics pipeline over a corpus root.
pub struct Assembler<D> {
    decompiler: D,
    jobs: usize,
}

impl<D: Decompile> Assembler<D> {
    /// `jobs` bounds the number of concurrent decompiler processes;
    /// `0` or `1` runs everything on the calling thread.
    #[must_use]
    pub fn new(decompiler: D, jobs: usize) -> Self {
        Self { decompiler, jobs }
    }

    /// Gathers statistics for each of `formats` under `root`.
    ///
    /// # Errors
    /// Fails on the first walk error or decompiler failure; no partial result
    /// is returned.
    pub fn gather(&self, root: &Path, formats: &[Format]) -> Result<CorpusResult> {
        self.gather_with_progress(root, formats, &|_: &Location| {}, &|_: Format, _: &FormatStats| {})
    }

    /// Same as [`Assembler::gather`], with callbacks invoked for each file
    /// before it is decompiled and for each finished format.
    ///
    /// # Errors
    /// See [`Assembler::gather`].
    pub fn gather_with_progress<F, S>(
        &self,
        root: &Path,
        formats: &[Format],
        on_file: &F,
        on_format: &S,
    ) -> Result<CorpusResult>
    where
        F: Fn(&Location) + Sync,
        S: Fn(Format, &FormatStats),
    {
        let pool = self.build_pool()?;
        let mut result = CorpusResult::default();
        for &format in formats {
            let stats = self.gather_format(root, format, pool.as_ref(), on_file)?;
            on_format(format, &stats);
            result.push(format, stats);
        }
        Ok(result)
    }

    fn gather_format<F>(
        &self,
        root: &Path,
        format: Format,
        pool: Option<&ThreadPool>,
        on_file: &F,
    ) -> Result<FormatStats>
    where
        F: Fn(&Location) + Sync,
    {
        let mut num_files = BTreeMap::new();
        let mut aggregator = Aggregator::new();
        for item in discovery::format_dirs(root, format) {
            let (game, _) = item?;
            aggregator.register_game(&game);
            num_files.insert(game, 0);
        }

        let locations = discovery::discover(root, &[format])?;
        for loc in &locations {
            *num_files.entry(loc.game.clone()).or_insert(0) += 1;
        }

        let counts = self.count_files(&locations, pool, on_file)?;

        for (loc, file_count) in locations.iter().zip(counts) {
            aggregator.ingest(&loc.game, &loc.filename, file_count);
        }
        let (ins, var) = aggregator.finish();

        Ok(FormatStats { num_files, ins, var })
    }

    /// Counts every file, returning results in the same order as `locations`
    /// regardless of completion order.
    fn count_files<F>(
        &self,
        locations: &[Location],
        pool: Option<&ThreadPool>,
        on_file: &F,
    ) -> Result<Vec<FileCount>>
    where
        F: Fn(&Location) + Sync,
    {
        let count_one = |loc: &Location| -> Result<FileCount> {
            on_file(loc);
            let source = self.decompiler.decompile(loc)?;
            FileCount::from_source(&source)
        };

        match pool {
            Some(pool) => pool.install(|| locations.par_iter().map(count_one).collect()),
            None => locations.iter().map(count_one).collect(),
        }
    }

    fn build_pool(&self) -> Result<Option<ThreadPool>> {
        if self.jobs <= 1 {
            return Ok(None);
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map(Some)
            .map_err(|e| OpstatError::Config(format!("cannot start worker pool: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Symbol;
    use std::fs;
    use tempfile::TempDir;

    /// Treats the file content itself as the decompiled text.
    struct ReadFile;

    impl Decompile for ReadFile {
        fn decompile(&self, location: &Location) -> Result<String> {
            Ok(fs::read_to_string(&location.path)?)
        }
    }

    struct FailOn(&'static str);

    impl Decompile for FailOn {
        fn decompile(&self, location: &Location) -> Result<String> {
            if location.filename == self.0 {
                return Err(OpstatError::ToolFailed {
                    command: "fake".into(),
                    path: location.path.clone(),
                    exit_code: 1,
                    stderr: String::new(),
                });
            }
            Ok(String::new())
        }
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, content).unwrap();
    }

    fn corpus() -> TempDir {
        let d = TempDir::new().unwrap();
        write(d.path(), "gameA/anm/f1", "ins_3(REG[1001]);\nins_3();");
        write(d.path(), "gameA/anm/f2", "ins_3(REG[5]);");
        d
    }

    #[test]
    fn end_to_end_scenario() {
        let d = corpus();
        let result = Assembler::new(ReadFile, 1).gather(d.path(), &[Format::Anm]).unwrap();
        let anm = result.get(Format::Anm).unwrap();

        let ins = &anm.ins["gameA"][&Symbol::new("3")];
        assert_eq!(ins.total, 3);
        assert_eq!(ins.breakdown, [("f1".to_string(), 2), ("f2".to_string(), 1)]);

        let var = &anm.var["gameA"][&Symbol::new("1001")];
        assert_eq!(var.total, 1);
        assert_eq!(var.breakdown, [("f1".to_string(), 1)]);
        assert!(!anm.var["gameA"].contains_key(&Symbol::new("5")));

        assert_eq!(anm.num_files["gameA"], 2);
    }

    #[test]
    fn parallel_matches_sequential() {
        let d = corpus();
        for i in 0..12 {
            write(d.path(), &format!("gameB/anm/x{i:02}"), "ins_7 REG[100]");
        }
        let seq = Assembler::new(ReadFile, 1).gather(d.path(), &[Format::Anm]).unwrap();
        let par = Assembler::new(ReadFile, 4).gather(d.path(), &[Format::Anm]).unwrap();
        assert_eq!(seq, par);

        let files: Vec<&str> = par.get(Format::Anm).unwrap().ins["gameB"][&Symbol::new("7")]
            .breakdown
            .iter()
            .map(|(f, _)| f.as_str())
            .collect();
        let mut sorted = files.clone();
        sorted.sort_unstable();
        assert_eq!(files, sorted);
    }

    #[test]
    fn files_without_tokens_still_counted() {
        let d = TempDir::new().unwrap();
        write(d.path(), "06/msg/empty", "nothing");
        let result = Assembler::new(ReadFile, 1).gather(d.path(), &[Format::Msg]).unwrap();
        let msg = result.get(Format::Msg).unwrap();
        assert_eq!(msg.num_files["06"], 1);
        assert!(msg.ins["06"].is_empty());
        assert!(msg.var["06"].is_empty());
    }

    #[test]
    fn empty_format_directory_counts_as_zero_files() {
        let d = TempDir::new().unwrap();
        fs::create_dir_all(d.path().join("06/anm")).unwrap();
        write(d.path(), "07/anm/a", "ins_1");

        let result = Assembler::new(ReadFile, 1).gather(d.path(), &[Format::Anm]).unwrap();
        let anm = result.get(Format::Anm).unwrap();
        assert_eq!(anm.num_files.get("06"), Some(&0));
        assert_eq!(anm.num_files.get("07"), Some(&1));
        assert!(anm.ins["06"].is_empty());
        assert!(anm.var["06"].is_empty());
        assert_eq!(anm.ins["07"][&Symbol::new("1")].total, 1);
    }

    #[test]
    fn absent_format_yields_empty_stats() {
        let d = corpus();
        let result = Assembler::new(ReadFile, 1)
            .gather(d.path(), &[Format::Anm, Format::Std])
            .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.get(Format::Std), Some(&FormatStats::default()));
    }

    #[test]
    fn one_failure_aborts_run() {
        let d = corpus();
        for jobs in [1, 3] {
            let err = Assembler::new(FailOn("f2"), jobs)
                .gather(d.path(), &[Format::Anm])
                .unwrap_err();
            assert!(err.is_tool_error());
        }
    }

    #[test]
    fn progress_callbacks_fire() {
        let d = corpus();
        let seen = std::sync::Mutex::new(Vec::new());
        let finished = std::cell::Cell::new(0);
        Assembler::new(ReadFile, 1)
            .gather_with_progress(
                d.path(),
                &[Format::Anm],
                &|loc: &Location| seen.lock().unwrap().push(loc.filename.clone()),
                &|_: Format, _: &FormatStats| finished.set(finished.get() + 1),
            )
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), ["f1", "f2"]);
        assert_eq!(finished.get(), 1);
    }

    #[test]
    fn summary_counts() {
        let d = corpus();
        let result = Assembler::new(ReadFile, 1).gather(d.path(), &[Format::Anm]).unwrap();
        let s = result.get(Format::Anm).unwrap().summary();
        assert_eq!(s.games, 1);
        assert_eq!(s.files, 2);
        assert_eq!(s.distinct_opcodes, 1);
        assert_eq!(s.distinct_registers, 1);
        assert_eq!(s.occurrences, 4);
    }

    #[test]
    fn serializes_formats_in_request_order() {
        let d = corpus();
        let result = Assembler::new(ReadFile, 1)
            .gather(d.path(), &[Format::Std, Format::Anm])
            .unwrap();
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.starts_with("{\"std\":{\"num-files\":{}"));
        assert!(json.contains("\"ins\":{\"gameA\":{\"3\":{\"total\":3,\"breakdown\":[[\"f1\",2],[\"f2\",1]]}}}"));
    }
}
