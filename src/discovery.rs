// src/discovery.rs
//! Corpus walking: `{root}/{game}/{format}/{file}` becomes one [`Location`].
//!
//! Games and files are visited in file-name order so that everything
//! downstream (tie-breaking in particular) is reproducible.

use crate::error::Result;
use crate::types::{Format, Location};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lazily enumerates every input file under `root` for the requested formats.
///
/// Game directories are visited in name order; within one game the formats
/// are visited in the order given. Missing format directories are skipped.
pub fn walk<'a>(root: &Path, formats: &'a [Format]) -> impl Iterator<Item = Result<Location>> + 'a {
    game_dirs(root).flat_map(move |item| -> Box<dyn Iterator<Item = Result<Location>> + 'a> {
        match item {
            Ok((game, dir)) => Box::new(
                formats
                    .iter()
                    .flat_map(move |&format| format_files(game.clone(), &dir, format)),
            ),
            Err(e) => Box::new(std::iter::once(Err(e))),
        }
    })
}

/// Collects [`walk`] eagerly, stopping at the first walk error.
///
/// # Errors
/// Returns error if the root or one of its game directories cannot be read.
pub fn discover(root: &Path, formats: &[Format]) -> Result<Vec<Location>> {
    walk(root, formats).collect()
}

/// Games that have a `format` directory, with that directory's path.
///
/// A game listed here appears in the statistics even when the directory
/// holds no files.
pub fn format_dirs(root: &Path, format: Format) -> impl Iterator<Item = Result<(String, PathBuf)>> {
    game_dirs(root).filter_map(move |item| match item {
        Ok((game, dir)) => {
            let dir = dir.join(format.as_str());
            dir.is_dir().then_some(Ok((game, dir)))
        }
        Err(e) => Some(Err(e)),
    })
}

fn game_dirs(root: &Path) -> impl Iterator<Item = Result<(String, PathBuf)>> {
    sorted_children(root).filter_map(|item| match item {
        Ok(entry) if entry.file_type().is_dir() => {
            let game = entry.file_name().to_string_lossy().into_owned();
            (!game.starts_with('.')).then(|| Ok((game, entry.into_path())))
        }
        Ok(_) => None,
        Err(e) => Some(Err(e.into())),
    })
}

fn format_files(
    game: String,
    game_dir: &Path,
    format: Format,
) -> Box<dyn Iterator<Item = Result<Location>>> {
    let dir = game_dir.join(format.as_str());
    if !dir.is_dir() {
        return Box::new(std::iter::empty());
    }

    Box::new(sorted_children(&dir).filter_map(move |item| match item {
        Ok(entry) if entry.file_type().is_file() => Some(Ok(Location {
            game: game.clone(),
            format,
            filename: entry.file_name().to_string_lossy().into_owned(),
            path: entry.into_path(),
        })),
        Ok(_) => None,
        Err(e) => Some(Err(e.into())),
    }))
}

fn sorted_children(dir: &Path) -> walkdir::IntoIter {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
}
