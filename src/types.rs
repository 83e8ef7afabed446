// src/types.rs
use clap::ValueEnum;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

/// One of the script file kinds produced by the target toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum Format {
    Anm,
    Msg,
    Std,
    End,
}

impl Format {
    /// Default run order when no formats are requested.
    pub const ALL: [Format; 4] = [Format::Anm, Format::Msg, Format::End, Format::Std];

    /// Directory name under each game directory, also used as the JSON key.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anm => "anm",
            Self::Msg => "msg",
            Self::Std => "std",
            Self::End => "end",
        }
    }

    /// Whether the decompiler knows instruction signatures for this format.
    /// `end` files are decompiled without argument decoding.
    #[must_use]
    pub fn has_signatures(self) -> bool {
        !matches!(self, Self::End)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Format {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single input file of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub game: String,
    pub format: Format,
    pub filename: String,
    pub path: PathBuf,
}

/// Opcode or register number, kept as the exact matched text.
///
/// Ordering is numeric where the text fits in an `i64`, falling back to the
/// text itself, so `"9" < "10" < "100"` and `"-1009" < "1001"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(String);

impl Symbol {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Integer value of the matched text, if it fits.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    fn sort_key(&self) -> (bool, Option<i64>, &str) {
        let value = self.as_integer();
        (value.is_none(), value, &self.0)
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UsageKind {
    Opcode,
    Register,
}

/// One token occurrence found in decompiled text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UsageEvent {
    Opcode(Symbol),
    Register(Symbol),
}

impl UsageEvent {
    #[must_use]
    pub fn kind(&self) -> UsageKind {
        match self {
            Self::Opcode(_) => UsageKind::Opcode,
            Self::Register(_) => UsageKind::Register,
        }
    }

    #[must_use]
    pub fn into_parts(self) -> (UsageKind, Symbol) {
        match self {
            Self::Opcode(n) => (UsageKind::Opcode, n),
            Self::Register(n) => (UsageKind::Register, n),
        }
    }
}
