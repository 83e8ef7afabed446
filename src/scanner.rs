// src/scanner.rs
//! Token scanning over decompiled source text.

use crate::error::{OpstatError, Result};
use crate::types::{Symbol, UsageEvent};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Opcode and register patterns as a single alternation, so one stretch of
/// text can never produce two events. Registers are only tracked for the
/// numbering range that textually starts with `10`.
pub const USAGE_PATTERN: &str = r"ins_(?P<opcode>[0-9]+)|REG\[(?P<register>-?10[0-9]+)";

static USAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(USAGE_PATTERN).unwrap_or_else(|_| panic!("Invalid Regex")));

/// Yields every usage in `source`, in order of appearance.
pub fn scan(source: &str) -> impl Iterator<Item = Result<UsageEvent>> + '_ {
    USAGE_RE.captures_iter(source).map(|caps| from_captures(&caps))
}

/// Like [`scan`], but collects into a `Vec`.
///
/// # Errors
/// Returns [`OpstatError::MalformedToken`] if a match carries neither group.
pub fn scan_all(source: &str) -> Result<Vec<UsageEvent>> {
    scan(source).collect()
}

fn from_captures(caps: &Captures<'_>) -> Result<UsageEvent> {
    if let Some(m) = caps.name("opcode") {
        return Ok(UsageEvent::Opcode(Symbol::new(m.as_str())));
    }
    if let Some(m) = caps.name("register") {
        return Ok(UsageEvent::Register(Symbol::new(m.as_str())));
    }
    Err(OpstatError::MalformedToken(
        caps.get(0).map_or_else(String::new, |m| m.as_str().to_string()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(src: &str) -> Vec<UsageEvent> {
        scan_all(src).unwrap()
    }

    fn op(n: &str) -> UsageEvent {
        UsageEvent::Opcode(Symbol::new(n))
    }

    fn reg(n: &str) -> UsageEvent {
        UsageEvent::Register(Symbol::new(n))
    }

    #[test]
    fn finds_opcodes_and_registers_in_order() {
        let src = "ins_3(REG[1001], 5);\n  ins_22();\n ins_3(REG[-1009]);";
        assert_eq!(
            events(src),
            [op("3"), reg("1001"), op("22"), op("3"), reg("-1009")]
        );
    }

    #[test]
    fn small_registers_are_ignored() {
        assert!(events("ins_x(REG[5], REG[42], REG[10], REG[-10])").is_empty());
    }

    #[test]
    fn register_must_start_with_ten_textually() {
        assert!(events("REG[1234] REG[2000] REG[99999]").is_empty());
        assert_eq!(events("REG[100] REG[10000]"), [reg("100"), reg("10000")]);
    }

    #[test]
    fn register_number_keeps_only_the_matched_digits() {
        assert_eq!(events("REG[1005]]"), [reg("1005")]);
        assert_eq!(events("REG[100a"), [reg("100")]);
    }

    #[test]
    fn opcode_needs_digits() {
        assert!(events("ins_ ins_a foo_ins").is_empty());
        assert_eq!(events("my_ins_7"), [op("7")]);
    }

    #[test]
    fn opcode_digits_are_kept_verbatim() {
        assert_eq!(events("ins_007"), [op("007")]);
    }

    #[test]
    fn repeated_tokens_are_all_reported() {
        assert_eq!(events("ins_1 ins_1 ins_1").len(), 3);
    }

    #[test]
    fn scan_is_lazy() {
        let mut it = scan("ins_1 ins_2");
        assert_eq!(it.next().unwrap().unwrap(), op("1"));
    }
}
