//! Replay text format: parsing, rendering and digests.
//!
//! A replay is a list of `tick=key[:value[:value...]]` entries joined by `&`,
//! for example `12=s:4&30=l:7&95=n`. The tick is base-10 and truncated to 32
//! bits; the key is one of the [`COMMAND_KEYS`](burrow_command::command::COMMAND_KEYS);
//! values are base-10 integers.
//!
//! Parsing comes in two flavours:
//!
//! - [`parse`] is lenient: each malformed entry is reported in
//!   [`ParsedReplay::skipped`] and the rest still loads. This is what a
//!   player-facing loader wants, since a partly corrupted replay is still
//!   mostly watchable.
//! - [`parse_strict`] stops at the first malformed entry. Useful for tools
//!   that validate replays.
//!
//! # Example
//!
//! ```
//! use burrow_engine::replay;
//! use burrow_command::command::Command;
//!
//! let parsed = replay::parse("2=n&oops&5=i:3");
//! assert_eq!(parsed.entries.len(), 2);
//! assert_eq!(parsed.skipped.len(), 1);
//! assert_eq!(parsed.entries[0].command, Command::Nuke);
//!
//! let text = replay::render(parsed.entries.iter().map(|e| (e.tick, &e.command)));
//! assert_eq!(text, "2=n&5=i:3");
//! ```

use std::collections::BTreeSet;
use std::fmt;

use burrow_command::command::Command;
use serde::{Deserialize, Serialize};

use crate::clock::TickIndex;
use crate::ReplayError;

/// Separates entries.
pub const ENTRY_SEPARATOR: char = '&';
/// Separates the tick from the command.
pub const TICK_SEPARATOR: char = '=';
/// Separates the key and each value.
pub const VALUE_SEPARATOR: char = ':';

// ---------------------------------------------------------------------------
// ReplayEntry
// ---------------------------------------------------------------------------

/// One command at one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayEntry {
    /// The tick whose pre-tick hook runs the command.
    pub tick: TickIndex,
    /// The command to run.
    pub command: Command,
}

impl ReplayEntry {
    /// Parse a single `tick=key[:values]` entry.
    ///
    /// # Errors
    ///
    /// Returns the [`ReplayError`] describing the first problem found.
    pub fn parse(entry: &str) -> Result<Self, ReplayError> {
        let (tick_text, body) =
            entry
                .split_once(TICK_SEPARATOR)
                .ok_or_else(|| ReplayError::MissingSeparator {
                    entry: entry.to_owned(),
                })?;

        let truncated =
            parse_low_32_bits(tick_text.trim()).ok_or_else(|| ReplayError::InvalidTick {
                entry: entry.to_owned(),
            })?;
        let tick = TickIndex::try_from(truncated)
            .map_err(|_| ReplayError::TickOutOfRange { tick: truncated })?;

        let mut parts = body.split(VALUE_SEPARATOR);
        let key_text = parts.next().unwrap_or_default().trim();
        let mut key_chars = key_text.chars();
        let key = match (key_chars.next(), key_chars.next()) {
            (Some(key), None) => key,
            _ => {
                return Err(ReplayError::MissingKey {
                    entry: entry.to_owned(),
                })
            }
        };

        let values = parts
            .map(|value| {
                value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| ReplayError::InvalidValue {
                        entry: entry.to_owned(),
                        value: value.to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let command =
            Command::load(key, &values).map_err(|source| ReplayError::Command { tick, source })?;
        Ok(Self { tick, command })
    }
}

/// Parse a signed base-10 integer of any length, keeping its low 32 bits.
fn parse_low_32_bits(text: &str) -> Option<i32> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    if digits.is_empty() {
        return None;
    }

    let mut low: u32 = 0;
    for c in digits.chars() {
        low = low.wrapping_mul(10).wrapping_add(c.to_digit(10)?);
    }
    let low = if negative { low.wrapping_neg() } else { low };
    Some(low as i32)
}

impl fmt::Display for ReplayEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{TICK_SEPARATOR}{}", self.tick, self.command)
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Result of a lenient parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedReplay {
    /// Well-formed entries, in text order.
    pub entries: Vec<ReplayEntry>,
    /// One error per skipped entry, in text order.
    pub skipped: Vec<ReplayError>,
}

/// Split replay text into its non-empty, trimmed entries.
fn raw_entries(text: &str) -> impl Iterator<Item = &str> {
    text.split(ENTRY_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

/// Parse replay text, skipping malformed entries individually.
pub fn parse(text: &str) -> ParsedReplay {
    let mut parsed = ParsedReplay::default();
    for entry in raw_entries(text) {
        match ReplayEntry::parse(entry) {
            Ok(entry) => parsed.entries.push(entry),
            Err(e) => parsed.skipped.push(e),
        }
    }
    parsed
}

/// Parse replay text, failing on the first malformed entry or repeated tick.
///
/// # Errors
///
/// Returns the first [`ReplayError`] encountered.
pub fn parse_strict(text: &str) -> Result<Vec<ReplayEntry>, ReplayError> {
    let mut seen = BTreeSet::new();
    let mut entries = Vec::new();
    for entry in raw_entries(text) {
        let entry = ReplayEntry::parse(entry)?;
        if !seen.insert(entry.tick) {
            return Err(ReplayError::DuplicateTick { tick: entry.tick });
        }
        entries.push(entry);
    }
    Ok(entries)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render `(tick, command)` pairs as replay text, in the order given.
pub fn render<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (TickIndex, &'a Command)>,
{
    let mut text = String::new();
    for (tick, command) in entries {
        if !text.is_empty() {
            text.push(ENTRY_SEPARATOR);
        }
        text.push_str(&ReplayEntry { tick, command: *command }.to_string());
    }
    text
}

// ---------------------------------------------------------------------------
// ReplayDigest
// ---------------------------------------------------------------------------

/// BLAKE3 hex digest of a rendered replay.
///
/// Two sessions are command-for-command identical exactly when their replay
/// texts are, so comparing digests is a cheap determinism check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplayDigest(String);

impl ReplayDigest {
    /// Digest of replay text.
    pub fn of(text: &str) -> Self {
        Self(blake3::hash(text.as_bytes()).to_hex().to_string())
    }

    /// The 64-character hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReplayDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
