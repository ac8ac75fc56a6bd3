//! Schema inference for repeated-group headers.
//!
//! Classifies each header cell as a plain column, the head of a repeat
//! group (`b1`), or the continuation of one (`b2`, `b3`, ...), then demotes
//! any group that falls short of the file's maximum repeat count back into
//! flat columns. The result is an immutable [`Schema`] that every data row
//! is projected through.

use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use crate::error::TateError;

/// One fixed output column of the normalized table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Source index into an input row, used while `repeat_count == 0`.
    pub position: usize,
    /// Output header label.
    pub display_name: String,
    /// Declared repeat count: 0 for plain (or demoted) columns, otherwise
    /// the most recently parsed numeric suffix of the group. Deliberately
    /// the declared suffix rather than the number of accumulated instances.
    pub repeat_count: usize,
    /// Input-column index per repeat instance, in discovery order.
    pub repeat_positions: Vec<usize>,
    /// Original header text per repeat instance, kept so demotion can
    /// restore the suffixed names.
    pub original_names: Vec<String>,
}

impl Column {
    fn plain(position: usize, display_name: String) -> Self {
        Self {
            position,
            display_name,
            repeat_count: 0,
            repeat_positions: Vec::new(),
            original_names: Vec::new(),
        }
    }

    pub fn is_repeating(&self) -> bool {
        self.repeat_count > 0
    }
}

/// Immutable description of how input rows map onto output rows, built once
/// per file from the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    pub columns: Vec<Column>,
    /// Maximum numeric suffix seen across all grouped header cells; values
    /// below 2 mean no repetition is present.
    pub max_repeat: usize,
}

impl Schema {
    /// Builds a schema from a (trimmed) header row. Columns whose name
    /// contains any `excludes` token are never grouped; the match is
    /// substring containment, so a token hitting part of an unrelated
    /// column name still excludes it.
    pub fn build(header: &[String], excludes: &[String]) -> Result<Self, TateError> {
        let (entries, max_repeat) = classify(header, excludes)?;
        let columns = demote(entries, max_repeat);
        let schema = Schema {
            columns,
            max_repeat,
        };
        debug!("built schema: {schema:?}");
        Ok(schema)
    }

    /// Output header record: one label per column.
    pub fn header_row(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| column.display_name.clone())
            .collect()
    }
}

/// Intermediate classification of a header cell, before demotion.
#[derive(Debug)]
enum HeaderEntry {
    Plain {
        position: usize,
        name: String,
    },
    RepeatHead {
        position: usize,
        name: String,
        declared: usize,
        positions: Vec<usize>,
        originals: Vec<String>,
    },
}

impl HeaderEntry {
    fn name(&self) -> &str {
        match self {
            HeaderEntry::Plain { name, .. } | HeaderEntry::RepeatHead { name, .. } => name,
        }
    }

    /// Folds a continuation cell into this entry. A plain column whose name
    /// equals the group prefix becomes the head of the group while keeping
    /// its own source position.
    fn absorb(&mut self, index: usize, original: &str, declared: usize) {
        match self {
            HeaderEntry::Plain { position, name } => {
                *self = HeaderEntry::RepeatHead {
                    position: *position,
                    name: std::mem::take(name),
                    declared,
                    positions: vec![index],
                    originals: vec![original.to_string()],
                };
            }
            HeaderEntry::RepeatHead {
                declared: current,
                positions,
                originals,
                ..
            } => {
                *current = declared;
                positions.push(index);
                originals.push(original.to_string());
            }
        }
    }
}

/// Matches a non-empty prefix followed by trailing ASCII digits: `b12`
/// splits into prefix `b` and number `12`. Only ASCII digits count, so a
/// full-width digit cell like `値２` stays a plain column instead of
/// failing the suffix parse.
fn suffix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.+?)([0-9]+)$").expect("suffix pattern is valid"))
}

/// First pass: classify every header cell in order, accumulating repeat
/// groups under their first-seen entry and tracking the maximum suffix.
fn classify(
    header: &[String],
    excludes: &[String],
) -> Result<(Vec<HeaderEntry>, usize), TateError> {
    let mut entries: Vec<HeaderEntry> = Vec::with_capacity(header.len());
    let mut max_repeat = 0usize;

    for (index, cell) in header.iter().enumerate() {
        let name = cell.trim();

        if excludes.iter().any(|token| name.contains(token.as_str())) {
            debug!("column '{name}' excluded from grouping");
            entries.push(HeaderEntry::Plain {
                position: index,
                name: name.to_string(),
            });
            continue;
        }

        let Some(captures) = suffix_pattern().captures(name) else {
            entries.push(HeaderEntry::Plain {
                position: index,
                name: name.to_string(),
            });
            continue;
        };

        let prefix = captures.get(1).map_or("", |m| m.as_str());
        let suffix = captures.get(2).map_or("", |m| m.as_str());
        let parsed: usize = suffix.parse().map_err(|source| TateError::Schema {
            column: name.to_string(),
            suffix: suffix.to_string(),
            source,
        })?;
        max_repeat = max_repeat.max(parsed);

        match entries.iter_mut().find(|entry| entry.name() == prefix) {
            Some(entry) => entry.absorb(index, name, parsed),
            None => entries.push(HeaderEntry::RepeatHead {
                position: index,
                name: prefix.to_string(),
                // A fresh group starts with a declared count of 1 no matter
                // which suffix opened it; only continuations overwrite it.
                declared: 1,
                positions: vec![index],
                originals: vec![name.to_string()],
            }),
        }
    }

    Ok((entries, max_repeat))
}

/// Second pass: produce the final column order. Every group whose declared
/// count falls short of `max_repeat` is demoted: its overflow instances
/// become standalone columns under their original suffixed names, appended
/// after all existing columns in reverse discovery order, and the group
/// itself collapses onto its first instance.
fn demote(entries: Vec<HeaderEntry>, max_repeat: usize) -> Vec<Column> {
    let mut columns: Vec<Column> = entries.into_iter().map(Column::from).collect();
    let mut appended: Vec<Column> = Vec::new();

    for column in columns.iter_mut().rev() {
        if column.repeat_count == 0 || column.repeat_count >= max_repeat {
            continue;
        }
        debug!(
            "demoting group '{}' (repeat {} < max {max_repeat})",
            column.display_name, column.repeat_count
        );
        for (position, original) in column
            .repeat_positions
            .iter()
            .zip(&column.original_names)
            .skip(1)
            .rev()
        {
            appended.push(Column::plain(*position, original.clone()));
        }
        column.position = column.repeat_positions[0];
        column.display_name = column.original_names[0].clone();
        column.repeat_count = 0;
        column.repeat_positions.clear();
        column.original_names.clear();
    }

    columns.append(&mut appended);
    columns
}

impl From<HeaderEntry> for Column {
    fn from(entry: HeaderEntry) -> Self {
        match entry {
            HeaderEntry::Plain { position, name } => Column::plain(position, name),
            HeaderEntry::RepeatHead {
                position,
                name,
                declared,
                positions,
                originals,
            } => Column {
                position,
                display_name: name,
                repeat_count: declared,
                repeat_positions: positions,
                original_names: originals,
            },
        }
    }
}
