//! Row expansion: projects one input record into repeated output rows.

use log::trace;

use crate::{cli::RepeatIf, schema::Schema};

/// Expands `row` into between zero and `schema.max_repeat` output rows.
///
/// Expansion walks repeat indices in order and stops at the first instance
/// judged empty under `repeat_if`. Emptiness is a hard stop, not a filter:
/// later instances are never emitted, even when non-empty. Without any
/// repetition present the row passes through as a single projected record.
pub fn expand(schema: &Schema, row: &[String], repeat_if: RepeatIf) -> Vec<Vec<String>> {
    if schema.max_repeat < 2 {
        let record = schema
            .columns
            .iter()
            .map(|column| row[column.position].clone())
            .collect();
        return vec![record];
    }

    let mut records = Vec::new();
    for repeat_index in 0..schema.max_repeat {
        if instance_empty(schema, row, repeat_index, repeat_if) {
            trace!("empty instance at repeat index {repeat_index}, stopping");
            break;
        }
        let record = schema
            .columns
            .iter()
            .map(|column| {
                if column.is_repeating() {
                    row[column.repeat_positions[repeat_index]].clone()
                } else {
                    // Non-repeated and demoted columns are held constant
                    // across every row expanded from this record.
                    row[column.position].clone()
                }
            })
            .collect();
        records.push(record);
    }
    records
}

/// Decides whether the repeat instance at `repeat_index` counts as empty,
/// looking only at columns that participate in repetition at this index.
fn instance_empty(
    schema: &Schema,
    row: &[String],
    repeat_index: usize,
    repeat_if: RepeatIf,
) -> bool {
    let mut participating = schema
        .columns
        .iter()
        .filter(|column| column.repeat_count > repeat_index);
    match repeat_if {
        // Empty only when every participating column is blank here.
        RepeatIf::Any => {
            participating.all(|column| row[column.repeat_positions[repeat_index]].is_empty())
        }
        // Empty as soon as one participating column is blank here.
        RepeatIf::All => {
            participating.any(|column| row[column.repeat_positions[repeat_index]].is_empty())
        }
    }
}
