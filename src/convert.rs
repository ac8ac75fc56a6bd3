//! Conversion pipeline: header read, schema build, per-row expansion, and
//! buffered output. Every record is materialized in memory before anything
//! is written; the first error aborts the whole run with nothing flushed.

use std::io::Read;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::{
    cli::{Cli, RepeatIf},
    error::TateError,
    expand::expand,
    io_utils,
    schema::Schema,
};

/// Reads every record from `reader` and returns the normalized records,
/// header row included when `output_header` is set. A reader with no header
/// record yields an empty result rather than an error.
pub fn convert<R: Read>(
    reader: &mut csv::Reader<R>,
    output_header: bool,
    excludes: &[String],
    repeat_if: RepeatIf,
) -> Result<Vec<Vec<String>>, TateError> {
    let mut rows = reader.records();
    let Some(header) = rows.next().transpose()? else {
        return Ok(Vec::new());
    };
    let header: Vec<String> = header.iter().map(str::to_string).collect();
    debug!("read header: {header:?}");

    let schema = Schema::build(&header, excludes)?;

    let mut records = Vec::new();
    if output_header {
        records.push(schema.header_row());
    }

    for row in rows {
        let row: Vec<String> = row?.iter().map(str::to_string).collect();
        records.extend(expand(&schema, &row, repeat_if));
    }

    Ok(records)
}

pub fn execute(args: &Cli) -> Result<()> {
    let encoding = io_utils::encoding(args.encoding);
    info!(
        "Normalizing '{}' -> {} ({})",
        args.input.display(),
        args.output
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".into()),
        encoding.name()
    );

    let input = io_utils::open_input(&args.input, encoding)
        .with_context(|| format!("Opening input file {:?}", args.input))?;
    let mut reader = io_utils::open_csv_reader(input);

    let records = convert(&mut reader, !args.no_header, &args.excludes, args.repeat_if)
        .with_context(|| format!("Normalizing {:?}", args.input))?;
    let count = records.len();

    io_utils::write_records(args.output.as_deref(), &records, encoding)
        .context("Writing output")?;
    info!("Wrote {count} record(s)");
    Ok(())
}
