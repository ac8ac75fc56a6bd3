//! I/O plumbing: reader/writer construction, encoding transcoding, and the
//! `-` stdin/stdout convention. The core algorithms never touch files or
//! bytes; every encoding concern lives here.

use std::{
    fs::{self, File},
    io::{self, BufReader, Read, Write},
    path::Path,
};

use encoding_rs::{Encoding, SHIFT_JIS, UTF_8};
use encoding_rs_io::DecodeReaderBytesBuilder;

use crate::{cli::EncodingChoice, error::TateError};

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn encoding(choice: EncodingChoice) -> &'static Encoding {
    match choice {
        EncodingChoice::Sjis => SHIFT_JIS,
        EncodingChoice::Utf8 => UTF_8,
    }
}

/// Opens the input stream (stdin for `-`), decoding it to UTF-8 when a
/// legacy encoding is selected.
pub fn open_input(path: &Path, encoding: &'static Encoding) -> Result<Box<dyn Read>, TateError> {
    let raw: Box<dyn Read> = if is_dash(path) {
        Box::new(io::stdin().lock())
    } else {
        Box::new(BufReader::new(File::open(path)?))
    };
    if encoding == UTF_8 {
        Ok(raw)
    } else {
        Ok(Box::new(
            DecodeReaderBytesBuilder::new()
                .encoding(Some(encoding))
                .build(raw),
        ))
    }
}

/// Header handling is manual in the conversion pipeline, and ragged rows
/// must surface as input errors rather than being padded. Fields are
/// trimmed on read, so a whitespace-only field counts as empty for the
/// expansion stopping rule.
pub fn open_csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .trim(csv::Trim::Fields)
        .from_reader(reader)
}

/// Serializes `records` and writes them out in one shot, re-encoding the
/// whole payload when a legacy output encoding is selected. The dataset is
/// fully buffered upstream anyway, so there is no incremental transcoding.
pub fn write_records(
    path: Option<&Path>,
    records: &[Vec<String>],
    encoding: &'static Encoding,
) -> Result<(), TateError> {
    let mut utf8 = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut utf8);
        for record in records {
            writer.write_record(record)?;
        }
        writer.flush()?;
    }

    let payload = if encoding == UTF_8 {
        utf8
    } else {
        let text = std::str::from_utf8(&utf8).map_err(|_| TateError::Encode {
            encoding: encoding.name(),
        })?;
        let (encoded, _, had_errors) = encoding.encode(text);
        if had_errors {
            return Err(TateError::Encode {
                encoding: encoding.name(),
            });
        }
        encoded.into_owned()
    };

    match path {
        Some(p) if !is_dash(p) => fs::write(p, payload)?,
        _ => io::stdout().write_all(&payload)?,
    }
    Ok(())
}
