//! Converts a merged raw dataset into the normalized report file.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use tracing::debug;

use crate::reading::{DecodedReport, HEADER};

/// Transcodes `input` into `output`, returning the number of records written.
pub fn transcode_file(input: &Path, output: &Path) -> io::Result<u64> {
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);

    let records = transcode(reader, writer)?;
    debug!("Wrote {} records to {}", records, output.display());

    Ok(records)
}

/// Writes the header, then one report line per input line.
pub fn transcode<R: BufRead, W: Write>(reader: R, mut writer: W) -> io::Result<u64> {
    writeln!(writer, "{}", HEADER)?;

    let mut records = 0;
    for line in reader.lines() {
        let line = line?;
        writeln!(writer, "{}", DecodedReport::from_line(&line))?;
        records += 1;
    }
    writer.flush()?;

    Ok(records)
}

// -- Tests ----------------------------------------------------------------------------
