use std::path::Path;

use anyhow::{Context, Result};

use crate::{cli::create_spinner, transcode::transcode_file};

pub fn transcode(input: &Path, output: &Path) -> Result<String> {
    let bar = create_spinner(format!("Transcoding {}...", input.display()));
    let records = transcode_file(input, output).with_context(|| format!("cannot transcode {}", input.display()))?;
    bar.finish_with_message(format!("{} records transcoded", records));

    Ok(output.to_string_lossy().to_string())
}
