use std::path::Path;

use ffv::error::FfvResult;
use ffv::io::WordSize;
use ffv::{Mode, VariantFile};
use humansize::{DECIMAL, format_size};

pub fn exec_copy(
    file: impl AsRef<Path>,
    output: impl AsRef<Path>,
    word_size: WordSize,
) -> FfvResult<()> {
    let mut ffv = VariantFile::open(file.as_ref(), Mode::Read, word_size)?;
    ffv.write_new(output.as_ref())?;
    ffv.close()?;

    let size = std::fs::metadata(output.as_ref())?.len();
    tracing::info!(
        "copied {} fields from {} to {} ({})",
        ffv.fields().len(),
        file.as_ref().display(),
        output.as_ref().display(),
        format_size(size, DECIMAL)
    );
    Ok(())
}
