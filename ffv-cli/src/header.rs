use std::path::Path;

use ffv::error::FfvResult;
use ffv::io::WordSize;
use ffv::{FixedHeader, HeaderSlot, IMDI, Mode, VariantFile};
use humansize::{DECIMAL, format_size};

pub fn exec_header(file: impl AsRef<Path>, word_size: WordSize, all: bool) -> FfvResult<()> {
    let size = std::fs::metadata(file.as_ref())?.len();
    let ffv = VariantFile::open(file, Mode::Read, word_size)?;
    println!("{} ({})", ffv, format_size(size, DECIMAL));

    let header = ffv.header();
    for (name, slot) in FixedHeader::names() {
        let words = match slot {
            HeaderSlot::Word(index) => &header.raw()[*index..=*index],
            HeaderSlot::Shape(range) => &header.raw()[range.clone()],
        };
        if !all && words.iter().all(|&w| w == IMDI) {
            continue;
        }
        match words {
            [word] => println!("{name:>34}: {word}"),
            _ => println!(
                "{name:>34}: ({})",
                words
                    .iter()
                    .map(|w| w.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
    Ok(())
}
