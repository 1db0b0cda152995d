use std::path::Path;

use ffv::error::FfvResult;
use ffv::io::WordSize;
use ffv::{FieldRecord, Mode, Packing, VariantFile};

pub fn exec_fields(file: impl AsRef<Path>, word_size: WordSize, decode: bool) -> FfvResult<()> {
    let ffv = VariantFile::open(file, Mode::Read, word_size)?;
    println!("{}: {} fields", ffv, ffv.fields().len());

    let mut failed = 0;
    for (i, field) in ffv.fields().iter().enumerate() {
        if field.is_padding() {
            println!("{i:>6}: padding");
            continue;
        }
        println!("{i:>6}: {}", describe(field));
        if decode {
            match field.read_data() {
                Ok(Some(data)) => println!("{:>8}{}", "", data),
                Ok(None) => println!("{:>8}no data", ""),
                Err(err) => {
                    failed += 1;
                    tracing::warn!("field {} cannot be decoded: {}", i, err);
                }
            }
        }
    }
    if failed > 0 {
        tracing::info!("{} fields could not be decoded", failed);
    }
    Ok(())
}

fn describe(field: &FieldRecord) -> String {
    let packing = Packing::try_from_code(field.lbpack())
        .map(|p| p.compression().to_string())
        .unwrap_or_else(|_| format!("unsupported ({})", field.lbpack()));
    format!(
        "release={} lbpack={} ({}) grid={}x{} lbegin={} lbnrec={} lbuser1={}",
        field
            .schema()
            .release()
            .map_or_else(|| "?".to_string(), |r| r.to_string()),
        field.lbpack(),
        packing,
        field.lbrow(),
        field.lbnpt(),
        field.lbegin(),
        field.lbnrec(),
        field.lbuser1(),
    )
}
