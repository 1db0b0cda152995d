#![allow(clippy::cast_possible_truncation)]
use std::fs::{self, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ffv_array::{Array, Values};
use ffv_error::{FfvError, FfvResult};
use ffv_io::WordSize;
use rstest::rstest;
use tempfile::TempDir;

use crate::{
    Component, DataSource, FfvOpenOptions, FieldRecord, IMDI, LBEGIN_OFFSET, LBNREC_OFFSET,
    LBREL_OFFSET, Mode, NUM_FIELD_INTS, VariantFile,
};

const BMDI: f64 = -32768.0;

fn file_path(dir: &TempDir) -> PathBuf {
    dir.path().join("test.ff")
}

fn header_ints(rows: usize, cols: usize, lbuser1: i64) -> Vec<i64> {
    let rows = i64::try_from(rows).unwrap();
    let cols = i64::try_from(cols).unwrap();
    let mut ints = vec![0; NUM_FIELD_INTS];
    ints[0] = 2024;
    ints[14] = rows * cols;
    ints[17] = rows;
    ints[18] = cols;
    ints[LBREL_OFFSET] = 3;
    ints[38] = lbuser1;
    ints
}

fn header_reals() -> Vec<f64> {
    let mut reals = vec![0.0; 19];
    reals[6] = 850.5;
    reals[17] = BMDI;
    reals
}

fn real_field(rows: usize, cols: usize, offset: f64) -> FieldRecord {
    let values = (0..rows * cols).map(|i| i as f64 * 0.5 + offset).collect();
    let data = Array::from_vec(values, vec![rows, cols]).unwrap();
    FieldRecord::with_data(header_ints(rows, cols, 1), header_reals(), data).unwrap()
}

fn int_field(rows: usize, cols: usize) -> FieldRecord {
    let values = (0..(rows * cols) as i64).map(|i| i - 3).collect();
    let data = Array::from_vec(values, vec![rows, cols]).unwrap();
    FieldRecord::with_data(header_ints(rows, cols, 2), header_reals(), data).unwrap()
}

fn padding_field() -> FieldRecord {
    FieldRecord::new(vec![-99; NUM_FIELD_INTS], vec![-99.0; 19], DataSource::None).unwrap()
}

fn integer_constants() -> Array {
    Array::flat(Values::from((1..=46i64).collect::<Vec<_>>()))
}

fn level_constants() -> Array {
    Array::from_vec((0..8).map(f64::from).collect::<Vec<_>>(), vec![4, 2]).unwrap()
}

/// Create a file at `path` holding `fields`, returning the records as they were written.
fn create(
    path: &Path,
    word_size: WordSize,
    dataset_type: i64,
    fields: Vec<FieldRecord>,
) -> FfvResult<Vec<FieldRecord>> {
    let mut ffv = VariantFile::open(path, Mode::Create, word_size)?;
    ffv.header_mut().set_dataset_type(dataset_type);
    ffv.set_constants(Component::IntegerConstants, Some(integer_constants()))?;
    ffv.set_constants(Component::LevelDependentConstants, Some(level_constants()))?;
    for field in fields {
        ffv.push_field(field);
    }
    ffv.close()?;
    Ok(ffv.fields().to_vec())
}

/// Overwrite a single integer word, 1-based, in an existing file.
fn patch_word(path: &Path, word_size: WordSize, word: i64, value: i64) {
    let mut file = OpenOptions::new().write(true).open(path).unwrap();
    file.seek(SeekFrom::Start(word_size.word_offset(word).unwrap()))
        .unwrap();
    match word_size {
        WordSize::Four => file
            .write_all(&i32::try_from(value).unwrap().to_be_bytes())
            .unwrap(),
        WordSize::Eight => file.write_all(&value.to_be_bytes()).unwrap(),
    }
}

#[rstest]
fn round_trip(
    #[values(0, 1, 3)] count: usize,
    #[values(WordSize::Four, WordSize::Eight)] word_size: WordSize,
) {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    let fields = (0..count)
        .map(|i| {
            if i % 2 == 0 {
                real_field(3, 5, i as f64)
            } else {
                int_field(4, 2)
            }
        })
        .collect();
    let written = create(&path, word_size, 3, fields).unwrap();

    let ffv = VariantFile::open(&path, Mode::Read, word_size).unwrap();
    let header = ffv.header();
    assert_eq!(header.dataset_type(), 3);
    assert_eq!(header.get("integer_constants_start").unwrap(), 257);
    assert_eq!(header.component_shape(Component::IntegerConstants), &[46]);
    assert_eq!(header.get("level_dependent_constants_start").unwrap(), 303);
    assert_eq!(
        header.component_shape(Component::LevelDependentConstants),
        &[4, 2]
    );
    assert_eq!(header.component_start(Component::RealConstants), IMDI);
    assert!(ffv.constants(Component::RealConstants).is_none());

    assert_eq!(
        ffv.constants(Component::IntegerConstants).unwrap(),
        &integer_constants().cast(word_size.int_ptype())
    );
    assert_eq!(
        ffv.constants(Component::LevelDependentConstants).unwrap(),
        &level_constants().cast(word_size.float_ptype())
    );

    if count == 0 {
        assert_eq!(header.lookup_start(), IMDI);
        assert_eq!(header.data_start(), IMDI);
        assert!(ffv.fields().is_empty());
        return;
    }

    assert_eq!(header.lookup_start(), 311);
    assert_eq!(header.lookup_shape(), &[64, count as i64]);
    assert_eq!(header.data_start(), 2049);
    assert_eq!(ffv.fields().len(), count);

    for (read, written) in ffv.fields().iter().zip(written.iter()) {
        assert_eq!(read.int_headers(), written.int_headers());
        assert_eq!(read.real_headers(), written.real_headers());
        let expected = written.read_data().unwrap().unwrap();
        let ptype = word_size.ptype(expected.ptype().kind());
        assert_eq!(read.read_data().unwrap().unwrap(), expected.cast(ptype));
    }
}

#[test]
fn records_compare_by_headers_and_data() {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    let written = create(&path, WordSize::Eight, 3, vec![real_field(2, 2, 1.0)]).unwrap();

    let ffv = VariantFile::open(&path, Mode::Read, WordSize::Eight).unwrap();
    assert!(ffv.fields()[0].try_eq(&written[0]).unwrap());
    assert!(!ffv.fields()[0].try_eq(&padding_field()).unwrap());
}

#[rstest]
fn padding_records_survive(#[values(WordSize::Four, WordSize::Eight)] word_size: WordSize) {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    let fields = vec![padding_field(), real_field(2, 3, 0.0), padding_field()];
    create(&path, word_size, 3, fields).unwrap();

    let ffv = VariantFile::open(&path, Mode::Read, word_size).unwrap();
    let fields = ffv.fields();
    assert_eq!(fields.len(), 3);
    assert!(fields[0].is_padding());
    assert!(matches!(fields[0].data_source(), DataSource::None));
    assert!(fields[0].read_data().unwrap().is_none());
    assert!(fields[2].read_data().unwrap().is_none());
    assert_eq!(fields[1].read_data().unwrap().unwrap().shape(), &[2, 3]);
    assert_eq!(fields[1].lbegin(), 2048);
}

#[rstest]
fn relative_addressing_matches_direct(
    #[values(WordSize::Four, WordSize::Eight)] word_size: WordSize,
) {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    let fields = vec![real_field(3, 3, 0.0), int_field(2, 5), real_field(1, 4, 9.0)];
    // Dataset type 1 stores payloads back to back, exactly as a model dump does.
    create(&path, word_size, 1, fields).unwrap();
    let direct: Vec<Array> = VariantFile::open(&path, Mode::Read, word_size)
        .unwrap()
        .fields()
        .iter()
        .map(|f| f.read_data().unwrap().unwrap())
        .collect();

    let lookup_start = 311;
    patch_word(&path, word_size, lookup_start + LBNREC_OFFSET as i64, 0);
    for i in 0..3 {
        patch_word(&path, word_size, lookup_start + 64 * i + LBEGIN_OFFSET as i64, 0);
    }

    let ffv = VariantFile::open(&path, Mode::Read, word_size).unwrap();
    assert_eq!(ffv.fields()[0].lbnrec(), 0);
    let relative: Vec<Array> = ffv
        .fields()
        .iter()
        .map(|f| f.read_data().unwrap().unwrap())
        .collect();
    assert_eq!(relative, direct);
}

#[rstest]
fn relative_addressing_skips_padding_records(
    #[values(WordSize::Four, WordSize::Eight)] word_size: WordSize,
) {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    let fields = vec![
        real_field(3, 3, 0.0),
        padding_field(),
        int_field(2, 5),
        real_field(1, 4, 9.0),
    ];
    create(&path, word_size, 1, fields).unwrap();
    let direct: Vec<Option<Array>> = VariantFile::open(&path, Mode::Read, word_size)
        .unwrap()
        .fields()
        .iter()
        .map(|f| f.read_data().unwrap())
        .collect();

    let lookup_start = 311;
    patch_word(&path, word_size, lookup_start + LBNREC_OFFSET as i64, 0);
    for i in [0, 2, 3] {
        patch_word(&path, word_size, lookup_start + 64 * i + LBEGIN_OFFSET as i64, 0);
    }

    let ffv = VariantFile::open(&path, Mode::Read, word_size).unwrap();
    let fields = ffv.fields();
    assert_eq!(fields[1].lblrec(), -99);
    assert!(matches!(fields[1].data_source(), DataSource::None));
    let relative: Vec<Option<Array>> = fields.iter().map(|f| f.read_data().unwrap()).collect();
    assert!(relative[1].is_none());
    assert_eq!(relative, direct);
}

#[test]
fn negative_lbegin_fails_only_that_field() {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    create(&path, WordSize::Eight, 3, vec![real_field(2, 2, 0.0), real_field(2, 2, 1.0)])
        .unwrap();
    patch_word(&path, WordSize::Eight, 311 + 64 + LBEGIN_OFFSET as i64, -5);

    let ffv = VariantFile::open(&path, Mode::Read, WordSize::Eight).unwrap();
    assert_eq!(ffv.fields()[1].lbegin(), -5);
    assert_eq!(
        ffv.fields()[0].read_data().unwrap().unwrap().get_f64(&[1, 1]),
        Some(1.5)
    );
    let err = ffv.fields()[1].read_data().unwrap_err();
    assert!(matches!(err, FfvError::Format(..)));
}

#[rstest]
#[case(1 << 60)]
#[case(1 << 40)]
#[case(i64::MAX)]
fn oversized_lookup_is_a_format_error(#[case] count: i64) {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    create(&path, WordSize::Eight, 3, vec![real_field(2, 2, 0.0)]).unwrap();
    // The second LOOKUP dimension, the number of entries.
    patch_word(&path, WordSize::Eight, 152, count);

    let err = VariantFile::open(&path, Mode::Read, WordSize::Eight)
        .err()
        .unwrap();
    assert!(matches!(err.root(), FfvError::Format(..)));
}

#[test]
fn oversized_constants_are_a_format_error() {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    create(&path, WordSize::Eight, 3, vec![]).unwrap();
    // Both dimensions of the level dependent constants.
    patch_word(&path, WordSize::Eight, 111, 1 << 40);
    patch_word(&path, WordSize::Eight, 112, 1 << 40);

    let err = VariantFile::open(&path, Mode::Read, WordSize::Eight)
        .err()
        .unwrap();
    assert!(matches!(err.root(), FfvError::Format(..)));
}

#[test]
fn prepare_header_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let mut ffv = VariantFile::open(file_path(&dir), Mode::Create, WordSize::Eight).unwrap();
    ffv.set_constants(Component::IntegerConstants, Some(integer_constants()))
        .unwrap();
    ffv.push_field(real_field(2, 2, 0.0));
    ffv.push_field(padding_field());

    ffv.prepare_header().unwrap();
    let first = ffv.header().clone();
    ffv.prepare_header().unwrap();
    assert_eq!(ffv.header(), &first);
    assert_eq!(first.lookup_start(), 303);
    assert_eq!(first.lookup_shape(), &[64, 2]);
    assert_eq!(first.data_start(), 2049);
}

#[test]
fn lookup_is_not_overlapped_by_data() {
    let dir = TempDir::new().unwrap();
    let mut ffv = VariantFile::open(file_path(&dir), Mode::Create, WordSize::Eight).unwrap();
    // 2048 - 256 words of constants leaves the LOOKUP starting one sector in.
    let constants = Array::flat(Values::from(vec![0i64; 2048 - 256]));
    ffv.set_constants(Component::IntegerConstants, Some(constants))
        .unwrap();
    ffv.push_field(real_field(2, 2, 0.0));
    ffv.prepare_header().unwrap();
    assert_eq!(ffv.header().lookup_start(), 2049);
    assert_eq!(ffv.header().data_start(), 4097);
}

#[test]
fn inconsistent_record_widths() {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    let mut ffv = VariantFile::open(&path, Mode::Create, WordSize::Eight).unwrap();
    ffv.push_field(real_field(2, 2, 0.0));
    let short = real_field(2, 2, 0.0);
    ffv.push_field(
        FieldRecord::new(
            short.int_headers().to_vec(),
            vec![0.0; 18],
            DataSource::None,
        )
        .unwrap(),
    );

    let err = ffv.prepare_header().unwrap_err();
    assert!(matches!(err, FfvError::Layout(..)));
    assert!(err.to_string().contains("63, 64"));

    let err = ffv.close().unwrap_err();
    assert!(matches!(err.root(), FfvError::Layout(..)));
    // The failed write never replaced the empty file.
    assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn constants_must_match_header_dimensions() {
    let dir = TempDir::new().unwrap();
    let mut ffv = VariantFile::open(file_path(&dir), Mode::Create, WordSize::Eight).unwrap();
    let err = ffv
        .set_constants(Component::LevelDependentConstants, Some(integer_constants()))
        .unwrap_err();
    assert!(matches!(err, FfvError::Layout(..)));
}

#[rstest]
#[case(WordSize::Four)]
#[case(WordSize::Eight)]
fn payloads_are_sector_aligned(#[case] word_size: WordSize) {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    let fields = vec![real_field(50, 50, 0.0), int_field(3, 3), real_field(1, 1, 0.0)];
    create(&path, word_size, 3, fields).unwrap();

    let sector = 2048 * word_size.bytes_u64();
    let ffv = VariantFile::open(&path, Mode::Read, word_size).unwrap();
    let lbegins: Vec<i64> = ffv.fields().iter().map(|f| f.lbegin()).collect();
    assert_eq!(lbegins, vec![2048, 2048 + 4096, 2048 + 6144]);
    let lbnrecs: Vec<i64> = ffv.fields().iter().map(|f| f.lbnrec()).collect();
    assert_eq!(lbnrecs, vec![4096, 2048, 2048]);
    for field in ffv.fields() {
        assert_eq!(u64::try_from(field.lbegin()).unwrap() * word_size.bytes_u64() % sector, 0);
    }
    assert_eq!(ffv.header().data_shape() % 2048, 0);
    assert_eq!(ffv.header().data_shape(), 8192);
    assert_eq!(fs::metadata(&path).unwrap().len() % sector, 0);
}

#[test]
fn unpadded_dataset_types_pack_payloads() {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    create(&path, WordSize::Eight, 2, vec![int_field(3, 3), int_field(2, 2)]).unwrap();

    let ffv = VariantFile::open(&path, Mode::Read, WordSize::Eight).unwrap();
    assert_eq!(ffv.fields()[0].lbegin(), 2048);
    assert_eq!(ffv.fields()[1].lbegin(), 2048 + 9);
    assert_eq!(ffv.header().data_shape(), 13);
}

#[test]
fn packing_codes() {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    create(&path, WordSize::Eight, 3, vec![real_field(4, 6, 0.0)]).unwrap();

    let mut ffv = VariantFile::open(&path, Mode::Read, WordSize::Eight).unwrap();
    let field = &mut ffv.fields_mut()[0];
    assert_eq!(field.lbpack(), 0);
    assert_eq!(field.read_data().unwrap().unwrap().shape(), &[4, 6]);

    field.set_int("lbpack", 2003).unwrap();
    let err = field.read_data().unwrap_err();
    assert!(matches!(err, FfvError::UnsupportedEncoding(..)));
    assert!(err.to_string().contains("2003"));

    field.set_int("lbpack", 3000).unwrap();
    assert!(field.read_data().is_ok());
}

#[test]
fn one_bad_field_does_not_spoil_the_file() {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    create(&path, WordSize::Eight, 3, vec![real_field(2, 2, 0.0), real_field(2, 2, 1.0)])
        .unwrap();
    // LBPACK of the first record.
    patch_word(&path, WordSize::Eight, 311 + 20, 4);

    let ffv = VariantFile::open(&path, Mode::Read, WordSize::Eight).unwrap();
    assert!(ffv.fields()[0].read_data().is_err());
    assert!(ffv.fields()[1].read_data().unwrap().is_some());
}

#[test]
fn compressed_records_are_rewritten_unpacked() {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    let mut field = real_field(2, 2, 0.0);
    field.set_int("lbpack", 2002).unwrap();
    let written = create(&path, WordSize::Eight, 3, vec![field]).unwrap();
    assert_eq!(written[0].lbpack(), 2000);

    let ffv = VariantFile::open(&path, Mode::Read, WordSize::Eight).unwrap();
    assert_eq!(ffv.fields()[0].lbpack(), 2000);
    assert_eq!(ffv.fields()[0].read_data().unwrap().unwrap().get_f64(&[1, 1]), Some(1.5));
}

#[test]
fn archival_fields_use_the_unpacker() {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    create(&path, WordSize::Eight, 3, vec![real_field(3, 4, 0.0)]).unwrap();

    let calls = Arc::new(Mutex::new(Vec::new()));
    let seen = calls.clone();
    let unpacker = move |bytes: &[u8], rows: usize, cols: usize, mdi: f64| {
        seen.lock().unwrap().push((bytes.len(), rows, cols, mdi));
        Array::from_vec(vec![7.0f32; rows * cols], vec![rows, cols])
    };
    let mut ffv = FfvOpenOptions::default()
        .with_unpacker(Arc::new(unpacker))
        .open(&path, Mode::Read)
        .unwrap();
    let field = &mut ffv.fields_mut()[0];
    field.set_int("lbpack", 1).unwrap();

    let data = field.read_data().unwrap().unwrap();
    assert_eq!(data.shape(), &[3, 4]);
    assert_eq!(data.get_f64(&[2, 3]), Some(7.0));
    assert_eq!(
        calls.lock().unwrap().as_slice(),
        &[((2048 * 2 - 1) * 4, 3, 4, BMDI)]
    );
}

#[test]
fn archival_fields_need_an_unpacker() {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    create(&path, WordSize::Eight, 3, vec![real_field(3, 4, 0.0)]).unwrap();

    let mut ffv = VariantFile::open(&path, Mode::Read, WordSize::Eight).unwrap();
    ffv.fields_mut()[0].set_int("lbpack", 1).unwrap();
    let err = ffv.fields()[0].read_data().unwrap_err();
    assert!(matches!(err, FfvError::UnsupportedEncoding(..)));
}

#[rstest]
fn boundary_payloads(#[values(WordSize::Four, WordSize::Eight)] word_size: WordSize) {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    let mut field = int_field(1, 12);
    field.set_int("lbhem", 103).unwrap();
    create(&path, word_size, 5, vec![field.clone(), field]).unwrap();

    let ffv = VariantFile::open(&path, Mode::Read, word_size).unwrap();
    assert_eq!(ffv.header().data_shape(), 0);
    for field in ffv.fields() {
        let data = field.read_data().unwrap().unwrap();
        assert_eq!(data.shape(), &[3, 4]);
        assert_eq!(data.get_f64(&[1, 0]), Some(1.0));
    }
}

#[test]
fn failed_write_leaves_records_untouched() {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    create(&path, WordSize::Eight, 3, vec![real_field(2, 2, 0.0), real_field(2, 2, 1.0)])
        .unwrap();
    let before = fs::read(&path).unwrap();

    let mut ffv = VariantFile::open(&path, Mode::Update, WordSize::Eight).unwrap();
    let first = &mut ffv.fields_mut()[0];
    first.set_data(Array::from_vec(vec![9.0f64; 4], vec![2, 2]).unwrap());
    first.set_int("lbpack", 2002).unwrap();
    first.set_int("lbegin", 0).unwrap();
    // The second payload is still in the file and cannot be decoded.
    ffv.fields_mut()[1].set_int("lbpack", 2003).unwrap();

    let err = ffv.close().unwrap_err();
    assert!(matches!(err.root(), FfvError::UnsupportedEncoding(..)));
    let first = &ffv.fields()[0];
    assert_eq!(first.lbpack(), 2002);
    assert_eq!(first.lbegin(), 0);
    assert_eq!(first.lbnrec(), 2048);
    assert_eq!(fs::read(&path).unwrap(), before);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn close_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    let mut ffv = VariantFile::open(&path, Mode::Create, WordSize::Eight).unwrap();
    ffv.push_field(real_field(2, 2, 0.0));
    ffv.close().unwrap();
    assert!(ffv.is_closed());
    assert!(path.exists());

    fs::remove_file(&path).unwrap();
    ffv.close().unwrap();
    drop(ffv);
    assert!(!path.exists());
}

#[test]
fn drop_writes_pending_changes() {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    {
        let mut ffv = VariantFile::open(&path, Mode::Create, WordSize::Eight).unwrap();
        ffv.header_mut().set_dataset_type(3);
        ffv.push_field(int_field(2, 2));
    }
    let ffv = VariantFile::open(&path, Mode::Read, WordSize::Eight).unwrap();
    assert_eq!(ffv.fields().len(), 1);
    assert_eq!(ffv.to_string(), "<FieldsFileVariant: dataset_type=3>");
}

#[test]
fn read_mode_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    create(&path, WordSize::Eight, 3, vec![real_field(2, 2, 0.0)]).unwrap();
    let before = fs::read(&path).unwrap();

    let mut ffv = VariantFile::open(&path, Mode::Read, WordSize::Eight).unwrap();
    ffv.header_mut().set("sub_model", 7).unwrap();
    ffv.close().unwrap();
    assert_eq!(fs::read(&path).unwrap(), before);
    // Payloads can no longer be read once the handle is gone.
    assert!(ffv.fields()[0].read_data().is_err());
}

#[test]
fn update_rewrites_the_file() {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    create(&path, WordSize::Eight, 3, vec![real_field(2, 2, 0.0)]).unwrap();

    let mut ffv = VariantFile::open(&path, Mode::Update, WordSize::Eight).unwrap();
    ffv.header_mut().set("sub_model", 1).unwrap();
    ffv.set_constants(Component::LevelDependentConstants, None)
        .unwrap();
    ffv.fields_mut()[0]
        .set_data(Array::from_vec(vec![9.0f64; 4], vec![2, 2]).unwrap());
    ffv.push_field(int_field(3, 1));
    ffv.close().unwrap();

    let ffv = VariantFile::open(&path, Mode::Read, WordSize::Eight).unwrap();
    assert_eq!(ffv.header().sub_model(), 1);
    assert!(ffv.constants(Component::LevelDependentConstants).is_none());
    assert_eq!(ffv.header().lookup_start(), 303);
    assert_eq!(ffv.fields().len(), 2);
    assert_eq!(
        ffv.fields()[0].read_data().unwrap().unwrap().get_f64(&[1, 1]),
        Some(9.0)
    );
    assert_eq!(ffv.fields()[1].read_data().unwrap().unwrap().shape(), &[3, 1]);
}

#[test]
fn write_new_copies_to_another_path() {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    let copy = dir.path().join("copy.ff");
    create(&path, WordSize::Four, 3, vec![real_field(2, 2, 0.0)]).unwrap();

    let mut ffv = VariantFile::open(&path, Mode::Read, WordSize::Four).unwrap();
    ffv.write_new(&copy).unwrap();
    ffv.close().unwrap();
    assert_eq!(fs::read(&copy).unwrap(), fs::read(&path).unwrap());
}

#[test]
fn short_header_is_a_format_error() {
    let dir = TempDir::new().unwrap();
    let path = file_path(&dir);
    fs::write(&path, vec![0u8; 100 * 8]).unwrap();
    let err = VariantFile::open(&path, Mode::Read, WordSize::Eight)
        .err()
        .unwrap();
    assert!(matches!(err.root(), FfvError::Format(..)));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = VariantFile::open(file_path(&dir), Mode::Update, WordSize::Eight)
        .err()
        .unwrap();
    assert!(matches!(err.root(), FfvError::IOError(_)));
}

#[test]
fn temp_dir_is_configurable() {
    let dir = TempDir::new().unwrap();
    let staging = TempDir::new_in(dir.path()).unwrap();
    let path = file_path(&dir);
    let mut ffv = FfvOpenOptions::new()
        .with_temp_dir(staging.path())
        .open(&path, Mode::Create)
        .unwrap();
    ffv.push_field(real_field(1, 1, 0.0));
    ffv.close().unwrap();
    assert!(path.exists());
    assert_eq!(fs::read_dir(staging.path()).unwrap().count(), 0);
}
