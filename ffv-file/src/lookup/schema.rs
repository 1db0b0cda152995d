use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use rustc_hash::FxHashMap;

/// The number of integer words at the start of every LOOKUP entry.
pub const NUM_FIELD_INTS: usize = 45;

/// Zero-based word of the record length.
pub const LBLREC_OFFSET: usize = 14;
/// Zero-based word of the header release number.
pub const LBREL_OFFSET: usize = 21;
/// Zero-based word of the data start.
pub const LBEGIN_OFFSET: usize = 28;
/// Zero-based word of the record length in physical words.
pub const LBNREC_OFFSET: usize = 29;
/// Zero-based word of the packing code.
pub const LBPACK_OFFSET: usize = 20;

pub(crate) const LBHEM_OFFSET: usize = 16;
pub(crate) const LBROW_OFFSET: usize = 17;
pub(crate) const LBNPT_OFFSET: usize = 18;
pub(crate) const LBUSER1_OFFSET: usize = 38;
pub(crate) const BMDI_OFFSET: usize = 62;

/// Items common to every header release, as zero-based words across the whole entry.
static COMMON_HEADER: &[(&str, &[usize])] = &[
    ("lbyr", &[0]),
    ("lbmon", &[1]),
    ("lbdat", &[2]),
    ("lbhr", &[3]),
    ("lbmin", &[4]),
    ("lbyrd", &[6]),
    ("lbmond", &[7]),
    ("lbdatd", &[8]),
    ("lbhrd", &[9]),
    ("lbmind", &[10]),
    ("lbtim", &[12]),
    ("lbft", &[13]),
    ("lblrec", &[14]),
    ("lbcode", &[15]),
    ("lbhem", &[16]),
    ("lbrow", &[17]),
    ("lbnpt", &[18]),
    ("lbext", &[19]),
    ("lbpack", &[20]),
    ("lbrel", &[21]),
    ("lbfc", &[22]),
    ("lbcfc", &[23]),
    ("lbproc", &[24]),
    ("lbvc", &[25]),
    ("lbrvc", &[26]),
    ("lbexp", &[27]),
    ("lbegin", &[28]),
    ("lbnrec", &[29]),
    ("lbproj", &[30]),
    ("lbtyp", &[31]),
    ("lblev", &[32]),
    ("lbrsvd", &[33, 34, 35, 36]),
    ("lbsrce", &[37]),
    ("lbuser", &[38, 39, 40, 41, 42, 43, 44]),
    ("brsvd", &[45, 46, 47, 48]),
    ("bdatum", &[49]),
    ("bacc", &[50]),
    ("blev", &[51]),
    ("brlev", &[52]),
    ("bhlev", &[53]),
    ("bhrlev", &[54]),
    ("bplat", &[55]),
    ("bplon", &[56]),
    ("bgor", &[57]),
    ("bzy", &[58]),
    ("bdy", &[59]),
    ("bzx", &[60]),
    ("bdx", &[61]),
    ("bmdi", &[62]),
    ("bmks", &[63]),
];

/// Release 2 validity times are stored to the day.
static RELEASE2_HEADER: &[(&str, &[usize])] = &[("lbday", &[5]), ("lbdayd", &[11])];

/// Release 3 validity times are stored to the second.
static RELEASE3_HEADER: &[(&str, &[usize])] = &[("lbsec", &[5]), ("lbsecd", &[11])];

/// The words every record exposes by name, whatever its release.
static STRUCTURAL_HEADER: &[(&str, &[usize])] = &[
    ("lblrec", &[LBLREC_OFFSET]),
    ("lbrel", &[LBREL_OFFSET]),
    ("lbegin", &[LBEGIN_OFFSET]),
    ("lbnrec", &[LBNREC_OFFSET]),
];

/// Where a named item lives within a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldSlot {
    /// An index into the integer words.
    Int(usize),
    /// An index into the real words.
    Real(usize),
}

impl FieldSlot {
    /// The slot for a zero-based word across the whole entry.
    pub const fn from_word(word: usize) -> Self {
        if word < NUM_FIELD_INTS {
            FieldSlot::Int(word)
        } else {
            FieldSlot::Real(word - NUM_FIELD_INTS)
        }
    }
}

struct SchemaTable {
    names: Vec<(String, FieldSlot)>,
    by_name: FxHashMap<String, FieldSlot>,
}

impl SchemaTable {
    fn new(tables: &[&[(&'static str, &'static [usize])]]) -> Self {
        let mut names: Vec<(String, FieldSlot, usize)> = Vec::new();
        for &(name, words) in tables.iter().flat_map(|table| table.iter()) {
            if let [word] = words {
                names.push((name.to_string(), FieldSlot::from_word(*word), *word));
            } else {
                for (i, &word) in words.iter().enumerate() {
                    names.push((format!("{name}{}", i + 1), FieldSlot::from_word(word), word));
                }
            }
        }
        names.sort_by_key(|(_, _, word)| *word);

        let names: Vec<(String, FieldSlot)> =
            names.into_iter().map(|(name, slot, _)| (name, slot)).collect();
        let by_name = names.iter().cloned().collect();
        Self { names, by_name }
    }
}

static RELEASE2: LazyLock<SchemaTable> =
    LazyLock::new(|| SchemaTable::new(&[COMMON_HEADER, RELEASE2_HEADER]));
static RELEASE3: LazyLock<SchemaTable> =
    LazyLock::new(|| SchemaTable::new(&[COMMON_HEADER, RELEASE3_HEADER]));
static UNVERSIONED: LazyLock<SchemaTable> =
    LazyLock::new(|| SchemaTable::new(&[STRUCTURAL_HEADER]));

/// The named view of a LOOKUP entry, selected by its header release number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldHeaderSchema {
    /// Any release without a known layout, including padding records.
    Unversioned,
    Release2,
    Release3,
}

impl FieldHeaderSchema {
    pub const fn for_release(lbrel: i64) -> Self {
        match lbrel {
            2 => FieldHeaderSchema::Release2,
            3 => FieldHeaderSchema::Release3,
            _ => FieldHeaderSchema::Unversioned,
        }
    }

    pub const fn release(&self) -> Option<i64> {
        match self {
            FieldHeaderSchema::Unversioned => None,
            FieldHeaderSchema::Release2 => Some(2),
            FieldHeaderSchema::Release3 => Some(3),
        }
    }

    fn table(&self) -> &'static SchemaTable {
        match self {
            FieldHeaderSchema::Unversioned => &UNVERSIONED,
            FieldHeaderSchema::Release2 => &RELEASE2,
            FieldHeaderSchema::Release3 => &RELEASE3,
        }
    }

    /// Resolve a name such as `lbproc`, `blev` or `lbuser4`.
    pub fn slot(&self, name: &str) -> Option<FieldSlot> {
        self.table().by_name.get(name).copied()
    }

    /// Every named item, in word order.
    pub fn names(&self) -> impl Iterator<Item = (&'static str, FieldSlot)> {
        self.table()
            .names
            .iter()
            .map(|(name, slot)| (name.as_str(), *slot))
    }
}

impl Display for FieldHeaderSchema {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.release() {
            Some(release) => write!(f, "release {release}"),
            None => write!(f, "unversioned"),
        }
    }
}
