use std::fmt::{Display, Formatter};

use ffv_dtype::Kind;

/// The optional constants blocks that follow the fixed length header, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Component {
    IntegerConstants,
    RealConstants,
    LevelDependentConstants,
    RowDependentConstants,
    ColumnDependentConstants,
    FieldsOfConstants,
    ExtraConstants,
    TempHistoryfile,
    CompressedFieldIndex1,
    CompressedFieldIndex2,
    CompressedFieldIndex3,
}

impl Component {
    pub const COUNT: usize = 11;

    /// Every component, in the order they are laid out on disk.
    pub const ALL: [Component; Self::COUNT] = [
        Component::IntegerConstants,
        Component::RealConstants,
        Component::LevelDependentConstants,
        Component::RowDependentConstants,
        Component::ColumnDependentConstants,
        Component::FieldsOfConstants,
        Component::ExtraConstants,
        Component::TempHistoryfile,
        Component::CompressedFieldIndex1,
        Component::CompressedFieldIndex2,
        Component::CompressedFieldIndex3,
    ];

    /// The name of the header pointer that locates this component.
    pub const fn name(&self) -> &'static str {
        match self {
            Component::IntegerConstants => "integer_constants",
            Component::RealConstants => "real_constants",
            Component::LevelDependentConstants => "level_dependent_constants",
            Component::RowDependentConstants => "row_dependent_constants",
            Component::ColumnDependentConstants => "column_dependent_constants",
            Component::FieldsOfConstants => "fields_of_constants",
            Component::ExtraConstants => "extra_constants",
            Component::TempHistoryfile => "temp_historyfile",
            Component::CompressedFieldIndex1 => "compressed_field_index1",
            Component::CompressedFieldIndex2 => "compressed_field_index2",
            Component::CompressedFieldIndex3 => "compressed_field_index3",
        }
    }

    /// The element kind the component is stored as.
    pub const fn kind(&self) -> Kind {
        match self {
            Component::IntegerConstants
            | Component::TempHistoryfile
            | Component::CompressedFieldIndex1
            | Component::CompressedFieldIndex2
            | Component::CompressedFieldIndex3 => Kind::Int,
            Component::RealConstants
            | Component::LevelDependentConstants
            | Component::RowDependentConstants
            | Component::ColumnDependentConstants
            | Component::FieldsOfConstants
            | Component::ExtraConstants => Kind::Float,
        }
    }

    pub(crate) const fn index(&self) -> usize {
        *self as usize
    }
}

impl Display for Component {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A region of the file located by a start word and shape in the fixed length header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pointer {
    Component(Component),
    Lookup,
    Data,
}

impl Pointer {
    pub const fn name(&self) -> &'static str {
        match self {
            Pointer::Component(component) => component.name(),
            Pointer::Lookup => "lookup",
            Pointer::Data => "data",
        }
    }
}

impl From<Component> for Pointer {
    fn from(value: Component) -> Self {
        Pointer::Component(value)
    }
}
