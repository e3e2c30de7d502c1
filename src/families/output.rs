//! Result shapes of a family computation.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::spectral::{Info, PurpleTable, SpectralTable};

/// A spectral table plus the wavelengths a projection had to leave out.
#[derive(Debug, Clone, PartialEq)]
pub struct TableOutput {
    pub table: SpectralTable,
    pub dropped: Vec<f64>,
}

impl TableOutput {
    #[must_use]
    pub fn new(table: SpectralTable) -> Self {
        Self {
            table,
            dropped: Vec::new(),
        }
    }
}

impl Serialize for TableOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TableOutput", 4)?;
        state.serialize_field("key", "wavelength")?;
        state.serialize_field("channels", &self.table.channels)?;
        state.serialize_field("rows", &self.table.to_arrays())?;
        state.serialize_field("dropped", &self.dropped)?;
        state.end()
    }
}

/// Purple-line stimuli; rows are keyed by complementary wavelength and
/// ordered by their fraction along the purple line.
#[derive(Debug, Clone, PartialEq)]
pub struct PurpleOutput {
    pub table: PurpleTable,
}

impl Serialize for PurpleOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fractions: Vec<f64> = self.table.rows.iter().map(|row| row.fraction).collect();
        let mut state = serializer.serialize_struct("PurpleOutput", 4)?;
        state.serialize_field("key", "complementary_wavelength")?;
        state.serialize_field("channels", &self.table.channels)?;
        state.serialize_field("rows", &self.table.to_arrays())?;
        state.serialize_field("fractions", &fractions)?;
        state.end()
    }
}

/// What a family computation returns.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Output {
    Table(TableOutput),
    Purples(PurpleOutput),
    Info(Info),
}

impl Output {
    #[must_use]
    pub fn as_table(&self) -> Option<&TableOutput> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_purples(&self) -> Option<&PurpleOutput> {
        match self {
            Self::Purples(purples) => Some(purples),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_info(&self) -> Option<&Info> {
        match self {
            Self::Info(info) => Some(info),
            _ => None,
        }
    }
}
