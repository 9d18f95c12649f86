pub mod behavior;
pub mod biospecimen;
pub mod datscan;
pub mod dates;
pub mod demographics;
pub mod error;
pub mod long_format;
mod schema;
mod utils;
pub mod visits;

pub use behavior::{BehaviorLoader, available_behavior};
pub use biospecimen::{BiospecimenLoader, available_biospecimen};
pub use datscan::{DatscanLoader, available_datscan};
pub use dates::VisitDatesLoader;
pub use demographics::{DemographicsLoader, available_demographics};
pub use error::LoadError;
pub use long_format::LongFormatLoader;
pub use visits::Visit;

/// Which measures a loader keeps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MeasureSelection {
    /// The loader's default set: everything for behavior, DaT scan and
    /// demographics, the CSF panel for biospecimen.
    #[default]
    Default,
    /// Every measure present in the source files.
    All,
    /// An explicit list of measure names.
    Named(Vec<String>),
}

impl MeasureSelection {
    /// Shorthand for [`MeasureSelection::Named`].
    pub fn named<I, S>(measures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Named(measures.into_iter().map(Into::into).collect())
    }
}
