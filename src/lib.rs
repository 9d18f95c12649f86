pub mod config;
pub mod fetch;
pub mod load;

mod constants;
pub mod error;

pub use crate::config::Credentials;
pub use crate::error::Error;
pub use crate::fetch::{
    FetchOptions, IdaClient, fetchable_genetic_projects, fetchable_genetics, fetchable_studydata,
};
pub use crate::load::{
    BehaviorLoader, BiospecimenLoader, DatscanLoader, DemographicsLoader, LongFormatLoader,
    MeasureSelection, VisitDatesLoader, available_behavior, available_biospecimen,
    available_datscan, available_demographics,
};
