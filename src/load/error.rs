use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(
        "{file} does not exist in {dir}; make sure the study data has been downloaded, e.g. \
         with IdaClient::fetch_studydata(&[\"all\"], ..)"
    )]
    MissingFile { file: String, dir: PathBuf },
    #[error("`{measure}` is not a valid {domain} measure; see {hint} for the available ones")]
    UnknownMeasure {
        measure: String,
        domain: &'static str,
        hint: &'static str,
    },
    #[error("the measure selection is empty")]
    EmptyMeasureSelection,
    #[error(transparent)]
    Polars(#[from] PolarsError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
