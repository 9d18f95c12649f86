use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(
        "could not authenticate the supplied user and password against the PPMI database; \
         check the credentials and, if you have not registered for access, follow the \
         instructions at https://www.ppmi-info.org/access-data-specimens/download-data/"
    )]
    AuthenticationFailed,
    #[error(
        "dataset `{0}` is not available; see fetchable_studydata() and fetchable_genetics() \
         for valid entries"
    )]
    UnknownDataset(String),
    #[error("download response carried no Content-Disposition filename")]
    MissingFilename,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Archive(#[from] zip::result::ZipError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
