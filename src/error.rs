use thiserror::Error;

use crate::fetch::error::FetchError;
use crate::load::error::LoadError;

/// Top-level error for callers that drive both the fetcher and the loaders.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Load(#[from] LoadError),
}
