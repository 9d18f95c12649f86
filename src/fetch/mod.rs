pub mod download;
pub mod error;
pub mod ida_client;
pub mod manifest;

pub use download::FetchOptions;
pub use ida_client::{Endpoint, IdaClient};
pub use manifest::{
    DatasetRecord, fetchable_genetic_projects, fetchable_genetics, fetchable_studydata,
};
