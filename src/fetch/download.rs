use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use indicatif::ProgressBar;
use log::{debug, info, warn};
use regex::Regex;
use reqwest::blocking::Response;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE, HeaderName};
use zip::ZipArchive;

use crate::config::resolve_data_dir;
use crate::fetch::error::FetchError;
use crate::fetch::ida_client::{DownloadParams, Endpoint, IdaClient};
use crate::fetch::manifest::{
    self, DatasetRecord, expand_genetics_request, fetchable_studydata,
};

static FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"filename="(.+)""#).expect("filename regex is valid"));

/// Options shared by the fetch entry points.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    path: Option<PathBuf>,
    overwrite: bool,
    quiet: bool,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory to download into; defaults to `$PPMI_PATH` or the current
    /// directory.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Re-download files that already exist at the target directory.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Suppress the download progress bar.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

impl IdaClient {
    /// Downloads the named study-data `datasets` and extracts them into the
    /// target directory.
    ///
    /// Dataset names are the keys listed by
    /// [`fetchable_studydata`](crate::fetch::fetchable_studydata); `"all"`
    /// selects the whole registry. All requested files are bundled into a
    /// single portal request. Returns the paths of every file produced or
    /// already present.
    pub fn fetch_studydata(
        &self,
        datasets: &[&str],
        options: &FetchOptions,
    ) -> Result<Vec<PathBuf>, FetchError> {
        let keys: Vec<&str> = if datasets.iter().any(|d| *d == "all") {
            fetchable_studydata()
        } else {
            datasets.to_vec()
        };
        let records = keys
            .iter()
            .map(|k| {
                manifest::studydata_record(k)
                    .ok_or_else(|| FetchError::UnknownDataset((*k).to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.download(&records, Endpoint::Study, options, true)
    }

    /// Downloads the named genetics `datasets` into the target directory.
    ///
    /// Accepts keys listed by
    /// [`fetchable_genetics`](crate::fetch::fetchable_genetics), `"all"`, or a
    /// project designation such as `"project 107"`, which expands to every
    /// file of that project. Genetics files are large, so each one is
    /// requested separately rather than bundled.
    pub fn fetch_genetics(
        &self,
        datasets: &[&str],
        options: &FetchOptions,
    ) -> Result<Vec<PathBuf>, FetchError> {
        let keys = expand_genetics_request(datasets);
        let records = keys
            .iter()
            .map(|k| {
                manifest::genetics_record(k)
                    .ok_or_else(|| FetchError::UnknownDataset(k.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.download(&records, Endpoint::Genetic, options, false)
    }

    fn download(
        &self,
        records: &[&'static DatasetRecord],
        endpoint: Endpoint,
        options: &FetchOptions,
        bundle: bool,
    ) -> Result<Vec<PathBuf>, FetchError> {
        let dir = resolve_data_dir(options.path.as_deref());
        info!("Requesting {} datasets for download", records.len());

        let mut downloaded = Vec::new();
        let mut pending: Vec<&str> = Vec::new();
        for record in records {
            let target = dir.join(&record.name);
            if target.is_file() && !options.overwrite {
                debug!("{} already exists, skipping", target.display());
                downloaded.push(target);
            } else {
                pending.push(record.id.as_str());
            }
        }

        // everything already on disk, nothing to request
        if pending.is_empty() {
            return Ok(downloaded);
        }

        let params = self.authenticate(endpoint)?;
        let requests: Vec<Vec<&str>> = if bundle {
            vec![pending]
        } else {
            pending.into_iter().map(|id| vec![id]).collect()
        };
        for file_ids in requests {
            downloaded.extend(self.download_files(&params, endpoint, &file_ids, &dir, options)?);
        }
        Ok(downloaded)
    }

    /// Issues one download request and lands its payload in `dir`: a zip
    /// response is extracted member by member, anything else is a single CSV
    /// named by the Content-Disposition header.
    fn download_files(
        &self,
        params: &DownloadParams,
        endpoint: Endpoint,
        file_ids: &[&str],
        dir: &Path,
        options: &FetchOptions,
    ) -> Result<Vec<PathBuf>, FetchError> {
        let mut query: Vec<(&str, &str)> = vec![
            ("type", "GET_FILES"),
            ("userId", params.user_id.as_str()),
            ("authKey", params.auth_key.as_str()),
        ];
        query.extend(file_ids.iter().map(|id| ("fileId", *id)));

        let response = self
            .http()
            .get(self.download_url(endpoint))
            .query(&query)
            .send()?
            .error_for_status()?;

        let content_type = header_str(&response, CONTENT_TYPE);
        let disposition = header_str(&response, CONTENT_DISPOSITION);
        let total = response.content_length();

        let progress = match (options.quiet, total) {
            (true, _) => ProgressBar::hidden(),
            (false, Some(len)) => ProgressBar::new(len),
            (false, None) => ProgressBar::new_spinner(),
        };
        let mut body = Vec::new();
        progress.wrap_read(response).read_to_end(&mut body)?;
        progress.finish_and_clear();

        if let Some(expected) = total
            && expected != body.len() as u64
        {
            warn!(
                "received {}/{} bytes; downloaded data may be corrupted",
                body.len(),
                expected
            );
        }

        if content_type.contains("zip-compressed") {
            let mut archive = ZipArchive::new(Cursor::new(body))?;
            let members: Vec<String> = archive.file_names().map(ToOwned::to_owned).collect();
            archive.extract(dir)?;
            info!("Extracted {} files into {}", members.len(), dir.display());
            Ok(members.into_iter().map(|m| dir.join(m)).collect())
        } else {
            let file_name = FILENAME_RE
                .captures(&disposition)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .ok_or(FetchError::MissingFilename)?;
            let target = dir.join(file_name);
            fs::write(&target, &body)?;
            info!("Saved {}", target.display());
            Ok(vec![target])
        }
    }
}

fn header_str(response: &Response, name: HeaderName) -> String {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
