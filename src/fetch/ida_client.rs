use std::fmt;
use std::sync::LazyLock;

use log::{debug, info};
use regex::Regex;
use reqwest::blocking::Client;

use crate::config::Credentials;
use crate::constants::{
    GENETIC_ACCESS_URL, GENETIC_DOWNLOAD_URL, LOGIN_URL, STUDY_ACCESS_URL, STUDY_DOWNLOAD_URL,
};
use crate::fetch::error::FetchError;

// The IDA pages do not expose the session keys through an API; they are
// embedded in the returned HTML and have to be scraped out.
static LOGIN_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"studyData\.jsp\?loginKey=(-?\d+)").expect("login key regex is valid")
});
static USER_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"userId=(\d+)").expect("user id regex is valid"));
static AUTH_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"authKey=(-?\d+)").expect("auth key regex is valid"));

/// The two download surfaces the portal exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Study,
    Genetic,
}

impl Endpoint {
    fn sub_page(self) -> &'static str {
        match self {
            Endpoint::Study => "STUDY_DATA",
            Endpoint::Genetic => "GENETIC_DATA",
        }
    }
}

/// Session parameters scraped from the access page; they are passed verbatim
/// as query parameters on download requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadParams {
    pub user_id: String,
    pub auth_key: String,
}

/// A client for the LONI IDA portal serving PPMI data.
///
/// Authentication is a two-step scrape: the login page yields a `loginKey`,
/// and the access page (study or genetic) yields the `userId`/`authKey` pair
/// that authorizes download requests.
pub struct IdaClient {
    http: Client,
    credentials: Credentials,
    login_url: String,
    study_access_url: String,
    genetic_access_url: String,
    study_download_url: String,
    genetic_download_url: String,
}

impl fmt::Debug for IdaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdaClient")
            .field("credentials", &self.credentials)
            .field("login_url", &self.login_url)
            .field("study_access_url", &self.study_access_url)
            .field("genetic_access_url", &self.genetic_access_url)
            .field("study_download_url", &self.study_download_url)
            .field("genetic_download_url", &self.genetic_download_url)
            .finish()
    }
}

impl IdaClient {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            http: Client::new(),
            credentials,
            login_url: LOGIN_URL.to_string(),
            study_access_url: STUDY_ACCESS_URL.to_string(),
            genetic_access_url: GENETIC_ACCESS_URL.to_string(),
            study_download_url: STUDY_DOWNLOAD_URL.to_string(),
            genetic_download_url: GENETIC_DOWNLOAD_URL.to_string(),
        }
    }

    /// Builds a client with credentials taken from `$PPMI_USER`/`$PPMI_PASSWORD`.
    pub fn from_env() -> Result<Self, FetchError> {
        Ok(Self::new(Credentials::from_env()?))
    }

    pub fn with_login_url(mut self, url: impl Into<String>) -> Self {
        self.login_url = url.into();
        self
    }

    pub fn with_access_urls(
        mut self,
        study: impl Into<String>,
        genetic: impl Into<String>,
    ) -> Self {
        self.study_access_url = study.into();
        self.genetic_access_url = genetic.into();
        self
    }

    pub fn with_download_urls(
        mut self,
        study: impl Into<String>,
        genetic: impl Into<String>,
    ) -> Self {
        self.study_download_url = study.into();
        self.genetic_download_url = genetic.into();
        self
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn download_url(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Study => &self.study_download_url,
            Endpoint::Genetic => &self.genetic_download_url,
        }
    }

    fn access_url(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Study => &self.study_access_url,
            Endpoint::Genetic => &self.genetic_access_url,
        }
    }

    /// Performs the nested login/access requests and returns the session
    /// parameters for download query strings.
    ///
    /// Bad credentials do not produce an HTTP error; they produce pages
    /// without the embedded keys, which surfaces here as
    /// [`FetchError::AuthenticationFailed`].
    pub fn authenticate(&self, endpoint: Endpoint) -> Result<DownloadParams, FetchError> {
        info!("Fetching authentication key for data download");
        let login_page = self
            .http
            .post(&self.login_url)
            .query(&[("project", "PPMI"), ("page", "HOME")])
            .form(&[
                ("userEmail", self.credentials.username()),
                ("userPassword", self.credentials.password()),
            ])
            .send()?
            .error_for_status()?
            .text()?;
        let login_key =
            capture(&LOGIN_KEY_RE, &login_page).ok_or(FetchError::AuthenticationFailed)?;
        debug!("Scraped loginKey from the IDA login page");

        let access_page = self
            .http
            .post(self.access_url(endpoint))
            .query(&[
                ("loginKey", login_key.as_str()),
                ("userEmail", self.credentials.username()),
                ("project", "PPMI"),
                ("page", "DOWNLOADS"),
                ("subPage", endpoint.sub_page()),
            ])
            .send()?
            .error_for_status()?
            .text()?;
        let user_id =
            capture(&USER_ID_RE, &access_page).ok_or(FetchError::AuthenticationFailed)?;
        let auth_key =
            capture(&AUTH_KEY_RE, &access_page).ok_or(FetchError::AuthenticationFailed)?;
        debug!("Scraped userId and authKey from the access page");

        Ok(DownloadParams { user_id, auth_key })
    }
}

fn capture(re: &Regex, body: &str) -> Option<String> {
    re.captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
