//! Portal endpoints and environment variable names.

/// IDA login page; the response body embeds the session `loginKey`.
pub(crate) const LOGIN_URL: &str = "https://ida.loni.usc.edu/login.jsp";

/// Study-data access page; the response body embeds `userId` and `authKey`.
pub(crate) const STUDY_ACCESS_URL: &str = "https://ida.loni.usc.edu/pages/access/studyData.jsp";

/// Genetics access page; same key scraping as the study-data page.
pub(crate) const GENETIC_ACCESS_URL: &str = "https://ida.loni.usc.edu/pages/access/geneticData.jsp";

/// Download endpoint for bundled study-data files.
pub(crate) const STUDY_DOWNLOAD_URL: &str = "https://utilities.loni.usc.edu/download/study";

/// Download endpoint for genetics files.
pub(crate) const GENETIC_DOWNLOAD_URL: &str = "https://utilities.loni.usc.edu/download/genetic";

pub(crate) const USER_ENV: &str = "PPMI_USER";
pub(crate) const PASSWORD_ENV: &str = "PPMI_PASSWORD";
pub(crate) const PATH_ENV: &str = "PPMI_PATH";
