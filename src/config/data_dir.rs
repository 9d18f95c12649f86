use std::env;
use std::path::{Path, PathBuf};

use crate::constants::PATH_ENV;

/// Resolves the directory holding (or receiving) PPMI data files.
///
/// Precedence: explicit `path` argument, then `$PPMI_PATH`, then the current
/// working directory.
pub fn resolve_data_dir(path: Option<&Path>) -> PathBuf {
    if let Some(p) = path {
        return p.to_path_buf();
    }
    if let Ok(p) = env::var(PATH_ENV) {
        return PathBuf::from(p);
    }
    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
