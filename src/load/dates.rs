use std::path::{Path, PathBuf};

use log::debug;
use polars::prelude::*;

use crate::config::resolve_data_dir;
use crate::load::error::LoadError;
use crate::load::schema::{EVENT_ID, INFODT, PATNO};
use crate::load::utils::{
    DATE, PARTICIPANT, VISIT, drop_unknown_visits, ensure_files, month_year_to_date, read_csv,
    sort_by_participant_visit,
};

/// Files whose `INFODT` column dates most visits; pooled together they cover
/// nearly every participant-visit pair in the study.
const DATE_FILES: [&str; 4] = [
    "Inclusion_Exclusion.csv",
    "Signature_Form.csv",
    "Socio-Economics.csv",
    "Vital_Signs.csv",
];

/// Loads the `(participant, visit, date)` lookup linking each visit code to a
/// calendar date.
#[derive(Debug, Clone, Default)]
pub struct VisitDatesLoader {
    data_dir: Option<PathBuf>,
    extra_files: Vec<String>,
}

impl VisitDatesLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Additional study files whose `INFODT` should contribute dates beyond
    /// the default pool.
    pub fn with_extra_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn load(&self) -> Result<DataFrame, LoadError> {
        let dir = resolve_data_dir(self.data_dir.as_deref());
        let extra: Vec<&str> = self.extra_files.iter().map(String::as_str).collect();
        let dates = load_dates_frame(&dir, &extra)?;
        Ok(sort_by_participant_visit(dates.lazy())?
            .select([col(PARTICIPANT), col(VISIT), col(DATE)])
            .collect()?)
    }
}

/// Pools `(PATNO, EVENT_ID, INFODT)` from the date files, keeping the first
/// date seen for each participant-visit pair.
pub(crate) fn load_dates_frame(dir: &Path, extra_files: &[&str]) -> Result<DataFrame, LoadError> {
    let mut files: Vec<&str> = extra_files.to_vec();
    files.extend(DATE_FILES);
    ensure_files(dir, &files)?;

    let mut parts = Vec::with_capacity(files.len());
    for file in &files {
        let df = read_csv(&dir.join(file))?;
        parts.push(df.lazy().select([
            col(PATNO).cast(DataType::Int64).alias(PARTICIPANT),
            col(EVENT_ID).alias(VISIT),
            col(INFODT).alias(DATE),
        ]));
    }

    let pooled = concat(parts, UnionArgs::default())?.filter(
        col(PARTICIPANT)
            .is_not_null()
            .and(col(VISIT).is_not_null())
            .and(col(DATE).is_not_null()),
    );
    let pooled = drop_unknown_visits(pooled)?.collect()?;
    let deduped = pooled.unique_stable(
        Some(&[PARTICIPANT.to_string(), VISIT.to_string()]),
        UniqueKeepStrategy::First,
        None,
    )?;
    Ok(deduped
        .lazy()
        .with_column(month_year_to_date(DATE))
        .collect()?)
}

/// Left-joins visit dates onto a tidy frame keyed by participant and visit.
///
/// When the date files are not present in `dir` the frame is returned
/// unchanged, without a date column; dates are an enrichment, not a
/// requirement.
pub(crate) fn add_dates(
    tidy: LazyFrame,
    dir: &Path,
    extra_files: &[&str],
) -> Result<(LazyFrame, bool), LoadError> {
    let dates = match load_dates_frame(dir, extra_files) {
        Ok(dates) => dates,
        Err(LoadError::MissingFile { file, .. }) => {
            debug!("visit dates unavailable ({file} missing); continuing without dates");
            return Ok((tidy, false));
        }
        Err(err) => return Err(err),
    };
    let joined = tidy.join(
        dates.lazy(),
        [col(PARTICIPANT), col(VISIT)],
        [col(PARTICIPANT), col(VISIT)],
        JoinArgs::new(JoinType::Left),
    );
    Ok((joined, true))
}
