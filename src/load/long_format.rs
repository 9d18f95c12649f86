use std::path::PathBuf;

use log::info;
use polars::prelude::*;

use crate::config::resolve_data_dir;
use crate::load::error::LoadError;
use crate::load::utils::{
    DATE, PARTICIPANT, SCORE, TEST, VISIT, melt_measures, sort_by_participant_visit,
};
use crate::load::{BehaviorLoader, BiospecimenLoader, DatscanLoader, DemographicsLoader};

/// Builds the combined long-format analysis table: one `(participant, visit,
/// test, score)` observation per row, annotated with demographics, visit
/// dates, age at visit and symptom duration.
///
/// Behavior, biospecimen and DaT-scan measures are unpivoted and pooled;
/// biospecimen and DaT-scan rows take their visit dates from the behavioral
/// assessments, which date visits most densely.
#[derive(Debug, Clone, Default)]
pub struct LongFormatLoader {
    data_dir: Option<PathBuf>,
}

impl LongFormatLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn load(&self) -> Result<DataFrame, LoadError> {
        let dir = resolve_data_dir(self.data_dir.as_deref());
        info!("Building the long-format study table from {}", dir.display());

        let behavior = BehaviorLoader::new().with_data_dir(&dir).load()?;
        let biospecimen = BiospecimenLoader::new().with_data_dir(&dir).load()?;
        let datscan = DatscanLoader::new().with_data_dir(&dir).load()?;
        let demographics = DemographicsLoader::new().with_data_dir(&dir).load()?;

        // behavioral assessments date the visits for every domain
        let visits = behavior
            .clone()
            .lazy()
            .select([col(PARTICIPANT), col(VISIT), col(DATE)])
            .filter(col(DATE).is_not_null())
            .collect()?
            .unique_stable(
                Some(&[PARTICIPANT.to_string(), VISIT.to_string()]),
                UniqueKeepStrategy::First,
                None,
            )?
            .lazy();

        let behavior_long = melt_domain(&behavior)?
            .select([col(PARTICIPANT), col(VISIT), col(DATE), col(TEST), col(SCORE)])
            .filter(col(DATE).is_not_null());
        let biospecimen_long = join_visit_dates(melt_domain(&biospecimen)?, visits.clone());
        let datscan_long = join_visit_dates(melt_domain(&datscan)?, visits);

        let long = concat(
            [behavior_long, biospecimen_long, datscan_long],
            UnionArgs::default(),
        )?;

        let annotated = long
            .join(
                demographics.lazy(),
                [col(PARTICIPANT)],
                [col(PARTICIPANT)],
                JoinArgs::new(JoinType::Inner),
            )
            .with_columns([
                // age at the visit, not at enrollment
                ((col(DATE) - col("date_birth"))
                    .dt()
                    .total_days()
                    .cast(DataType::Float64)
                    / lit(365.25))
                .alias("age"),
                ((col(DATE) - col("date_diagnosis"))
                    .dt()
                    .total_days()
                    .cast(DataType::Float64)
                    / lit(365.25))
                .alias("symptom_duration"),
            ]);

        let columns = [
            PARTICIPANT,
            "diagnosis",
            "gender",
            "race",
            "age",
            "family_history",
            "handedness",
            "education",
            "symptom_duration",
            "site",
            VISIT,
            DATE,
            TEST,
            SCORE,
        ];
        Ok(sort_by_participant_visit(annotated)?
            .select(columns.map(col))
            .collect()?)
    }
}

/// Unpivots a tidy domain frame into long observations; a date column, when
/// present, stays on the keys.
fn melt_domain(df: &DataFrame) -> Result<LazyFrame, LoadError> {
    let has_date = df
        .get_column_names()
        .iter()
        .any(|name| name.as_str() == DATE);
    let keys: &[&str] = if has_date {
        &[PARTICIPANT, VISIT, DATE]
    } else {
        &[PARTICIPANT, VISIT]
    };
    melt_measures(df, keys)
}

/// Replaces a domain's own dates with the behavioral visit dates.
fn join_visit_dates(long: LazyFrame, visits: LazyFrame) -> LazyFrame {
    long.select([col(PARTICIPANT), col(VISIT), col(TEST), col(SCORE)])
        .join(
            visits,
            [col(PARTICIPANT), col(VISIT)],
            [col(PARTICIPANT), col(VISIT)],
            JoinArgs::new(JoinType::Inner),
        )
        .select([col(PARTICIPANT), col(VISIT), col(DATE), col(TEST), col(SCORE)])
}
