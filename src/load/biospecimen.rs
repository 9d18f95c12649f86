use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::info;
use polars::prelude::*;

use crate::config::resolve_data_dir;
use crate::load::MeasureSelection;
use crate::load::dates::add_dates;
use crate::load::error::LoadError;
use crate::load::utils::{
    DATE, PARTICIPANT, SCORE, TEST, VISIT, drop_unknown_visits, ensure_files, read_csv,
    sort_by_participant_visit, spread_measures,
};

const BIOSPECIMEN_FILE: &str = "Current_Biospecimen_Analysis_Results.csv";

/// The lumbar-puncture log dates most CSF draws and supplements the default
/// visit-date pool.
const LP_FILE: &str = "Lumbar_Puncture_Sample_Collection.csv";

/// The CSF panel kept when no explicit selection is made; most other assays
/// are missing for large fractions of the cohort.
const DEFAULT_PANEL: [&str; 4] = ["abeta_1-42", "csf_alpha-synuclein", "ptau", "ttau"];

/// Loads biospecimen assay results into a tidy frame, one row per
/// participant-visit and one column per test.
///
/// Test names are normalized to lowercase with underscores; duplicate assays
/// of the same test at the same visit are averaged.
#[derive(Debug, Clone, Default)]
pub struct BiospecimenLoader {
    data_dir: Option<PathBuf>,
    measures: MeasureSelection,
}

impl BiospecimenLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Which tests to keep; [`MeasureSelection::Default`] keeps the CSF panel.
    /// Keeping everything ([`MeasureSelection::All`]) is substantially slower.
    pub fn with_measures(mut self, measures: MeasureSelection) -> Self {
        self.measures = measures;
        self
    }

    pub fn load(&self) -> Result<DataFrame, LoadError> {
        let dir = resolve_data_dir(self.data_dir.as_deref());
        ensure_files(&dir, &[BIOSPECIMEN_FILE])?;
        info!("Loading biospecimen data from {}", dir.display());

        let raw = read_csv(&dir.join(BIOSPECIMEN_FILE))?;
        let long = raw.lazy().select([
            col("PATNO").cast(DataType::Int64).alias(PARTICIPANT),
            col("CLINICAL_EVENT").alias(VISIT),
            normalized_test_name(col("TESTNAME")).alias(TEST),
            col("TESTVALUE").cast(DataType::Float64).alias(SCORE),
        ]);
        let long = drop_unknown_visits(long)?;

        let mut tests: Vec<String> = match &self.measures {
            MeasureSelection::Default => {
                DEFAULT_PANEL.iter().map(|t| (*t).to_string()).collect()
            }
            MeasureSelection::All => available_biospecimen(Some(&dir))?,
            MeasureSelection::Named(names) => names.clone(),
        };
        tests.sort_unstable();
        tests.dedup();

        let wide = spread_measures(&long, &[PARTICIPANT, VISIT], &tests)?;
        let (wide, has_dates) = add_dates(wide, &dir, &[LP_FILE])?;

        let mut columns: Vec<Expr> = vec![col(PARTICIPANT), col(VISIT)];
        if has_dates {
            columns.push(col(DATE));
        }
        columns.extend(tests.iter().map(|t| col(t.as_str())));

        Ok(sort_by_participant_visit(wide)?.select(columns).collect()?)
    }
}

/// Lists the assays present in the biospecimen file, in normalized form.
pub fn available_biospecimen(path: Option<&Path>) -> Result<Vec<String>, LoadError> {
    let dir = resolve_data_dir(path);
    ensure_files(&dir, &[BIOSPECIMEN_FILE])?;
    let names = read_csv(&dir.join(BIOSPECIMEN_FILE))?
        .lazy()
        .select([normalized_test_name(col("TESTNAME")).alias(TEST)])
        .collect()?;

    let unique: BTreeSet<String> = names
        .column(TEST)?
        .str()?
        .iter()
        .flatten()
        .map(ToOwned::to_owned)
        .collect();
    Ok(unique.into_iter().collect())
}

fn normalized_test_name(name: Expr) -> Expr {
    name.str()
        .to_lowercase()
        .str()
        .replace_all(lit(" "), lit("_"), true)
}
