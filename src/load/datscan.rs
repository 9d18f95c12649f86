use std::path::{Path, PathBuf};

use log::info;
use polars::prelude::*;

use crate::config::resolve_data_dir;
use crate::load::MeasureSelection;
use crate::load::dates::add_dates;
use crate::load::error::LoadError;
use crate::load::utils::{
    DATE, PARTICIPANT, VISIT, drop_unknown_visits, ensure_files, read_csv,
    sort_by_participant_visit, ymd_to_date,
};

const DATSCAN_FILE: &str = "DATScan_Analysis.csv";

const KEY_COLUMNS: [&str; 3] = ["PATNO", "EVENT_ID", "SCAN_DATE"];

/// Loads striatal binding ratios from the DaT-scan analysis file, one row per
/// participant-visit and one lowercase column per region.
#[derive(Debug, Clone, Default)]
pub struct DatscanLoader {
    data_dir: Option<PathBuf>,
    measures: MeasureSelection,
}

impl DatscanLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Which regions to keep; the default keeps everything the file carries.
    /// Naming a region the file does not carry is an error.
    pub fn with_measures(mut self, measures: MeasureSelection) -> Self {
        self.measures = measures;
        self
    }

    pub fn load(&self) -> Result<DataFrame, LoadError> {
        let dir = resolve_data_dir(self.data_dir.as_deref());
        ensure_files(&dir, &[DATSCAN_FILE])?;
        info!("Loading DaT-scan data from {}", dir.display());

        let raw = read_csv(&dir.join(DATSCAN_FILE))?;
        let column_names: Vec<String> = raw
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let has_scan_date = column_names.iter().any(|name| name == "SCAN_DATE");
        let all_measures: Vec<String> = column_names
            .iter()
            .filter(|name| !KEY_COLUMNS.contains(&name.as_str()))
            .map(|name| name.to_lowercase())
            .collect();

        let mut select: Vec<Expr> = vec![
            col("PATNO").cast(DataType::Int64).alias(PARTICIPANT),
            col("EVENT_ID").alias(VISIT),
        ];
        if has_scan_date {
            select.push(col("SCAN_DATE").alias(DATE));
        }
        for name in &column_names {
            if !KEY_COLUMNS.contains(&name.as_str()) {
                select.push(
                    col(name.as_str())
                        .cast(DataType::Float64)
                        .alias(name.to_lowercase()),
                );
            }
        }

        let tidy = drop_unknown_visits(raw.lazy().select(select))?;

        // an explicit selection mirrors the vendor file check; the scan date
        // is rebuilt from the visit-date pool in that case
        let (tidy, measures, has_dates) = match &self.measures {
            MeasureSelection::Default | MeasureSelection::All => {
                let tidy = if has_scan_date {
                    tidy.with_column(ymd_to_date(DATE))
                } else {
                    tidy
                };
                if has_scan_date {
                    (tidy, all_measures, true)
                } else {
                    let (tidy, has_dates) = add_dates(tidy, &dir, &[])?;
                    (tidy, all_measures, has_dates)
                }
            }
            MeasureSelection::Named(names) => {
                for name in names {
                    if !all_measures.contains(name) {
                        return Err(LoadError::UnknownMeasure {
                            measure: name.clone(),
                            domain: "DaT-scan",
                            hint: "available_datscan()",
                        });
                    }
                }
                if names.is_empty() {
                    return Err(LoadError::EmptyMeasureSelection);
                }
                let mut keep: Vec<Expr> = vec![col(PARTICIPANT), col(VISIT)];
                keep.extend(names.iter().map(|name| col(name.as_str())));
                let (tidy, has_dates) = add_dates(tidy.select(keep), &dir, &[])?;
                (tidy, names.clone(), has_dates)
            }
        };

        let mut columns: Vec<Expr> = vec![col(PARTICIPANT), col(VISIT)];
        if has_dates {
            columns.push(col(DATE));
        }
        columns.extend(measures.iter().map(|name| col(name.as_str())));

        Ok(sort_by_participant_visit(tidy)?.select(columns).collect()?)
    }
}

/// Lists the measure columns of the DaT-scan file, lowercased and sorted.
pub fn available_datscan(path: Option<&Path>) -> Result<Vec<String>, LoadError> {
    let dir = resolve_data_dir(path);
    ensure_files(&dir, &[DATSCAN_FILE])?;

    // only the header is needed
    let header = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_n_rows(Some(0))
        .try_into_reader_with_file_path(Some(dir.join(DATSCAN_FILE)))?
        .finish()?;

    let mut measures: Vec<String> = header
        .get_column_names()
        .iter()
        .filter(|name| !KEY_COLUMNS.contains(&name.as_str()))
        .map(|name| name.to_lowercase())
        .collect();
    measures.sort_unstable();
    Ok(measures)
}
