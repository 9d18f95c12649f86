use std::collections::BTreeMap;
use std::path::PathBuf;

use log::info;
use polars::prelude::*;

use crate::config::resolve_data_dir;
use crate::load::MeasureSelection;
use crate::load::error::LoadError;
use crate::load::schema::{DEMOGRAPHIC_MEASURES, DemographicMeasure, DemographicSpec};
use crate::load::utils::{PARTICIPANT, ensure_files, month_year_to_date, read_csv};

/// Loads per-participant demographic attributes, one row per participant.
///
/// Each attribute comes from a single vendor file and column, recoded through
/// the static demographic table; attributes are outer-joined on participant.
#[derive(Debug, Clone, Default)]
pub struct DemographicsLoader {
    data_dir: Option<PathBuf>,
    measures: MeasureSelection,
}

impl DemographicsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Which attributes to keep; the default keeps all of them. Names not in
    /// the demographic table are ignored.
    pub fn with_measures(mut self, measures: MeasureSelection) -> Self {
        self.measures = measures;
        self
    }

    pub fn load(&self) -> Result<DataFrame, LoadError> {
        let specs: Vec<&DemographicMeasure> = match &self.measures {
            MeasureSelection::Default | MeasureSelection::All => {
                DEMOGRAPHIC_MEASURES.iter().collect()
            }
            MeasureSelection::Named(names) => DEMOGRAPHIC_MEASURES
                .iter()
                .filter(|m| names.iter().any(|n| n == m.name))
                .collect(),
        };
        if specs.is_empty() {
            return Err(LoadError::EmptyMeasureSelection);
        }

        let dir = resolve_data_dir(self.data_dir.as_deref());
        let files: Vec<&str> = specs.iter().map(|m| m.spec.file()).collect();
        ensure_files(&dir, &files)?;
        info!("Loading demographics from {}", dir.display());

        // several attributes share a source file; read each file once
        let mut cache: BTreeMap<&str, DataFrame> = BTreeMap::new();
        for file in files {
            if !cache.contains_key(file) {
                cache.insert(file, read_csv(&dir.join(file))?);
            }
        }

        let mut acc: Option<LazyFrame> = None;
        for measure in &specs {
            let source = cache
                .get(measure.spec.file())
                .expect("every spec file was read above");
            let piece = source
                .clone()
                .lazy()
                .select([
                    col("PATNO").cast(DataType::Int64).alias(PARTICIPANT),
                    measure_expr(&measure.spec)?.alias(measure.name),
                ])
                .collect()?
                // the source files carry one row per visit; keep the first
                .unique_stable(
                    Some(&[PARTICIPANT.to_string()]),
                    UniqueKeepStrategy::First,
                    None,
                )?
                .lazy();
            acc = Some(match acc {
                None => piece,
                Some(acc) => acc.join(
                    piece,
                    [col(PARTICIPANT)],
                    [col(PARTICIPANT)],
                    JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns),
                ),
            });
        }

        let mut columns: Vec<Expr> = vec![col(PARTICIPANT)];
        columns.extend(specs.iter().map(|m| col(m.name)));

        Ok(acc
            .expect("at least one measure was selected")
            .select(columns)
            .sort([PARTICIPANT], SortMultipleOptions::default())
            .collect()?)
    }
}

/// Lists the demographic attributes the loader can produce.
pub fn available_demographics() -> Vec<&'static str> {
    DEMOGRAPHIC_MEASURES.iter().map(|m| m.name).collect()
}

fn measure_expr(spec: &DemographicSpec) -> Result<Expr, LoadError> {
    let expr = match spec {
        DemographicSpec::Replace { column, map, .. } => {
            // built from the end so unmatched values pass through
            let mut expr: Expr = col(*column);
            for (from, to) in map.iter().rev() {
                expr = when(col(*column).eq(lit(*from)))
                    .then(lit(*to))
                    .otherwise(expr);
            }
            expr
        }
        DemographicSpec::Lowercase { column, .. } => col(*column).str().to_lowercase(),
        DemographicSpec::MonthYearDate { column, .. } => month_year_to_date(column),
        DemographicSpec::AnyIndicator { columns, .. } => {
            let flags: Vec<Expr> = columns
                .iter()
                .map(|c| col(*c).cast(DataType::Float64))
                .collect();
            sum_horizontal(&flags, true)?.gt(lit(0.0))
        }
        DemographicSpec::YearsBetween { start, end, .. } => {
            let elapsed = month_year_to_date(end) - month_year_to_date(start);
            elapsed.dt().total_days().cast(DataType::Float64) / lit(365.25)
        }
        DemographicSpec::RaceIndicators { columns, .. } => {
            let flags: Vec<Expr> = columns
                .iter()
                .map(|(c, _)| col(*c).cast(DataType::Float64))
                .collect();
            let total = sum_horizontal(&flags, true)?;

            let mut single: Expr = lit(NULL);
            for (column, label) in columns.iter().rev() {
                single = when(col(*column).cast(DataType::Float64).eq(lit(1.0)))
                    .then(lit(*label))
                    .otherwise(single);
            }
            when(total.clone().gt(lit(1.0)))
                .then(lit("multi"))
                .when(total.eq(lit(1.0)))
                .then(single)
                .otherwise(lit(NULL))
        }
        DemographicSpec::GenderCode { column, .. } => {
            let code = col(*column).cast(DataType::Float64);
            when(code.clone().eq(lit(0.0)).or(code.clone().eq(lit(1.0))))
                .then(lit("f"))
                .when(code.eq(lit(2.0)))
                .then(lit("m"))
                .otherwise(lit("ns"))
        }
        DemographicSpec::Integer { column, .. } => col(*column).cast(DataType::Int64),
        DemographicSpec::Float { column, .. } => col(*column).cast(DataType::Float64),
    };
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::fs;
    use tempfile::TempDir;

    #[fixture]
    fn data_dir() -> TempDir {
        let dir = tempfile::tempdir().expect("Failed to create temporary directory");
        fs::write(
            dir.path().join("Patient_Status.csv"),
            "PATNO,ENROLL_CAT,ENROLL_STATUS\n\
             1001,PD,Enrolled\n\
             1002,HC,Enrolled\n\
             1003,PRODROMA,Withdrew\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("Randomization_table.csv"),
            "PATNO,BIRTHDT,ENROLLDT,GENDER\n\
             1001,05/1950,05/2019,2\n\
             1002,01/1960,01/2020,1\n\
             1003,03/1945,03/2019,\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("PD_Features.csv"),
            "PATNO,PDDXDT\n1001,01/2019\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("Family_History__PD_.csv"),
            "PATNO,BIOMOMPD,BIODADPD,FULSIBPD,HAFSIBPD,MAGPARPD,PAGPARPD,MATAUPD,PATAUPD,KIDSPD\n\
             1001,0,1,0,0,0,0,0,0,0\n\
             1002,0,0,0,0,0,0,0,0,0\n\
             1003,,,,,,,,,\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("Screening___Demographics.csv"),
            "PATNO,RAINDALS,RAASIAN,RABLACK,RAHAWOPI,RAWHITE,RANOS\n\
             1001,0,0,0,0,1,0\n\
             1002,0,1,0,0,1,0\n\
             1003,0,0,0,0,0,1\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("Center-Subject_List.csv"),
            "PATNO,CNO\n1001,12\n1002,17\n1003,12\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("Socio-Economics.csv"),
            "PATNO,EVENT_ID,INFODT,HANDED,EDUCYRS\n\
             1001,BL,05/2019,1,16\n\
             1001,V01,08/2019,1,16\n\
             1002,BL,01/2020,2,12\n\
             1003,BL,03/2019,3,18\n",
        )
        .unwrap();
        dir
    }

    #[rstest]
    fn test_full_demographics_shape(data_dir: TempDir) {
        let tidy = DemographicsLoader::new()
            .with_data_dir(data_dir.path())
            .load()
            .unwrap();

        let mut expected = vec![PARTICIPANT];
        expected.extend(available_demographics());
        assert_eq!(
            tidy.get_column_names()
                .iter()
                .map(|n| n.as_str())
                .collect::<Vec<_>>(),
            expected
        );
        // one row per participant despite repeated Socio-Economics visits
        assert_eq!(tidy.height(), 3);
    }

    #[rstest]
    fn test_diagnosis_and_status_recodes(data_dir: TempDir) {
        let tidy = DemographicsLoader::new()
            .with_data_dir(data_dir.path())
            .with_measures(MeasureSelection::named(["diagnosis", "status"]))
            .load()
            .unwrap();

        let diagnosis: Vec<Option<&str>> = tidy
            .column("diagnosis")
            .unwrap()
            .str()
            .unwrap()
            .iter()
            .collect();
        assert_eq!(diagnosis, vec![Some("pd"), Some("hc"), Some("prod")]);

        let status: Vec<Option<&str>> = tidy
            .column("status")
            .unwrap()
            .str()
            .unwrap()
            .iter()
            .collect();
        assert_eq!(status, vec![Some("enrolled"), Some("enrolled"), Some("withdrew")]);
    }

    #[rstest]
    fn test_gender_race_and_handedness(data_dir: TempDir) {
        let tidy = DemographicsLoader::new()
            .with_data_dir(data_dir.path())
            .with_measures(MeasureSelection::named(["gender", "race", "handedness"]))
            .load()
            .unwrap();

        let gender: Vec<Option<&str>> = tidy
            .column("gender")
            .unwrap()
            .str()
            .unwrap()
            .iter()
            .collect();
        assert_eq!(gender, vec![Some("m"), Some("f"), Some("ns")]);

        let race: Vec<Option<&str>> =
            tidy.column("race").unwrap().str().unwrap().iter().collect();
        assert_eq!(race, vec![Some("white"), Some("multi"), Some("ns")]);

        let handedness: Vec<Option<&str>> = tidy
            .column("handedness")
            .unwrap()
            .str()
            .unwrap()
            .iter()
            .collect();
        assert_eq!(handedness, vec![Some("right"), Some("left"), Some("both")]);
    }

    #[rstest]
    fn test_family_history_and_age(data_dir: TempDir) {
        let tidy = DemographicsLoader::new()
            .with_data_dir(data_dir.path())
            .with_measures(MeasureSelection::named(["family_history", "age"]))
            .load()
            .unwrap();

        let family: Vec<Option<bool>> = tidy
            .column("family_history")
            .unwrap()
            .bool()
            .unwrap()
            .iter()
            .collect();
        assert_eq!(family[0], Some(true));
        assert_eq!(family[1], Some(false));

        let age: Vec<Option<f64>> = tidy.column("age").unwrap().f64().unwrap().iter().collect();
        // 05/1950 to 05/2019 is 69 years, within rounding of the month grid
        assert!((age[0].unwrap() - 69.0).abs() < 0.1);
        assert!((age[1].unwrap() - 60.0).abs() < 0.1);
    }

    #[rstest]
    fn test_unknown_measures_are_ignored(data_dir: TempDir) {
        let tidy = DemographicsLoader::new()
            .with_data_dir(data_dir.path())
            .with_measures(MeasureSelection::named(["diagnosis", "shoe_size"]))
            .load()
            .unwrap();
        assert_eq!(
            tidy.get_column_names()
                .iter()
                .map(|n| n.as_str())
                .collect::<Vec<_>>(),
            vec![PARTICIPANT, "diagnosis"]
        );
    }
}
