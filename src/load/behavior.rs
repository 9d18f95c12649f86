use std::path::{Path, PathBuf};

use log::info;
use polars::prelude::*;

use crate::config::resolve_data_dir;
use crate::load::MeasureSelection;
use crate::load::error::LoadError;
use crate::load::schema::{
    BEHAVIOR_MEASURES, BehaviorMeasure, CombineOp, EVENT_ID, GroupOp, INFODT, ItemGroup,
    ItemRecode, KeyColumns, PAG_NAME, PATNO,
};
use crate::load::utils::{
    DATE, PARTICIPANT, SCORE, TEST, VISIT, ensure_files, month_year_to_date, read_csv,
    sort_by_participant_visit, spread_measures,
};

/// Page name of the post-treatment motor exam; its scores are kept apart from
/// the pre-treatment ones so averaging cannot blend medication states.
const POST_TREATMENT_PAGE: &str = "NUPDRS3A";

/// Loads clinical-behavioral composite scores into a tidy frame, one row per
/// participant-visit and one column per measure.
///
/// Measures are assembled from the static behavior table: items are recoded,
/// collapsed per group, and combined across groups. Post-treatment UPDRS III
/// scores surface as the separate `updrs_iii_a` measure, and MoCA scores below
/// 30 are adjusted by the education indicator.
#[derive(Debug, Clone, Default)]
pub struct BehaviorLoader {
    data_dir: Option<PathBuf>,
    measures: MeasureSelection,
}

impl BehaviorLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Which measures to keep; the default keeps all of them. Names not in
    /// the behavior table are ignored. Selecting `moca` pulls in the
    /// education indicator needed for score adjustment.
    pub fn with_measures(mut self, measures: MeasureSelection) -> Self {
        self.measures = measures;
        self
    }

    pub fn load(&self) -> Result<DataFrame, LoadError> {
        let specs = selected_specs(&self.measures);
        if specs.is_empty() {
            return Err(LoadError::EmptyMeasureSelection);
        }

        let dir = resolve_data_dir(self.data_dir.as_deref());
        let files: Vec<&str> = specs
            .iter()
            .flat_map(|spec| spec.files.iter().map(|source| source.file))
            .collect();
        ensure_files(&dir, &files)?;
        info!(
            "Loading {} behavioral measures from {}",
            specs.len(),
            dir.display()
        );

        let mut long_frames = Vec::with_capacity(specs.len());
        for spec in &specs {
            long_frames.push(measure_long_frame(&dir, spec)?);
        }
        let long = concat_lf_diagonal(long_frames, UnionArgs::default())?;

        // split the post-treatment motor exam off before pivoting
        let has_page = specs.iter().any(|spec| spec.keys == KeyColumns::WithPage);
        let long = if has_page {
            long.with_column(
                when(col(PAG_NAME).eq(lit(POST_TREATMENT_PAGE)))
                    .then(lit("updrs_iii_a"))
                    .otherwise(col(TEST))
                    .alias(TEST),
            )
        } else {
            long
        };

        let long = long
            .rename([PATNO, EVENT_ID, INFODT], [PARTICIPANT, VISIT, DATE], true)
            .filter(
                col(PARTICIPANT)
                    .is_not_null()
                    .and(col(VISIT).is_not_null())
                    .and(col(DATE).is_not_null()),
            );

        let mut tests: Vec<String> = specs.iter().map(|spec| spec.name.to_string()).collect();
        if specs.iter().any(|spec| spec.name == "updrs_iii") {
            tests.push("updrs_iii_a".to_string());
        }
        tests.sort_unstable();

        let wide = spread_measures(&long, &[PARTICIPANT, VISIT, DATE], &tests)?;

        // adjust low MoCA totals by the education indicator, then drop it
        let has_moca = tests.iter().any(|t| t == "moca");
        let has_education = tests.iter().any(|t| t == "education");
        let wide = if has_moca && has_education {
            wide.with_column(
                when(col("moca").lt(lit(30.0)))
                    .then(col("moca") + col("education").fill_null(lit(0.0)))
                    .otherwise(col("moca"))
                    .alias("moca"),
            )
        } else {
            wide
        };
        if has_education {
            tests.retain(|t| t != "education");
        }

        let wide = wide.with_column(month_year_to_date(DATE));

        let mut columns: Vec<Expr> = vec![col(PARTICIPANT), col(VISIT), col(DATE)];
        columns.extend(tests.iter().map(|t| col(t.as_str())));

        Ok(sort_by_participant_visit(wide)?.select(columns).collect()?)
    }
}

/// Lists the behavioral measures the loader can produce.
pub fn available_behavior() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = BEHAVIOR_MEASURES
        .iter()
        .map(|m| m.name)
        .filter(|name| *name != "education")
        .collect();
    names.push("updrs_iii_a");
    names.sort_unstable();
    names
}

/// Resolves a selection against the behavior table.
///
/// The education indicator travels with MoCA: it is pulled in when `moca` is
/// selected and dropped when it is not, since it only exists for the score
/// adjustment.
fn selected_specs(selection: &MeasureSelection) -> Vec<&'static BehaviorMeasure> {
    match selection {
        MeasureSelection::Default | MeasureSelection::All => BEHAVIOR_MEASURES.iter().collect(),
        MeasureSelection::Named(names) => {
            let mut specs: Vec<&BehaviorMeasure> = BEHAVIOR_MEASURES
                .iter()
                .filter(|m| names.iter().any(|n| n == m.name))
                .collect();
            let has_moca = specs.iter().any(|m| m.name == "moca");
            let has_education = specs.iter().any(|m| m.name == "education");
            if has_moca && !has_education {
                specs.extend(BEHAVIOR_MEASURES.iter().filter(|m| m.name == "education"));
            } else if !has_moca && has_education {
                specs.retain(|m| m.name != "education");
            }
            specs
        }
    }
}

/// Builds the long `(keys.., test, score)` frame for one measure: per-file
/// group scores inner-joined on the key columns, then combined.
fn measure_long_frame(dir: &Path, spec: &BehaviorMeasure) -> Result<LazyFrame, LoadError> {
    let keys = spec.keys.names();
    let key_exprs = || -> Vec<Expr> {
        keys.iter()
            .map(|k| {
                if *k == PATNO {
                    col(PATNO).cast(DataType::Int64)
                } else {
                    col(*k)
                }
            })
            .collect()
    };

    let mut pieces: Vec<LazyFrame> = Vec::with_capacity(spec.files.len());
    let mut group_cols: Vec<String> = Vec::new();
    for source in spec.files {
        let df = read_csv(&dir.join(source.file))?;
        let mut select = key_exprs();
        for group in source.groups {
            let name = format!("__group_{}", group_cols.len());
            select.push(group_expr(group)?.alias(name.as_str()));
            group_cols.push(name);
        }
        pieces.push(df.lazy().select(select));
    }

    let join_keys: Vec<Expr> = keys.iter().map(|k| col(*k)).collect();
    let merged = pieces
        .into_iter()
        .reduce(|left, right| {
            left.join(
                right,
                join_keys.clone(),
                join_keys.clone(),
                JoinArgs::new(JoinType::Inner),
            )
        })
        .expect("every measure has at least one source file");

    let mut select: Vec<Expr> = keys.iter().map(|k| col(*k)).collect();
    select.push(lit(spec.name).alias(TEST));
    select.push(
        combine_expr(spec.combine, &group_cols)?
            .cast(DataType::Float64)
            .alias(SCORE),
    );
    Ok(merged.select(select))
}

fn group_expr(group: &ItemGroup) -> Result<Expr, LoadError> {
    let items: Vec<Expr> = group
        .items
        .iter()
        .map(|item| recode_expr(col(*item).cast(DataType::Float64), group.recode))
        .collect();

    let expr = match group.op {
        GroupOp::Sum => sum_horizontal(&items, false)?,
        GroupOp::Min => {
            // a missing item poisons the minimum, like it poisons a sum
            let any_null = items
                .iter()
                .map(|item| item.clone().is_null())
                .reduce(|a, b| a.or(b))
                .expect("item groups are not empty");
            when(any_null)
                .then(lit(NULL))
                .otherwise(min_horizontal(&items)?)
        }
        GroupOp::Any => {
            let truthy: Vec<Expr> = items
                .into_iter()
                .map(|item| item.neq(lit(0.0)).fill_null(lit(false)))
                .collect();
            any_horizontal(&truthy)?.cast(DataType::Float64)
        }
    };
    Ok(expr)
}

fn recode_expr(value: Expr, recode: ItemRecode) -> Expr {
    match recode {
        ItemRecode::Identity => value,
        ItemRecode::Negate => value * lit(-1.0),
        ItemRecode::OneIfZero => when(value.eq(lit(0.0)))
            .then(lit(1.0))
            .otherwise(lit(0.0)),
        ItemRecode::OneIfAtMost12 => when(value.lt_eq(lit(12.0)))
            .then(lit(1.0))
            .otherwise(lit(0.0)),
        ItemRecode::ReverseLikert5 => lit(5.0) - value,
        ItemRecode::NineToThree => when(value.clone().eq(lit(9.0)))
            .then(lit(3.0))
            .otherwise(value),
        ItemRecode::NineToZero => when(value.clone().eq(lit(9.0)))
            .then(lit(0.0))
            .otherwise(value),
        ItemRecode::Reciprocal => when(value.clone().eq(lit(0.0)))
            .then(lit(f64::INFINITY))
            .otherwise(lit(1.0) / value),
    }
}

fn combine_expr(op: CombineOp, group_cols: &[String]) -> Result<Expr, LoadError> {
    let scores: Vec<Expr> = group_cols.iter().map(|c| col(c.as_str())).collect();
    Ok(match op {
        CombineOp::Sum => sum_horizontal(&scores, false)?,
        CombineOp::Mean { ignore_nulls } => mean_horizontal(&scores, ignore_nulls)?,
        CombineOp::Product => scores
            .into_iter()
            .reduce(|a, b| a * b)
            .expect("every measure has at least one item group"),
    })
}
