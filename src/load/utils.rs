//! Shared dataframe plumbing for the per-domain loaders.

use std::path::Path;

use polars::df;
use polars::prelude::*;
use strum::IntoEnumIterator as _;

use crate::load::error::LoadError;
use crate::load::visits::Visit;

pub(crate) const PARTICIPANT: &str = "participant";
pub(crate) const VISIT: &str = "visit";
pub(crate) const DATE: &str = "date";
pub(crate) const TEST: &str = "test";
pub(crate) const SCORE: &str = "score";

/// Internal sort key; never part of loader output.
pub(crate) const VISIT_ORDER: &str = "__visit_order";

/// Checks that every file in `files` exists under `dir`.
pub(crate) fn ensure_files(dir: &Path, files: &[&str]) -> Result<(), LoadError> {
    for file in files {
        if !dir.join(file).is_file() {
            return Err(LoadError::MissingFile {
                file: (*file).to_string(),
                dir: dir.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Reads a vendor CSV with every column as a string.
///
/// The vendor files mix numeric codes, free text and out-of-range markers in
/// the same columns, so nothing is inferred; coercion happens explicitly
/// against the static schema tables.
pub(crate) fn read_csv(path: &Path) -> Result<DataFrame, LoadError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// Maps each visit code to its position in the protocol schedule.
pub(crate) fn visit_order_frame() -> Result<DataFrame, LoadError> {
    let codes: Vec<String> = Visit::iter().map(|v| v.to_string()).collect();
    let order: Vec<u32> = Visit::iter().map(Visit::order).collect();
    Ok(df!(VISIT => codes, VISIT_ORDER => order)?)
}

/// Keeps only rows whose visit code belongs to the protocol vocabulary.
pub(crate) fn drop_unknown_visits(lf: LazyFrame) -> Result<LazyFrame, LoadError> {
    let known = visit_order_frame()?.lazy().select([col(VISIT)]);
    Ok(lf.join(
        known,
        [col(VISIT)],
        [col(VISIT)],
        JoinArgs::new(JoinType::Semi),
    ))
}

/// Sorts by participant and protocol visit order.
///
/// Rows with visit codes outside the vocabulary sort last. The helper leaves
/// the [`VISIT_ORDER`] column on the frame; callers finish with an explicit
/// `select` that excludes it.
pub(crate) fn sort_by_participant_visit(lf: LazyFrame) -> Result<LazyFrame, LoadError> {
    let order = visit_order_frame()?.lazy();
    Ok(lf
        .join(
            order,
            [col(VISIT)],
            [col(VISIT)],
            JoinArgs::new(JoinType::Left),
        )
        .sort_by_exprs(
            vec![col(PARTICIPANT), col(VISIT_ORDER)],
            SortMultipleOptions::default().with_nulls_last(true),
        ))
}

/// Parses `MM/YYYY` month stamps into first-of-month dates; anything that does
/// not parse becomes null.
pub(crate) fn month_year_to_date(column: &str) -> Expr {
    concat_str([lit("01/"), col(column)], "", false)
        .str()
        .to_date(StrptimeOptions {
            format: Some("%d/%m/%Y".into()),
            strict: false,
            ..Default::default()
        })
        .alias(column)
}

/// Parses `YYYY-MM-DD` day stamps; anything that does not parse becomes null.
pub(crate) fn ymd_to_date(column: &str) -> Expr {
    col(column)
        .str()
        .to_date(StrptimeOptions {
            format: Some("%Y-%m-%d".into()),
            strict: false,
            ..Default::default()
        })
        .alias(column)
}

/// Reshapes a long `(keys.., test, score)` frame into one column per test,
/// averaging duplicate observations, full-joined on `keys`.
pub(crate) fn spread_measures(
    long: &LazyFrame,
    keys: &[&str],
    tests: &[String],
) -> Result<LazyFrame, LoadError> {
    let mut acc: Option<LazyFrame> = None;
    for test in tests {
        let key_cols: Vec<Expr> = keys.iter().map(|k| col(*k)).collect();
        let piece = long
            .clone()
            .filter(col(TEST).eq(lit(test.as_str())))
            .group_by(key_cols.clone())
            .agg([col(SCORE).mean().alias(test.as_str())]);
        acc = Some(match acc {
            None => piece,
            Some(acc) => acc.join(
                piece,
                key_cols.clone(),
                key_cols,
                JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns),
            ),
        });
    }
    acc.ok_or(LoadError::EmptyMeasureSelection)
}

/// Unpivots the measure columns of a tidy frame into `(keys.., test, score)`
/// rows, dropping missing scores.
pub(crate) fn melt_measures(df: &DataFrame, keys: &[&str]) -> Result<LazyFrame, LoadError> {
    let measure_cols: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .filter(|name| !keys.contains(&name.as_str()))
        .collect();

    let mut pieces = Vec::with_capacity(measure_cols.len());
    for measure in &measure_cols {
        let mut select: Vec<Expr> = keys.iter().map(|k| col(*k)).collect();
        select.push(lit(measure.as_str()).alias(TEST));
        select.push(col(measure.as_str()).cast(DataType::Float64).alias(SCORE));
        pieces.push(
            df.clone()
                .lazy()
                .select(select)
                .filter(col(SCORE).is_not_null()),
        );
    }
    if pieces.is_empty() {
        return Err(LoadError::EmptyMeasureSelection);
    }
    Ok(concat(pieces, UnionArgs::default())?)
}
