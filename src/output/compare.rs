use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::core::types::{PairedKind, PairedRecord};
use crate::output::{
    create_output, fixed, output_path, Layout, OutputFormat, OutputLabel, WriteError,
};
use crate::quant::compare::ComparisonMap;

const SCALAR_HEADER: [&str; 5] = [
    "Header",
    "Mean count 1",
    "Std. err 1",
    "Mean count 2",
    "Std. err 2",
];

#[derive(Serialize)]
struct ComparisonReport<'a> {
    layout: &'a Layout,
    records: Vec<ComparisonRow<'a>>,
}

#[derive(Serialize)]
struct ComparisonRow<'a> {
    header: &'a str,
    values: &'a [f64],
}

fn sorted(map: &ComparisonMap) -> Vec<(&String, &PairedRecord)> {
    let mut rows: Vec<_> = map.iter().collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));
    rows
}

fn check_record(header: &str, record: &PairedRecord, layout: &Layout) -> Result<(), WriteError> {
    let expected = match layout {
        Layout::Summary => (PairedKind::Scalar, 4),
        Layout::PerLibrary(names) => (PairedKind::Vector, names.len()),
    };
    if (record.kind, record.values.len()) == expected {
        Ok(())
    } else {
        Err(WriteError::ColumnMismatch {
            header: header.to_string(),
            reason: format!(
                "expected {:?} with {} values, found {:?} with {}",
                expected.0,
                expected.1,
                record.kind,
                record.values.len()
            ),
        })
    }
}

/// Write paired records as CSV, one row per reference sorted by header.
///
/// Summary layouts print means with 3 decimals and standard errors with 8;
/// per-library counts use 3 decimals.
///
/// # Errors
///
/// Returns `WriteError::Csv` on write failure or `WriteError::ColumnMismatch`
/// if a record does not fit `layout`.
pub fn write_comparison_csv<W: Write>(
    writer: W,
    comparison: &ComparisonMap,
    layout: &Layout,
) -> Result<(), WriteError> {
    let mut csv = csv::Writer::from_writer(writer);

    match layout {
        Layout::Summary => csv.write_record(SCALAR_HEADER)?,
        Layout::PerLibrary(names) => {
            csv.write_record(std::iter::once("Header").chain(names.iter().map(String::as_str)))?;
        }
    }

    for (header, record) in sorted(comparison) {
        check_record(header, record, layout)?;
        let values = record.values.iter().enumerate().map(|(i, v)| match layout {
            // mean, se, mean, se
            Layout::Summary if i % 2 == 1 => fixed(*v, 8),
            _ => fixed(*v, 3),
        });
        csv.write_record(std::iter::once(header.clone()).chain(values))?;
    }

    csv.flush()?;
    Ok(())
}

/// Write paired records as pretty-printed JSON.
///
/// # Errors
///
/// Returns `WriteError::Json` on failure or `WriteError::ColumnMismatch` if a
/// record does not fit `layout`.
pub fn write_comparison_json<W: Write>(
    writer: W,
    comparison: &ComparisonMap,
    layout: &Layout,
) -> Result<(), WriteError> {
    let records = sorted(comparison)
        .into_iter()
        .map(|(header, record)| {
            check_record(header, record, layout)?;
            Ok(ComparisonRow {
                header,
                values: &record.values,
            })
        })
        .collect::<Result<Vec<_>, WriteError>>()?;

    serde_json::to_writer_pretty(writer, &ComparisonReport { layout, records })?;
    Ok(())
}

/// Write a comparison to `{prefix}_{label}.{csv|json}` and return the path.
///
/// # Errors
///
/// See [`write_comparison_csv`] and [`write_comparison_json`].
pub fn write_comparison(
    prefix: &Path,
    label: OutputLabel,
    format: OutputFormat,
    comparison: &ComparisonMap,
    layout: &Layout,
) -> Result<PathBuf, WriteError> {
    let start = Instant::now();
    let path = output_path(prefix, label, format);
    let mut writer = create_output(&path)?;

    match format {
        OutputFormat::Csv => write_comparison_csv(&mut writer, comparison, layout)?,
        OutputFormat::Json => write_comparison_json(&mut writer, comparison, layout)?,
    }
    writer.flush()?;

    info!(
        file = %path.display(),
        records = comparison.len(),
        elapsed = ?start.elapsed(),
        "Comparison written"
    );
    Ok(path)
}
