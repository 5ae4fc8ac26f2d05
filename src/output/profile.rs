use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::core::alignment::SingleAlignment;
use crate::core::reference::ReferenceSet;
use crate::core::types::Abundance;
use crate::output::{
    create_output, fixed, output_path, Layout, OutputFormat, OutputLabel, WriteError,
};
use crate::quant::profile::ProfileMap;

const FIXED_COLUMNS: [&str; 5] = ["Header", "len", "sRNA", "Position", "Strand"];

#[derive(Serialize)]
struct ProfileReport<'a> {
    layout: &'a Layout,
    references: Vec<ProfileEntry<'a>>,
}

#[derive(Serialize)]
struct ProfileEntry<'a> {
    header: &'a str,
    length: usize,
    alignments: &'a [SingleAlignment],
}

/// Profiled references in reference-set order
fn in_reference_order<'a>(
    profiles: &'a ProfileMap,
    refs: &'a ReferenceSet,
) -> impl Iterator<Item = ProfileEntry<'a>> {
    refs.iter().filter_map(move |record| {
        profiles.get(&record.header).map(|alignments| ProfileEntry {
            header: &record.header,
            length: record.len(),
            alignments: alignments.as_slice(),
        })
    })
}

fn abundance_columns(
    header: &str,
    abundance: &Abundance,
    layout: &Layout,
) -> Result<Vec<String>, WriteError> {
    match (abundance, layout) {
        (Abundance::Summary(ms), Layout::Summary) => Ok(vec![fixed(ms.mean, 3), fixed(ms.se, 8)]),
        (Abundance::PerLibrary(counts), Layout::PerLibrary(names))
            if counts.len() == names.len() =>
        {
            Ok(counts.iter().map(|c| fixed(*c, 3)).collect())
        }
        _ => Err(WriteError::ColumnMismatch {
            header: header.to_string(),
            reason: format!("{} abundance in a {layout:?} layout", abundance.kind()),
        }),
    }
}

/// Write profiles as CSV, references in `refs` order and alignments in
/// ascending position within each reference.
///
/// # Errors
///
/// Returns `WriteError::Csv` on write failure or `WriteError::ColumnMismatch`
/// if an abundance does not fit `layout`.
pub fn write_profile_csv<W: Write>(
    writer: W,
    profiles: &ProfileMap,
    refs: &ReferenceSet,
    layout: &Layout,
) -> Result<(), WriteError> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header_row: Vec<&str> = FIXED_COLUMNS.to_vec();
    match layout {
        Layout::Summary => header_row.extend(["Count", "Std. Err", "Times aligned"]),
        Layout::PerLibrary(names) => {
            header_row.push("Times aligned");
            header_row.extend(names.iter().map(String::as_str));
        }
    }
    csv.write_record(&header_row)?;

    for entry in in_reference_order(profiles, refs) {
        let length = entry.length.to_string();
        for alignment in entry.alignments {
            let mut row = vec![
                entry.header.to_string(),
                length.clone(),
                alignment.read.clone(),
                alignment.position.to_string(),
                alignment.strand.to_string(),
            ];
            let abundance = abundance_columns(entry.header, &alignment.abundance, layout)?;
            let times = alignment.times_aligned.to_string();
            match layout {
                Layout::Summary => {
                    row.extend(abundance);
                    row.push(times);
                }
                Layout::PerLibrary(_) => {
                    row.push(times);
                    row.extend(abundance);
                }
            }
            csv.write_record(&row)?;
        }
    }

    csv.flush()?;
    Ok(())
}

/// Write profiles as pretty-printed JSON, references in `refs` order.
///
/// # Errors
///
/// Returns `WriteError::Json` on failure or `WriteError::ColumnMismatch` if an
/// abundance does not fit `layout`.
pub fn write_profile_json<W: Write>(
    writer: W,
    profiles: &ProfileMap,
    refs: &ReferenceSet,
    layout: &Layout,
) -> Result<(), WriteError> {
    let references: Vec<ProfileEntry<'_>> = in_reference_order(profiles, refs).collect();
    for entry in &references {
        for alignment in entry.alignments {
            abundance_columns(entry.header, &alignment.abundance, layout)?;
        }
    }
    serde_json::to_writer_pretty(writer, &ProfileReport { layout, references })?;
    Ok(())
}

/// Write profiles to `{prefix}_{len}.{csv|json}` and return the path.
///
/// # Errors
///
/// See [`write_profile_csv`] and [`write_profile_json`].
pub fn write_profile(
    prefix: &Path,
    window: usize,
    format: OutputFormat,
    profiles: &ProfileMap,
    refs: &ReferenceSet,
    layout: &Layout,
) -> Result<PathBuf, WriteError> {
    let start = Instant::now();
    let path = output_path(prefix, OutputLabel::Length(window), format);
    let mut writer = create_output(&path)?;

    match format {
        OutputFormat::Csv => write_profile_csv(&mut writer, profiles, refs, layout)?,
        OutputFormat::Json => write_profile_json(&mut writer, profiles, refs, layout)?,
    }
    writer.flush()?;

    info!(
        file = %path.display(),
        references = profiles.len(),
        elapsed = ?start.elapsed(),
        "Profile written"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reference::ReferenceRecord;
    use crate::core::types::Strand;

    fn alignment(
        read: &str,
        position: u64,
        strand: Strand,
        abundance: Abundance,
    ) -> SingleAlignment {
        SingleAlignment {
            read: read.to_string(),
            times_aligned: 2,
            position,
            strand,
            abundance,
        }
    }

    fn refs() -> ReferenceSet {
        ReferenceSet::new(vec![
            ReferenceRecord::new("zeta", "ACGTACGT"),
            ReferenceRecord::new("alpha", "AAAA"),
            ReferenceRecord::new("unaligned", "CCCC"),
        ])
    }

    #[test]
    fn test_summary_csv_in_reference_order() {
        let profiles = ProfileMap::from([
            (
                "alpha".to_string(),
                vec![alignment("AA", 1, Strand::Plus, Abundance::summary(10.0, 0.5))],
            ),
            (
                "zeta".to_string(),
                vec![
                    alignment("AC", 1, Strand::Plus, Abundance::summary(2.5, 0.0)),
                    alignment("GT", 3, Strand::Minus, Abundance::summary(1.0, 0.0)),
                ],
            ),
        ]);

        let mut out = Vec::new();
        write_profile_csv(&mut out, &profiles, &refs(), &Layout::Summary).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Header,len,sRNA,Position,Strand,Count,Std. Err,Times aligned",
                "zeta,8,AC,1,+,2.500,0.00000000,2",
                "zeta,8,GT,3,-,1.000,0.00000000,2",
                "alpha,4,AA,1,+,10.000,0.50000000,2",
            ]
        );
    }

    #[test]
    fn test_per_library_csv() {
        let profiles = ProfileMap::from([(
            "alpha".to_string(),
            vec![alignment("AA", 1, Strand::Plus, Abundance::per_library(vec![1.0, 2.0]))],
        )]);
        let layout = Layout::PerLibrary(vec!["rep1".into(), "rep2".into()]);

        let mut out = Vec::new();
        write_profile_csv(&mut out, &profiles, &refs(), &layout).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Header,len,sRNA,Position,Strand,Times aligned,rep1,rep2\nalpha,4,AA,1,+,2,1.000,2.000\n"
        );
    }

    #[test]
    fn test_json_profile() {
        let profiles = ProfileMap::from([(
            "alpha".to_string(),
            vec![alignment("AA", 2, Strand::Minus, Abundance::summary(3.0, 0.0))],
        )]);

        let mut out = Vec::new();
        write_profile_json(&mut out, &profiles, &refs(), &Layout::Summary).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        let alpha = &value["references"][0];
        assert_eq!(alpha["header"], "alpha");
        assert_eq!(alpha["length"], 4);
        assert_eq!(alpha["alignments"][0]["strand"], "-");
        assert_eq!(alpha["alignments"][0]["position"], 2);
        assert_eq!(value["references"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_mismatched_layout() {
        let profiles = ProfileMap::from([(
            "alpha".to_string(),
            vec![alignment("AA", 1, Strand::Plus, Abundance::summary(1.0, 0.0))],
        )]);
        let layout = Layout::PerLibrary(vec!["rep1".into()]);
        let result = write_profile_csv(Vec::<u8>::new(), &profiles, &refs(), &layout);
        assert!(matches!(result, Err(WriteError::ColumnMismatch { .. })));
    }
}
