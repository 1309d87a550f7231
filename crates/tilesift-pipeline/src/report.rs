//! Tab-separated tile report
//!
//! One row per tile in grid order:
//!
//! ```text
//! Tile	Dimensions	Keep
//! S1_01	400x400	0
//! S1_02	400x400	1
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tilesift_tissue::TileDecision;

/// Column names of the report.
pub const REPORT_HEADER: [&str; 3] = ["Tile", "Dimensions", "Keep"];

/// Outcome of one tile as it appears in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRecord {
    /// `<sample_id>_<seq>`
    pub name: String,
    /// `"{w}x{h}"`
    pub dimensions: String,
    pub decision: TileDecision,
}

/// Write the header and one line per record.
pub fn write_report<W: Write>(records: &[ClassificationRecord], mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "{}", REPORT_HEADER.join("\t"))?;
    for record in records {
        writeln!(
            writer,
            "{}\t{}\t{}",
            record.name,
            record.dimensions,
            record.decision.as_flag()
        )?;
    }
    writer.flush()
}

/// Write the report to `path`, replacing any existing file.
pub fn write_report_file(records: &[ClassificationRecord], path: &Path) -> std::io::Result<()> {
    write_report(records, BufWriter::new(File::create(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_format() {
        let records = vec![
            ClassificationRecord {
                name: "S_01".to_string(),
                dimensions: "4x4".to_string(),
                decision: TileDecision::Keep,
            },
            ClassificationRecord {
                name: "S_02".to_string(),
                dimensions: "2x4".to_string(),
                decision: TileDecision::Discard,
            },
        ];
        let mut out = Vec::new();
        write_report(&records, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Tile\tDimensions\tKeep\nS_01\t4x4\t1\nS_02\t2x4\t0\n"
        );
    }

    #[test]
    fn test_empty_report_has_header() {
        let mut out = Vec::new();
        write_report(&[], &mut out).unwrap();
        assert_eq!(out, b"Tile\tDimensions\tKeep\n");
    }
}
