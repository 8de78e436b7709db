use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::domain::{DateSections, record_count};

/// Flat view of one record as written to CSV.
#[derive(Debug, Clone, Serialize)]
struct RecordRow<'a> {
    date: &'a str,
    primary_category: &'a str,
    secondary_category: &'a str,
    tags: String,
    amount: &'a str,
    description: &'a str,
}

/// Exporter for writing parsed ledger records to various formats
pub struct Exporter<'a> {
    sections: &'a DateSections,
}

impl<'a> Exporter<'a> {
    pub fn new(sections: &'a DateSections) -> Self {
        Self { sections }
    }

    /// Export every record to CSV, one row per record, dates in sorted order.
    /// Tags are joined with ';'.
    pub fn export_records_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut count = 0;
        for (date, records) in self.sections {
            for record in records {
                csv_writer.serialize(RecordRow {
                    date,
                    primary_category: record.primary_category.trim(),
                    secondary_category: record.secondary_category.trim(),
                    tags: record.tags.join(";"),
                    amount: record.amount.trim(),
                    description: record.description.trim(),
                })?;
                count += 1;
            }
        }

        // An empty ledger still gets a header line
        if count == 0 {
            csv_writer.write_record([
                "date",
                "primary_category",
                "secondary_category",
                "tags",
                "amount",
                "description",
            ])?;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the date sections as pretty JSON, keyed by date label.
    pub fn export_records_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        serde_json::to_writer_pretty(&mut writer, self.sections)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(record_count(self.sections))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, BufWriter};

    use super::*;
    use crate::domain::TransactionRecord;

    fn sections() -> DateSections {
        let mut sections = DateSections::new();
        sections.insert(
            "2023-03-02".into(),
            vec![TransactionRecord {
                primary_category: " income ".into(),
                secondary_category: " salary ".into(),
                tags: vec![],
                amount: " 3000 ".into(),
                description: " pay ".into(),
            }],
        );
        sections.insert(
            "2023-03-01".into(),
            vec![TransactionRecord {
                primary_category: " expense ".into(),
                secondary_category: " food ".into(),
                tags: vec!["snack".into(), "coffee".into()],
                amount: " 15.50 ".into(),
                description: " lunch, with team ".into(),
            }],
        );
        sections
    }

    #[test]
    fn test_export_records_csv() {
        let sections = sections();
        let mut out = Vec::new();
        let count = Exporter::new(&sections).export_records_csv(&mut out).unwrap();

        assert_eq!(count, 2);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "date,primary_category,secondary_category,tags,amount,description",
                "2023-03-01,expense,food,snack;coffee,15.50,\"lunch, with team\"",
                "2023-03-02,income,salary,,3000,pay",
            ]
        );
    }

    #[test]
    fn test_export_empty_csv_has_header() {
        let sections = DateSections::new();
        let mut out = Vec::new();
        let count = Exporter::new(&sections).export_records_csv(&mut out).unwrap();

        assert_eq!(count, 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "date,primary_category,secondary_category,tags,amount,description\n"
        );
    }

    #[test]
    fn test_export_records_json() {
        let sections = sections();
        let mut out = Vec::new();
        let count = Exporter::new(&sections).export_records_json(&mut out).unwrap();

        assert_eq!(count, 2);
        let parsed: DateSections = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, sections);
    }

    /// Writer rejecting every write, like a full disk.
    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_export_json_reports_write_failure() {
        let sections = sections();
        let result = Exporter::new(&sections).export_records_json(BufWriter::new(FullDisk));
        assert!(result.is_err());
    }

    #[test]
    fn test_export_csv_reports_write_failure() {
        let sections = sections();
        let result = Exporter::new(&sections).export_records_csv(BufWriter::new(FullDisk));
        assert!(result.is_err());
    }
}
