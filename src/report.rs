//! Grep-style reporter: header, truncation warning, one record per line.

use std::io::{self, Write};

use crate::search::types::{MatchRecord, SearchOutcome};

/// Formats one search's results for a given pattern and source label.
pub struct Reporter<'a> {
    pattern: &'a str,
    source: &'a str,
}

impl<'a> Reporter<'a> {
    pub fn new(pattern: &'a str, source: &'a str) -> Self {
        Self { pattern, source }
    }

    /// Write the report: truncation warning (if any) to `err`, then the
    /// header and the retained records to `out`.
    ///
    /// The header count is the true logical count; the record list is
    /// limited to the retained subset.
    pub fn write_report<W: Write, E: Write>(
        &self,
        outcome: &SearchOutcome,
        records: &[MatchRecord],
        out: &mut W,
        err: &mut E,
    ) -> io::Result<()> {
        if outcome.truncated {
            writeln!(
                err,
                "[gpu-grep] warning: found {} matches but capacity is {}; {} not shown",
                outcome.total,
                records.len(),
                outcome.total as usize - records.len()
            )?;
        }

        writeln!(
            out,
            "Found {} matches for '{}' in '{}'",
            outcome.total, self.pattern, self.source
        )?;

        for record in records {
            writeln!(out, "{}:{}:\t{}", self.source, record.line_number, record.line)?;
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn outcome(offsets: Vec<u32>, total: u32, truncated: bool) -> SearchOutcome {
        SearchOutcome {
            offsets,
            total,
            truncated,
            elapsed: Duration::ZERO,
        }
    }

    fn record(offset: u32, line_number: usize, line: &str) -> MatchRecord {
        MatchRecord {
            offset,
            line_number,
            line: line.to_string(),
        }
    }

    #[test]
    fn test_header_and_records() {
        let reporter = Reporter::new("foo", "input.txt");
        let records = vec![record(0, 1, "foo"), record(8, 3, "foobar")];
        let mut out = Vec::new();
        let mut err = Vec::new();

        reporter
            .write_report(&outcome(vec![0, 8], 2, false), &records, &mut out, &mut err)
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            "Found 2 matches for 'foo' in 'input.txt'\n\
             input.txt:1:\tfoo\n\
             input.txt:3:\tfoobar\n"
        );
        assert!(err.is_empty(), "no warning without truncation");
    }

    #[test]
    fn test_zero_matches_header_only() {
        let reporter = Reporter::new("nope", "stdin");
        let mut out = Vec::new();
        let mut err = Vec::new();

        reporter
            .write_report(&outcome(vec![], 0, false), &[], &mut out, &mut err)
            .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Found 0 matches for 'nope' in 'stdin'\n"
        );
        assert!(err.is_empty());
    }

    #[test]
    fn test_truncation_warning() {
        let reporter = Reporter::new("a", "big.txt");
        let records: Vec<MatchRecord> =
            (0..10).map(|i| record(i, 1, "aaaa")).collect();
        let mut out = Vec::new();
        let mut err = Vec::new();

        reporter
            .write_report(
                &outcome((0..10).collect(), 11, true),
                &records,
                &mut out,
                &mut err,
            )
            .unwrap();

        let err = String::from_utf8(err).unwrap();
        assert!(err.contains("found 11 matches"), "warning states true count: {}", err);
        assert!(err.contains("capacity is 10"), "warning states capacity: {}", err);
        assert!(err.contains("1 not shown"), "warning states dropped count: {}", err);

        let out = String::from_utf8(out).unwrap();
        assert!(
            out.starts_with("Found 11 matches"),
            "header shows the true logical count, not the clamped one: {}",
            out
        );
        assert_eq!(out.lines().count(), 11, "header + 10 retained records");
    }

    #[test]
    fn test_record_line_uses_tab() {
        let reporter = Reporter::new("x", "f");
        let mut out = Vec::new();
        let mut err = Vec::new();
        reporter
            .write_report(&outcome(vec![3], 1, false), &[record(3, 2, "x y")], &mut out, &mut err)
            .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.ends_with("f:2:\tx y\n"), "record format is source:line:\\ttext: {}", out);
    }
}
