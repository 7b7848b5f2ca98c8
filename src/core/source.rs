use crate::domain::model::CitationRecord;
use crate::utils::error::Result;
use csv::{ErrorKind, ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const BOM: char = '\u{feff}';

/// Lazy, forward-only reader over a citations CSV.
///
/// Each item is one data row keyed by the header names. The underlying
/// reader is owned by the source, so the file is closed as soon as the
/// source (or any adapter wrapping it) is dropped.
///
/// A read failure ends the iteration; call [`CitationSource::finish`] after
/// consuming the rows to surface it.
pub struct CitationSource<R: Read = File> {
    reader: csv::Reader<R>,
    headers: Vec<String>,
    row: StringRecord,
    skipped: usize,
    error: Option<io::Error>,
    done: bool,
}

impl CitationSource<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Opening citation source {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

impl<R: Read> CitationSource<R> {
    pub fn from_reader(rdr: R) -> Result<Self> {
        // flexible: short or long rows keep whatever fields line up with the header
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(rdr);

        let headers = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, name)| {
                if i == 0 {
                    name.trim_start_matches(BOM).to_string()
                } else {
                    name.to_string()
                }
            })
            .collect();

        Ok(Self {
            reader,
            headers,
            row: StringRecord::new(),
            skipped: 0,
            error: None,
            done: false,
        })
    }

    /// Rows dropped because they could not be decoded.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Returns the I/O error that cut the read short, if any.
    pub fn finish(self) -> Result<()> {
        match self.error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    fn to_record(&self) -> CitationRecord {
        self.headers
            .iter()
            .zip(self.row.iter())
            .map(|(name, value)| (name.as_str(), value))
            .collect()
    }
}

impl<R: Read> Iterator for CitationSource<R> {
    type Item = CitationRecord;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.reader.read_record(&mut self.row) {
                Ok(true) => return Some(self.to_record()),
                Ok(false) => {
                    self.done = true;
                    if self.skipped > 0 {
                        tracing::warn!("Skipped {} undecodable CSV rows", self.skipped);
                    }
                }
                Err(e) if matches!(e.kind(), ErrorKind::Io(_)) => {
                    tracing::error!("Stopped reading citations: {}", e);
                    if let ErrorKind::Io(io_err) = e.into_kind() {
                        self.error = Some(io_err);
                    }
                    self.done = true;
                }
                Err(e) => {
                    tracing::warn!("Skipping malformed CSV row: {}", e);
                    self.skipped += 1;
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;
    use std::io::Cursor;

    /// Serves `data`, then fails every later read.
    struct FailingReader {
        data: Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::other("device went away")),
                n => Ok(n),
            }
        }
    }

    #[test]
    fn test_reads_rows_keyed_by_header() {
        let csv = "Issue Date,Violation Description,Fine amount\n\
                   1/1/2018,METER EXP.,63\n\
                   1/2/2018,RED ZONE,93\n";
        let source = CitationSource::from_reader(Cursor::new(csv)).unwrap();
        let rows: Vec<_> = source.collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].issue_date(), Some("1/1/2018"));
        assert_eq!(rows[1].violation_description(), Some("RED ZONE"));
        assert_eq!(rows[1].fine_amount(), Some("93"));
    }

    #[test]
    fn test_strips_byte_order_mark_from_first_header() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"Issue Date,Violation Description\n1/1/2018,METER EXP.\n");
        let source = CitationSource::from_reader(Cursor::new(bytes)).unwrap();

        let rows: Vec<_> = source.collect();
        assert!(rows[0].data.contains_key("Issue Date"));
        assert_eq!(rows[0].issue_date(), Some("1/1/2018"));
    }

    #[test]
    fn test_short_rows_leave_fields_missing() {
        let csv = "Issue Date,Violation Description,Fine amount\n1/1/2018,METER EXP.\n";
        let rows: Vec<_> = CitationSource::from_reader(Cursor::new(csv))
            .unwrap()
            .collect();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fine_amount(), None);
    }

    #[test]
    fn test_invalid_utf8_row_is_skipped() {
        let mut bytes = b"Issue Date,Violation Description\n".to_vec();
        bytes.extend_from_slice(b"1/1/2018,\xFF\xFE\n");
        bytes.extend_from_slice(b"1/2/2018,RED ZONE\n");
        let mut source = CitationSource::from_reader(Cursor::new(bytes)).unwrap();

        let rows: Vec<_> = source.by_ref().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].violation_description(), Some("RED ZONE"));
        assert_eq!(source.skipped(), 1);
    }

    #[test]
    fn test_read_failure_is_reported_by_finish() {
        let csv = "Issue Date,Violation Description,Fine amount\n1/1/2018,A,50\n1/2/2018,A,25\n";
        let reader = FailingReader {
            data: Cursor::new(csv.as_bytes().to_vec()),
        };
        let mut source = CitationSource::from_reader(reader).unwrap();

        let rows: Vec<_> = source.by_ref().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(source.skipped(), 0);
        match source.finish() {
            Err(EtlError::IoError(e)) => assert_eq!(e.kind(), io::ErrorKind::Other),
            other => panic!("expected an I/O error, got {:?}", other),
        }
    }

    #[test]
    fn test_clean_read_finishes_ok() {
        let csv = "Issue Date,Violation Description\n1/1/2018,A\n";
        let mut source = CitationSource::from_reader(Cursor::new(csv)).unwrap();
        assert_eq!(source.by_ref().count(), 1);
        assert!(source.finish().is_ok());
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let source = CitationSource::from_reader(Cursor::new("")).unwrap();
        assert_eq!(source.count(), 0);
    }
}
