use crate::shell::source::FastqError;
use memchr::memchr;

/// One parsed FASTQ record, owning its bytes. The id is stored without the
/// leading `@`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    pub id: Vec<u8>,
    pub seq: Vec<u8>,
    pub qual: Vec<u8>,
}

impl Record {
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

/// Line iterator over raw bytes. Strips `\n` and a trailing `\r`, so CRLF
/// input parses the same as LF.
struct Lines<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Lines<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn next_line(&mut self) -> Option<&'a [u8]> {
        if self.pos >= self.data.len() {
            return None;
        }
        let rest = &self.data[self.pos..];
        let mut line = match memchr(b'\n', rest) {
            Some(i) => {
                self.pos += i + 1;
                &rest[..i]
            }
            None => {
                self.pos = self.data.len();
                rest
            }
        };
        if line.last() == Some(&b'\r') {
            line = &line[..line.len() - 1];
        }
        Some(line)
    }
}

/// Scans `bytes` as 4-line FASTQ records. All-or-nothing: the first
/// malformed record fails the whole scan.
///
/// Accepted shape per record: an `@`-header with a non-empty identifier, a
/// sequence line, a `+`-separator, and a quality line of exactly the
/// sequence's length. Blank lines between records are tolerated.
pub fn parse_all(bytes: &[u8]) -> Result<Vec<Record>, FastqError> {
    let mut records = Vec::new();
    let mut lines = Lines::new(bytes);
    loop {
        // Skip blank lines at record boundaries (trailing newlines etc.).
        let header = loop {
            match lines.next_line() {
                Some(line) if line.is_empty() => continue,
                Some(line) => break line,
                None => return Ok(records),
            }
        };
        let record = records.len() as u64 + 1;
        if header.first() != Some(&b'@') {
            return Err(FastqError::malformed(
                record,
                "header does not start with '@'",
            ));
        }
        if header.len() < 2 {
            return Err(FastqError::malformed(record, "missing sequence identifier"));
        }
        let Some(seq) = lines.next_line() else {
            return Err(FastqError::malformed(
                record,
                "incomplete record: missing sequence",
            ));
        };
        let Some(sep) = lines.next_line() else {
            return Err(FastqError::malformed(
                record,
                "incomplete record: missing separator",
            ));
        };
        if sep.first() != Some(&b'+') {
            return Err(FastqError::malformed(
                record,
                "separator line does not start with '+'",
            ));
        }
        let Some(qual) = lines.next_line() else {
            return Err(FastqError::malformed(
                record,
                "incomplete record: missing quality",
            ));
        };
        if qual.len() != seq.len() {
            return Err(FastqError::malformed(
                record,
                format!(
                    "sequence and quality lengths differ ({} vs {})",
                    seq.len(),
                    qual.len()
                ),
            ));
        }
        records.push(Record {
            id: header[1..].to_vec(),
            seq: seq.to_vec(),
            qual: qual.to_vec(),
        });
    }
}

/// Number of records sampled for Phred-offset detection.
const AUTO_DETECT_READS: usize = 50_000;

/// Detects the Phred offset from the observed quality-byte range.
/// Phred+33 data reaches low ASCII (down to `!`); Phred+64 clusters at `@`
/// and above.
pub fn detect_phred_offset(records: &[Record]) -> u8 {
    let mut min_q = u8::MAX;
    let mut max_q = 0u8;
    for record in records.iter().take(AUTO_DETECT_READS) {
        for &q in &record.qual {
            if q < min_q {
                min_q = q;
            }
            if q > max_q {
                max_q = q;
            }
        }
    }
    if min_q > max_q {
        // No quality bytes at all; modern default.
        return 33;
    }
    if min_q < 59 {
        33
    } else if min_q >= 64 {
        64
    } else if max_q <= 74 {
        33
    } else {
        64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_RECORDS: &[u8] = b"@r1 lane1\nACGT\n+\nII#I\n@r2\nTTAGGC\n+r2\nIIIIII\n";

    #[test]
    fn test_parse_two_records() {
        let records = parse_all(TWO_RECORDS).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, b"r1 lane1");
        assert_eq!(records[0].seq, b"ACGT");
        assert_eq!(records[0].qual, b"II#I");
        assert_eq!(records[1].id, b"r2");
        assert_eq!(records[1].seq, b"TTAGGC");
        assert_eq!(records[1].len(), 6);
    }

    #[test]
    fn test_parse_crlf_line_endings() {
        let records = parse_all(b"@r1\r\nACGT\r\n+\r\nIIII\r\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].seq, b"ACGT");
        assert_eq!(records[0].qual, b"IIII");
    }

    #[test]
    fn test_parse_without_trailing_newline() {
        let records = parse_all(b"@r1\nAC\n+\nII").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].qual, b"II");
    }

    #[test]
    fn test_parse_tolerates_trailing_blank_lines() {
        let records = parse_all(b"@r1\nAC\n+\nII\n\n\n").unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_empty_input_has_no_records() {
        assert!(parse_all(b"").unwrap().is_empty());
        assert!(parse_all(b"\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_header_must_start_with_at() {
        let err = parse_all(b"r1\nACGT\n+\nIIII\n").unwrap_err();
        assert!(matches!(err, FastqError::Malformed { record: 1, .. }));
        assert!(err.to_string().contains("header does not start with '@'"));
    }

    #[test]
    fn test_header_needs_an_identifier() {
        let err = parse_all(b"@\nACGT\n+\nIIII\n").unwrap_err();
        assert!(err.to_string().contains("missing sequence identifier"));
    }

    #[test]
    fn test_separator_must_start_with_plus() {
        let err = parse_all(b"@r1\nACGT\n-\nIIII\n").unwrap_err();
        assert!(err.to_string().contains("separator line"));
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let err = parse_all(b"@r1\nACGT\n+\nIII\n").unwrap_err();
        assert!(err.to_string().contains("lengths differ (4 vs 3)"));
    }

    #[test]
    fn test_truncated_record_is_rejected() {
        let err = parse_all(b"@r1\nACGT\n+\n").unwrap_err();
        assert!(matches!(err, FastqError::Malformed { record: 1, .. }));
        assert!(err.to_string().contains("missing quality"));
    }

    #[test]
    fn test_error_reports_one_based_record_number() {
        let err = parse_all(b"@r1\nAC\n+\nII\n@r2\nAC\n+\nI\n").unwrap_err();
        assert!(matches!(err, FastqError::Malformed { record: 2, .. }));
    }

    #[test]
    fn test_all_or_nothing_on_late_failure() {
        // First record is fine; scan still fails as a whole.
        let result = parse_all(b"@r1\nAC\n+\nII\nnot-a-header\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_detect_phred33_from_low_ascii() {
        let records = parse_all(b"@r1\nACGT\n+\n!I#I\n").unwrap();
        assert_eq!(detect_phred_offset(&records), 33);
    }

    #[test]
    fn test_detect_phred64_from_high_ascii() {
        let records = parse_all(b"@r1\nACGT\n+\nhhgf\n").unwrap();
        assert_eq!(detect_phred_offset(&records), 64);
    }

    #[test]
    fn test_detect_defaults_to_phred33_without_quality_bytes() {
        assert_eq!(detect_phred_offset(&[]), 33);
    }

    #[test]
    fn test_detect_ambiguous_mid_range_leans_on_max() {
        // Bytes in 59..64 with a low max read as Phred+33.
        let records = parse_all(b"@r1\nAC\n+\n;J\n").unwrap();
        assert_eq!(detect_phred_offset(&records), 33);
    }
}
