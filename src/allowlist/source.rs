//! Allow-list sources.
//!
//! # Format
//!
//! The file source reads comma-delimited records; only the first field is
//! used, the rest of the record is free-form (names, notes, ...).
//!
//! - Blank lines are ignored
//! - Lines whose first non-blank character is `#` are comments
//! - The first field may be double-quoted, with `""` escaping a quote
//! - Addresses are trimmed and lower-cased
//!
//! ```text
//! # team allow-list
//! alice@example.com,Alice
//! "Bob@Example.com",contractor
//! ```
//!
//! A malformed record fails the whole read. Callers keep whatever they
//! published last.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::normalize_address;

/// Error produced while parsing allow-list content.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Underlying reader failed (including invalid UTF-8).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A record could not be interpreted.
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: &'static str },
}

/// Error produced by an [`AddressSource`].
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The source could not be opened at all.
    #[error("cannot open allow-list {path:?}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The source was opened but its content could not be read or parsed.
    #[error("failed to read allow-list {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

impl SourceError {
    /// True when the source could not be accessed, as opposed to read.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SourceError::Unavailable { .. })
    }
}

/// Produces the current complete list of allowed addresses.
///
/// Implementations are synchronous and hold no shared state; the refresh
/// task runs them on a blocking worker.
pub trait AddressSource: Send + Sync {
    /// Identifier used in logs and status output.
    fn describe(&self) -> String;

    /// Read the source and return normalized addresses.
    fn load(&self) -> Result<Vec<String>, SourceError>;
}

/// Allow-list stored in a local file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AddressSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<String>, SourceError> {
        let file = File::open(&self.path).map_err(|e| SourceError::Unavailable {
            path: self.path.clone(),
            source: e,
        })?;

        parse_addresses(BufReader::new(file)).map_err(|e| SourceError::Parse {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// Parse allow-list records from a reader.
pub fn parse_addresses<R: BufRead>(reader: R) -> Result<Vec<String>, ParseError> {
    let mut addresses = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let record = line.trim_start();

        if record.is_empty() || record.starts_with('#') {
            continue;
        }

        let field = first_field(record).map_err(|reason| ParseError::Malformed {
            line: index + 1,
            reason,
        })?;

        let address = normalize_address(&field);
        if address.is_empty() {
            return Err(ParseError::Malformed {
                line: index + 1,
                reason: "empty address field",
            });
        }
        addresses.push(address);
    }

    Ok(addresses)
}

/// Extract the first comma-delimited field of a record.
fn first_field(record: &str) -> Result<String, &'static str> {
    let Some(quoted) = record.strip_prefix('"') else {
        let field = record.split(',').next().unwrap_or_default();
        if field.contains('"') {
            return Err("bare quote in unquoted field");
        }
        return Ok(field.to_string());
    };

    let mut field = String::new();
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        if c != '"' {
            field.push(c);
            continue;
        }
        if chars.as_str().starts_with('"') {
            chars.next();
            field.push('"');
            continue;
        }
        let rest = chars.as_str().trim_start();
        if rest.is_empty() || rest.starts_with(',') {
            return Ok(field);
        }
        return Err("unexpected text after closing quote");
    }

    Err("unterminated quoted field")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    fn parse(content: &str) -> Result<Vec<String>, ParseError> {
        parse_addresses(Cursor::new(content))
    }

    #[test]
    fn test_parse_skips_blank_lines_and_comments() {
        let content = "# header\n\nfoo@example.com\n   # indented comment\n  \nbar@example.com\n";
        assert_eq!(parse(content).unwrap(), vec!["foo@example.com", "bar@example.com"]);
    }

    #[test]
    fn test_parse_normalizes_first_field() {
        let content = "   Foo.Bar@Example.Com   ,Foo Bar,extra\r\nBAZ@example.com\r\n";
        assert_eq!(
            parse(content).unwrap(),
            vec!["foo.bar@example.com", "baz@example.com"]
        );
    }

    #[test]
    fn test_parse_quoted_fields() {
        let content = "\"Quoted@Example.com\",note\n\"odd\"\"name@example.com\"\n";
        assert_eq!(
            parse(content).unwrap(),
            vec!["quoted@example.com", "odd\"name@example.com"]
        );
    }

    #[test]
    fn test_parse_rejects_malformed_records() {
        let err = parse("ok@example.com\n\"unterminated@example.com\n").unwrap_err();
        assert!(matches!(err, ParseError::Malformed { line: 2, .. }));

        let err = parse("bad\"quote@example.com\n").unwrap_err();
        assert!(matches!(err, ParseError::Malformed { line: 1, .. }));

        let err = parse("\"a@example.com\"junk\n").unwrap_err();
        assert!(matches!(err, ParseError::Malformed { line: 1, .. }));

        let err = parse("ok@example.com\n  ,note only\n").unwrap_err();
        assert!(matches!(err, ParseError::Malformed { line: 2, reason: "empty address field" }));
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("# only comments\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_file_source_load() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# allowed").unwrap();
        writeln!(file, "xyzzy@example.com").unwrap();
        writeln!(file, "plugh@example.com,second").unwrap();
        file.flush().unwrap();

        let source = FileSource::new(file.path());
        assert_eq!(source.load().unwrap(), vec!["xyzzy@example.com", "plugh@example.com"]);
        assert_eq!(source.describe(), file.path().display().to_string());
    }

    #[test]
    fn test_file_source_missing_file_is_unavailable() {
        let source = FileSource::new("/nonexistent/email-gate/emails.csv");
        let err = source.load().unwrap_err();
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_file_source_parse_error_is_not_unavailable() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "\"broken@example.com").unwrap();
        file.flush().unwrap();

        let err = FileSource::new(file.path()).load().unwrap_err();
        assert!(!err.is_unavailable());
        assert!(matches!(err, SourceError::Parse { .. }));
    }
}
