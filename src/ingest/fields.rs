//! Field-level parsing for loader CSV rows.

use chrono::NaiveDate;
use csv::StringRecord;

use super::IngestError;
use crate::models::PlayerRole;

/// Date format used by the source files.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Treat the literal strings `NULL`, `None` and the empty string as absent.
pub fn nullify(value: &str) -> Option<&str> {
    match value {
        "NULL" | "None" | "" => None,
        other => Some(other),
    }
}

/// Parse a `YYYYMMDD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
}

/// A CSV record plus the location needed for error messages.
pub(crate) struct Row<'a> {
    file: &'static str,
    line: u64,
    record: &'a StringRecord,
}

impl<'a> Row<'a> {
    pub fn new(file: &'static str, record: &'a StringRecord) -> Self {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        Self { file, line, record }
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u64 {
        self.line
    }

    fn raw(&self, index: usize, column: &'static str) -> Result<&'a str, IngestError> {
        self.record.get(index).ok_or(IngestError::ShortRow {
            file: self.file,
            line: self.line,
            column,
        })
    }

    /// A value stored as-is, never nullified (keys and required names).
    pub fn text(&self, index: usize, column: &'static str) -> Result<String, IngestError> {
        Ok(self.raw(index, column)?.to_string())
    }

    pub fn opt_text(&self, index: usize, column: &'static str) -> Result<Option<String>, IngestError> {
        Ok(nullify(self.raw(index, column)?).map(str::to_string))
    }

    pub fn int(&self, index: usize, column: &'static str) -> Result<i64, IngestError> {
        let raw = self.raw(index, column)?;
        raw.trim().parse().map_err(|_| self.invalid_integer(column, raw))
    }

    pub fn opt_int(&self, index: usize, column: &'static str) -> Result<Option<i64>, IngestError> {
        let raw = self.raw(index, column)?;
        nullify(raw)
            .map(|v| v.trim().parse().map_err(|_| self.invalid_integer(column, raw)))
            .transpose()
    }

    pub fn opt_date(&self, index: usize, column: &'static str) -> Result<Option<NaiveDate>, IngestError> {
        let raw = self.raw(index, column)?;
        nullify(raw)
            .map(|v| {
                parse_date(v).map_err(|_| IngestError::InvalidDate {
                    file: self.file,
                    line: self.line,
                    column,
                    value: raw.to_string(),
                })
            })
            .transpose()
    }

    pub fn opt_role(&self, index: usize, column: &'static str) -> Result<Option<PlayerRole>, IngestError> {
        let raw = self.raw(index, column)?;
        nullify(raw)
            .map(|v| {
                v.parse().map_err(|_| IngestError::InvalidRole {
                    file: self.file,
                    line: self.line,
                    value: raw.to_string(),
                })
            })
            .transpose()
    }

    fn invalid_integer(&self, column: &'static str, raw: &str) -> IngestError {
        IngestError::InvalidInteger {
            file: self.file,
            line: self.line,
            column,
            value: raw.to_string(),
        }
    }
}
