use std::io::BufRead;

use super::TableError;
use crate::sequence::{parse_codon, Codon};

/// One data line of a tab-separated table.
pub(crate) struct Record {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Read tab-separated records with at least `columns` fields, skipping
/// blank lines and `#` comments.
pub(crate) fn read_records<R: BufRead>(reader: R, columns: usize) -> Result<Vec<Record>, TableError> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields: Vec<String> = trimmed.split('\t').map(|f| f.trim().to_string()).collect();
        if fields.len() < columns {
            return Err(TableError::Parse {
                line: idx + 1,
                message: format!("expected {} columns, found {}", columns, fields.len()),
            });
        }
        records.push(Record {
            line: idx + 1,
            fields,
        });
    }
    Ok(records)
}

impl Record {
    pub fn residue(&self, column: usize) -> Result<u8, TableError> {
        let field = &self.fields[column];
        match field.as_bytes() {
            [symbol] => Ok(symbol.to_ascii_uppercase()),
            _ => Err(self.error(format!("expected a single residue, found '{}'", field))),
        }
    }

    pub fn residue_pair(&self, column: usize) -> Result<[u8; 2], TableError> {
        let field = &self.fields[column];
        match field.as_bytes() {
            [prev, cur] => Ok([prev.to_ascii_uppercase(), cur.to_ascii_uppercase()]),
            _ => Err(self.error(format!("expected a residue pair, found '{}'", field))),
        }
    }

    pub fn codon(&self, column: usize) -> Result<Codon, TableError> {
        let field = &self.fields[column];
        parse_codon(field).ok_or_else(|| self.error(format!("invalid codon '{}'", field)))
    }

    pub fn weight(&self, column: usize) -> Result<f64, TableError> {
        let field = &self.fields[column];
        match field.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
            _ => Err(self.error(format!("invalid weight '{}'", field))),
        }
    }

    fn error(&self, message: String) -> TableError {
        TableError::Parse {
            line: self.line,
            message,
        }
    }
}
