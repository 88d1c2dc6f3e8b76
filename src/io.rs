//! Gene input and nucleotide output
//!
//! Input is either FASTA, read with `bio::io::fasta` (identifier and
//! description together form the gene name), or one `name<TAB>sequence`
//! pair per line; the format is sniffed from the first non-blank line. Output is one
//! `name<TAB>nucleotides` line per gene.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{anyhow, Result};
use bio::io::fasta;
use thiserror::Error;

use crate::orchestrator::GeneJob;
use crate::sequence::{AminoAcidSequence, SequenceError};

/// Errors raised while reading gene input.
#[derive(Debug, Error)]
pub enum IoError {
    /// Underlying read failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// First line is neither a FASTA header nor a tab-separated pair.
    #[error("unsupported input format: expected FASTA or name<TAB>sequence lines")]
    UnsupportedFormat,

    /// Line that does not fit the detected format.
    #[error("line {line}: {message}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        message: String,
    },

    /// FASTA record rejected by the reader.
    #[error("malformed FASTA: {0}")]
    Fasta(String),

    /// Two entries share a name.
    #[error("gene '{0}' appears more than once")]
    DuplicateName(String),

    /// Protein sequence rejected.
    #[error("gene '{name}': {source}")]
    Sequence {
        /// Gene name.
        name: String,
        /// Parse failure.
        #[source]
        source: SequenceError,
    },
}

/// Read every gene from `reader`, in input order.
pub fn read_genes<R: BufRead>(mut reader: R) -> Result<Vec<GeneJob>, IoError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let first = text.lines().find(|line| !line.trim().is_empty());
    let raw = match first {
        None => Vec::new(),
        Some(line) if line.trim_start().starts_with('>') => {
            let start = text.find('>').unwrap_or(0);
            parse_fasta(&text[start..])?
        }
        Some(line) if line.contains('\t') => parse_tabbed(&text)?,
        Some(_) => return Err(IoError::UnsupportedFormat),
    };

    let mut seen = HashSet::new();
    let mut jobs = Vec::with_capacity(raw.len());
    for (name, residues) in raw {
        if !seen.insert(name.clone()) {
            return Err(IoError::DuplicateName(name));
        }
        let protein = AminoAcidSequence::parse(&residues)
            .map_err(|source| IoError::Sequence { name: name.clone(), source })?;
        jobs.push(GeneJob::new(name, protein));
    }
    Ok(jobs)
}

/// Read every gene from the file at `path`.
pub fn read_genes_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<GeneJob>, IoError> {
    let file = File::open(path)?;
    read_genes(BufReader::new(file))
}

fn parse_fasta(text: &str) -> Result<Vec<(String, String)>, IoError> {
    let reader = fasta::Reader::new(text.as_bytes());
    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|e| IoError::Fasta(e.to_string()))?;
        if record.id().is_empty() {
            return Err(IoError::Fasta(format!("record {} has no name", index + 1)));
        }
        let name = match record.desc() {
            Some(desc) if !desc.trim().is_empty() => format!("{} {}", record.id(), desc.trim()),
            _ => record.id().to_string(),
        };
        records.push((name, String::from_utf8_lossy(record.seq()).into_owned()));
    }
    Ok(records)
}

fn parse_tabbed(text: &str) -> Result<Vec<(String, String)>, IoError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            let mut fields = line.trim_end().split('\t');
            match (fields.next(), fields.next(), fields.next()) {
                (Some(name), Some(sequence), None) if !name.trim().is_empty() => {
                    Ok((name.trim().to_string(), sequence.to_string()))
                }
                _ => Err(IoError::Malformed {
                    line: idx + 1,
                    message: "expected name<TAB>sequence".to_string(),
                }),
            }
        })
        .collect()
}

/// Write `name<TAB>nucleotides` records.
pub fn write_records<'a, W, I>(writer: &mut W, records: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    for (name, nucleotides) in records {
        writeln!(writer, "{name}\t{nucleotides}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Render records into a string (useful for tests and snapshots).
pub fn render_records<'a, I>(records: I) -> Result<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut buffer = Vec::new();
    write_records(&mut buffer, records)?;
    String::from_utf8(buffer).map_err(|_| anyhow!("rendered records are not valid UTF-8"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_multiline_fasta() {
        let input = ">gfp partial\nMSKGEE\nLFTG\n\n>ins\nmalwmr\n";
        let jobs = read_genes(input.as_bytes()).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].name, "gfp partial");
        assert_eq!(jobs[0].protein.to_string(), "MSKGEELFTG");
        assert_eq!(jobs[1].protein.to_string(), "MALWMR");
    }

    #[test]
    fn reads_tabbed_pairs() {
        let input = "\nalpha\tMKV*\nbeta\tMW\n";
        let jobs = read_genes(input.as_bytes()).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[1].name, "beta");
    }

    #[test]
    fn rejects_unknown_format_and_duplicates() {
        assert!(matches!(
            read_genes("MKV\n".as_bytes()),
            Err(IoError::UnsupportedFormat)
        ));
        assert!(matches!(
            read_genes("a\tMK\na\tMW\n".as_bytes()),
            Err(IoError::DuplicateName(name)) if name == "a"
        ));
        assert!(matches!(
            read_genes("a\tMK\nbroken line\n".as_bytes()),
            Err(IoError::Malformed { line: 2, .. })
        ));
        assert!(matches!(
            read_genes(">x\nMK1\n".as_bytes()),
            Err(IoError::Sequence { .. })
        ));
    }

    #[test]
    fn fasta_quirks() {
        let jobs = read_genes("\n\n>sp|P01308 insulin  \nMALW\n\nMRLL\n".as_bytes()).unwrap();
        assert_eq!(jobs[0].name, "sp|P01308 insulin");
        assert_eq!(jobs[0].protein.to_string(), "MALWMRLL");
        assert!(matches!(
            read_genes(">\nMK\n".as_bytes()),
            Err(IoError::Fasta(_))
        ));
        assert!(matches!(
            read_genes(">a\nMK\n>a\nMW\n".as_bytes()),
            Err(IoError::DuplicateName(name)) if name == "a"
        ));
    }

    #[test]
    fn empty_input_has_no_genes() {
        assert!(read_genes("\n\n".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn renders_tab_separated_lines() {
        let text = render_records([("a", "ATGTGG"), ("b", "ATG")]).unwrap();
        assert_eq!(text, "a\tATGTGG\nb\tATG\n");
    }
}
