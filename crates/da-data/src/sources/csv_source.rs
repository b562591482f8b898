use std::path::{Path, PathBuf};
use std::sync::Arc;
use da_core::{Dataset, Record, Schema};
use tracing::{debug, info};

use crate::DataError;

/// CSV data source: a dataset parsed from delimited text
pub struct CsvSource {
    /// Where the text came from, if it was a file
    path: Option<PathBuf>,
    /// Display name of the source
    name: String,
    /// Parsed records
    dataset: Dataset,
}

impl CsvSource {
    /// Read and parse a CSV file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.csv")
            .to_string();

        let dataset = parse_csv(&text);
        info!(
            "Loaded '{}': {} records, {} columns",
            name,
            dataset.len(),
            dataset.columns().len()
        );

        Ok(Self {
            path: Some(path.to_path_buf()),
            name,
            dataset,
        })
    }

    /// Parse CSV text that was obtained elsewhere (upload, remote fetch)
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self {
            path: None,
            name: name.into(),
            dataset: parse_csv(text),
        }
    }

    pub fn source_name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }
}

/// Parse CSV text into a dataset.
///
/// The first non-blank line is the header. Fewer than two non-blank lines
/// give the empty dataset. Rows whose values are all blank are dropped.
/// Malformed quoting never fails: an unterminated quote swallows the rest
/// of its line.
pub fn parse_csv(text: &str) -> Dataset {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Dataset::empty();
    };
    let mut lines = lines.peekable();
    if lines.peek().is_none() {
        debug!("CSV input has a header but no data lines");
        return Dataset::empty();
    }

    let header = parse_csv_line(header_line);
    let schema = Arc::new(Schema::new(header.iter().cloned()));

    let mut skipped = 0usize;
    let records: Vec<Record> = lines
        .map(|line| Record::from_header_row(&schema, &header, parse_csv_line(line)))
        .filter(|record| {
            let keep = !record.is_blank();
            if !keep {
                skipped += 1;
            }
            keep
        })
        .collect();

    debug!(
        "Parsed {} records across {} columns ({} blank rows dropped)",
        records.len(),
        schema.len(),
        skipped
    );
    Dataset::new(schema, records)
}

/// Split one line into fields.
///
/// Double quotes wrap a field, `""` inside quotes is a literal quote, and
/// commas inside quotes are literal. Whitespace outside quotes is trimmed
/// from both ends of a field; whitespace inside quotes is kept.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = FieldBuilder::default();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                field.push_quoted('"');
            }
            '"' => {
                in_quotes = !in_quotes;
                field.mark_quote();
            }
            ',' if !in_quotes => fields.push(field.finish()),
            c if in_quotes => field.push_quoted(c),
            c => field.push_bare(c),
        }
    }
    fields.push(field.finish());
    fields
}

/// Accumulates one field, remembering which bytes came from inside quotes
/// so trimming never eats them.
#[derive(Default)]
struct FieldBuilder {
    value: String,
    started: bool,
    protected: usize,
}

impl FieldBuilder {
    fn push_bare(&mut self, c: char) {
        if !self.started && c.is_whitespace() {
            return;
        }
        self.started = true;
        self.value.push(c);
    }

    fn push_quoted(&mut self, c: char) {
        self.started = true;
        self.value.push(c);
        self.protected = self.value.len();
    }

    fn mark_quote(&mut self) {
        self.started = true;
        self.protected = self.value.len();
    }

    fn finish(&mut self) -> String {
        let keep = self.value.trim_end().len().max(self.protected);
        self.value.truncate(keep);
        let field = std::mem::take(&mut self.value);
        *self = Self::default();
        field
    }
}
