//! Documents held by the engine and the corpus they are loaded from.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LectioError, Result};

/// Descriptive fields attached to a passage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMetadata {
    pub book_name: String,
    /// May be empty.
    pub author: String,
    /// Tradition tag such as `orthodox`, `sunni` or `shia`; may be empty.
    pub confession: String,
    /// Free-text topic label; may be empty.
    pub theme: String,
}

impl DocumentMetadata {
    /// Metadata with only a book name.
    pub fn with_book<S: Into<String>>(book_name: S) -> Self {
        Self {
            book_name: book_name.into(),
            ..Default::default()
        }
    }

    /// Set the author.
    pub fn author<S: Into<String>>(mut self, author: S) -> Self {
        self.author = author.into();
        self
    }

    /// Set the confession tag.
    pub fn confession<S: Into<String>>(mut self, confession: S) -> Self {
        self.confession = confession.into();
        self
    }

    /// Set the theme label.
    pub fn theme<S: Into<String>>(mut self, theme: S) -> Self {
        self.theme = theme.into();
        self
    }
}

/// A passage owned by a fitted engine.
///
/// The id is the passage's position in the sequence given to `fit` and is only
/// meaningful until the next `fit`.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    id: usize,
    text: String,
    metadata: DocumentMetadata,
    normalized: String,
    tokens: Vec<String>,
}

impl Document {
    pub(crate) fn new(
        id: usize,
        text: String,
        metadata: DocumentMetadata,
        normalized: String,
    ) -> Self {
        let tokens = normalized.split_whitespace().map(str::to_string).collect();
        Self {
            id,
            text,
            metadata,
            normalized,
            tokens,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// The raw passage text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    /// The normalized passage text.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// The normalized passage words.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

/// One line of a JSONL corpus file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusRecord {
    pub text: String,
    #[serde(flatten)]
    pub metadata: DocumentMetadata,
}

/// Passage texts with positionally aligned metadata, ready for `fit`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    pub texts: Vec<String>,
    pub metadata: Vec<DocumentMetadata>,
}

impl Corpus {
    /// Create an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a passage.
    pub fn push<S: Into<String>>(&mut self, text: S, metadata: DocumentMetadata) {
        self.texts.push(text.into());
        self.metadata.push(metadata);
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Build a corpus from parsed records.
    pub fn from_records<I: IntoIterator<Item = CorpusRecord>>(records: I) -> Self {
        let mut corpus = Self::new();
        for record in records {
            corpus.push(record.text, record.metadata);
        }
        corpus
    }

    /// Load a JSONL file with one [`CorpusRecord`] per line.
    ///
    /// Blank lines are skipped; a malformed line fails the whole load.
    pub fn load_jsonl<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let mut corpus = Self::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let record: CorpusRecord = serde_json::from_str(line).map_err(|e| {
                LectioError::parse(format!(
                    "Failed to parse corpus record on line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            corpus.push(record.text, record.metadata);
        }

        Ok(corpus)
    }
}
