//! Output formatting for CLI commands.

use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::cli::args::{LectioArgs, OutputFormat};
use crate::error::Result;
use crate::search::{SearchDiagnostics, SearchResult};

/// Result structure for search operations.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchOutput {
    pub query: String,
    pub confession: Option<String>,
    pub results: Vec<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<SearchDiagnostics>,
    pub duration_ms: u64,
}

/// Result structure for query expansion.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExpansionOutput {
    pub query: String,
    pub main: Vec<String>,
    pub expanded: Vec<String>,
}

/// Corpus statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct CorpusStats {
    pub documents: usize,
    pub vocabulary_size: usize,
    pub average_length: f64,
    pub empty_documents: usize,
    /// Passage count per book name.
    pub books: BTreeMap<String, usize>,
    /// Passage count per confession tag.
    pub confessions: BTreeMap<String, usize>,
}

/// Types that know how to render themselves for a terminal.
pub trait HumanReadable {
    fn write_human<W: Write>(&self, out: &mut W, args: &LectioArgs) -> Result<()>;
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &LectioArgs) -> Result<()>
where
    T: Serialize + HumanReadable,
{
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: HumanReadable>(message: &str, result: &T, args: &LectioArgs) -> Result<()> {
    let mut out = io::stdout().lock();
    if args.verbosity() > 1 {
        writeln!(out, "{message}")?;
        writeln!(out)?;
    }

    result.write_human(&mut out, args)?;
    out.flush()?;
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &LectioArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

impl HumanReadable for SearchOutput {
    fn write_human<W: Write>(&self, out: &mut W, _args: &LectioArgs) -> Result<()> {
        writeln!(out, "Search Results:")?;
        writeln!(out, "═══════════════")?;

        for (i, result) in self.results.iter().enumerate() {
            writeln!(out)?;
            writeln!(out, "Result {}: (Score: {:.3})", i + 1, result.score)?;
            writeln!(out, "─────────────")?;
            writeln!(out, "{}", result.text)?;

            let source = match (result.book_name.is_empty(), result.author.is_empty()) {
                (false, false) => format!("{} ({})", result.book_name, result.author),
                (false, true) => result.book_name.clone(),
                (true, false) => result.author.clone(),
                (true, true) => String::new(),
            };
            if !source.is_empty() {
                writeln!(out, "Source: {source}")?;
            }
            if !result.confession.is_empty() {
                writeln!(out, "Confession: {}", result.confession)?;
            }
            if !result.theme.is_empty() {
                writeln!(out, "Theme: {}", result.theme)?;
            }

            if self.diagnostics.is_some() {
                let b = &result.score_breakdown;
                writeln!(
                    out,
                    "Breakdown: bm25={:.3} tfidf={:.3} ngram={:.3} boosts={:.3}",
                    b.bm25, b.tfidf, b.ngram, b.boosts
                )?;
                if !result.boosts_applied.is_empty() {
                    let kinds: Vec<&str> =
                        result.boosts_applied.iter().map(|k| k.as_str()).collect();
                    writeln!(out, "Boosts: {}", kinds.join(", "))?;
                }
            }
        }

        writeln!(out)?;
        writeln!(out, "Total results: {}", self.results.len())?;
        writeln!(out, "Search time: {}ms", self.duration_ms)?;

        if let Some(d) = &self.diagnostics {
            writeln!(out)?;
            writeln!(out, "Diagnostics:")?;
            writeln!(out, "────────────")?;
            writeln!(out, "Main query: {}", d.main_query.join(" "))?;
            writeln!(out, "Expanded query: {}", d.expanded_query.join(" "))?;
            writeln!(
                out,
                "Nominees: bm25={} ngram={} tfidf={}",
                d.bm25_nominees, d.ngram_nominees, d.tfidf_nominees
            )?;
            writeln!(out, "Candidates: {}", d.candidates)?;
            writeln!(
                out,
                "Threshold: {:.3}{}",
                d.threshold,
                if d.floor_applied { " (floor applied)" } else { "" }
            )?;
            writeln!(
                out,
                "Kept: {} after threshold, {} after book cap ({} skipped), {} after dedup ({} duplicates)",
                d.after_threshold,
                d.after_book_cap,
                d.book_cap_skipped,
                d.returned,
                d.duplicates_dropped
            )?;
        }

        Ok(())
    }
}

impl HumanReadable for ExpansionOutput {
    fn write_human<W: Write>(&self, out: &mut W, _args: &LectioArgs) -> Result<()> {
        writeln!(out, "Query: {}", self.query)?;
        writeln!(out, "Main words: {}", self.main.join(" "))?;
        writeln!(out, "Expanded words: {}", self.expanded.join(" "))?;
        Ok(())
    }
}

impl HumanReadable for CorpusStats {
    fn write_human<W: Write>(&self, out: &mut W, args: &LectioArgs) -> Result<()> {
        writeln!(out, "Corpus Statistics:")?;
        writeln!(out, "══════════════════")?;
        writeln!(out, "Total documents: {}", self.documents)?;
        writeln!(out, "Vocabulary size: {}", self.vocabulary_size)?;
        writeln!(out, "Average length: {:.1} words", self.average_length)?;
        if self.empty_documents > 0 {
            writeln!(out, "Empty documents: {}", self.empty_documents)?;
        }

        write_counts(out, "Confessions", &self.confessions)?;
        if args.verbosity() > 1 {
            write_counts(out, "Books", &self.books)?;
        } else {
            writeln!(out, "Books: {}", self.books.len())?;
        }

        Ok(())
    }
}

fn write_counts<W: Write>(
    out: &mut W,
    title: &str,
    counts: &BTreeMap<String, usize>,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{title}:")?;
    for (label, count) in counts {
        let label = if label.is_empty() { "(none)" } else { label };
        writeln!(out, "  {label} ({count})")?;
    }
    Ok(())
}
