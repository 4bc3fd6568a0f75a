//! Command implementations for the lectio CLI.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use log::info;

use crate::analysis::{QueryDictionary, QueryRewriter};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::Result;
use crate::search::{Corpus, HybridSearchEngine, SearchConfig, SearchRequest};

/// Execute a CLI command.
pub fn execute_command(args: LectioArgs) -> Result<()> {
    match &args.command {
        Command::Search(search_args) => search_corpus(search_args, &args),
        Command::Expand(expand_args) => expand_query(expand_args, &args),
        Command::Stats(stats_args) => show_stats(stats_args, &args),
    }
}

/// Search a corpus file.
fn search_corpus(args: &SearchArgs, cli_args: &LectioArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => SearchConfig::load_from_file(path)?,
        None => SearchConfig::default(),
    };
    let dictionary = load_dictionary(args.dictionary.as_deref())?;
    let engine = build_engine(&args.corpus, config, dictionary)?;

    let mut request = SearchRequest::new(args.query.clone());
    if let Some(confession) = &args.confession {
        request = request.confession(confession.clone());
    }
    if let Some(limit) = args.limit {
        request = request.limit(limit);
    }

    let start_time = Instant::now();
    let (results, diagnostics) = engine.search_with_diagnostics(&request)?;
    let duration = start_time.elapsed();

    output_result(
        "Search completed",
        &SearchOutput {
            query: args.query.clone(),
            confession: args.confession.clone(),
            results,
            diagnostics: args.explain.then_some(diagnostics),
            duration_ms: duration.as_millis() as u64,
        },
        cli_args,
    )
}

/// Print the rewriting of a query.
fn expand_query(args: &ExpandArgs, cli_args: &LectioArgs) -> Result<()> {
    let dictionary = load_dictionary(args.dictionary.as_deref())?;
    let expanded = QueryRewriter::new(dictionary).expand_query(&args.query);

    output_result(
        "Query expanded",
        &ExpansionOutput {
            query: args.query.clone(),
            main: expanded.main,
            expanded: expanded.expanded,
        },
        cli_args,
    )
}

/// Print statistics about a corpus file.
fn show_stats(args: &StatsArgs, cli_args: &LectioArgs) -> Result<()> {
    let engine = build_engine(
        &args.corpus,
        SearchConfig::default(),
        QueryDictionary::default(),
    )?;
    output_result("Corpus statistics", &corpus_stats(&engine), cli_args)
}

/// Summarize a fitted engine's corpus.
pub fn corpus_stats(engine: &HybridSearchEngine) -> CorpusStats {
    let mut books = BTreeMap::new();
    let mut confessions = BTreeMap::new();
    for doc in engine.documents() {
        *books.entry(doc.metadata().book_name.clone()).or_insert(0) += 1;
        *confessions
            .entry(doc.metadata().confession.clone())
            .or_insert(0) += 1;
    }

    CorpusStats {
        documents: engine.corpus_size(),
        vocabulary_size: engine.vocabulary_size(),
        average_length: engine.avg_doc_len(),
        empty_documents: engine
            .documents()
            .iter()
            .filter(|doc| doc.tokens().is_empty())
            .count(),
        books,
        confessions,
    }
}

fn load_dictionary(path: Option<&Path>) -> Result<QueryDictionary> {
    match path {
        Some(path) => {
            info!("Loading dictionary from: {}", path.display());
            QueryDictionary::load_from_file(path)
        }
        None => Ok(QueryDictionary::default()),
    }
}

fn build_engine(
    corpus_path: &Path,
    config: SearchConfig,
    dictionary: QueryDictionary,
) -> Result<HybridSearchEngine> {
    info!("Loading corpus from: {}", corpus_path.display());
    let corpus = Corpus::load_jsonl(corpus_path)?;

    let mut engine = HybridSearchEngine::with_dictionary(config, dictionary)?;
    engine.fit_corpus(&corpus)?;
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::DocumentMetadata;

    #[test]
    fn test_corpus_stats() {
        let mut engine = HybridSearchEngine::default();
        engine
            .fit(
                &["В начале было Слово", "Слово было у Бога", "..."],
                &[
                    DocumentMetadata::with_book("Евангелие от Иоанна").confession("orthodox"),
                    DocumentMetadata::with_book("Евангелие от Иоанна").confession("orthodox"),
                    DocumentMetadata::default(),
                ],
            )
            .unwrap();

        let stats = corpus_stats(&engine);
        assert_eq!(stats.documents, 3);
        assert_eq!(stats.empty_documents, 1);
        assert_eq!(stats.books["Евангелие от Иоанна"], 2);
        assert_eq!(stats.confessions["orthodox"], 2);
        assert_eq!(stats.confessions[""], 1);
        // в начале было слово у бога
        assert_eq!(stats.vocabulary_size, 6);
    }
}
