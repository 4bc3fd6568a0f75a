//! Loading configuration, dictionaries and corpora from disk.

use std::fs;

use tempfile::tempdir;

use lectio::analysis::{QueryDictionary, QueryRewriter};
use lectio::error::{LectioError, Result};
use lectio::search::{Corpus, HybridSearchEngine, SearchConfig};

#[test]
fn test_load_partial_config() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{
            "weights": { "bm25": 0.6 },
            "threshold": { "result_floor": 5 },
            "confessions": ["orthodox", "catholic"]
        }"#,
    )?;

    let config = SearchConfig::load_from_file(&path)?;
    assert_eq!(config.weights.bm25, 0.6);
    assert_eq!(config.weights.ngram, 0.25);
    assert_eq!(config.threshold.result_floor, 5);
    assert!(config.is_known_confession("catholic"));
    assert!(!config.is_known_confession("sunni"));
    assert_eq!(config.default_limit, 20);

    Ok(())
}

#[test]
fn test_invalid_config_file() -> Result<()> {
    let dir = tempdir()?;

    let path = dir.path().join("bad_values.json");
    fs::write(&path, r#"{ "bm25": { "b": 3.0 } }"#)?;
    assert!(matches!(
        SearchConfig::load_from_file(&path),
        Err(LectioError::InvalidConfig(_))
    ));

    let path = dir.path().join("not_json.json");
    fs::write(&path, "weights = 1")?;
    assert!(matches!(
        SearchConfig::load_from_file(&path),
        Err(LectioError::Parse(_))
    ));

    assert!(matches!(
        SearchConfig::load_from_file(dir.path().join("missing.json")),
        Err(LectioError::Io(_))
    ));

    Ok(())
}

#[test]
fn test_load_dictionary() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("dictionary.json");
    fs::write(
        &path,
        r#"{
            "synonyms": { "temple": ["church", "cathedral"] },
            "themes": { "temple": ["liturgy"] }
        }"#,
    )?;

    let dictionary = QueryDictionary::load_from_file(&path)?;
    let expanded = QueryRewriter::new(dictionary).expand_query("Temple");
    assert_eq!(expanded.main, vec!["temple"]);
    assert_eq!(
        expanded.expanded,
        vec!["temple", "church", "cathedral", "liturgy"]
    );

    Ok(())
}

#[test]
fn test_dictionary_missing_section_is_empty() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("dictionary.json");
    fs::write(&path, r#"{ "synonyms": { "a": ["b"] } }"#)?;

    let dictionary = QueryDictionary::load_from_file(&path)?;
    assert_eq!(dictionary.get_synonyms("a"), Some(&vec!["b".to_string()]));
    assert!(dictionary.get_synonyms("бог").is_none());
    assert!(dictionary.get_themes("семья").is_none());
    assert!(dictionary.themes.is_empty());

    Ok(())
}

#[test]
fn test_load_jsonl_corpus_and_search() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("corpus.jsonl");
    fs::write(
        &path,
        concat!(
            r#"{"text": "Отче наш, Иже еси на небесех", "book_name": "Евангелие от Матфея", "confession": "orthodox"}"#,
            "\n\n",
            r#"{"text": "Во имя Аллаха, Милостивого, Милосердного", "book_name": "Коран", "author": "", "confession": "sunni", "theme": "молитва"}"#,
            "\n",
        ),
    )?;

    let corpus = Corpus::load_jsonl(&path)?;
    assert_eq!(corpus.len(), 2);
    assert_eq!(corpus.metadata[0].theme, "");
    assert_eq!(corpus.metadata[1].book_name, "Коран");

    let mut engine = HybridSearchEngine::default();
    engine.fit_corpus(&corpus)?;
    let results = engine.search("Милосердного", Some("sunni"), 5)?;
    assert_eq!(results[0].id, 1);
    assert_eq!(results[0].book_name, "Коран");

    Ok(())
}

#[test]
fn test_malformed_corpus_line() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("corpus.jsonl");
    fs::write(&path, "{\"text\": \"ok\"}\n{\"book_name\": \"no text\"}\n")?;

    match Corpus::load_jsonl(&path) {
        Err(LectioError::Parse(msg)) => assert!(msg.contains("line 2")),
        other => panic!("expected parse error, got {other:?}"),
    }

    Ok(())
}
