//! Static synonym and theme tables used for query expansion.
//!
//! Both tables are plain configuration data: a word maps to the list of words
//! that should be added to a query containing it. They are never computed from
//! the corpus, so a deployment can swap them without touching scoring logic.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LectioError, Result};

/// Synonym and theme tables for query expansion.
///
/// The JSON form is an object with two maps:
///
/// ```json
/// {
///   "synonyms": { "temple": ["church", "cathedral"] },
///   "themes": { "family": ["marriage", "children"] }
/// }
/// ```
///
/// A missing map is empty; the shipped tables are never merged in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDictionary {
    /// Word -> synonyms added to the query.
    #[serde(default)]
    pub synonyms: HashMap<String, Vec<String>>,
    /// Word -> topic words added to the query.
    #[serde(default)]
    pub themes: HashMap<String, Vec<String>>,
}

impl Default for QueryDictionary {
    /// The tables shipped with the confession corpus deployment.
    fn default() -> Self {
        Self {
            synonyms: table(DEFAULT_SYNONYMS),
            themes: table(DEFAULT_THEMES),
        }
    }
}

impl QueryDictionary {
    /// Create a dictionary with no entries.
    pub fn empty() -> Self {
        Self {
            synonyms: HashMap::new(),
            themes: HashMap::new(),
        }
    }

    /// Load a dictionary from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        serde_json::from_str(&content).map_err(|e| {
            LectioError::parse(format!(
                "Failed to parse query dictionary JSON from '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Add synonyms for a word, keeping any already present.
    pub fn add_synonyms<S: Into<String>>(&mut self, word: S, synonyms: &[&str]) -> &mut Self {
        self.synonyms
            .entry(word.into())
            .or_default()
            .extend(synonyms.iter().map(|s| s.to_string()));
        self
    }

    /// Add topic words for a word, keeping any already present.
    pub fn add_themes<S: Into<String>>(&mut self, word: S, themes: &[&str]) -> &mut Self {
        self.themes
            .entry(word.into())
            .or_default()
            .extend(themes.iter().map(|s| s.to_string()));
        self
    }

    /// Synonyms registered for `word`.
    pub fn get_synonyms(&self, word: &str) -> Option<&Vec<String>> {
        self.synonyms.get(word)
    }

    /// Topic words registered for `word`.
    pub fn get_themes(&self, word: &str) -> Option<&Vec<String>> {
        self.themes.get(word)
    }
}

fn table(entries: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(word, related)| {
            (
                word.to_string(),
                related.iter().map(|r| r.to_string()).collect(),
            )
        })
        .collect()
}

const DEFAULT_SYNONYMS: &[(&str, &[&str])] = &[
    // temple / church
    (
        "храм",
        &["церковь", "собор", "богослужение", "литургия", "мечеть", "намаз"],
    ),
    ("церковь", &["храм", "собор", "богослужение", "литургия"]),
    ("мечеть", &["храм", "намаз", "богослужение"]),
    // family / marriage
    ("жена", &["супруга", "брак", "семья", "семейный"]),
    (
        "измена",
        &["прелюбодеяние", "неверность", "развод", "прощение", "покаяние"],
    ),
    ("брак", &["семья", "супружество", "женитьба"]),
    // end times
    (
        "апокалипсис",
        &["конец света", "второе пришествие", "страшный суд", "эсхатология"],
    ),
    (
        "конец света",
        &["апокалипсис", "второе пришествие", "страшный суд", "эсхатология"],
    ),
    (
        "второе пришествие",
        &["апокалипсис", "конец света", "страшный суд"],
    ),
    // prayer
    ("молитва", &["намаз", "поклонение", "дуа", "мольба"]),
    ("намаз", &["молитва", "поклонение", "салят"]),
    // god
    ("бог", &["аллах", "господь", "творец", "всевышний"]),
    ("аллах", &["бог", "господь", "творец", "всевышний"]),
    // truth
    ("истина", &["правда", "истинность", "достоверность"]),
    ("правда", &["истина", "истинность", "достоверность"]),
];

const DEFAULT_THEMES: &[(&str, &[&str])] = &[
    (
        "храм",
        &["богослужение", "литургия", "таинства", "воскресенье", "праздник"],
    ),
    (
        "семья",
        &["брак", "супружество", "дети", "родители", "родственники"],
    ),
    ("молитва", &["поклонение", "дуа", "намаз", "богослужение"]),
    ("апокалипсис", &["эсхатология", "пророчества", "признаки", "суд"]),
    ("измена", &["верность", "прелюбодеяние", "развод", "прощение"]),
];
