// Vocabulary catalog
// Supplies the words and sentences the UI can ask to hear

pub mod models;

pub use models::{ExampleSentence, JlptLevel, Vocabulary};

use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct VocabularyCatalog {
    entries: Vec<Vocabulary>,
}

impl VocabularyCatalog {
    pub fn new(entries: Vec<Vocabulary>) -> Self {
        Self { entries }
    }

    /// Parse a JSON array of vocabulary entries
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<Vocabulary> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let catalog = Self::from_json(&fs::read_to_string(path)?)?;
        info!("Loaded {} vocabulary entries from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    pub fn all(&self) -> &[Vocabulary] {
        &self.entries
    }

    /// Entries of one level, in catalog order
    pub fn for_level(&self, level: JlptLevel) -> Vec<&Vocabulary> {
        self.entries.iter().filter(|v| v.level == level).collect()
    }

    pub fn find(&self, word: &str) -> Option<&Vocabulary> {
        self.entries.iter().find(|v| v.word == word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
