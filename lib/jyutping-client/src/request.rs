use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentences to romanize, keyed by the index of the segment they came from.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct RomanizeRequest {
    pub sentences: BTreeMap<String, String>,
}

impl RomanizeRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl ToString, sentence: impl ToString) {
        self.sentences.insert(key.to_string(), sentence.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sentences.keys().map(String::as_str)
    }
}
