use {
    crate::{FrontendError, Result},
    jieba_rs::Jieba,
    log::{debug, info, warn},
    pinyin::ToPinyin,
    std::{collections::HashMap, path::Path, time::Instant},
};

static BUILTIN_PHRASES: &str = include_str!("../../../asset/zh_phrase_dict.json");

/// Tone-numbered reading of one character, `ü` written `v`.
pub fn romanize_char(c: char) -> Option<String> {
    c.to_pinyin()
        .map(|p| p.with_tone_num_end().replace('ü', "v"))
}

/// Word segmentation plus phrase readings, so that polyphonic characters are
/// read in context. Words without an entry fall back to per-character readings.
pub struct MandarinLexicon {
    jieba: Jieba,
    phrases: HashMap<String, Vec<String>>,
}

impl Default for MandarinLexicon {
    fn default() -> Self {
        let phrases = serde_json::from_str(BUILTIN_PHRASES).unwrap_or_else(|e| {
            warn!("built-in phrase dictionary unreadable: {e}");
            HashMap::new()
        });
        Self::from_phrases(phrases)
    }
}

impl MandarinLexicon {
    /// Entries whose reading count differs from their character count are skipped.
    pub fn from_phrases(phrases: HashMap<String, Vec<String>>) -> Self {
        let mut lexicon = Self {
            jieba: Jieba::new(),
            phrases: HashMap::with_capacity(phrases.len()),
        };
        lexicon.extend(phrases);
        lexicon
    }

    /// Built-in phrases overlaid with `{"词": ["ci2"], ...}`.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let extra: HashMap<String, Vec<String>> = serde_json::from_str(content)?;
        let mut lexicon = Self::default();
        lexicon.extend(extra);
        Ok(lexicon)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let start = Instant::now();

        let lexicon = std::fs::read_to_string(path)
            .map_err(FrontendError::from)
            .and_then(|content| Self::from_json_str(&content))
            .map_err(|e| FrontendError::ResourceLoad {
                what: "phrase dictionary",
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        info!(
            "loaded {} phrases from {} in {:?}",
            lexicon.len(),
            path.display(),
            start.elapsed()
        );
        Ok(lexicon)
    }

    fn extend(&mut self, phrases: HashMap<String, Vec<String>>) {
        for (word, readings) in phrases {
            if word.chars().count() != readings.len() {
                warn!("phrase {word:?} has {} readings, skipped", readings.len());
                continue;
            }

            // Keeps the segmenter from splitting a known phrase
            self.jieba.add_word(&word, None, None);
            let readings = readings.into_iter().map(|r| r.replace('ü', "v")).collect();
            self.phrases.insert(word, readings);
        }
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn phrase(&self, word: &str) -> Option<&[String]> {
        self.phrases.get(word).map(Vec::as_slice)
    }

    /// One entry per character of `text`, `None` for characters without a reading.
    pub fn romanize(&self, text: &str) -> Vec<Option<String>> {
        let mut out = Vec::with_capacity(text.chars().count());

        for word in self.jieba.cut(text, true) {
            match self.phrases.get(word) {
                Some(readings) => out.extend(readings.iter().cloned().map(Some)),
                None => out.extend(word.chars().map(romanize_char)),
            }
        }

        debug!("pinyin: {out:?}");
        out
    }
}
