use {
    crate::{FrontendError, Result},
    log::{info, warn},
    std::{collections::HashMap, path::Path, time::Instant},
};

/// Uppercased word to pronunciation variants, each an ordered list of
/// stress-marked phones. Immutable once built.
#[derive(Debug, Default, Clone)]
pub struct EnglishDictionary {
    entries: HashMap<String, Vec<Vec<String>>>,
    // Sorted, used by the nearest-word scan
    keys: Vec<String>,
}

impl EnglishDictionary {
    pub fn from_entries(entries: HashMap<String, Vec<Vec<String>>>) -> Self {
        let mut merged: HashMap<String, Vec<Vec<String>>> = HashMap::with_capacity(entries.len());
        for (word, variants) in entries {
            merged
                .entry(word.to_uppercase())
                .or_default()
                .extend(variants);
        }

        let mut keys: Vec<String> = merged.keys().cloned().collect();
        keys.sort_unstable();

        Self {
            entries: merged,
            keys,
        }
    }

    /// `{"WORD": [["PH1", "PH2"], ...], ...}`
    pub fn from_json_str(content: &str) -> Result<Self> {
        let entries: HashMap<String, Vec<Vec<String>>> = serde_json::from_str(content)?;
        Ok(Self::from_entries(entries))
    }

    /// CMUdict text. `;;;` starts a comment line, `WORD(2)` lines add alternates.
    pub fn from_cmudict_str(content: &str) -> Result<Self> {
        let mut entries: HashMap<String, Vec<Vec<String>>> = HashMap::new();

        for (lineno, line) in content.lines().enumerate() {
            let line = line.split(" #").next().unwrap_or_default().trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }

            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            let phones: Vec<String> = fields.map(str::to_string).collect();
            if phones.is_empty() {
                return Err(FrontendError::MalformedInput(format!(
                    "cmudict line {}: {word:?} has no phones",
                    lineno + 1
                )));
            }

            let word = match word.split_once('(') {
                Some((base, rest)) if rest.ends_with(')') => base,
                _ => word,
            };
            entries.entry(word.to_string()).or_default().push(phones);
        }

        Ok(Self::from_entries(entries))
    }

    /// Loads `.json` files as JSON, anything else as CMUdict text.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let start = Instant::now();

        let content = std::fs::read_to_string(path).map_err(|e| FrontendError::ResourceLoad {
            what: "english dictionary",
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let dict = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_cmudict_str(&content)
        }
        .map_err(|e| FrontendError::ResourceLoad {
            what: "english dictionary",
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        info!(
            "loaded {} dictionary entries from {} in {:?}",
            dict.len(),
            path.display(),
            start.elapsed()
        );
        Ok(dict)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn get(&self, word: &str) -> Option<&[Vec<String>]> {
        self.entries.get(word).map(Vec::as_slice)
    }

    /// Key with the smallest edit distance to `word`. Ties keep the earliest key,
    /// an exact match ends the scan.
    pub fn nearest(&self, word: &str) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;

        for key in &self.keys {
            let dist = strsim::levenshtein(word, key);
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((key.as_str(), dist));
            }
            if dist == 0 {
                break;
            }
        }

        best.map(|(key, _)| key)
    }

    /// First pronunciation variant of `word` (already uppercased), falling back to
    /// the nearest dictionary word. `None` when neither gives a usable variant.
    pub fn pronounce(&self, word: &str) -> Option<&[String]> {
        if let Some(variant) = self.get(word).and_then(<[_]>::first) {
            return Some(variant.as_slice());
        }

        let start = Instant::now();
        let closest = self.nearest(word)?;
        warn!(
            "{word:?} not in dictionary, using {closest:?} ({:?})",
            start.elapsed()
        );
        self.get(closest).and_then(<[_]>::first).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CMUDICT: &str = ";;; test dictionary
HELLO  HH AH0 L OW1
HELLO(2)  HH EH0 L OW1
WORLD  W ER1 L D
READ  R IY1 D # present tense
";

    #[test]
    fn test_cmudict_variants() {
        let dict = EnglishDictionary::from_cmudict_str(CMUDICT).unwrap();
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.keys(), ["HELLO", "READ", "WORLD"]);

        let hello = dict.get("HELLO").unwrap();
        assert_eq!(hello.len(), 2);
        assert_eq!(hello[0], ["HH", "AH0", "L", "OW1"]);
        assert_eq!(hello[1][1], "EH0");
        assert_eq!(dict.get("READ").unwrap()[0], ["R", "IY1", "D"]);
    }

    #[test]
    fn test_cmudict_missing_phones() {
        let err = EnglishDictionary::from_cmudict_str("HELLO\n").unwrap_err();
        assert!(matches!(err, FrontendError::MalformedInput(_)));
    }

    #[test]
    fn test_json_keys_are_uppercased() {
        let dict = EnglishDictionary::from_json_str(r#"{"cat": [["K", "AE1", "T"]]}"#).unwrap();
        assert!(dict.get("CAT").is_some());
        assert!(dict.get("cat").is_none());
    }

    #[test]
    fn test_nearest() {
        let dict = EnglishDictionary::from_cmudict_str(CMUDICT).unwrap();
        assert_eq!(dict.nearest("WORLD"), Some("WORLD"));
        assert_eq!(dict.nearest("HELO"), Some("HELLO"));

        let dict = EnglishDictionary::from_json_str(r#"{"COT": [["K"]], "CAT": [["K"]]}"#).unwrap();
        assert_eq!(dict.nearest("CUT"), Some("CAT"));
        assert_eq!(EnglishDictionary::default().nearest("X"), None);
    }

    #[test]
    fn test_pronounce_falls_back() {
        let dict = EnglishDictionary::from_cmudict_str(CMUDICT).unwrap();
        assert_eq!(dict.pronounce("WORLDS").unwrap(), ["W", "ER1", "L", "D"]);
        assert!(EnglishDictionary::default().pronounce("WORLD").is_none());
    }

    #[test]
    fn test_load_by_extension() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;

        let json = dir.path().join("dict.json");
        std::fs::write(&json, r#"{"OK": [["OW2", "K", "EY1"]]}"#)?;
        assert_eq!(EnglishDictionary::load(&json)?.len(), 1);

        let txt = dir.path().join("cmudict.dict");
        std::fs::write(&txt, CMUDICT)?;
        assert_eq!(EnglishDictionary::load(&txt)?.len(), 3);

        let missing = EnglishDictionary::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, FrontendError::ResourceLoad { .. }));
        Ok(())
    }
}
