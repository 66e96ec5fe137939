use {
    crate::{FrontendError, PhonemeSequence, Result},
    log::{info, warn},
    serde::Deserialize,
    std::{collections::HashMap, path::Path, time::Instant},
};

/// Blank id interleaved before every phone and tone.
pub const BLANK_ID: i64 = 0;

#[derive(Deserialize)]
struct SymbolFile {
    symbols: Vec<String>,
}

/// Phone string to model vocabulary id, fixed for one language mode.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    ids: HashMap<String, i64>,
}

impl SymbolTable {
    /// The id of a symbol is its position; a repeated symbol keeps its first id.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids = HashMap::new();
        for (i, symbol) in symbols.into_iter().enumerate() {
            ids.entry(symbol.into()).or_insert(i as i64);
        }
        Self { ids }
    }

    /// `{"symbols": ["_", "AA", ...]}`
    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: SymbolFile = serde_json::from_str(content)?;
        Ok(Self::from_symbols(file.symbols))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let start = Instant::now();

        let table = std::fs::read_to_string(path)
            .map_err(FrontendError::from)
            .and_then(|content| Self::from_json_str(&content))
            .map_err(|e| FrontendError::ResourceLoad {
                what: "symbol table",
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        info!(
            "loaded {} symbols from {} in {:?}",
            table.len(),
            path.display(),
            start.elapsed()
        );
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get(&self, phone: &str) -> Option<i64> {
        self.ids.get(phone).copied()
    }

    /// `0, id, 0, id, ..., 0`. Phones missing from the table are dropped.
    pub fn map_phones<S: AsRef<str>>(&self, phones: &[S]) -> Vec<i64> {
        let mut out = Vec::with_capacity(phones.len() * 2 + 1);
        for phone in phones {
            match self.get(phone.as_ref()) {
                Some(id) => {
                    out.push(BLANK_ID);
                    out.push(id);
                }
                None => warn!("phone {:?} not in symbol table, dropped", phone.as_ref()),
            }
        }
        out.push(BLANK_ID);
        out
    }

    /// Copy of `seq` without the phones this table cannot map, plus the dropped
    /// phones in order. Every unit keeps its slot; its count shrinks by the
    /// phones it lost, so ids, tones and durations built from the copy line up.
    pub fn retain_known(&self, seq: &PhonemeSequence) -> (PhonemeSequence, Vec<String>) {
        let mut kept = PhonemeSequence::with_capacity(seq.len());
        let mut dropped = vec![];
        let mut pairs = seq.phones.iter().zip(&seq.tones);

        for &count in &seq.word2ph {
            let before = kept.phones.len();
            for (phone, &tone) in pairs.by_ref().take(count) {
                if self.ids.contains_key(phone) {
                    kept.phones.push(phone.clone());
                    kept.tones.push(tone);
                } else {
                    dropped.push(phone.clone());
                }
            }
            kept.word2ph.push(kept.phones.len() - before);
        }

        (kept, dropped)
    }
}

/// `0, tone + offset, 0, ..., 0`
pub fn map_tones(tones: &[i32], offset: i32) -> Vec<i64> {
    let mut out = Vec::with_capacity(tones.len() * 2 + 1);
    for &tone in tones {
        out.push(BLANK_ID);
        out.push((tone + offset) as i64);
    }
    out.push(BLANK_ID);
    out
}

/// Doubles every count for the interleaved blanks; the first unit takes one more.
pub fn map_durations(word2ph: &[usize]) -> Vec<usize> {
    let mut out: Vec<usize> = word2ph.iter().map(|n| n * 2).collect();
    if let Some(first) = out.first_mut() {
        *first += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SymbolTable {
        SymbolTable::from_json_str(r#"{"symbols": ["_", "zh", "ong", "AA", "_", ","]}"#).unwrap()
    }

    #[test]
    fn test_ids_are_positions() {
        let t = table();
        assert_eq!(t.len(), 5);
        assert_eq!(t.get("_"), Some(0));
        assert_eq!(t.get("ong"), Some(2));
        assert_eq!(t.get(","), Some(5));
        assert_eq!(t.get("aa"), None);
    }

    #[test]
    fn test_map_phones() {
        let t = table();
        assert_eq!(t.map_phones(&["_", "zh", "ong", "_"]), [0, 0, 0, 1, 0, 2, 0, 0, 0]);
        // Unknown phones take no slot
        assert_eq!(t.map_phones(&["zh", "xx", "ong"]), [0, 1, 0, 2, 0]);
        assert_eq!(t.map_phones::<&str>(&[]), [0]);
    }

    #[test]
    fn test_map_tones() {
        assert_eq!(map_tones(&[0, 1, 3], 20), [0, 20, 0, 21, 0, 23, 0]);
        assert_eq!(map_tones(&[], 20), [0]);
    }

    #[test]
    fn test_map_durations() {
        assert_eq!(map_durations(&[1, 2, 0, 1]), [3, 4, 0, 2]);
        assert!(map_durations(&[]).is_empty());
    }

    #[test]
    fn test_mapping_is_repeatable() {
        let t = table();
        let phones = ["_", "zh", "ong", ",", "_"];
        let tones = [0, 1, 1, 0, 0];
        let word2ph = [1, 2, 1, 1];

        let first = (t.map_phones(&phones), map_tones(&tones, 20), map_durations(&word2ph));
        let second = (t.map_phones(&phones), map_tones(&tones, 20), map_durations(&word2ph));
        assert_eq!(first, second);
        // Lengths line up when every phone is known
        assert_eq!(first.0.len(), first.1.len());
        assert_eq!(first.0.len(), first.2.iter().sum::<usize>());
    }

    #[test]
    fn test_retain_known_shrinks_owning_unit() {
        let t = table();
        let seq = PhonemeSequence {
            phones: ["_", "zh", "ong", "%", ",", "_"].map(String::from).to_vec(),
            tones: vec![0, 1, 1, 0, 0, 0],
            word2ph: vec![1, 2, 1, 1, 1],
        };

        let (kept, dropped) = t.retain_known(&seq);
        assert_eq!(dropped, ["%"]);
        assert_eq!(kept.phones, ["_", "zh", "ong", ",", "_"]);
        assert_eq!(kept.tones, [0, 1, 1, 0, 0]);
        assert_eq!(kept.word2ph, [1, 2, 0, 1, 1]);

        let ids = t.map_phones(&kept.phones);
        let durations = map_durations(&kept.word2ph);
        assert_eq!(durations, [3, 4, 0, 2, 2]);
        assert_eq!(ids.len(), durations.iter().sum::<usize>());
        assert_eq!(ids.len(), map_tones(&kept.tones, 20).len());
    }

    #[test]
    fn test_retain_known_keeps_everything_known() {
        let t = table();
        let seq = PhonemeSequence {
            phones: ["_", "zh", "ong", "_"].map(String::from).to_vec(),
            tones: vec![0, 1, 1, 0],
            word2ph: vec![1, 2, 1],
        };

        let (kept, dropped) = t.retain_known(&seq);
        assert!(dropped.is_empty());
        assert_eq!(kept, seq);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SymbolTable::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, FrontendError::ResourceLoad { what: "symbol table", .. }));
    }
}
