#![allow(dead_code)]

use jyutping_client::{CharRecord, RomanizeRequest, RomanizeResponse, Syllable};
use ndarray::Array2;
use std::sync::atomic::{AtomicUsize, Ordering};
use tts_frontend::{
    AcousticInputs, AcousticModel, EnglishDictionary, Embedder, LangMode, Result, Romanizer,
    SubwordTokenizer, SymbolTable, TextProcessor,
};

pub const DICT_JSON: &str = r#"{
    "OK": [["OW2", "K", "EY1"]],
    "RUST": [["R", "AH1", "S", "T"]],
    "HELLO": [["HH", "AH0", "L", "OW1"]],
    "WORLD": [["W", "ER1", "L", "D"]]
}"#;

pub const SYMBOLS: &[&str] = &[
    "_", "zh", "ong", "g", "uo", "n", "i", "h", "ao", "u", "r", "ah", "s", "t", "ow", "k", "ey",
    "hh", "l", "w", "er", "d", "aa", "，", "。", ",", "!",
];

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Lowercased whitespace split; words longer than four letters continue in `##` pieces.
pub struct FakeTokenizer;

impl SubwordTokenizer for FakeTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let mut tokens = vec![];
        for word in text.split_whitespace() {
            let chars: Vec<char> = word.to_lowercase().chars().collect();
            for (i, piece) in chars.chunks(4).enumerate() {
                let piece: String = piece.iter().collect();
                tokens.push(if i == 0 { piece } else { format!("##{piece}") });
            }
        }
        Ok(tokens)
    }
}

/// Every character romanizes to `s aa` tone 1, unless the service is set to fail.
#[derive(Default)]
pub struct FakeRomanizer {
    pub calls: AtomicUsize,
    pub fail_with_status: Option<u16>,
}

impl Romanizer for FakeRomanizer {
    fn romanize(&self, request: &RomanizeRequest) -> jyutping_client::Result<RomanizeResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(code) = self.fail_with_status {
            return Err(jyutping_client::Error::Status {
                status: reqwest::StatusCode::from_u16(code).unwrap(),
                body: "unavailable".into(),
            });
        }

        let mut resp = RomanizeResponse::default();
        for (key, sentence) in &request.sentences {
            let records = sentence
                .chars()
                .map(|c| CharRecord {
                    char: c.to_string(),
                    pinyin: Some("saa1".into()),
                    initial_list: vec![Syllable {
                        initial: "s".into(),
                        nucleus: "aa".into(),
                        coda: String::new(),
                        tone: 1,
                    }],
                })
                .collect();
            resp.segments.insert(key.clone(), records);
        }
        Ok(resp)
    }
}

/// Row `i` is filled with `i`, so expanded columns reveal which unit they came from.
pub struct IndexEmbedder {
    pub units: usize,
    pub dim: usize,
}

impl Embedder for IndexEmbedder {
    fn embed(&self, _text: &str) -> Result<Array2<f32>> {
        Ok(Array2::from_shape_fn((self.units, self.dim), |(i, _)| i as f32))
    }
}

/// One sample per phone id.
pub struct EchoModel;

impl AcousticModel for EchoModel {
    fn infer(&self, inputs: &AcousticInputs) -> Result<Vec<f32>> {
        Ok(inputs.phone_ids.iter().map(|&id| id as f32).collect())
    }
}

pub fn dictionary() -> EnglishDictionary {
    EnglishDictionary::from_json_str(DICT_JSON).unwrap()
}

pub fn symbols() -> SymbolTable {
    SymbolTable::from_symbols(SYMBOLS.iter().copied())
}

pub fn processor(mode: LangMode) -> TextProcessor {
    TextProcessor::new(mode, Box::new(FakeTokenizer), dictionary())
}
