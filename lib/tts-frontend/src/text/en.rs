mod dict;

pub use dict::EnglishDictionary;
use {
    crate::{FrontendError, Result, text::PhonemeSequence},
    log::{debug, warn},
    serde::{Deserialize, Serialize},
    std::path::Path,
    tokenizers::Tokenizer,
};

/// WordPiece marker for a token that continues the previous one.
pub const CONTINUATION_PREFIX: &str = "##";

/// What to do with a word that neither the dictionary nor its nearest match can
/// pronounce.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnusableWordPolicy {
    /// Emit no phones, one zero count per sub-word token.
    #[default]
    Skip,
    Fail,
}

pub trait SubwordTokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<String>>;
}

impl SubwordTokenizer for Tokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let encoding = self
            .encode(text, false)
            .map_err(|e| FrontendError::Tokenizer(e.to_string()))?;
        Ok(encoding.get_tokens().to_vec())
    }
}

pub fn load_tokenizer(path: impl AsRef<Path>) -> Result<Tokenizer> {
    let path = path.as_ref();
    Tokenizer::from_file(path).map_err(|e| FrontendError::ResourceLoad {
        what: "tokenizer",
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Regroups sub-word tokens into words, continuation prefixes stripped.
pub fn group_tokens(tokens: &[String]) -> Vec<Vec<&str>> {
    let mut groups: Vec<Vec<&str>> = Vec::with_capacity(tokens.len());

    for token in tokens {
        match token.strip_prefix(CONTINUATION_PREFIX) {
            Some(piece) => match groups.last_mut() {
                Some(group) => group.push(piece),
                None => {
                    debug!("continuation token {token:?} opens the text");
                    groups.push(vec![piece]);
                }
            },
            None => groups.push(vec![token.as_str()]),
        }
    }

    groups
}

/// `AH1` -> (`ah`, 2). Stress 0-4 maps to tone 1-5, no stress is tone 0.
pub fn split_phone_tone(phone: &str) -> (String, i32) {
    match phone.as_bytes().last() {
        Some(&b) if (b'0'..=b'4').contains(&b) => (
            phone[..phone.len() - 1].to_lowercase(),
            (b - b'0') as i32 + 1,
        ),
        _ => (phone.to_lowercase(), 0),
    }
}

/// Spreads `phones` over `tokens` buckets, each phone going to the emptiest
/// bucket, earliest on ties.
pub fn distribute(phones: usize, tokens: usize) -> Vec<usize> {
    let mut counts = vec![0usize; tokens];
    if tokens == 0 {
        return counts;
    }

    for _ in 0..phones {
        let idx = counts
            .iter()
            .enumerate()
            .min_by_key(|(_, c)| **c)
            .map(|(i, _)| i)
            .unwrap_or_default();
        counts[idx] += 1;
    }

    counts
}

pub fn phonemize_english(
    text: &str,
    tokenizer: &dyn SubwordTokenizer,
    dict: &EnglishDictionary,
    policy: UnusableWordPolicy,
) -> Result<PhonemeSequence> {
    let tokens = tokenizer.tokenize(text)?;
    let groups = group_tokens(&tokens);
    let mut seq = PhonemeSequence::with_capacity(tokens.len() * 3);

    for parts in &groups {
        let word = parts.concat().to_uppercase();

        let variant = match dict.pronounce(&word) {
            Some(v) => v,
            None => match policy {
                UnusableWordPolicy::Skip => {
                    warn!("no usable pronunciation for {word:?}, skipped");
                    seq.word2ph.extend(distribute(0, parts.len()));
                    continue;
                }
                UnusableWordPolicy::Fail => return Err(FrontendError::UnusableWord(word)),
            },
        };

        for ph in variant {
            let (phone, tone) = split_phone_tone(ph);
            seq.phones.push(phone);
            seq.tones.push(tone);
        }
        seq.word2ph.extend(distribute(variant.len(), parts.len()));
    }

    debug!("english tokens: {tokens:?}");
    debug!("english phones: {:?}", seq.phones);
    debug!("english word2ph: {:?}", seq.word2ph);
    Ok(seq)
}
