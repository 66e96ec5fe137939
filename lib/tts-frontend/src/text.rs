pub mod en;
pub mod num;
pub mod phone_symbol;
pub mod segment;
pub mod zh;

use {
    crate::{FrontendError, Result},
    jyutping_client::RomanizeRequest,
    log::{debug, info},
    serde::{Deserialize, Serialize},
    std::time::Instant,
};
pub use {
    en::{EnglishDictionary, SubwordTokenizer, UnusableWordPolicy, phonemize_english},
    num::digits_to_chinese,
    phone_symbol::SymbolTable,
    segment::{SegmentKind, TextSegment, segment},
    zh::{
        MandarinLexicon, phonemize_mandarin, romanize_char,
        yue::{
            HongKongConverter, IdentityConverter, Romanizer, ScriptConverter,
            phonemize_cantonese, records_to_phonemes,
        },
    },
};

/// Marks the start and end of every utterance.
pub const BOUNDARY_PHONE: &str = "_";

/// Phones, their tones, and the number of phones each linguistic unit produced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PhonemeSequence {
    pub phones: Vec<String>,
    pub tones: Vec<i32>,
    pub word2ph: Vec<usize>,
}

impl PhonemeSequence {
    pub fn with_capacity(phones: usize) -> Self {
        Self {
            phones: Vec::with_capacity(phones),
            tones: Vec::with_capacity(phones),
            word2ph: Vec::with_capacity(phones / 2 + 1),
        }
    }

    /// Appends one linguistic unit; every phone gets the same tone.
    pub fn push_unit<I, S>(&mut self, phones: I, tone: i32)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.phones.len();
        for ph in phones {
            self.phones.push(ph.as_ref().to_string());
            self.tones.push(tone);
        }
        self.word2ph.push(self.phones.len() - before);
    }

    pub fn push_boundary(&mut self) {
        self.push_unit([BOUNDARY_PHONE], 0);
    }

    /// Each character becomes its own phone with tone 0.
    pub fn push_punctuation(&mut self, text: &str) {
        let mut buf = [0u8; 4];
        for c in text.chars() {
            self.push_unit([&*c.encode_utf8(&mut buf)], 0);
        }
    }

    pub fn append(&mut self, mut other: PhonemeSequence) {
        self.phones.append(&mut other.phones);
        self.tones.append(&mut other.tones);
        self.word2ph.append(&mut other.word2ph);
    }

    pub fn len(&self) -> usize {
        self.phones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phones.is_empty()
    }

    pub fn is_consistent(&self) -> bool {
        self.phones.len() == self.tones.len()
            && self.word2ph.iter().sum::<usize>() == self.phones.len()
    }
}

/// `zh_x` pairs Mandarin with English, `yue_en` pairs Cantonese with English.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LangMode {
    #[default]
    #[serde(rename = "zh_x")]
    Mandarin,

    #[serde(rename = "yue_en")]
    Cantonese,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MixedPhonemes {
    pub seq: PhonemeSequence,
    /// The text the embedder sees: Chinese numerals for digits, `Other` runs dropped.
    pub normalized_text: String,
}

/// Dispatches each script run to its phonemizer. Holds only immutable resources,
/// so one instance serves concurrent callers.
pub struct TextProcessor {
    pub mode: LangMode,
    pub tokenizer: Box<dyn SubwordTokenizer>,
    pub dictionary: EnglishDictionary,
    pub lexicon: MandarinLexicon,
    pub unusable_word: UnusableWordPolicy,
    pub romanizer: Option<Box<dyn Romanizer>>,
    pub converter: Box<dyn ScriptConverter>,
}

impl TextProcessor {
    pub fn new(
        mode: LangMode,
        tokenizer: Box<dyn SubwordTokenizer>,
        dictionary: EnglishDictionary,
    ) -> Self {
        Self {
            mode,
            tokenizer,
            dictionary,
            lexicon: MandarinLexicon::default(),
            unusable_word: UnusableWordPolicy::default(),
            romanizer: None,
            converter: Box::new(HongKongConverter),
        }
    }

    pub fn with_romanizer(mut self, romanizer: Box<dyn Romanizer>) -> Self {
        self.romanizer = Some(romanizer);
        self
    }

    pub fn with_lexicon(mut self, lexicon: MandarinLexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn with_converter(mut self, converter: Box<dyn ScriptConverter>) -> Self {
        self.converter = converter;
        self
    }

    pub fn with_unusable_word(mut self, policy: UnusableWordPolicy) -> Self {
        self.unusable_word = policy;
        self
    }

    fn normalize(&self, seg: &TextSegment) -> Option<String> {
        match seg.kind {
            SegmentKind::Chinese if self.mode == LangMode::Cantonese => {
                Some(self.converter.convert(&seg.content))
            }
            SegmentKind::Digit => Some(digits_to_chinese(&seg.content)),
            SegmentKind::Chinese | SegmentKind::Latin | SegmentKind::Punctuation => {
                Some(seg.content.clone())
            }
            SegmentKind::Other => {
                debug!("dropping unsupported run {:?}", seg.content);
                None
            }
        }
    }

    fn romanize_batch(
        &self,
        normalized: &[(SegmentKind, Option<String>)],
    ) -> Result<Option<jyutping_client::RomanizeResponse>> {
        let mut request = RomanizeRequest::new();
        for (index, (kind, content)) in normalized.iter().enumerate() {
            if let (SegmentKind::Chinese | SegmentKind::Digit, Some(content)) = (kind, content) {
                request.insert(index, content);
            }
        }

        if request.is_empty() {
            return Ok(None);
        }

        let romanizer = self
            .romanizer
            .as_deref()
            .ok_or(FrontendError::RomanizerMissing)?;

        let start = Instant::now();
        let response = romanizer.romanize(&request)?;
        info!(
            "romanized {} segments in {:?}",
            request.len(),
            start.elapsed()
        );
        Ok(Some(response))
    }

    /// Turns mixed-script text into one phoneme sequence framed by boundary units.
    pub fn mix_g2p(&self, text: &str) -> Result<MixedPhonemes> {
        let segments = segment(text);
        let normalized: Vec<(SegmentKind, Option<String>)> = segments
            .iter()
            .map(|seg| (seg.kind, self.normalize(seg)))
            .collect();

        let mut response = match self.mode {
            LangMode::Cantonese => self.romanize_batch(&normalized)?,
            LangMode::Mandarin => None,
        };

        let mut seq = PhonemeSequence::with_capacity(text.len() * 2 + 2);
        let mut normalized_text = String::with_capacity(text.len() * 2);
        seq.push_boundary();

        for (index, (kind, content)) in normalized.iter().enumerate() {
            let Some(content) = content else {
                continue;
            };
            normalized_text.push_str(content);

            match kind {
                SegmentKind::Chinese | SegmentKind::Digit => match response.as_mut() {
                    Some(resp) => {
                        let records = resp.take(&index.to_string())?;
                        seq.append(records_to_phonemes(&records));
                    }
                    None => seq.append(phonemize_mandarin(content, &self.lexicon)),
                },
                SegmentKind::Latin => seq.append(phonemize_english(
                    content,
                    self.tokenizer.as_ref(),
                    &self.dictionary,
                    self.unusable_word,
                )?),
                SegmentKind::Punctuation => seq.push_punctuation(content),
                SegmentKind::Other => {
                    return Err(FrontendError::MalformedInput(format!(
                        "unexpected normalized run {content:?}"
                    )));
                }
            }
        }

        seq.push_boundary();

        if !seq.is_consistent() {
            return Err(FrontendError::shape_mismatch(
                "mix_g2p",
                &[seq.phones.len(), seq.phones.len()],
                &[seq.tones.len(), seq.word2ph.iter().sum()],
            ));
        }

        debug!("normalized text: {normalized_text}");
        debug!("phones: {:?}", seq.phones);
        debug!("tones: {:?}", seq.tones);
        debug!("word2ph: {:?}", seq.word2ph);

        Ok(MixedPhonemes {
            seq,
            normalized_text,
        })
    }
}
