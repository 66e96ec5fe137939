mod config;
mod error;
mod feature;
mod synthesis;
mod text;

use {
    derive_setters::Setters,
    log::{debug, info, warn},
    std::time::Instant,
};
pub use {
    config::*,
    error::*,
    feature::*,
    jyutping_client,
    synthesis::*,
    text::{
        en::{CONTINUATION_PREFIX, distribute, group_tokens, load_tokenizer, split_phone_tone},
        phone_symbol::{BLANK_ID, map_durations, map_tones},
        zh::{get_final, get_initial, split_zh_ph},
        *,
    },
};

pub const DEFAULT_TONE_OFFSET: i32 = 20;
pub const DEFAULT_PLACEHOLDER_DIM: usize = 1024;

/// Text front-end plus the acoustic-input assembly for one language mode.
///
/// All resources are loaded up front and never mutated, so a single instance can
/// be shared by reference between threads.
#[derive(Setters)]
#[setters(prefix = "with_")]
pub struct Frontend {
    #[setters(skip)]
    processor: TextProcessor,

    #[setters(skip)]
    symbols: SymbolTable,

    pub tone_offset: i32,
    pub placeholder_dim: usize,
}

impl Frontend {
    pub fn new(processor: TextProcessor, symbols: SymbolTable) -> Self {
        Self {
            processor,
            symbols,
            tone_offset: DEFAULT_TONE_OFFSET,
            placeholder_dim: DEFAULT_PLACEHOLDER_DIM,
        }
    }

    /// Loads the symbol table, dictionary and optional phrase readings named by
    /// `config`. The romanization client is only built in Cantonese mode.
    pub fn from_config(
        config: &FrontendConfig,
        tokenizer: Box<dyn SubwordTokenizer>,
    ) -> Result<Self> {
        let start = Instant::now();

        let symbols = SymbolTable::load(&config.symbol_table_path)?;
        let dictionary = EnglishDictionary::load(&config.dictionary_path)?;

        let mut processor = TextProcessor::new(config.mode, tokenizer, dictionary)
            .with_unusable_word(config.unusable_word);
        if let Some(path) = &config.phrase_dictionary_path {
            processor = processor.with_lexicon(MandarinLexicon::load(path)?);
        }
        if config.mode == LangMode::Cantonese {
            let client = jyutping_client::Client::new(config.romanizer.client_config())?;
            processor = processor.with_romanizer(Box::new(client));
        }

        info!(
            "{:?} front-end ready in {:?}",
            config.mode,
            start.elapsed()
        );

        Ok(Self::new(processor, symbols)
            .with_tone_offset(config.tone_offset)
            .with_placeholder_dim(config.placeholder_dim))
    }

    /// Like [`Frontend::from_config`], with the tokenizer read from `tokenizer_path`.
    pub fn load(config: &FrontendConfig) -> Result<Self> {
        let tokenizer = load_tokenizer(&config.tokenizer_path)?;
        Self::from_config(config, Box::new(tokenizer))
    }

    pub fn mode(&self) -> LangMode {
        self.processor.mode
    }

    pub fn processor(&self) -> &TextProcessor {
        &self.processor
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn mix_g2p(&self, text: &str) -> Result<MixedPhonemes> {
        self.processor.mix_g2p(text)
    }

    /// Phonemizes and embeds `text`, returning model-ready inputs.
    pub fn prepare(
        &self,
        text: &str,
        embedder: &dyn Embedder,
        params: &SynthesisParams,
    ) -> Result<AcousticInputs> {
        check_speed(params)?;
        self.prepare_phonemes(self.mix_g2p(text)?, embedder, params)
    }

    /// [`Frontend::prepare`] for phonemes the caller already has from
    /// [`Frontend::mix_g2p`].
    pub fn prepare_phonemes(
        &self,
        phonemes: MixedPhonemes,
        embedder: &dyn Embedder,
        params: &SynthesisParams,
    ) -> Result<AcousticInputs> {
        check_speed(params)?;
        let MixedPhonemes {
            seq,
            normalized_text,
        } = phonemes;

        // Phones the acoustic vocabulary lacks are dropped together with their
        // tone and their share of the owning unit's duration
        let (seq, dropped) = self.symbols.retain_known(&seq);
        if !dropped.is_empty() {
            warn!("phones not in symbol table, dropped: {dropped:?}");
        }

        let phone_ids = self.symbols.map_phones(&seq.phones);
        let tone_ids = map_tones(&seq.tones, self.tone_offset);
        let durations = map_durations(&seq.word2ph);

        let total: usize = durations.iter().sum();
        if phone_ids.len() != tone_ids.len() || phone_ids.len() != total {
            return Err(FrontendError::shape_mismatch(
                "phone ids",
                &[total, total],
                &[phone_ids.len(), tone_ids.len()],
            ));
        }

        let start = Instant::now();
        let unit_features = embedder.embed(&normalized_text)?;
        debug!(
            "embedded {:?} into {:?} in {:?}",
            normalized_text,
            unit_features.dim(),
            start.elapsed()
        );

        let phone_features = expand_and_align(unit_features.view(), &durations)?;
        let ja_bert = transpose_with_batch(&phone_features)?;
        let bert = placeholder(self.placeholder_dim, phone_ids.len());

        debug!("phone_ids: {phone_ids:?}");
        debug!("tone_ids: {tone_ids:?}");
        debug!("durations: {durations:?}");

        Ok(AcousticInputs {
            phone_ids,
            tone_ids,
            durations,
            speaker_id: params.speaker_id,
            bert,
            ja_bert,
            sdp_ratio: params.sdp_ratio,
            noise_scale: params.noise_scale,
            noise_scale_w: params.noise_scale_w,
            length_scale: params.length_scale(),
            normalized_text,
        })
    }

    /// Runs [`Frontend::prepare`] and the acoustic model. Samples are at
    /// [`OUTPUT_SAMPLE_RATE`].
    pub fn synthesize(
        &self,
        text: &str,
        embedder: &dyn Embedder,
        model: &dyn AcousticModel,
        params: &SynthesisParams,
    ) -> Result<Vec<f32>> {
        let inputs = self.prepare(text, embedder, params)?;

        let start = Instant::now();
        let samples = model.infer(&inputs)?;
        info!(
            "synthesized {} samples ({:.2}s audio) in {:?}",
            samples.len(),
            samples.len() as f32 / OUTPUT_SAMPLE_RATE as f32,
            start.elapsed()
        );
        Ok(samples)
    }
}

fn check_speed(params: &SynthesisParams) -> Result<()> {
    if params.speed > 0.0 {
        Ok(())
    } else {
        Err(FrontendError::MalformedInput(format!(
            "speed must be greater than 0, got {}",
            params.speed
        )))
    }
}
