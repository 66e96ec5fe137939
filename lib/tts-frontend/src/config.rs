use {
    crate::{FrontendError, LangMode, Result, SynthesisParams, UnusableWordPolicy},
    derivative::Derivative,
    derive_setters::Setters,
    jyutping_client::{ClientConfig, DEFAULT_URL, MAX_TIMEOUT},
    serde::{Deserialize, Serialize},
    std::{
        path::{Path, PathBuf},
        time::Duration,
    },
};

#[derive(Serialize, Deserialize, Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct FrontendConfig {
    pub mode: LangMode,

    #[derivative(Default(value = "\"zh_x_symbolid.json\".into()"))]
    pub symbol_table_path: PathBuf,

    #[derivative(Default(value = "\"cmudict.dict\".into()"))]
    pub dictionary_path: PathBuf,

    #[derivative(Default(value = "\"tokenizer.json\".into()"))]
    pub tokenizer_path: PathBuf,

    /// Extra Mandarin phrase readings on top of the built-in ones.
    pub phrase_dictionary_path: Option<PathBuf>,

    #[derivative(Default(value = "20"))]
    pub tone_offset: i32,

    pub unusable_word: UnusableWordPolicy,

    #[derivative(Default(value = "1024"))]
    pub placeholder_dim: usize,

    pub romanizer: RomanizerConfig,

    pub synthesis: SynthesisParams,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct RomanizerConfig {
    #[derivative(Default(value = "DEFAULT_URL.to_string()"))]
    pub url: String,

    pub token: String,

    #[derivative(Default(value = "10"))]
    pub timeout_secs: u64,

    #[derivative(Default(value = "\"tts-frontend\".to_string()"))]
    pub user_agent: String,
}

impl RomanizerConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            url: self.url.clone(),
            token: self.token.clone(),
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl FrontendConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        std::fs::read_to_string(path)
            .map_err(FrontendError::from)
            .and_then(|content| Self::from_toml_str(&content))
            .map_err(|e| FrontendError::ResourceLoad {
                what: "config",
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    fn validate(&mut self) -> Result<()> {
        let max_secs = MAX_TIMEOUT.as_secs();
        if self.romanizer.timeout_secs == 0 || self.romanizer.timeout_secs > max_secs {
            log::warn!(
                "romanizer timeout {}s out of range, using {max_secs}s",
                self.romanizer.timeout_secs
            );
            self.romanizer.timeout_secs = max_secs;
        }

        if !(self.synthesis.speed > 0.0) {
            return Err(FrontendError::MalformedInput(format!(
                "speed must be greater than 0, got {}",
                self.synthesis.speed
            )));
        }

        Ok(())
    }
}
