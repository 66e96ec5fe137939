use {
    crate::Result,
    derivative::Derivative,
    derive_setters::Setters,
    ndarray::{Array2, Array3},
    serde::{Deserialize, Serialize},
};

/// Sample rate of the audio the acoustic model returns.
pub const OUTPUT_SAMPLE_RATE: u32 = 24000;

/// Produces one feature vector per linguistic unit of `text`.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Array2<f32>>;
}

/// Turns assembled inputs into raw samples at [`OUTPUT_SAMPLE_RATE`].
pub trait AcousticModel: Send + Sync {
    fn infer(&self, inputs: &AcousticInputs) -> Result<Vec<f32>>;
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct SynthesisParams {
    pub speaker_id: i64,

    #[derivative(Default(value = "1.0"))]
    pub speed: f32, // greater than 0.0

    #[derivative(Default(value = "0.2"))]
    pub sdp_ratio: f32,

    #[derivative(Default(value = "0.6"))]
    pub noise_scale: f32,

    pub noise_scale_w: f32,
}

impl SynthesisParams {
    pub fn length_scale(&self) -> f32 {
        1.0 / self.speed
    }
}

/// Everything one utterance hands to the acoustic model.
#[derive(Debug, Clone)]
pub struct AcousticInputs {
    /// Blank-interleaved phone ids, `[L]`.
    pub phone_ids: Vec<i64>,
    /// Blank-interleaved tone ids, `[L]`.
    pub tone_ids: Vec<i64>,
    /// Per-unit durations; they sum to `L`.
    pub durations: Vec<usize>,
    pub speaker_id: i64,
    /// Zero channel, `[1, placeholder_dim, L]`.
    pub bert: Array3<f32>,
    /// Phone-level features, `[1, D, L]`.
    pub ja_bert: Array3<f32>,
    pub sdp_ratio: f32,
    pub noise_scale: f32,
    pub noise_scale_w: f32,
    pub length_scale: f32,
    pub normalized_text: String,
}

impl AcousticInputs {
    pub fn len(&self) -> usize {
        self.phone_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phone_ids.is_empty()
    }
}
