// cargo run -p tts-frontend --example frontend_demo -- frontend.toml "你好呀，we ship 2 crates。"

use ndarray::Array2;
use tts_frontend::{Embedder, Frontend, FrontendConfig, Result as FrontendResult};

const TEXT: &str = "你好呀，我们是一群追逐梦想的人。Rust makes 2 things easy!";

/// Stand-in for a real embedding model: one zero vector per linguistic unit.
struct ZeroEmbedder {
    units: usize,
}

impl Embedder for ZeroEmbedder {
    fn embed(&self, _text: &str) -> FrontendResult<Array2<f32>> {
        Ok(Array2::zeros((self.units, 1024)))
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => FrontendConfig::load(path)?,
        None => FrontendConfig::default(),
    };
    let text = args.next().unwrap_or_else(|| TEXT.to_string());

    let frontend = Frontend::load(&config)?;
    let mixed = frontend.mix_g2p(&text)?;
    println!("normalized: {}", mixed.normalized_text);
    println!("phones:     {:?}", mixed.seq.phones);
    println!("tones:      {:?}", mixed.seq.tones);
    println!("word2ph:    {:?}", mixed.seq.word2ph);

    let embedder = ZeroEmbedder {
        units: mixed.seq.word2ph.len(),
    };
    let inputs = frontend.prepare_phonemes(mixed, &embedder, &config.synthesis)?;
    println!("phone_ids:  {:?}", inputs.phone_ids);
    println!("tone_ids:   {:?}", inputs.tone_ids);
    println!("ja_bert:    {:?}", inputs.ja_bert.dim());

    Ok(())
}
