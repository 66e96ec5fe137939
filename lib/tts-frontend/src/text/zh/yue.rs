use {
    crate::{Result, text::PhonemeSequence},
    jyutping_client::{CharRecord, Client, RomanizeRequest, RomanizeResponse},
    log::debug,
    std::time::Instant,
};

/// External Cantonese romanization, one round trip per batch of sentences.
pub trait Romanizer: Send + Sync {
    fn romanize(&self, request: &RomanizeRequest) -> jyutping_client::Result<RomanizeResponse>;
}

impl Romanizer for Client {
    fn romanize(&self, request: &RomanizeRequest) -> jyutping_client::Result<RomanizeResponse> {
        Client::romanize(self, request)
    }
}

/// Normalizes Chinese text to the script variant the romanizer expects.
pub trait ScriptConverter: Send + Sync {
    fn convert(&self, text: &str) -> String;
}

/// Simplified to Hong Kong traditional.
#[derive(Debug, Default, Clone, Copy)]
pub struct HongKongConverter;

impl ScriptConverter for HongKongConverter {
    fn convert(&self, text: &str) -> String {
        zhconv::zhconv(text, zhconv::Variant::ZhHK)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityConverter;

impl ScriptConverter for IdentityConverter {
    fn convert(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Turns romanized records into phones. Each syllable is one unit carrying its
/// initial, nucleus and coda (0 to 3 phones) under the syllable's tone.
pub fn records_to_phonemes(records: &[CharRecord]) -> PhonemeSequence {
    let mut seq = PhonemeSequence::with_capacity(records.len() * 3);

    for record in records {
        if record.initial_list.is_empty() {
            debug!("no jyutping for {:?}", record.char);
            for _ in record.char.chars() {
                seq.push_unit(std::iter::empty::<&str>(), 0);
            }
            continue;
        }

        for syllable in &record.initial_list {
            seq.push_unit(syllable.parts(), syllable.tone);
        }
    }

    seq
}

/// Phonemizes a single Cantonese sentence with one romanizer call.
pub fn phonemize_cantonese(
    text: &str,
    romanizer: &dyn Romanizer,
    converter: &dyn ScriptConverter,
) -> Result<PhonemeSequence> {
    let mut request = RomanizeRequest::new();
    request.insert(0, converter.convert(text));

    let start = Instant::now();
    let mut response = romanizer.romanize(&request)?;
    debug!("romanizer round trip: {:?}", start.elapsed());

    let seq = records_to_phonemes(&response.take("0")?);
    debug!("cantonese phones: {:?}", seq.phones);
    debug!("cantonese word2ph: {:?}", seq.word2ph);
    Ok(seq)
}
