mod phrase;
mod split;
pub mod yue;

use {crate::text::PhonemeSequence, log::debug};
pub use {
    phrase::{MandarinLexicon, romanize_char},
    split::{get_final, get_initial, split_zh_ph},
};

/// Appends the phones of one syllable as a single unit.
pub fn push_syllable(seq: &mut PhonemeSequence, syllable: &str) {
    let (initial, final_, tone) = split_zh_ph(syllable);
    let parts = [initial, final_.as_str()];
    seq.push_unit(parts.into_iter().filter(|p| !p.is_empty()), tone);
}

/// One unit per source character; word2ph entries are 0, 1 or 2.
pub fn phonemize_mandarin(text: &str, lexicon: &MandarinLexicon) -> PhonemeSequence {
    let syllables = lexicon.romanize(text);
    let mut seq = PhonemeSequence::with_capacity(syllables.len() * 2);

    for (c, syllable) in text.chars().zip(&syllables) {
        match syllable {
            Some(s) => push_syllable(&mut seq, s),
            None => {
                debug!("no pinyin for {c:?}");
                seq.push_unit(std::iter::empty::<&str>(), 0);
            }
        }
    }

    debug!("mandarin phones: {:?}", seq.phones);
    debug!("mandarin word2ph: {:?}", seq.word2ph);
    seq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phonemize_mandarin() {
        let seq = phonemize_mandarin("中国", &MandarinLexicon::default());
        assert_eq!(seq.phones, ["zh", "ong", "g", "uo"]);
        assert_eq!(seq.tones, [1, 1, 2, 2]);
        assert_eq!(seq.word2ph, [2, 2]);
    }

    #[test]
    fn test_zero_initial_and_yw() {
        let seq = phonemize_mandarin("一五鱼", &MandarinLexicon::default());
        assert_eq!(seq.phones, ["i", "u", "v"]);
        assert_eq!(seq.tones, [1, 3, 2]);
        assert_eq!(seq.word2ph, [1, 1, 1]);
    }

    #[test]
    fn test_polyphone_phones() {
        let lexicon = MandarinLexicon::default();

        let seq = phonemize_mandarin("银行", &lexicon);
        assert_eq!(seq.phones, ["in", "h", "ang"]);
        assert_eq!(seq.tones, [2, 2, 2]);
        assert_eq!(seq.word2ph, [1, 2]);

        let seq = phonemize_mandarin("长大", &lexicon);
        assert_eq!(seq.phones, ["zh", "ang", "d", "a"]);
        assert_eq!(seq.tones, [3, 3, 4, 4]);
        assert_eq!(seq.word2ph, [2, 2]);
    }

    #[test]
    fn test_unreadable_char_counts_zero() {
        let mut seq = PhonemeSequence::default();
        push_syllable(&mut seq, "a");
        assert_eq!(seq.word2ph, [1]);
        assert_eq!(seq.tones, [0]);

        let seq = phonemize_mandarin("中x", &MandarinLexicon::default());
        assert_eq!(seq.word2ph, [2, 0]);
        assert!(seq.is_consistent());
    }
}
