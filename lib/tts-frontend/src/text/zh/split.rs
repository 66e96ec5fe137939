// Longest initials first so that `zh` never matches as `z`.
const INITIALS: [&str; 21] = [
    "zh", "ch", "sh", "b", "p", "m", "f", "d", "t", "n", "l", "g", "k", "h", "j", "q", "x", "r",
    "z", "c", "s",
];

/// Returns the initial consonant of a pinyin syllable, or "" for zero-initial syllables.
pub fn get_initial(syllable: &str) -> &'static str {
    INITIALS
        .iter()
        .find(|i| syllable.starts_with(*i))
        .copied()
        .unwrap_or("")
}

fn palatal_u(accented: char) -> Option<char> {
    match accented {
        'ū' => Some('ǖ'),
        'ú' => Some('ǘ'),
        'ǔ' => Some('ǚ'),
        'ù' => Some('ǜ'),
        _ => None,
    }
}

// yu -> v, yi -> i, y -> i, wu -> u, w -> u
fn handle_yw(syllable: &str) -> String {
    if let Some(rest) = syllable.strip_prefix("yu") {
        format!("v{rest}")
    } else if let Some(rest) = syllable.strip_prefix("yi") {
        format!("i{rest}")
    } else if let Some(rest) = syllable.strip_prefix('y') {
        format!("i{rest}")
    } else if let Some(rest) = syllable.strip_prefix("wu") {
        format!("u{rest}")
    } else if let Some(rest) = syllable.strip_prefix('w') {
        format!("u{rest}")
    } else {
        syllable.to_string()
    }
}

/// Returns the final of a syllable, tone digit still attached.
pub fn get_final(syllable: &str) -> String {
    let initial = get_initial(syllable);
    if initial.is_empty() {
        return handle_yw(syllable);
    }

    let rest = &syllable[initial.len()..];
    if matches!(initial, "j" | "q" | "x") {
        // jū -> ǖ
        let mut chars = rest.chars();
        if let (Some(c), None) = (chars.next(), chars.next())
            && let Some(v) = palatal_u(c)
        {
            return v.to_string();
        }

        // ju -> v, ju1 -> v1
        if let Some(tone) = rest.strip_prefix('u')
            && tone.chars().count() <= 1
            && tone.chars().all(|c| c.is_ascii_digit())
        {
            return format!("v{tone}");
        }
    }

    rest.to_string()
}

/// Splits a syllable into `(initial, final, tone)`. Tone 0 means unmarked.
pub fn split_zh_ph(syllable: &str) -> (&'static str, String, i32) {
    let initial = get_initial(syllable);
    let mut final_ = get_final(syllable);

    let tone = match final_.chars().last() {
        Some(c) if c.is_ascii_digit() => {
            final_.pop();
            c as i32 - '0' as i32
        }
        _ => 0,
    };

    (initial, final_, tone)
}
