use chinese_number::{ChineseCase, ChineseCountMethod, ChineseVariant, NumberToChinese};
use log::warn;

#[inline]
fn digit_to_zh(c: char) -> Option<&'static str> {
    match c {
        '0' => Some("零"),
        '1' => Some("一"),
        '2' => Some("二"),
        '3' => Some("三"),
        '4' => Some("四"),
        '5' => Some("五"),
        '6' => Some("六"),
        '7' => Some("七"),
        '8' => Some("八"),
        '9' => Some("九"),
        _ => None,
    }
}

/// Reads each digit on its own: `2024` -> `二零二四`. Non-digits are kept as is.
pub fn read_digits(digits: &str) -> String {
    let mut dst_string = String::with_capacity(digits.len() * 3);
    for c in digits.chars() {
        match digit_to_zh(c) {
            Some(txt) => dst_string.push_str(txt),
            None => dst_string.push(c),
        }
    }
    dst_string
}

/// Spells an ASCII digit run as a simplified Chinese numeral. Runs too long for a
/// `u64` are read digit by digit.
pub fn digits_to_chinese(digits: &str) -> String {
    let Ok(num) = digits.parse::<u64>() else {
        warn!("{digits:?} is not a u64, reading digit by digit");
        return read_digits(digits);
    };

    match num.to_chinese(
        ChineseVariant::Simple,
        ChineseCase::Lower,
        ChineseCountMethod::TenThousand,
    ) {
        Ok(txt) => txt,
        Err(e) => {
            warn!("failed to spell {num}: {e}");
            read_digits(digits)
        }
    }
}
