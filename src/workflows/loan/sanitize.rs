//! Keystroke-level input normalization for wizard form fields.
//!
//! Every sanitizer is a total, pure function over the raw widget value and is
//! idempotent: running one twice yields the same string as running it once.
//! Only the per-digit Aadhaar sanitizer surfaces a notice; the rest strip
//! disallowed characters silently.

use std::time::Duration;

pub const PAN_LEN: usize = 10;
pub const IFSC_LEN: usize = 11;
pub const GST_LEN: usize = 15;

/// Transient message shown when a keystroke is rejected. The rendering layer
/// clears it once `clears_after` has elapsed; it never blocks further typing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatNotice {
    pub message: &'static str,
    pub clears_after: Duration,
}

/// Outcome of feeding one keystroke into an Aadhaar digit slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigitKeystroke {
    Accepted(u8),
    /// Empty input, e.g. the widget was cleared.
    Ignored,
    Rejected(FormatNotice),
}

/// Aadhaar slots accept exactly one digit; anything else earns a notice.
pub fn aadhaar_digit(raw: &str, notice_ttl: Duration) -> DigitKeystroke {
    let Some(ch) = raw.chars().last() else {
        return DigitKeystroke::Ignored;
    };

    match ch.to_digit(10) {
        Some(digit) => DigitKeystroke::Accepted(digit as u8),
        None => DigitKeystroke::Rejected(FormatNotice {
            message: "Only digits 0-9 are allowed",
            clears_after: notice_ttl,
        }),
    }
}

/// Strip everything but ASCII digits, silently.
pub fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Digits-only with a hard length cap (mobile numbers, pincodes).
pub fn digits_capped(raw: &str, max: usize) -> String {
    raw.chars().filter(char::is_ascii_digit).take(max).collect()
}

/// Uppercased alphanumerics, truncated to `max` (PAN, IFSC, GST formats).
pub fn uppercase_alnum(raw: &str, max: usize) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_uppercase())
        .take(max)
        .collect()
}

pub fn pan(raw: &str) -> String {
    uppercase_alnum(raw, PAN_LEN)
}

pub fn ifsc(raw: &str) -> String {
    uppercase_alnum(raw, IFSC_LEN)
}

pub fn gst(raw: &str) -> String {
    uppercase_alnum(raw, GST_LEN)
}

/// Person names keep letters and spaces only.
pub fn name(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_ascii_alphabetic() || *ch == ' ')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_millis(2000);

    fn printable_ascii() -> impl Iterator<Item = char> {
        (0x20u8..0x7f).map(char::from)
    }

    #[test]
    fn aadhaar_digit_accepts_digits() {
        assert_eq!(aadhaar_digit("7", TTL), DigitKeystroke::Accepted(7));
        // Widgets may hand back the whole slot value; the last keystroke wins.
        assert_eq!(aadhaar_digit("37", TTL), DigitKeystroke::Accepted(7));
    }

    #[test]
    fn aadhaar_digit_rejects_with_notice() {
        match aadhaar_digit("x", TTL) {
            DigitKeystroke::Rejected(notice) => {
                assert_eq!(notice.message, "Only digits 0-9 are allowed");
                assert_eq!(notice.clears_after, TTL);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn aadhaar_digit_ignores_empty_input() {
        assert_eq!(aadhaar_digit("", TTL), DigitKeystroke::Ignored);
    }

    #[test]
    fn digits_strip_silently() {
        assert_eq!(digits("98a76-54 321b0"), "9876543210");
        assert_eq!(digits_capped("12345678901234", 10), "1234567890");
    }

    #[test]
    fn uppercase_alnum_truncates_and_uppercases() {
        assert_eq!(pan("abcde1234f!!"), "ABCDE1234F");
        assert_eq!(pan("abcde1234fghij"), "ABCDE1234F");
        assert_eq!(ifsc("sbin-0001234xyz"), "SBIN0001234");
        assert_eq!(gst("27aapfu0939f1zv##"), "27AAPFU0939F1ZV");
    }

    #[test]
    fn name_keeps_letters_and_spaces() {
        assert_eq!(name("Asha R. Devi-3"), "Asha R Devi");
    }

    #[test]
    fn string_sanitizers_are_idempotent_over_printable_ascii() {
        let sample: String = printable_ascii().collect();
        let sanitizers: [fn(&str) -> String; 6] = [
            digits,
            |raw| digits_capped(raw, 10),
            pan,
            ifsc,
            gst,
            name,
        ];
        for sanitize in sanitizers {
            let once = sanitize(&sample);
            assert_eq!(sanitize(&once), once);
        }

        for ch in printable_ascii() {
            let raw = ch.to_string();
            for sanitize in sanitizers {
                let once = sanitize(&raw);
                assert_eq!(sanitize(&once), once);
            }
        }
    }
}
