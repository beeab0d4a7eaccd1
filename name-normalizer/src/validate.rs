//! The deterministic cleanup + pre-validation pipeline.

use unicode_normalization::UnicodeNormalization;

use crate::patterns::{
    DIGITS_ONLY, EXCESSIVE_REPEAT, HAS_LETTER, JUNK_PATTERNS, PROBLEM_SYMBOLS, PUNCTUATION_ONLY,
    PUNCT_RUNS, WHITESPACE_RUNS,
};

const MIN_LENGTH: usize = 3;
const MAX_LENGTH: usize = 500;
const SUSPICIOUS_SYMBOL_RATIO: f64 = 1.0 / 3.0;

/// Outcome of running a raw name through the cleanup/validation pipeline.
/// Never an `Err` for ordinary invalid input — that's expected data, tagged
/// here rather than raised as a failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub cleaned_name: String,
    pub is_valid: bool,
    pub reason: String,
    pub confidence: f64,
}

impl ValidationOutcome {
    fn reject(cleaned_name: String, reason: &'static str) -> Self {
        Self {
            cleaned_name,
            is_valid: false,
            reason: reason.to_string(),
            confidence: 0.0,
        }
    }
}

/// Run the full pipeline on a raw name.
pub fn normalize(raw: &str) -> ValidationOutcome {
    // Step 1: NFC-normalize, trim, strip BOM, tabs -> spaces, collapse whitespace.
    let mut s: String = raw.nfc().collect();
    s = s.replace('\u{FEFF}', "");
    s = s.replace('\t', " ");
    s = WHITESPACE_RUNS.replace_all(s.trim(), " ").to_string();

    // Step 2: length gating.
    let mut confidence = 1.0;
    let mut soft_reason: Option<&'static str> = None;
    let char_count = s.chars().count();
    if char_count == 0 {
        return ValidationOutcome::reject(s, "empty_string");
    }
    if char_count < MIN_LENGTH {
        return ValidationOutcome::reject(s, "too_short");
    }
    if char_count > MAX_LENGTH {
        s = s.chars().take(MAX_LENGTH).collect();
        confidence *= 0.9;
        soft_reason = Some("truncated");
    }

    // Step 3: UTF-8 validity is guaranteed by `&str`; see `normalize_bytes`
    // for the fallible entry point used on raw byte input.

    // Step 4: junk/placeholder patterns.
    if JUNK_PATTERNS.iter().any(|re| re.is_match(&s)) {
        return ValidationOutcome::reject(s, "test_pattern_detected");
    }

    // Step 5: digit-only / punctuation-only rejection, one shared reason code.
    if DIGITS_ONLY.is_match(&s) || PUNCTUATION_ONLY.is_match(&s) {
        return ValidationOutcome::reject(s, "only_numbers_or_special_chars");
    }

    // Step 6: excessive repeating character.
    if EXCESSIVE_REPEAT.is_match(&s) {
        return ValidationOutcome::reject(s, "excessive_repeating_chars");
    }

    // Step 7: deep cleanup.
    s.retain(|c| !PROBLEM_SYMBOLS.contains(&c));
    s = PUNCT_RUNS
        .replace_all(&s, |caps: &regex::Captures| caps[0][..1].to_string())
        .to_string();
    s = s.replace("...", "…").replace("!!", "!").replace("??", "?");
    s = WHITESPACE_RUNS.replace_all(s.trim(), " ").to_string();

    // Step 8: must contain at least one letter.
    if !HAS_LETTER.is_match(&s) {
        return ValidationOutcome::reject(s, "no_letters");
    }

    // Step 9: suspicious-symbol ratio penalty.
    let total = s.chars().count().max(1) as f64;
    let suspicious = s
        .chars()
        .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
        .count() as f64;
    if suspicious / total > SUSPICIOUS_SYMBOL_RATIO {
        confidence *= 0.7;
    }

    ValidationOutcome {
        cleaned_name: s,
        is_valid: true,
        reason: soft_reason.unwrap_or("ok").to_string(),
        confidence,
    }
}

/// Byte-oriented entry point performing the explicit UTF-8 validity check
/// before delegating to [`normalize`].
pub fn normalize_bytes(raw: &[u8]) -> Result<ValidationOutcome, crate::NormalizationError> {
    let s = std::str::from_utf8(raw).map_err(|_| crate::NormalizationError::InvalidUtf8)?;
    Ok(normalize(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_string() {
        let r = normalize("");
        assert!(!r.is_valid);
        assert_eq!(r.reason, "empty_string");
    }

    #[test]
    fn rejects_too_short() {
        let r = normalize("АБ");
        assert!(!r.is_valid);
        assert_eq!(r.reason, "too_short");
    }

    #[test]
    fn truncates_and_penalizes_overlong_input() {
        let long = "А".repeat(600);
        let r = normalize(&long);
        assert!(r.is_valid);
        assert_eq!(r.cleaned_name.chars().count(), MAX_LENGTH);
        assert_eq!(r.reason, "truncated");
        assert!((r.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn rejects_junk_patterns_in_latin_and_cyrillic() {
        assert!(!normalize("TEST company ltd").is_valid);
        assert!(!normalize("Черновик ООО Ромашка").is_valid);
        assert!(!normalize("[DELETE] ООО Вектор").is_valid);
    }

    #[test]
    fn rejects_digit_only_and_punctuation_only() {
        assert_eq!(normalize("1234567890").reason, "only_numbers_or_special_chars");
        assert_eq!(normalize("--- *** ---").reason, "only_numbers_or_special_chars");
    }

    #[test]
    fn rejects_excessive_repeats() {
        let r = normalize("ООО ааааааааааа");
        assert!(!r.is_valid);
        assert_eq!(r.reason, "excessive_repeating_chars");
    }

    #[test]
    fn deep_cleanup_strips_problem_symbols_and_collapses_punct_runs() {
        let r = normalize("ООО <Ромашка>,,, ~Торг~");
        assert!(r.is_valid);
        assert!(!r.cleaned_name.contains(['<', '>', '~']));
        assert!(!r.cleaned_name.contains(",,"));
    }

    #[test]
    fn accepts_clean_name_with_full_confidence() {
        let r = normalize("ООО Ромашка Торговый Дом");
        assert!(r.is_valid);
        assert_eq!(r.reason, "ok");
        assert_eq!(r.confidence, 1.0);
    }

    #[test]
    fn suspicious_symbol_ratio_penalizes_confidence() {
        let r = normalize("А#$%Б^&*В()_");
        assert!(r.confidence < 1.0);
    }

    #[test]
    fn rejects_invalid_utf8_bytes() {
        let bad = vec![0x41, 0xFF, 0xFE, 0x42];
        assert!(normalize_bytes(&bad).is_err());
    }
}
