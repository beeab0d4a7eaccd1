//! Compiled pattern tables shared by the pipeline, built once per process.

use std::sync::LazyLock;

use regex::Regex;

/// Markers that flag a name as placeholder/test data rather than a real
/// counterparty, in both Latin and Cyrillic forms.
pub(crate) static JUNK_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    let sources = [
        r"(?i)\[delete\]",
        r"(?i)\btest\b",
        r"(?i)\bdraft\b",
        r"(?i)\buntitled\b",
        r"(?i)x{3,}",
        r"={3,}",
        r"-{3,}",
        r"#{3,}",
        r"(?i)\bsample\b",
        r"(?i)\bdeprecated\b",
        r"(?i)тест(ов\w*)?",
        r"(?i)черновик",
        r"(?i)удалить",
        r"(?i)образец",
        r"(?i)устарел\w*",
        r"(?i)не\s*использовать",
    ];
    sources
        .iter()
        .map(|p| Regex::new(p).expect("static junk pattern must compile"))
        .collect()
});

/// `\p{L}`: at least one Unicode letter is required for a name to be valid.
pub(crate) static HAS_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{L}").expect("static letter pattern must compile"));

/// Digit-only input.
pub(crate) static DIGITS_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("static digits-only pattern must compile"));

/// Punctuation/symbol-only input, no letters or digits at all.
pub(crate) static PUNCTUATION_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\p{L}0-9]+$").expect("static punctuation-only pattern must compile")
});

/// A code point repeated 10 or more times in a row.
pub(crate) static EXCESSIVE_REPEAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(.)\1{9,}").expect("static excessive-repeat pattern must compile")
});

/// Runs of `,`/`;`/`:` to collapse to a single instance.
pub(crate) static PUNCT_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;:]{2,}").expect("static punct-run pattern must compile"));

/// Whitespace runs to collapse to a single space.
pub(crate) static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static whitespace pattern must compile"));

/// Symbols removed entirely during deep cleanup.
pub(crate) const PROBLEM_SYMBOLS: &[char] =
    &['\\', '|', '~', '`', '^', '{', '}', '[', ']', '<', '>'];
