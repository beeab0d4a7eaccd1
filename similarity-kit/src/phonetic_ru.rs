//! Cyrillic phonetic codes: a Soundex-style 4-character code and a
//! Metaphone-style consonant-folding code. Neither aims for
//! linguistic completeness, only for collapsing common transliteration and
//! typo variance (е/ё, г/х, ж/ш/щ, voiced/unvoiced pairs) onto the same key.

use crate::common::nfc;
use crate::edit_distance::{hamming, levenshtein};

/// Fixed consonant → digit table, grouped by place/manner of articulation
/// the way the classic English Soundex groups B/F/P/V together.
fn consonant_group(c: char) -> Option<u8> {
    match c {
        'б' | 'п' | 'в' | 'ф' => Some(1),
        'д' | 'т' => Some(2),
        'з' | 'с' | 'ц' | 'ч' => Some(3),
        'ж' | 'ш' | 'щ' => Some(3),
        'г' | 'к' | 'х' => Some(4),
        'м' | 'н' => Some(5),
        'л' | 'р' => Some(6),
        'й' => Some(7),
        _ => None,
    }
}

fn is_vowel_or_silent(c: char) -> bool {
    matches!(
        c,
        'а' | 'е' | 'ё' | 'и' | 'о' | 'у' | 'ы' | 'э' | 'ю' | 'я' | 'ь' | 'ъ'
    )
}

/// A 4-character Soundex-style code: the first letter, followed by up to
/// three digits from [`consonant_group`], with vowels/silent letters
/// skipped and consecutive equal digits collapsed, zero-padded to length 4.
pub fn soundex_ru(s: &str) -> String {
    let chars: Vec<char> = nfc(s)
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect();
    if chars.is_empty() {
        return "0000".to_string();
    }

    let first = chars[0];
    let mut codes: Vec<u8> = Vec::new();
    let mut last_group = consonant_group(first);
    for &c in &chars[1..] {
        match consonant_group(c) {
            Some(group) => {
                if last_group != Some(group) {
                    codes.push(group);
                }
                last_group = Some(group);
            }
            None => {
                if is_vowel_or_silent(c) {
                    last_group = None;
                }
            }
        }
    }
    codes.truncate(3);

    let mut out = String::with_capacity(4);
    out.push(first);
    for d in &codes {
        out.push((b'0' + d) as char);
    }
    while out.chars().count() < 4 {
        out.push('0');
    }
    out
}

/// Hamming similarity between two Soundex codes (both always length 4, so
/// this never fails on unequal length).
pub fn similarity_soundex(a: &str, b: &str) -> f64 {
    let ca = soundex_ru(a);
    let cb = soundex_ru(b);
    hamming(&ca, &cb)
        .map(|d| 1.0 - d as f64 / 4.0)
        .unwrap_or(0.0)
}

/// Devoice/defricate a consonant into a representative ASCII letter, folding
/// voiced/unvoiced pairs (б/п, в/ф, г/к, д/т, ж/ш, з/с) and collapsing the
/// и/ш/щ sibilant family and ц/ч affricates onto one symbol each.
fn fold_consonant(c: char) -> Option<char> {
    match c {
        'б' | 'п' => Some('P'),
        'в' | 'ф' => Some('F'),
        'г' | 'к' | 'х' => Some('K'),
        'д' | 'т' => Some('T'),
        'ж' | 'ш' | 'щ' => Some('S'),
        'з' | 'с' | 'ц' => Some('C'),
        'ч' => Some('H'),
        'л' => Some('L'),
        'р' => Some('R'),
        'м' => Some('M'),
        'н' => Some('N'),
        'й' => Some('J'),
        _ => None,
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'а' | 'е' | 'ё' | 'и' | 'о' | 'у' | 'ы' | 'э' | 'ю' | 'я')
}

/// A consonant-skeleton code: keeps a marker for a leading vowel, drops every
/// other vowel and silent letter, folds consonants through
/// [`fold_consonant`], and collapses consecutive repeats of the same symbol.
pub fn metaphone_ru(s: &str) -> String {
    let chars: Vec<char> = nfc(s)
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect();
    let mut out = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if c == 'ь' || c == 'ъ' {
            continue;
        }
        if is_vowel(c) {
            if i == 0 {
                push_if_new(&mut out, 'A');
            }
            continue;
        }
        match fold_consonant(c) {
            Some(code) => push_if_new(&mut out, code),
            None => push_if_new(&mut out, c.to_ascii_uppercase()),
        }
    }
    out
}

fn push_if_new(out: &mut String, c: char) {
    if out.chars().last() != Some(c) {
        out.push(c);
    }
}

/// Levenshtein-based similarity between two Metaphone-style codes.
pub fn similarity_metaphone(a: &str, b: &str) -> f64 {
    let ca = metaphone_ru(a);
    let cb = metaphone_ru(b);
    if ca.is_empty() && cb.is_empty() {
        return 1.0;
    }
    if ca.is_empty() || cb.is_empty() {
        return 0.0;
    }
    let dist = levenshtein(&ca, &cb) as f64;
    let max_len = ca.chars().count().max(cb.chars().count()) as f64;
    1.0 - dist / max_len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soundex_is_always_four_chars() {
        assert_eq!(soundex_ru("Иванов").chars().count(), 4);
        assert_eq!(soundex_ru("Ян").chars().count(), 4);
        assert_eq!(soundex_ru("").chars().count(), 4);
    }

    #[test]
    fn soundex_collapses_similar_sounding_names() {
        assert_eq!(soundex_ru("Иванов"), soundex_ru("Иванова"));
    }

    #[test]
    fn metaphone_folds_voiced_unvoiced_variants() {
        assert_eq!(metaphone_ru("Бахметьев"), metaphone_ru("Пахметьев"));
    }

    #[test]
    fn similarity_self_is_one() {
        assert_eq!(similarity_soundex("Газпром", "Газпром"), 1.0);
        assert_eq!(similarity_metaphone("Газпром", "Газпром"), 1.0);
    }

    #[test]
    fn similarity_bounded() {
        let s = similarity_soundex("Сбербанк", "Тинькофф");
        assert!((0.0..=1.0).contains(&s));
        let m = similarity_metaphone("Сбербанк", "Тинькофф");
        assert!((0.0..=1.0).contains(&m));
    }
}
