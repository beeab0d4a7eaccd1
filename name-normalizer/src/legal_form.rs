//! Legal-form extraction: strips a recognized legal-form token
//! (as a prefix, then as a suffix) and returns it as a separate canonical
//! acronym. Idempotent — running it again on its own output is a no-op.

use std::sync::LazyLock;

use regex::Regex;

struct FormEntry {
    canonical: &'static str,
    prefix: Regex,
    suffix: Regex,
}

const FORM_SYNONYMS: &[(&str, &str)] = &[
    (
        "ООО",
        r"ооо|общество\s+с\s+ограниченной\s+ответственностью",
    ),
    ("ОАО", r"оао|открытое\s+акционерное\s+общество"),
    ("ЗАО", r"зао|закрытое\s+акционерное\s+общество"),
    ("ПАО", r"пао|публичное\s+акционерное\s+общество"),
    ("АО", r"ао|акционерное\s+общество"),
    ("ИП", r"ип|индивидуальный\s+предприниматель"),
    ("НКО", r"нко|некоммерческая\s+организация"),
    ("LLC", r"llc|limited\s+liability\s+company"),
    ("LTD", r"ltd|limited"),
    ("INC", r"inc|incorporated"),
    ("CORP", r"corp|corporation"),
    ("GMBH", r"gmbh"),
];

static FORMS: LazyLock<Vec<FormEntry>> = LazyLock::new(|| {
    FORM_SYNONYMS
        .iter()
        .map(|(canonical, alt)| FormEntry {
            canonical,
            prefix: Regex::new(&format!(r"(?i)^\s*(?:{alt})\.?\s+"))
                .expect("static legal-form prefix pattern must compile"),
            suffix: Regex::new(&format!(r"(?i)\s+(?:{alt})\.?\s*$"))
                .expect("static legal-form suffix pattern must compile"),
        })
        .collect()
});

const QUOTE_CHARS: &[char] = &['"', '\'', '«', '»', '“', '”'];

fn strip_quotes(s: &str) -> &str {
    s.trim().trim_matches(|c| QUOTE_CHARS.contains(&c)).trim()
}

/// Tries each form's prefix pattern, then each suffix pattern; the first
/// match wins. Returns the name with the form removed and surrounding
/// quotes stripped, plus the canonical acronym if one was found.
pub fn extract_legal_form(name: &str) -> (String, Option<&'static str>) {
    let trimmed = strip_quotes(name);

    for form in FORMS.iter() {
        if let Some(m) = form.prefix.find(trimmed) {
            let rest = strip_quotes(&trimmed[m.end()..]);
            return (rest.to_string(), Some(form.canonical));
        }
    }
    for form in FORMS.iter() {
        if let Some(m) = form.suffix.find(trimmed) {
            let rest = strip_quotes(&trimmed[..m.start()]);
            return (rest.to_string(), Some(form.canonical));
        }
    }
    (trimmed.to_string(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_prefix_acronym() {
        let (rest, form) = extract_legal_form("ООО Ромашка");
        assert_eq!(rest, "Ромашка");
        assert_eq!(form, Some("ООО"));
    }

    #[test]
    fn strips_suffix_acronym_and_quotes() {
        let (rest, form) = extract_legal_form("\"Ромашка\" ЛТД");
        assert_eq!(rest, "Ромашка");
        assert_eq!(form, Some("LTD"));
    }

    #[test]
    fn expands_full_form_to_canonical_acronym() {
        let (rest, form) = extract_legal_form("Общество с ограниченной ответственностью Вектор");
        assert_eq!(rest, "Вектор");
        assert_eq!(form, Some("ООО"));
    }

    #[test]
    fn is_idempotent() {
        let (first, _) = extract_legal_form("ООО Ромашка");
        let (second, form) = extract_legal_form(&first);
        assert_eq!(first, second);
        assert_eq!(form, None);
    }

    #[test]
    fn no_form_present_returns_unchanged() {
        let (rest, form) = extract_legal_form("Ромашка");
        assert_eq!(rest, "Ромашка");
        assert_eq!(form, None);
    }
}
