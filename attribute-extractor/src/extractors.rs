//! Per-field extraction strategies, tried in order until one returns a
//! non-empty match.

use regex::Regex;

/// One strategy for pulling a field's value out of an opaque attribute blob.
/// Ordered lists of these (`Vec<Box<dyn FieldExtractor>>`) back each field in
/// [`crate::fields`], so adding a new shape fallback never touches the
/// dispatch loop.
pub trait FieldExtractor: Send + Sync {
    fn try_extract(&self, text: &str) -> Option<String>;
}

/// `<Tag>value</Tag>`, case-insensitive, tried against each of a list of
/// tag-name synonyms (e.g. Cyrillic and Latin spellings of the same field).
pub struct XmlTagExtractor {
    patterns: Vec<Regex>,
}

impl XmlTagExtractor {
    pub fn new(tags: &[&str]) -> Self {
        let patterns = tags
            .iter()
            .map(|t| {
                let escaped = regex::escape(t);
                Regex::new(&format!(r"(?is)<\s*{escaped}\s*>(.*?)<\s*/\s*{escaped}\s*>"))
                    .expect("static xml-tag pattern must compile")
            })
            .collect();
        Self { patterns }
    }
}

impl FieldExtractor for XmlTagExtractor {
    fn try_extract(&self, text: &str) -> Option<String> {
        for re in &self.patterns {
            if let Some(caps) = re.captures(text) {
                let val = caps[1].trim();
                if !val.is_empty() {
                    return Some(val.to_string());
                }
            }
        }
        None
    }
}

/// `Label: value` or `Label=value`, where segments are separated by `;`,
/// `,`, or newline and `Label` matches one of a list of synonyms.
pub struct LabeledKeyValueExtractor {
    patterns: Vec<Regex>,
}

impl LabeledKeyValueExtractor {
    pub fn new(labels: &[&str]) -> Self {
        let patterns = labels
            .iter()
            .map(|l| {
                let escaped = regex::escape(l);
                Regex::new(&format!(r"(?i)^\s*{escaped}\s*[:=]\s*(.+?)\s*$"))
                    .expect("static label pattern must compile")
            })
            .collect();
        Self { patterns }
    }
}

impl FieldExtractor for LabeledKeyValueExtractor {
    fn try_extract(&self, text: &str) -> Option<String> {
        for segment in text.split(['\n', ';', ',']) {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            for re in &self.patterns {
                if let Some(caps) = re.captures(segment) {
                    let val = caps[1].trim();
                    if !val.is_empty() {
                        return Some(val.to_string());
                    }
                }
            }
        }
        None
    }
}

/// A shape-based fallback for numeric identifiers: a digit run of an exact
/// accepted length, bounded by word boundaries so a 12-digit run never
/// satisfies a 10-digit pattern. Optionally gated on a required context
/// keyword appearing anywhere in the source text, for shapes that collide
/// with another field — e.g. "bank"/"branch" disambiguating a bank code
/// from a same-length subkey.
pub struct DigitShapeExtractor {
    pattern: Regex,
    required_context: Vec<&'static str>,
}

impl DigitShapeExtractor {
    pub fn new(lengths: &[usize], required_context: &[&'static str]) -> Self {
        let alternation = lengths
            .iter()
            .map(|n| format!(r"\d{{{n}}}"))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"\b(?:{alternation})\b"))
            .expect("static digit-shape pattern must compile");
        Self {
            pattern,
            required_context: required_context.to_vec(),
        }
    }

    fn context_satisfied(&self, text: &str) -> bool {
        if self.required_context.is_empty() {
            return true;
        }
        let lower = text.to_lowercase();
        self.required_context.iter().any(|kw| lower.contains(kw))
    }
}

impl FieldExtractor for DigitShapeExtractor {
    fn try_extract(&self, text: &str) -> Option<String> {
        if !self.context_satisfied(text) {
            return None;
        }
        self.pattern.find(text).map(|m| m.as_str().to_string())
    }
}

/// A 6-digit postal code followed by address text, e.g. `"123456, Москва, ул. Ленина 1"`.
pub struct PostalShapeExtractor {
    pattern: Regex,
}

impl Default for PostalShapeExtractor {
    fn default() -> Self {
        Self {
            pattern: Regex::new(r"\b\d{6}\b[,]?\s*.{3,}")
                .expect("static postal-shape pattern must compile"),
        }
    }
}

impl FieldExtractor for PostalShapeExtractor {
    fn try_extract(&self, text: &str) -> Option<String> {
        self.pattern
            .find(text)
            .map(|m| m.as_str().trim().to_string())
    }
}

/// Run an ordered list of strategies, returning the first non-empty match.
pub fn extract_field(text: &str, strategies: &[Box<dyn FieldExtractor>]) -> Option<String> {
    strategies.iter().find_map(|s| s.try_extract(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xml_tag_extractor_matches_case_insensitively() {
        let ex = XmlTagExtractor::new(&["INN", "ИНН"]);
        assert_eq!(
            ex.try_extract("<inn>7701234567</inn>"),
            Some("7701234567".to_string())
        );
        assert_eq!(
            ex.try_extract("<ИНН>7701234567</ИНН>"),
            Some("7701234567".to_string())
        );
    }

    #[test]
    fn labeled_kv_extractor_splits_on_separators() {
        let ex = LabeledKeyValueExtractor::new(&["инн", "inn"]);
        assert_eq!(
            ex.try_extract("Название: Ромашка; ИНН: 7701234567; КПП: 770101001"),
            Some("7701234567".to_string())
        );
    }

    #[test]
    fn digit_shape_requires_word_boundary() {
        let ex = DigitShapeExtractor::new(&[10, 12], &[]);
        assert_eq!(ex.try_extract("код 123456789012"), Some("123456789012".to_string()));
        assert!(ex.try_extract("код 12345").is_none());
    }

    #[test]
    fn digit_shape_gated_on_context_keyword() {
        let ex = DigitShapeExtractor::new(&[9], &["банк", "бик"]);
        assert!(ex.try_extract("код 770101001").is_none());
        assert_eq!(
            ex.try_extract("БИК банка: 770101001"),
            Some("770101001".to_string())
        );
    }
}
