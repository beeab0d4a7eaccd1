//! Token-wise unit canonicalization: a fixed synonym map so
//! `мм`, `mm.` and `миллиметр` all collapse onto `mm`.

use std::collections::HashMap;
use std::sync::LazyLock;

static UNIT_MAP: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("mm", "mm"),
        ("mm.", "mm"),
        ("мм", "mm"),
        ("миллиметр", "mm"),
        ("миллиметров", "mm"),
        ("cm", "cm"),
        ("см", "cm"),
        ("сантиметр", "cm"),
        ("сантиметров", "cm"),
        ("m", "m"),
        ("м", "m"),
        ("метр", "m"),
        ("метров", "m"),
        ("kg", "kg"),
        ("кг", "kg"),
        ("килограмм", "kg"),
        ("килограммов", "kg"),
        ("g", "g"),
        ("гр", "g"),
        ("грамм", "g"),
        ("граммов", "g"),
        ("l", "l"),
        ("л", "l"),
        ("литр", "l"),
        ("литров", "l"),
        ("pcs", "pcs"),
        ("шт", "pcs"),
        ("шт.", "pcs"),
        ("штук", "pcs"),
    ])
});

/// Replace every whitespace-delimited token that matches a known unit
/// synonym with its canonical form; other tokens pass through unchanged.
pub fn canonicalize_units(text: &str) -> String {
    text.split(' ')
        .map(|tok| {
            let key = tok.to_lowercase();
            UNIT_MAP.get(key.as_str()).copied().unwrap_or(tok)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
