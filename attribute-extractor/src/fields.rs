//! Field-specific extractor chains and the top-level `extract` entry point.

use crate::extractors::{
    extract_field, DigitShapeExtractor, FieldExtractor, LabeledKeyValueExtractor,
    PostalShapeExtractor, XmlTagExtractor,
};

/// All fields this crate knows how to pull out of an opaque attribute blob.
/// Every field is optional: absence and ambiguity are both represented as
/// `None`, never as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedAttributes {
    pub tax_id: Option<String>,
    pub secondary_id: Option<String>,
    pub alt_tax_id: Option<String>,
    pub legal_address: Option<String>,
    pub postal_address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub contact_person: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account: Option<String>,
    pub correspondent_account: Option<String>,
    pub bank_code: Option<String>,
}

fn tax_id_strategies() -> Vec<Box<dyn FieldExtractor>> {
    vec![
        Box::new(XmlTagExtractor::new(&["inn", "tax_id", "taxid"])),
        Box::new(LabeledKeyValueExtractor::new(&[
            "inn", "инн", "tax id", "tax_id",
        ])),
        Box::new(DigitShapeExtractor::new(&[10, 12], &[])),
    ]
}

fn secondary_id_strategies() -> Vec<Box<dyn FieldExtractor>> {
    vec![
        Box::new(XmlTagExtractor::new(&["kpp", "secondary_id"])),
        Box::new(LabeledKeyValueExtractor::new(&[
            "kpp",
            "кпп",
            "secondary id",
            "secondary_id",
        ])),
    ]
}

fn alt_tax_id_strategies() -> Vec<Box<dyn FieldExtractor>> {
    vec![
        Box::new(XmlTagExtractor::new(&["ogrn", "alt_tax_id"])),
        Box::new(LabeledKeyValueExtractor::new(&[
            "ogrn",
            "огрн",
            "alt tax id",
            "alt_tax_id",
        ])),
        Box::new(DigitShapeExtractor::new(
            &[12],
            &["альт", "национальн", "alt", "national"],
        )),
    ]
}

fn legal_address_strategies() -> Vec<Box<dyn FieldExtractor>> {
    vec![
        Box::new(XmlTagExtractor::new(&["legaladdress", "legal_address"])),
        Box::new(LabeledKeyValueExtractor::new(&[
            "юридический адрес",
            "юр. адрес",
            "legal address",
            "legal_address",
        ])),
    ]
}

fn postal_address_strategies() -> Vec<Box<dyn FieldExtractor>> {
    vec![
        Box::new(XmlTagExtractor::new(&["postaladdress", "postal_address"])),
        Box::new(LabeledKeyValueExtractor::new(&[
            "почтовый адрес",
            "postal address",
            "postal_address",
        ])),
        Box::<PostalShapeExtractor>::default(),
    ]
}

fn phone_strategies() -> Vec<Box<dyn FieldExtractor>> {
    vec![
        Box::new(XmlTagExtractor::new(&["phone", "tel", "телефон"])),
        Box::new(LabeledKeyValueExtractor::new(&["телефон", "phone", "tel"])),
    ]
}

fn email_strategies() -> Vec<Box<dyn FieldExtractor>> {
    vec![
        Box::new(XmlTagExtractor::new(&["email", "mail"])),
        Box::new(LabeledKeyValueExtractor::new(&[
            "email",
            "e-mail",
            "эл. почта",
            "эл.почта",
        ])),
    ]
}

fn contact_person_strategies() -> Vec<Box<dyn FieldExtractor>> {
    vec![
        Box::new(XmlTagExtractor::new(&["contact", "contactperson"])),
        Box::new(LabeledKeyValueExtractor::new(&[
            "контактное лицо",
            "contact person",
            "contact",
        ])),
    ]
}

fn bank_name_strategies() -> Vec<Box<dyn FieldExtractor>> {
    vec![
        Box::new(XmlTagExtractor::new(&["bankname", "bank_name"])),
        Box::new(LabeledKeyValueExtractor::new(&[
            "банк",
            "bank name",
            "bank_name",
        ])),
    ]
}

fn bank_account_strategies() -> Vec<Box<dyn FieldExtractor>> {
    vec![
        Box::new(XmlTagExtractor::new(&["bankaccount", "bank_account"])),
        Box::new(LabeledKeyValueExtractor::new(&[
            "р/с",
            "расчетный счет",
            "bank account",
            "bank_account",
        ])),
        Box::new(DigitShapeExtractor::new(&[20], &[])),
    ]
}

fn correspondent_account_strategies() -> Vec<Box<dyn FieldExtractor>> {
    vec![
        Box::new(XmlTagExtractor::new(&[
            "correspondentaccount",
            "correspondent_account",
        ])),
        Box::new(LabeledKeyValueExtractor::new(&[
            "к/с",
            "корреспондентский счет",
            "correspondent account",
            "correspondent_account",
        ])),
        Box::new(DigitShapeExtractor::new(
            &[20],
            &["корр", "correspondent", "corr"],
        )),
    ]
}

fn bank_code_strategies() -> Vec<Box<dyn FieldExtractor>> {
    vec![
        Box::new(XmlTagExtractor::new(&["bankcode", "bank_code", "bic"])),
        Box::new(LabeledKeyValueExtractor::new(&[
            "бик",
            "bank code",
            "bank_code",
            "bic",
        ])),
        Box::new(DigitShapeExtractor::new(
            &[9],
            &["банк", "бик", "bank", "bic", "branch", "филиал"],
        )),
    ]
}

/// Run every field's strategy chain against `text`, then resolve the one
/// collision the chains can't see on their own: a correspondent-account
/// context keyword firing on the same digits a plain bank-account shape
/// also matched. The extractor never guesses, so the less specific field
/// is cleared rather than silently duplicated.
pub fn extract(text: &str) -> ExtractedAttributes {
    let mut attrs = ExtractedAttributes {
        tax_id: extract_field(text, &tax_id_strategies()),
        secondary_id: extract_field(text, &secondary_id_strategies()),
        alt_tax_id: extract_field(text, &alt_tax_id_strategies()),
        legal_address: extract_field(text, &legal_address_strategies()),
        postal_address: extract_field(text, &postal_address_strategies()),
        phone: extract_field(text, &phone_strategies()),
        email: extract_field(text, &email_strategies()),
        contact_person: extract_field(text, &contact_person_strategies()),
        bank_name: extract_field(text, &bank_name_strategies()),
        bank_account: extract_field(text, &bank_account_strategies()),
        correspondent_account: extract_field(text, &correspondent_account_strategies()),
        bank_code: extract_field(text, &bank_code_strategies()),
    };

    if attrs.tax_id.is_some() && attrs.tax_id == attrs.alt_tax_id {
        attrs.tax_id = None;
    }
    if attrs.bank_account.is_some() && attrs.bank_account == attrs.correspondent_account {
        attrs.bank_account = None;
    }

    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_xml_tags() {
        let text = "<Name>Ромашка</Name><INN>7701234567</INN><KPP>770101001</KPP>";
        let a = extract(text);
        assert_eq!(a.tax_id.as_deref(), Some("7701234567"));
        assert_eq!(a.secondary_id.as_deref(), Some("770101001"));
    }

    #[test]
    fn extracts_from_labeled_pairs() {
        let text = "ИНН: 7701234567; Банк: Сбербанк; БИК банка: 044525225";
        let a = extract(text);
        assert_eq!(a.tax_id.as_deref(), Some("7701234567"));
        assert_eq!(a.bank_name.as_deref(), Some("Сбербанк"));
        assert_eq!(a.bank_code.as_deref(), Some("044525225"));
    }

    #[test]
    fn nine_digit_number_without_bank_context_is_not_a_bank_code() {
        let a = extract("Код подразделения: 770101001");
        assert_eq!(a.bank_code, None);
    }

    #[test]
    fn colliding_tax_id_and_alt_tax_id_resolve_to_alt_only() {
        let text = "ОГРН: 123456789012";
        let a = extract(text);
        assert_eq!(a.alt_tax_id.as_deref(), Some("123456789012"));
        assert_eq!(a.tax_id, None);
    }

    #[test]
    fn bank_account_shape_without_context_is_kept_when_no_collision() {
        let a = extract("Р/с 12345678901234567890");
        assert_eq!(a.bank_account.as_deref(), Some("12345678901234567890"));
    }
}
