//! Master Selector: chooses which member of a duplicate group becomes the
//! surviving canonical record.
//!
//! Pure function over pre-gathered scoring inputs — counting distinct
//! source databases needs a repository round trip, so the caller resolves
//! that once per item and passes it in via [`ScoringInput`] rather than this
//! module holding a repository handle of its own.

use nsi_model::{CanonicalId, MasterSelectionStrategy, NormalizedCounterparty};

/// Curated data providers whose `source_enrichment` tag earns a priority
/// multiplier on the enrichment bonus. Names and weights aren't named by
/// any upstream contract; kept as a small literal table so the multiplier
/// is easy to audit and extend.
const CURATED_SOURCE_WEIGHTS: &[(&str, f64)] = &[("provider-a", 3.0), ("provider-b", 2.0), ("provider-c", 1.5)];

/// One candidate's inputs to the scoring formula.
pub struct ScoringInput<'a> {
    pub record: &'a NormalizedCounterparty,
    /// Count of distinct source databases linked to this record.
    pub source_database_count: usize,
}

/// `source_enrichment`'s curated-provider priority multiplier, `1.0` for
/// anything uncurated or absent.
fn curated_source_priority(record: &NormalizedCounterparty) -> f64 {
    record
        .source_enrichment
        .as_deref()
        .and_then(|tag| {
            CURATED_SOURCE_WEIGHTS
                .iter()
                .find(|(name, _)| tag.eq_ignore_ascii_case(name))
                .map(|(_, w)| *w)
        })
        .unwrap_or(1.0)
}

/// Sums every named bonus from the `max_data` scoring table: identifier
/// presence, per-field fill bonuses (uniform +3 plus each field's own
/// differential weight), source-database breadth, enrichment provenance,
/// name-length and legal-form signals, and the quality score itself.
fn data_completeness_score(input: &ScoringInput) -> f64 {
    let record = input.record;
    let mut score = 0.0;

    if record.tax_id.is_some() || record.alt_tax_id.is_some() {
        score += 30.0;
    }
    if record.secondary_id.is_some() {
        score += 10.0;
    }

    score += record.filled_scoring_fields() as f64 * 3.0;

    if record.legal_address.is_some() {
        score += 15.0;
    }
    if record.postal_address.is_some() {
        score += 10.0;
    }
    if record.phone.is_some() {
        score += 5.0;
    }
    if record.email.is_some() {
        score += 5.0;
    }
    if record.contact_person.is_some() {
        score += 5.0;
    }
    if record.bank_name.is_some() {
        score += 5.0;
    }
    if record.bank_account.is_some() {
        score += 5.0;
    }
    if record.correspondent_account.is_some() {
        score += 3.0;
    }
    if record.bank_code.is_some() {
        score += 3.0;
    }

    score += input.source_database_count as f64 * 5.0;

    if record.enrichment_applied {
        score += 20.0 + curated_source_priority(record) * 10.0;
    }

    if record.normalized_name.chars().count() > 10 {
        score += 10.0;
    }
    if record.legal_form.is_some() {
        score += 10.0;
    }

    score += record.quality_score * 20.0;

    score
}

/// Picks a master from `inputs` per `strategy`, breaking ties by the lowest
/// canonical id so the choice is reproducible across repeated runs over the
/// same input set.
///
/// Returns `None` if `inputs` is empty.
pub fn select_master(inputs: &[ScoringInput], strategy: MasterSelectionStrategy) -> Option<CanonicalId> {
    if inputs.is_empty() {
        return None;
    }

    let key = |input: &ScoringInput| -> f64 {
        match strategy {
            MasterSelectionStrategy::MaxData => data_completeness_score(input),
            MasterSelectionStrategy::MaxQuality => input.record.quality_score,
            MasterSelectionStrategy::MaxDatabases => input.source_database_count as f64,
        }
    };

    inputs
        .iter()
        .max_by(|a, b| {
            key(a)
                .partial_cmp(&key(b))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.record.id.cmp(&a.record.id))
        })
        .map(|winner| winner.record.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nsi_model::ids::{stable_uuid, NAMESPACE_CANONICAL};

    fn record(
        key: &str,
        quality: f64,
        tax_id: bool,
        enrichment_applied: bool,
        enrichment: Option<&str>,
    ) -> NormalizedCounterparty {
        NormalizedCounterparty {
            id: stable_uuid(&NAMESPACE_CANONICAL, key),
            project_id: stable_uuid(&NAMESPACE_CANONICAL, "proj"),
            source_reference: key.to_string(),
            source_name: "src".to_string(),
            normalized_name: "Тест".to_string(),
            legal_form: None,
            tax_id: tax_id.then(|| "1234567890".to_string()),
            secondary_id: None,
            alt_tax_id: None,
            legal_address: None,
            postal_address: None,
            phone: None,
            email: None,
            contact_person: None,
            bank_name: None,
            bank_account: None,
            correspondent_account: None,
            bank_code: None,
            quality_score: quality,
            enrichment_applied,
            source_enrichment: enrichment.map(str::to_string),
            source_database: None,
            benchmark_id: None,
            subcategory: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn more_filled_fields_wins_max_data() {
        let a = record("a", 0.5, true, false, None);
        let b = record("b", 0.5, false, false, None);
        let inputs = vec![
            ScoringInput { record: &a, source_database_count: 1 },
            ScoringInput { record: &b, source_database_count: 1 },
        ];
        assert_eq!(select_master(&inputs, MasterSelectionStrategy::MaxData), Some(a.id));
    }

    #[test]
    fn curated_source_multiplier_can_flip_the_winner() {
        let a = record("a", 0.5, false, true, None);
        let b = record("b", 0.5, false, true, Some("provider-a"));
        let inputs = vec![
            ScoringInput { record: &a, source_database_count: 1 },
            ScoringInput { record: &b, source_database_count: 1 },
        ];
        assert_eq!(select_master(&inputs, MasterSelectionStrategy::MaxData), Some(b.id));
    }

    #[test]
    fn enrichment_flag_gates_the_enrichment_bonus() {
        let a = record("a", 0.5, false, false, Some("provider-a"));
        let b = record("b", 0.5, false, true, None);
        let inputs = vec![
            ScoringInput { record: &a, source_database_count: 1 },
            ScoringInput { record: &b, source_database_count: 1 },
        ];
        assert_eq!(select_master(&inputs, MasterSelectionStrategy::MaxData), Some(b.id));
    }

    #[test]
    fn max_quality_strategy_ignores_field_count() {
        let a = record("a", 0.9, false, false, None);
        let b = record("b", 0.4, true, false, None);
        let inputs = vec![
            ScoringInput { record: &a, source_database_count: 0 },
            ScoringInput { record: &b, source_database_count: 5 },
        ];
        assert_eq!(select_master(&inputs, MasterSelectionStrategy::MaxQuality), Some(a.id));
    }

    #[test]
    fn ties_break_on_lowest_id() {
        let a = record("a", 0.5, false, false, None);
        let b = record("b", 0.5, false, false, None);
        let expected = a.id.min(b.id);
        let inputs = vec![
            ScoringInput { record: &a, source_database_count: 0 },
            ScoringInput { record: &b, source_database_count: 0 },
        ];
        assert_eq!(select_master(&inputs, MasterSelectionStrategy::MaxData), Some(expected));
    }

    #[test]
    fn empty_input_returns_none() {
        assert_eq!(select_master(&[], MasterSelectionStrategy::MaxData), None);
    }
}
