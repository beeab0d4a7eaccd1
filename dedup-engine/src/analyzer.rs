//! Duplicate Analyzer: groups canonical records by deterministic
//! identifier keys, merges overlapping groups under transitive equivalence,
//! and — optionally — sweeps the remainder for fuzzy near-duplicates.
//!
//! Pure and synchronous: the caller loads the project's canonical
//! population once (`CounterpartyRepository::list_canonical_records`) and
//! hands it to [`analyze`]; nothing here touches the store.

use std::collections::HashMap;

use nsi_model::{CanonicalId, NormalizedCounterparty, ProjectConfig};
use similarity_kit::CombinedScorer;

use crate::union_find::UnionFind;

/// One equivalence class produced by the analyzer.
///
/// `master_item` is left unset here — it's filled in by
/// `dedup-engine::selector` once a [`crate::selector::MasterSelectionStrategy`]
/// has been applied, and by design a `DuplicateGroup` can be passed around
/// before that happens.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateGroup {
    pub key: String,
    pub key_type: String,
    pub items: Vec<CanonicalId>,
    pub master_item: Option<CanonicalId>,
    pub confidence: f64,
}

/// Default fuzzy-grouping combined-score threshold.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.85;

/// Groups `records` into duplicate candidates in three phases: deterministic
/// key matching, overlapping-group merge, and optional fuzzy grouping.
///
/// `bucket_fuzzy_by_prefix` enables a token-prefix pre-pass for phase 3:
/// candidates are only compared pairwise within records that share a first
/// normalized token, avoiding an O(n²) sweep over the whole uncovered set.
/// Pairs whose leading tokens differ are simply never considered, trading
/// some recall at prefix boundaries for scalability on large batches.
pub fn analyze(
    records: &[NormalizedCounterparty],
    config: &ProjectConfig,
    bucket_fuzzy_by_prefix: bool,
) -> Vec<DuplicateGroup> {
    let n = records.len();
    if n == 0 {
        return Vec::new();
    }

    let mut uf = UnionFind::new(n);
    // index -> (key value, tag) for each deterministic key an item matched.
    let mut key_a: HashMap<usize, (String, &'static str)> = HashMap::new();
    let mut key_b: HashMap<usize, String> = HashMap::new();

    // Phase 1a — Key A: tax_id, optionally + secondary_id.
    let mut buckets_a: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, r) in records.iter().enumerate() {
        let Some(tax_id) = r.tax_id.as_deref().filter(|s| !s.is_empty()) else {
            continue;
        };
        let (bucket_key, tag) = match r.secondary_id.as_deref().filter(|s| !s.is_empty()) {
            Some(sub) => (format!("{tax_id}|{sub}"), "tax_id+sub"),
            None => (tax_id.to_string(), "tax_id"),
        };
        key_a.insert(i, (bucket_key.clone(), tag));
        buckets_a.entry(bucket_key).or_default().push(i);
    }
    for members in buckets_a.values() {
        for w in members.windows(2) {
            uf.union(w[0], w[1]);
        }
    }

    // Phase 1b — Key B: alt_tax_id.
    let mut buckets_b: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, r) in records.iter().enumerate() {
        let Some(alt) = r.alt_tax_id.as_deref().filter(|s| !s.is_empty()) else {
            continue;
        };
        key_b.insert(i, alt.to_string());
        buckets_b.entry(alt.to_string()).or_default().push(i);
    }
    for members in buckets_b.values() {
        for w in members.windows(2) {
            uf.union(w[0], w[1]);
        }
    }

    // Phase 2 — a record present in both an A-bucket and a B-bucket unions
    // its two groups; `uf` already shares components through that member.
    let deterministic: std::collections::HashSet<usize> =
        key_a.keys().chain(key_b.keys()).copied().collect();

    let mut groups = components_to_groups(&mut uf, &deterministic, records, |members| {
        build_deterministic_label(members, &key_a, &key_b)
    });

    // Phase 3 — fuzzy grouping over records lacking both identifiers.
    if config.fuzzy_grouping_enabled {
        let candidates: Vec<usize> = (0..n).filter(|i| !deterministic.contains(i)).collect();
        groups.extend(fuzzy_groups(
            records,
            &candidates,
            config,
            bucket_fuzzy_by_prefix,
        ));
    }

    groups
}

/// Walks every connected component of `uf` restricted to `member_pool`,
/// labels it via `label`, and emits a [`DuplicateGroup`] for components of
/// size ≥ 2 (singletons are discarded).
fn components_to_groups(
    uf: &mut UnionFind,
    member_pool: &std::collections::HashSet<usize>,
    records: &[NormalizedCounterparty],
    label: impl Fn(&[usize]) -> (String, String),
) -> Vec<DuplicateGroup> {
    let mut by_root: HashMap<usize, Vec<usize>> = HashMap::new();
    // Insertion order of `member_pool` isn't deterministic (it's a HashSet);
    // sort by original index so output is stable and item order within a
    // group follows insertion order into `records`.
    let mut ordered: Vec<usize> = member_pool.iter().copied().collect();
    ordered.sort_unstable();
    for &i in &ordered {
        let root = uf.find(i);
        by_root.entry(root).or_default().push(i);
    }

    let mut roots: Vec<usize> = by_root.keys().copied().collect();
    roots.sort_unstable();

    roots
        .into_iter()
        .filter_map(|root| by_root.remove(&root))
        .filter(|members| members.len() >= 2)
        .map(|members| {
            let (key, key_type) = label(&members);
            DuplicateGroup {
                key,
                key_type,
                items: members.iter().map(|&i| records[i].id).collect(),
                master_item: None,
                confidence: 1.0,
            }
        })
        .collect()
}

fn build_deterministic_label(
    members: &[usize],
    key_a: &HashMap<usize, (String, &'static str)>,
    key_b: &HashMap<usize, String>,
) -> (String, String) {
    let mut a_keys: Vec<&str> = Vec::new();
    let mut a_tag: Option<&'static str> = None;
    let mut b_keys: Vec<&str> = Vec::new();

    for &i in members {
        if let Some((k, tag)) = key_a.get(&i) {
            if !a_keys.contains(&k.as_str()) {
                a_keys.push(k.as_str());
            }
            a_tag = Some(tag);
        }
        if let Some(k) = key_b.get(&i) {
            if !b_keys.contains(&k.as_str()) {
                b_keys.push(k.as_str());
            }
        }
    }

    let key = a_keys
        .iter()
        .chain(b_keys.iter())
        .copied()
        .collect::<Vec<_>>()
        .join("+");

    let key_type = match (a_tag, b_keys.is_empty()) {
        (Some(_), false) => "tax_id+alt".to_string(),
        (Some(tag), true) => tag.to_string(),
        (None, false) => "alt_tax_id".to_string(),
        (None, true) => String::new(), // unreachable: component came from key_a/key_b
    };

    (key, key_type)
}

/// Phase 3: pairwise sweep over `candidates` using the project's combined
/// similarity score, with edges at or above `fuzzy_threshold` collapsed
/// into connected components via a fresh union-find over `candidates`'
/// positions.
fn fuzzy_groups(
    records: &[NormalizedCounterparty],
    candidates: &[usize],
    config: &ProjectConfig,
    bucket_by_prefix: bool,
) -> Vec<DuplicateGroup> {
    if candidates.len() < 2 {
        return Vec::new();
    }

    let scorer = match CombinedScorer::from_config(&config.similarity_weights) {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };
    let threshold = if config.fuzzy_threshold > 0.0 {
        config.fuzzy_threshold
    } else {
        DEFAULT_FUZZY_THRESHOLD
    };

    let mut uf = UnionFind::new(candidates.len());
    let mut scores: HashMap<(usize, usize), f64> = HashMap::new();

    let pairs = candidate_pairs(records, candidates, bucket_by_prefix);
    for (pi, pj) in pairs {
        let a = &records[candidates[pi]].normalized_name;
        let b = &records[candidates[pj]].normalized_name;
        let score = scorer.score(a, b);
        if score >= threshold {
            uf.union(pi, pj);
            scores.insert((pi.min(pj), pi.max(pj)), score);
        }
    }

    let mut by_root: HashMap<usize, Vec<usize>> = HashMap::new();
    for i in 0..candidates.len() {
        let root = uf.find(i);
        by_root.entry(root).or_default().push(i);
    }

    let mut roots: Vec<usize> = by_root.keys().copied().collect();
    roots.sort_unstable();

    roots
        .into_iter()
        .filter_map(|root| by_root.remove(&root))
        .filter(|members| members.len() >= 2)
        .map(|members| {
            let mut total = 0.0;
            let mut count = 0usize;
            for w in 0..members.len() {
                for v in (w + 1)..members.len() {
                    let a = members[w].min(members[v]);
                    let b = members[w].max(members[v]);
                    if let Some(s) = scores.get(&(a, b)) {
                        total += s;
                        count += 1;
                    }
                }
            }
            let confidence = if count > 0 { total / count as f64 } else { threshold };
            DuplicateGroup {
                key: members
                    .iter()
                    .map(|&p| records[candidates[p]].id.to_string())
                    .collect::<Vec<_>>()
                    .join("+"),
                key_type: "fuzzy".to_string(),
                items: members.iter().map(|&p| records[candidates[p]].id).collect(),
                master_item: None,
                confidence,
            }
        })
        .collect()
}

/// Candidate pairs (as positions into `candidates`) to score in phase 3.
/// With bucketing enabled, only pairs sharing a first normalized token are
/// considered, trading recall at prefix boundaries for avoiding an O(n²) sweep.
fn candidate_pairs(
    records: &[NormalizedCounterparty],
    candidates: &[usize],
    bucket_by_prefix: bool,
) -> Vec<(usize, usize)> {
    if !bucket_by_prefix {
        let mut pairs = Vec::new();
        for i in 0..candidates.len() {
            for j in (i + 1)..candidates.len() {
                pairs.push((i, j));
            }
        }
        return pairs;
    }

    let mut by_prefix: HashMap<String, Vec<usize>> = HashMap::new();
    for (pos, &idx) in candidates.iter().enumerate() {
        let prefix = records[idx]
            .normalized_name
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_lowercase();
        by_prefix.entry(prefix).or_default().push(pos);
    }

    let mut pairs = Vec::new();
    for members in by_prefix.values() {
        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                pairs.push((members[i], members[j]));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nsi_model::ids::{stable_uuid, NAMESPACE_CANONICAL};
    use uuid::Uuid;

    fn record(id: Uuid, tax_id: Option<&str>, secondary_id: Option<&str>, alt: Option<&str>) -> NormalizedCounterparty {
        NormalizedCounterparty {
            id,
            project_id: stable_uuid(&NAMESPACE_CANONICAL, "p1"),
            source_reference: id.to_string(),
            source_name: "src".to_string(),
            normalized_name: "Тест Компания".to_string(),
            legal_form: None,
            tax_id: tax_id.map(str::to_string),
            secondary_id: secondary_id.map(str::to_string),
            alt_tax_id: alt.map(str::to_string),
            legal_address: None,
            postal_address: None,
            phone: None,
            email: None,
            contact_person: None,
            bank_name: None,
            bank_account: None,
            correspondent_account: None,
            bank_code: None,
            quality_score: 0.5,
            enrichment_applied: false,
            source_enrichment: None,
            source_database: None,
            benchmark_id: None,
            subcategory: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn deterministic_merge_by_tax_id_and_secondary() {
        let r1 = record(stable_uuid(&NAMESPACE_CANONICAL, "t1"), Some("1234567890"), Some("123456789"), None);
        let r2 = record(stable_uuid(&NAMESPACE_CANONICAL, "t2"), Some("1234567890"), Some("123456789"), None);
        let r3 = record(stable_uuid(&NAMESPACE_CANONICAL, "t3"), Some("1234567891"), Some("123456789"), None);
        let records = vec![r1.clone(), r2.clone(), r3.clone()];
        let config = ProjectConfig::with_defaults(r1.project_id);
        let groups = analyze(&records, &config, false);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(groups[0].key_type, "tax_id+sub");
        assert_eq!(groups[0].confidence, 1.0);
    }

    #[test]
    fn overlapping_groups_merge_by_two_identifiers() {
        let a = record(stable_uuid(&NAMESPACE_CANONICAL, "oa"), Some("1234567890"), None, None);
        let b = record(stable_uuid(&NAMESPACE_CANONICAL, "ob"), Some("1234567890"), None, Some("111222333444"));
        let c = record(stable_uuid(&NAMESPACE_CANONICAL, "oc"), None, None, Some("111222333444"));
        let records = vec![a.clone(), b.clone(), c.clone()];
        let config = ProjectConfig::with_defaults(a.project_id);
        let groups = analyze(&records, &config, false);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].items.len(), 3);
        assert_eq!(groups[0].key_type, "tax_id+alt");
    }

    #[test]
    fn singletons_are_discarded() {
        let a = record(stable_uuid(&NAMESPACE_CANONICAL, "sa"), Some("1111111111"), None, None);
        let records = vec![a.clone()];
        let config = ProjectConfig::with_defaults(a.project_id);
        let groups = analyze(&records, &config, false);
        assert!(groups.is_empty());
    }

    #[test]
    fn records_without_identifiers_are_ungrouped_when_fuzzy_disabled() {
        let a = record(stable_uuid(&NAMESPACE_CANONICAL, "ua"), None, None, None);
        let b = record(stable_uuid(&NAMESPACE_CANONICAL, "ub"), None, None, None);
        let records = vec![a.clone(), b.clone()];
        let config = ProjectConfig::with_defaults(a.project_id);
        let groups = analyze(&records, &config, false);
        assert!(groups.is_empty());
    }
}
