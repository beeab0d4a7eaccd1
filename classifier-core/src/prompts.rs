//! Builds the system/user prompt pair for one cascade stage.

use nsi_model::{ClassifierLevel, ClassifierNode};

/// Subclass candidate lists are truncated beyond this many entries.
pub const SUBCLASS_TRUNCATE_AT: usize = 25;
/// Group candidate lists are truncated beyond this many entries.
pub const GROUP_TRUNCATE_AT: usize = 20;

fn truncate_limit(level: ClassifierLevel) -> Option<usize> {
    match level {
        ClassifierLevel::Section | ClassifierLevel::Class => None,
        ClassifierLevel::Subclass => Some(SUBCLASS_TRUNCATE_AT),
        ClassifierLevel::Group => Some(GROUP_TRUNCATE_AT),
    }
}

fn stage_name(level: ClassifierLevel) -> &'static str {
    match level {
        ClassifierLevel::Section => "section",
        ClassifierLevel::Class => "class",
        ClassifierLevel::Subclass => "subclass",
        ClassifierLevel::Group => "group",
    }
}

/// One-sentence instruction plus a candidate list, truncated per `level`'s
/// limit with a trailing "...and N more" when the full list doesn't fit.
pub fn system_prompt(level: ClassifierLevel, candidates: &[&ClassifierNode]) -> String {
    let stage = stage_name(level);
    let limit = truncate_limit(level);
    let shown = limit.map(|n| candidates.len().min(n)).unwrap_or(candidates.len());

    let mut list = String::new();
    for node in &candidates[..shown] {
        list.push_str(&format!("- {}: {}\n", node.code, node.name));
    }
    if let Some(n) = limit {
        if candidates.len() > n {
            list.push_str(&format!("...and {} more\n", candidates.len() - n));
        }
    }

    format!(
        "You are a product and service classification assistant. Choose exactly one {stage} \
         from the list below that best matches the item described by the user, and give a \
         one-sentence rationale. Candidates:\n{list}\
         Respond with strict JSON only: {{\"selected_code\": string, \"confidence\": number between 0 and 1, \"reasoning\": string}}."
    )
}

/// The item name and category, the only things the user prompt varies on.
pub fn user_prompt(item_name: &str, category: &str) -> String {
    format!("Item: \"{item_name}\"\nCategory: \"{category}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(code: &str) -> ClassifierNode {
        ClassifierNode {
            code: code.to_string(),
            name: format!("name-{code}"),
            parent_code: None,
            level: ClassifierLevel::Group,
        }
    }

    #[test]
    fn group_list_truncates_with_remainder_marker() {
        let owned: Vec<ClassifierNode> = (0..25).map(|i| node(&i.to_string())).collect();
        let refs: Vec<&ClassifierNode> = owned.iter().collect();
        let prompt = system_prompt(ClassifierLevel::Group, &refs);
        assert!(prompt.contains("...and 5 more"));
    }

    #[test]
    fn section_list_is_never_truncated() {
        let owned: Vec<ClassifierNode> = (0..200).map(|i| node(&i.to_string())).collect();
        let refs: Vec<&ClassifierNode> = owned.iter().collect();
        let prompt = system_prompt(ClassifierLevel::Section, &refs);
        assert!(!prompt.contains("more"));
    }
}
