use crate::config::GroupingConfig;
use crate::ir::{DEFAULT_KIND, Node};

/// Picks the display name for one workflow. Members are given in input order
/// and the first matching rule wins:
///
/// 1. a frame node's label,
/// 2. a user node's label when the workflow holds generated nodes,
/// 3. the first label long enough to be informative,
/// 4. the vocabulary name of the most frequent type tag.
pub(super) fn workflow_name(members: &[&Node], config: &GroupingConfig) -> String {
    if let Some(label) = first_label_of_kind(members, &config.frame_type, config.trim_labels) {
        return label.to_string();
    }

    let has_generated = members
        .iter()
        .any(|node| node.id.starts_with(config.generated_id_prefix.as_str()));
    if has_generated {
        if let Some(label) = first_label_of_kind(members, &config.user_type, config.trim_labels) {
            return label.to_string();
        }
    }

    if let Some(label) = members
        .iter()
        .filter_map(|node| node.naming_label(config.trim_labels))
        .find(|label| label.chars().count() >= config.min_label_chars)
    {
        return label.to_string();
    }

    config.name_for_kind(dominant_kind(members)).to_string()
}

fn first_label_of_kind<'a>(members: &[&'a Node], kind: &str, trim: bool) -> Option<&'a str> {
    members
        .iter()
        .filter(|node| node.kind.as_deref() == Some(kind))
        .find_map(|node| node.naming_label(trim))
}

/// Most frequent type tag; ties go to the tag seen first.
fn dominant_kind<'a>(members: &[&'a Node]) -> &'a str {
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    for node in members {
        let kind = node.kind_or_default();
        match counts.iter_mut().find(|(seen, _)| *seen == kind) {
            Some(entry) => entry.1 += 1,
            None => counts.push((kind, 1)),
        }
    }

    let mut best = DEFAULT_KIND;
    let mut best_count = 0usize;
    for (kind, count) in counts {
        if count > best_count {
            best = kind;
            best_count = count;
        }
    }
    best
}
