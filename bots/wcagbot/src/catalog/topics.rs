// SPDX-License-Identifier: PMPL-1.0-or-later
//! Topic to criteria mapping used for guidance lookups.

const TOPICS: &[(&str, &[&str])] = &[
    ("images", &["1.1.1", "1.4.5", "1.4.9"]),
    ("forms", &["1.3.1", "3.3.1", "3.3.2", "3.3.3", "3.3.4", "4.1.2"]),
    ("color", &["1.4.1", "1.4.3", "1.4.6", "1.4.11"]),
    ("keyboard", &["2.1.1", "2.1.2", "2.1.4", "2.4.3", "2.4.7"]),
    ("headings", &["1.3.1", "2.4.6", "2.4.10"]),
    ("links", &["2.4.4", "2.4.9", "4.1.2"]),
    ("language", &["3.1.1", "3.1.2"]),
    (
        "media",
        &["1.2.1", "1.2.2", "1.2.3", "1.2.4", "1.2.5", "1.2.6", "1.2.7", "1.2.8", "1.2.9"],
    ),
    ("timing", &["2.2.1", "2.2.2", "2.2.3", "2.2.4", "2.2.5", "2.2.6"]),
    ("seizures", &["2.3.1", "2.3.2", "2.3.3"]),
    ("navigation", &["2.4.1", "2.4.2", "2.4.5", "2.4.8", "3.2.3", "3.2.4"]),
    (
        "input",
        &["1.3.5", "2.5.1", "2.5.2", "2.5.3", "2.5.4", "2.5.6", "3.3.7", "3.3.8"],
    ),
    ("focus", &["2.4.7", "2.4.11", "2.4.12", "2.4.13"]),
];

/// Known topic names in display order
pub fn names() -> impl Iterator<Item = &'static str> {
    TOPICS.iter().map(|(name, _)| *name)
}

/// Criterion ids for a topic, matched case-insensitively. "colour" is
/// accepted as an alias.
pub fn criteria_for(topic: &str) -> Option<&'static [&'static str]> {
    let wanted = match topic.trim().to_lowercase().as_str() {
        "colour" => "color".to_string(),
        other => other.to_string(),
    };
    TOPICS
        .iter()
        .find(|(name, _)| *name == wanted)
        .map(|(_, ids)| *ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_every_topic_resolves_against_catalog() {
        let cat = catalog::global().unwrap();
        for name in names() {
            let ids = criteria_for(name).unwrap();
            let found = cat.for_topic(name).unwrap();
            assert_eq!(found.len(), ids.len(), "topic {} has dangling ids", name);
        }
    }

    #[test]
    fn test_topic_lookup_is_case_insensitive() {
        assert_eq!(criteria_for("Keyboard"), criteria_for("keyboard"));
        assert_eq!(criteria_for("colour"), criteria_for("color"));
        assert!(criteria_for("weather").is_none());
    }

    #[test]
    fn test_unknown_topic_is_an_error() {
        let cat = catalog::global().unwrap();
        assert!(matches!(
            cat.for_topic("weather"),
            Err(crate::error::WcagError::UnknownTopic(_))
        ));
    }
}
