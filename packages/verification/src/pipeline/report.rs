//! Report synthesis: domain tagging, keyword tags, summary fallback, and
//! plain-text export.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::types::{
    entity::Entity,
    report::{Report, RunStatistics},
};

/// Keyword substring -> domain label.
///
/// A deliberately naive heuristic; labels are kept in the product's
/// original French.
pub const DOMAIN_KEYWORDS: &[(&str, &str)] = &[
    ("math", "Mathématiques"),
    ("phys", "Physique"),
    ("bio", "Biologie"),
    ("chem", "Chimie"),
    ("éco", "Économie"),
];

/// Detect coarse subject-matter domains across the main entities.
///
/// Each domain appears at most once; order follows the keyword table.
pub fn detect_domains(entities: &[Entity]) -> Vec<String> {
    let mut domains = Vec::new();
    for (keyword, label) in DOMAIN_KEYWORDS {
        let found = entities
            .iter()
            .any(|e| e.text.to_lowercase().contains(keyword));
        if found && !domains.iter().any(|d| d == label) {
            domains.push((*label).to_string());
        }
    }
    domains
}

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid regex"))
}

/// Extract the tags produced by one entity.
///
/// Every numeric literal becomes a `value:<number>` tag and every
/// whitespace-delimited token longer than 3 characters becomes a
/// `concept:<token>` tag.
pub fn entity_tags(entity: &Entity) -> Vec<String> {
    let text = entity.text.to_lowercase();
    let mut tags = Vec::new();

    for number in number_pattern().find_iter(&text) {
        tags.push(format!("value:{}", number.as_str()));
    }

    for word in text.split_whitespace() {
        if word.chars().count() > 3 {
            tags.push(format!("concept:{word}"));
        }
    }

    tags
}

/// Build the tag -> entity-id mapping for the main entities.
///
/// Insertion order of first appearance is preserved per tag; an entity
/// producing the same tag twice contributes its id twice.
pub fn collect_tags(entities: &[Entity]) -> IndexMap<String, Vec<String>> {
    let mut tags: IndexMap<String, Vec<String>> = IndexMap::new();

    for entity in entities {
        for tag in entity_tags(entity) {
            tags.entry(tag).or_default().push(entity.id.clone());
        }
    }

    tags
}

/// Template summary built from the run counts alone.
///
/// Used when the reasoning service cannot provide a narrative.
pub fn fallback_summary(statistics: &RunStatistics) -> String {
    format!(
        "Analysis of {} entities across {} segments. {} issues detected over {} verifications.",
        statistics.entities, statistics.segments, statistics.issues, statistics.verifications
    )
}

/// Render a report as a plain-text document for export.
///
/// Layout: header line, ISO-8601 timestamp, summary block, statistics
/// block, then one numbered entry per issue with its message, entity text,
/// and confidence percentage.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    out.push_str("DOCUMENT ANALYSIS REPORT\n");
    out.push_str(&format!(
        "Generated: {}\n\n",
        report.generated_at.to_rfc3339()
    ));
    out.push_str(&format!("SUMMARY:\n{}\n\n", report.summary));
    out.push_str("STATISTICS:\n");
    out.push_str(&format!("- Entities: {}\n", report.statistics.entities));
    out.push_str(&format!("- Segments: {}\n", report.statistics.segments));
    out.push_str(&format!(
        "- Verifications: {}\n",
        report.statistics.verifications
    ));
    out.push_str(&format!("- Issues: {}\n\n", report.statistics.issues));

    out.push_str("DETECTED ISSUES:\n");
    for (i, record) in report.verifications.iter().enumerate() {
        for (j, issue) in record.issues.iter().enumerate() {
            out.push_str(&format!("{}.{} {}\n", i + 1, j + 1, issue.message));
            out.push_str(&format!("    Entity: {}\n", issue.entity.text));
            out.push_str(&format!(
                "    Confidence: {:.0}%\n\n",
                issue.confidence * 100.0
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::entity::EntityKind;
    use crate::types::issue::{Issue, IssueKind, VerificationRecord};
    use crate::types::segment::Segment;
    use chrono::TimeZone;

    fn concept(id: &str, text: &str) -> Entity {
        Entity::new(id, text, EntityKind::Concept)
    }

    #[test]
    fn detects_domains_once_each() {
        let entities = vec![
            concept("entity_0", "Applied MATHematics and physics"),
            concept("entity_1", "more mathematics"),
            concept("entity_2", "économie politique"),
        ];

        let domains = detect_domains(&entities);
        assert_eq!(domains, ["Mathématiques", "Physique", "Économie"]);
    }

    #[test]
    fn no_entities_no_domains() {
        assert!(detect_domains(&[]).is_empty());
    }

    #[test]
    fn tags_cover_numbers_and_long_tokens() {
        let entity = concept("entity_0", "Water boils at 100 degrees or 212.5 F");
        let tags = entity_tags(&entity);

        assert!(tags.contains(&"value:100".to_string()));
        assert!(tags.contains(&"value:212.5".to_string()));
        assert!(tags.contains(&"concept:water".to_string()));
        assert!(tags.contains(&"concept:boils".to_string()));
        assert!(tags.contains(&"concept:degrees".to_string()));
        // Tokens of 3 characters or fewer are skipped.
        assert!(!tags.iter().any(|t| t == "concept:at" || t == "concept:or"));
    }

    #[test]
    fn tag_map_preserves_first_appearance_order() {
        let entities = vec![
            concept("entity_0", "gravity bends light"),
            concept("entity_1", "light carries energy"),
        ];

        let tags = collect_tags(&entities);
        let keys: Vec<_> = tags.keys().cloned().collect();
        assert_eq!(
            keys,
            [
                "concept:gravity",
                "concept:bends",
                "concept:light",
                "concept:carries",
                "concept:energy"
            ]
        );
        assert_eq!(tags["concept:light"], vec!["entity_0", "entity_1"]);
    }

    #[test]
    fn fallback_summary_uses_counts() {
        let statistics = RunStatistics {
            entities: 7,
            reference_entities: 3,
            segments: 1,
            verifications: 7,
            issues: 2,
        };
        let summary = fallback_summary(&statistics);
        assert!(summary.contains("7 entities"));
        assert!(summary.contains("1 segments"));
        assert!(summary.contains("2 issues"));
    }

    #[test]
    fn rendered_report_has_expected_layout() {
        let entity = concept("entity_0", "the earth is flat");
        let segment = Segment {
            id: "segment_0".to_string(),
            entities: vec![entity.clone()],
            start_index: 0,
            end_index: 1,
        };
        let issue = Issue {
            kind: IssueKind::Error,
            entity,
            message: "contradicts the reference".to_string(),
            references: vec![],
            confidence: 0.25,
        };
        let report = Report {
            generated_at: chrono::Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap(),
            summary: "One inconsistency found.".to_string(),
            domains: vec![],
            tags: IndexMap::new(),
            statistics: RunStatistics {
                entities: 1,
                reference_entities: 1,
                segments: 1,
                verifications: 1,
                issues: 1,
            },
            verifications: vec![VerificationRecord {
                segment,
                issues: vec![issue],
                confidence: 0.25,
                verified: false,
            }],
        };

        let text = render_text(&report);
        assert!(text.starts_with("DOCUMENT ANALYSIS REPORT\n"));
        assert!(text.contains("Generated: 2026-08-07T12:00:00+00:00"));
        assert!(text.contains("SUMMARY:\nOne inconsistency found."));
        assert!(text.contains("- Entities: 1"));
        assert!(text.contains("- Verifications: 1"));
        assert!(text.contains("1.1 contradicts the reference"));
        assert!(text.contains("    Entity: the earth is flat"));
        assert!(text.contains("    Confidence: 25%"));
    }
}
