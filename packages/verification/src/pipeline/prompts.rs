//! LLM prompts for the verification pipeline.

use crate::types::{entity::Entity, issue::SimilarEntity, report::RunStatistics};

/// System prompt for entity extraction.
pub const EXTRACT_ENTITIES_PROMPT: &str = r#"You are a document analysis expert. Analyze the provided text and extract every significant entity using this JSON format:
{
    "entities": [
        {
            "id": "entity_1",
            "text": "exact text of the entity",
            "type": "concept|value|equation|reference|assertion",
            "context": "immediate surrounding context"
        }
    ]
}

Extract facts, numeric values, equations, citations, and checkable claims. Only include entities explicitly present in the text."#;

/// System prompt for consistency verification.
pub const VERIFY_CONSISTENCY_PROMPT: &str = r#"You are a document consistency expert. Compare the assertion against the provided references and judge whether it is consistent with them.
Respond in JSON with this format:
{
    "consistent": true or false,
    "reason": "detailed explanation",
    "confidence": 0.8
}"#;

/// System prompt for the final narrative summary.
pub const SUMMARY_PROMPT: &str =
    "You are a document analysis expert. Write a concise, informative summary of the completed analysis.";

/// Format the user message for entity extraction.
pub fn format_extract_prompt(content: &str) -> String {
    format!("Analyze this text and extract every significant entity:\n\n{content}")
}

/// Format the user message for consistency verification.
pub fn format_verify_prompt(entity: &Entity, references: &[SimilarEntity]) -> String {
    let references_text = references
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "{}. {} (source: {})",
                i + 1,
                r.entity.text,
                r.entity.source.as_deref().unwrap_or("unknown")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Check the consistency of this assertion against the references below:\n\n\
         Assertion: \"{}\"\n\nReferences:\n{}",
        entity.text, references_text
    )
}

/// Format the user message for the run summary.
pub fn format_summary_prompt(statistics: &RunStatistics) -> String {
    format!(
        "Summarize this document analysis:\n\
         - {} entities analyzed\n\
         - {} segments processed\n\
         - {} verifications performed\n\
         - {} issues detected\n\n\
         Error rate: {:.1}%",
        statistics.entities,
        statistics.segments,
        statistics.verifications,
        statistics.issues,
        statistics.error_rate_percent()
    )
}
