//! Typed parsing of reasoning-service responses.
//!
//! The service returns free-form text that should contain JSON matching a
//! documented schema. Responses are validated through serde structs before
//! use; a mismatch is an explicit error the caller recovers from, never a
//! crash.

use serde::Deserialize;

use crate::error::Result;
use crate::types::{
    entity::{Entity, EntityKind},
    issue::Verdict,
};

/// Strip a surrounding markdown code fence, if present.
///
/// Models frequently wrap JSON in ```json fences despite instructions.
pub fn strip_code_fences(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[derive(Deserialize)]
struct EntitiesResponse {
    #[serde(default)]
    entities: Vec<RawEntity>,
}

#[derive(Deserialize)]
struct RawEntity {
    #[serde(default)]
    id: String,
    text: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    context: String,
}

/// Parse the extraction response into entities.
///
/// Ids are carried through as-is; the pipeline re-keys them. Kind labels
/// outside the documented set degrade to `assertion` rather than failing
/// the whole extraction.
pub fn parse_entities_response(response: &str) -> Result<Vec<Entity>> {
    let parsed: EntitiesResponse = parse_json(response)?;

    Ok(parsed
        .entities
        .into_iter()
        .map(|raw| Entity {
            id: raw.id,
            text: raw.text,
            kind: EntityKind::parse(&raw.kind).unwrap_or(EntityKind::Assertion),
            context: raw.context,
            source: None,
        })
        .collect())
}

#[derive(Deserialize)]
struct RawVerdict {
    consistent: bool,
    #[serde(default)]
    reason: String,
    #[serde(default = "default_verdict_confidence")]
    confidence: f32,
}

fn default_verdict_confidence() -> f32 {
    0.5
}

/// Parse the verification response into a verdict.
///
/// Confidence is clamped into [0, 1].
pub fn parse_verdict_response(response: &str) -> Result<Verdict> {
    let raw: RawVerdict = parse_json(response)?;

    Ok(Verdict {
        consistent: raw.consistent,
        reason: raw.reason,
        confidence: raw.confidence.clamp(0.0, 1.0),
    })
}

/// Parse JSON, retrying with code fences stripped.
fn parse_json<T: for<'de> Deserialize<'de>>(response: &str) -> Result<T> {
    match serde_json::from_str(response) {
        Ok(value) => Ok(value),
        Err(_) => Ok(serde_json::from_str(strip_code_fences(response))?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_entities_json() {
        let response = r#"{"entities": [
            {"id": "entity_1", "text": "E = mc^2", "type": "equation", "context": "relativity"},
            {"id": "entity_2", "text": "c is 299792 km/s", "type": "value"}
        ]}"#;

        let entities = parse_entities_response(response).unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].kind, EntityKind::Equation);
        assert_eq!(entities[0].context, "relativity");
        assert_eq!(entities[1].kind, EntityKind::Value);
        assert!(entities[1].source.is_none());
    }

    #[test]
    fn parses_fenced_json() {
        let response = "```json\n{\"entities\": [{\"text\": \"gravity\", \"type\": \"concept\"}]}\n```";
        let entities = parse_entities_response(response).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].kind, EntityKind::Concept);
    }

    #[test]
    fn unknown_kind_degrades_to_assertion() {
        let response = r#"{"entities": [{"text": "something", "type": "observation"}]}"#;
        let entities = parse_entities_response(response).unwrap();
        assert_eq!(entities[0].kind, EntityKind::Assertion);
    }

    #[test]
    fn missing_entities_field_yields_empty_list() {
        let entities = parse_entities_response("{}").unwrap();
        assert!(entities.is_empty());
    }

    #[test]
    fn non_json_is_an_error() {
        assert!(parse_entities_response("I could not find any entities.").is_err());
        assert!(parse_verdict_response("not json").is_err());
    }

    #[test]
    fn parses_verdict_and_clamps_confidence() {
        let verdict = parse_verdict_response(
            r#"{"consistent": false, "reason": "values differ", "confidence": 1.7}"#,
        )
        .unwrap();
        assert!(!verdict.consistent);
        assert_eq!(verdict.reason, "values differ");
        assert_eq!(verdict.confidence, 1.0);

        let verdict =
            parse_verdict_response(r#"{"consistent": true, "confidence": -0.2}"#).unwrap();
        assert_eq!(verdict.confidence, 0.0);
    }

    #[test]
    fn verdict_without_confidence_defaults_to_midpoint() {
        let verdict = parse_verdict_response(r#"{"consistent": true}"#).unwrap();
        assert_eq!(verdict.confidence, 0.5);
    }
}
