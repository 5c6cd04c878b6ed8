//! Incident classification through the AI boundary.
//!
//! The model is asked for a strict JSON object; whatever comes back is
//! cleaned, parsed and normalised before it reaches the database.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domains::incidents::models::{
    normalize_category, normalize_severity, AiAnalysis, DEFAULT_SUMMARY,
};
use crate::kernel::BaseAI;

#[derive(Error, Debug)]
pub enum ClassificationError {
    #[error("AI request failed: {0}")]
    Ai(#[source] anyhow::Error),

    #[error("AI response is not a JSON object: {0}")]
    InvalidJson(String),
}

pub fn build_prompt(description: &str) -> String {
    format!(
        "You are PulseAI, a city management assistant. Analyze the following citizen report: \"{}\". \
         Respond in a strict JSON format with no extra text, comments, or markdown ticks before or after the JSON object. \
         The JSON must have \"summary\" (string), \"category\" (string from 'Traffic', 'Power Outage', 'Water Issue', \
         'Public Unrest', 'Infrastructure', 'Other'), and \"severity\" (number from 1-5). \
         Example: {{ \"summary\": \"Flooding on Main St.\", \"category\": \"Water Issue\", \"severity\": 4 }}",
        description
    )
}

/// Strip markdown fences and any prose around the outermost object
pub fn clean_response(text: &str) -> String {
    let stripped = text.replace("```json", "").replace("```", "");
    let trimmed = stripped.trim();

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => trimmed[start..=end].to_string(),
        _ => trimmed.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    severity: Option<Value>,
}

fn severity_value(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

pub fn parse_analysis(text: &str) -> Result<AiAnalysis, ClassificationError> {
    let cleaned = clean_response(text);
    let raw: RawAnalysis = serde_json::from_str(&cleaned)
        .map_err(|e| ClassificationError::InvalidJson(e.to_string()))?;

    let summary = raw
        .summary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SUMMARY.to_string());

    Ok(AiAnalysis {
        summary,
        category: normalize_category(raw.category.as_deref()),
        severity: normalize_severity(severity_value(raw.severity.as_ref())),
    })
}

pub async fn classify(ai: &dyn BaseAI, description: &str) -> Result<AiAnalysis, ClassificationError> {
    let response = ai
        .complete_json(&build_prompt(description))
        .await
        .map_err(ClassificationError::Ai)?;

    debug!(response = %response, "Received raw classifier response");

    parse_analysis(&response).map_err(|e| {
        warn!(error = %e, "Classifier returned unparseable response");
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::MockAI;

    #[test]
    fn test_prompt_embeds_description() {
        let prompt = build_prompt("Water main burst on MG Road");
        assert!(prompt.starts_with("You are PulseAI, a city management assistant."));
        assert!(prompt.contains("\"Water main burst on MG Road\""));
        assert!(prompt.contains("{ \"summary\": \"Flooding on Main St.\""));
    }

    #[test]
    fn test_clean_response_strips_fences() {
        let raw = "```json\n{\"summary\":\"x\",\"category\":\"Traffic\",\"severity\":2}\n```";
        assert_eq!(
            clean_response(raw),
            "{\"summary\":\"x\",\"category\":\"Traffic\",\"severity\":2}"
        );
    }

    #[test]
    fn test_clean_response_drops_prose() {
        let raw = "Sure! Here it is: {\"severity\": 1} Hope that helps.";
        assert_eq!(clean_response(raw), "{\"severity\": 1}");
    }

    #[test]
    fn test_parse_analysis_numeric_string_severity() {
        let analysis =
            parse_analysis(r#"{"summary":"Signal down","category":"traffic","severity":"4"}"#)
                .unwrap();
        assert_eq!(analysis.summary, "Signal down");
        assert_eq!(analysis.category, "Traffic");
        assert_eq!(analysis.severity, 4);
    }

    #[test]
    fn test_parse_analysis_defaults() {
        let analysis = parse_analysis(r#"{"category":"Meteor strike","severity":12.2}"#).unwrap();
        assert_eq!(analysis.summary, "Manual analysis");
        assert_eq!(analysis.category, "Other");
        assert_eq!(analysis.severity, 5);
    }

    #[test]
    fn test_parse_analysis_rejects_non_json() {
        assert!(matches!(
            parse_analysis("I could not understand the report."),
            Err(ClassificationError::InvalidJson(_))
        ));
    }

    #[tokio::test]
    async fn test_classify_uses_ai() {
        let ai = MockAI::new().with_response(
            "```json\n{\"summary\":\"Power cut in sector 4\",\"category\":\"Power Outage\",\"severity\":3}\n```",
        );

        let analysis = classify(&ai, "No electricity since morning").await.unwrap();

        assert_eq!(analysis.category, "Power Outage");
        assert_eq!(ai.call_count(), 1);
        assert!(ai.prompts()[0].contains("No electricity since morning"));
    }

    #[tokio::test]
    async fn test_classify_ai_failure() {
        let ai = MockAI::new().with_failure("quota exceeded");
        assert!(matches!(
            classify(&ai, "anything").await,
            Err(ClassificationError::Ai(_))
        ));
    }
}
