use crate::insight::types::AnalysisResult;
use serde_json::Value;
use tracing::debug;

/// Best-effort extraction of a structured [`AnalysisResult`] from the
/// model's free-form reply. Never fails: anything that does not parse
/// cleanly degrades into the textual fallback so the caller always has
/// something to show.
pub fn extract_result(reply: &str) -> AnalysisResult {
    let candidate = extract_json_candidate(reply);

    match serde_json::from_str::<AnalysisResult>(&candidate) {
        Ok(result) => result,
        Err(e) => {
            debug!(
                "Insight JSON parse failed ({e}), using textual fallback | text: {}",
                &candidate[..candidate.len().min(200)]
            );
            fallback_result(reply)
        }
    }
}

/// Locate the JSON payload inside the reply: a ```json fence wins, then the
/// first balanced top-level object, then the whole reply as-is.
fn extract_json_candidate(text: &str) -> String {
    if let Some(s) = text.find("```json") {
        let after = &text[s + 7..];
        if let Some(e) = after.find("```") {
            return after[..e].trim().to_string();
        }
    }

    if let Some(start) = text.find('{') {
        let mut depth = 0;
        for (i, ch) in text[start..].char_indices() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return text[start..=start + i].to_string();
                    }
                }
                _ => {}
            }
        }
    }

    text.to_string()
}

/// Low-confidence fallback when the reply is not clean JSON. The reply is
/// scanned for the INVALID_DATA marker; insights are populated so the UI
/// has something to render rather than erroring outright.
fn fallback_result(reply: &str) -> AnalysisResult {
    let invalid = reply.contains("INVALID_DATA");

    let mut insights = serde_json::Map::new();
    let product = if reply.contains("Product") {
        reply.to_string()
    } else {
        "Unable to parse insights".to_string()
    };
    insights.insert("product".to_string(), Value::String(product));
    insights.insert("business".to_string(), Value::String(String::new()));
    insights.insert("tech".to_string(), Value::String(String::new()));
    insights.insert("marketing".to_string(), Value::String(String::new()));

    AnalysisResult {
        valid: !invalid,
        error_message: invalid.then(|| reply.to_string()),
        insights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_block_wins() {
        let reply = "Here is the analysis:\n```json\n{\"valid\":true,\"insights\":{}}\n```\nHope it helps.";
        let result = extract_result(reply);
        assert!(result.valid);
        assert!(result.error_message.is_none());
        assert!(result.insights.is_empty());
    }

    #[test]
    fn bare_object_is_found() {
        let reply = "Sure! {\"valid\": true, \"insights\": {\"tech\": \"All good\"}} — done.";
        let result = extract_result(reply);
        assert!(result.valid);
        assert_eq!(
            result.insights.get("tech").and_then(|v| v.as_str()),
            Some("All good")
        );
    }

    #[test]
    fn nested_braces_stay_balanced() {
        let reply = r#"{"valid":true,"insights":{"product":{"priority":"High"}}} trailing"#;
        let result = extract_result(reply);
        assert_eq!(
            result.insights["product"]["priority"].as_str(),
            Some("High")
        );
    }

    #[test]
    fn invalid_data_marker_triggers_fallback() {
        let reply = "INVALID_DATA: missing sessions";
        let result = extract_result(reply);
        assert!(!result.valid);
        assert_eq!(
            result.error_message.as_deref(),
            Some("INVALID_DATA: missing sessions")
        );
    }

    #[test]
    fn unparseable_reply_without_marker_stays_valid() {
        let reply = "The Product team should look into checkout drop-off.";
        let result = extract_result(reply);
        assert!(result.valid);
        assert!(result.error_message.is_none());
        // Reply mentions "Product", so it lands on the product card verbatim.
        assert_eq!(
            result.insights.get("product").and_then(|v| v.as_str()),
            Some(reply)
        );
        assert_eq!(
            result.insights.get("business").and_then(|v| v.as_str()),
            Some("")
        );
    }

    #[test]
    fn missing_valid_field_routes_through_fallback() {
        // Well-formed JSON but no `valid` key: treated as a parse failure.
        let reply = r#"{"insights":{"product":"looks fine"}}"#;
        let result = extract_result(reply);
        assert!(result.valid);
        assert_eq!(
            result.insights.get("business").and_then(|v| v.as_str()),
            Some("")
        );
    }
}
