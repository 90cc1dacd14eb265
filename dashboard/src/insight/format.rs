use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static H3_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"###\s+([^\n]+)").unwrap());
static H2_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"##\s+([^\n]+)").unwrap());

pub const NO_INSIGHTS: &str = "<p>No insights available</p>";

/// True when a payload would render nothing: absent, null, or an empty
/// string (the fallback extractor fills unmatched teams with "").
pub fn payload_is_empty(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Convert one team's insight payload (text, sequence, or nested record)
/// into display-ready markup. Pure and deterministic.
pub fn format_insight(payload: &Value) -> String {
    if payload_is_empty(payload) {
        return NO_INSIGHTS.to_string();
    }

    let text = match payload {
        Value::Object(record) => record_to_text(record),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .collect::<Vec<_>>()
            .join("\n\n"),
        other => value_to_text(other),
    };

    markdown_to_markup(&text)
}

/// Recursively flatten a nested record into markdown-ish text: each key
/// becomes a `## ` heading, sequences become bullet lines, scalars print
/// as-is. Keys are visited in insertion order.
pub fn record_to_text(record: &serde_json::Map<String, Value>) -> String {
    let mut out = String::new();

    for (key, value) in record {
        out.push_str("## ");
        out.push_str(&humanize_key(key));
        out.push_str("\n\n");

        match value {
            Value::Object(nested) => {
                out.push_str(&record_to_text(nested));
                out.push_str("\n\n");
            }
            Value::Array(items) => {
                for item in items {
                    out.push_str("• ");
                    out.push_str(&value_to_text(item));
                    out.push('\n');
                }
                out.push('\n');
            }
            other => {
                out.push_str(&value_to_text(other));
                out.push_str("\n\n");
            }
        }
    }

    out
}

/// `key_findings` -> `Key Findings`. A word starts wherever the previous
/// character is not alphanumeric; acronyms get no special treatment.
fn humanize_key(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut out = String::with_capacity(spaced.len());
    let mut boundary = true;
    for ch in spaced.chars() {
        if boundary {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        boundary = !ch.is_alphanumeric();
    }
    out
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Markdown-to-markup pass. Replacement order matters: emphasis first so
/// heading/paragraph wrapping sees the finished inline markup, then block
/// structure. This is a line/regex pass, not a markdown parser: no nested
/// emphasis, lists, links, or escaping.
pub fn markdown_to_markup(text: &str) -> String {
    let html = BOLD_RE.replace_all(text, "<strong>$1</strong>");
    let html = ITALIC_RE.replace_all(&html, "<em>$1</em>");
    let html = H3_RE.replace_all(&html, "<h3>$1</h3>");
    let html = H2_RE.replace_all(&html, "<h3>$1</h3>");
    let html = html.replace("\n\n", "</p><p>");
    let html = html.replace('\n', "<br>");

    // Wrap whatever is left that is not already a heading or paragraph.
    let html = html
        .lines()
        .map(|line| {
            if line.is_empty() || line.starts_with("<h3>") || line.starts_with("<p>") {
                line.to_string()
            } else {
                format!("<p>{line}</p>")
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    html.replace("<p></p>", "")
}
