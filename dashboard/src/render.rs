use crate::config::SelectedTeams;
use crate::input::UploadedFile;
use crate::insight::format::{format_insight, payload_is_empty};
use crate::insight::{AnalysisResult, TeamKey};
use std::time::Duration;

/// One render-ready team card: markup for the report, plain text for the
/// terminal and for email share.
#[derive(Debug, Clone)]
pub struct InsightCard {
    pub team: TeamKey,
    pub html: String,
    pub text: String,
}

/// Build the cards for an analysis result: fixed team order, deselected
/// teams skipped, teams with no payload (or an empty one) skipped. Keys
/// outside the four team keys are ignored.
pub fn build_cards(result: &AnalysisResult, selected: &SelectedTeams) -> Vec<InsightCard> {
    let mut cards = Vec::new();

    for team in TeamKey::ALL {
        if !selected.is_selected(team) {
            continue;
        }
        let payload = match result.insight(team) {
            Some(p) if !payload_is_empty(p) => p,
            _ => continue,
        };

        let html = format_insight(payload);
        let text = markup_to_plain(&html);
        cards.push(InsightCard { team, html, text });
    }

    cards
}

/// Flatten card markup back to readable text (share/terminal form).
pub fn markup_to_plain(html: &str) -> String {
    html.replace("</p><p>", "\n\n")
        .replace("<br>", "\n")
        .replace("</h3>", "\n")
        .replace("</p>", "\n")
        .replace("<h3>", "")
        .replace("<p>", "")
        .replace("<strong>", "")
        .replace("</strong>", "")
        .replace("<em>", "")
        .replace("</em>", "")
        .trim()
        .to_string()
}

const REPORT_HEAD: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>AI Analytics Insights</title>
<style>
* { margin: 0; padding: 0; box-sizing: border-box; }
body { background: #0a0e17; color: #c9d1d9; font-family: 'Segoe UI', 'Helvetica Neue', Arial, sans-serif; font-size: 14px; padding: 24px; }
.header { margin-bottom: 20px; }
.header h1 { font-size: 20px; color: #58a6ff; font-weight: 600; }
.header .meta { color: #8b949e; font-size: 12px; margin-top: 6px; }
.insights-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(340px, 1fr)); gap: 16px; }
.insight-card { background: #161b22; border: 1px solid #30363d; border-left: 3px solid #30363d; border-radius: 8px; padding: 18px; }
.insight-card.product { border-left-color: #58a6ff; }
.insight-card.business { border-left-color: #3fb950; }
.insight-card.tech { border-left-color: #bc8cff; }
.insight-card.marketing { border-left-color: #d29922; }
.team-badge { display: flex; align-items: center; gap: 8px; font-weight: 700; font-size: 15px; margin-bottom: 12px; }
.insight-content h3 { font-size: 13px; color: #58a6ff; margin: 12px 0 6px; text-transform: uppercase; letter-spacing: 0.5px; }
.insight-content p { margin: 6px 0; line-height: 1.5; }
.insight-content strong { color: #e6edf3; }
</style>
</head>
<body>
"##;

const REPORT_FOOT: &str = "</body>\n</html>\n";

/// Self-contained HTML report: header with file info + analysis duration,
/// then one card per selected team.
pub fn render_report(cards: &[InsightCard], file: &UploadedFile, duration: Duration) -> String {
    let mut out = String::from(REPORT_HEAD);

    out.push_str("<div class=\"header\">\n<h1>AI Analytics Insights</h1>\n");
    out.push_str(&format!(
        "<div class=\"meta\">{} ({}) — analysis done in {:.2} seconds — {}</div>\n</div>\n",
        file.name,
        file.size_label(),
        duration.as_secs_f64(),
        chrono::Local::now().format("%Y-%m-%d %H:%M"),
    ));

    out.push_str("<div class=\"insights-grid\">\n");
    for card in cards {
        out.push_str(&card_markup(card));
    }
    out.push_str("</div>\n");
    out.push_str(REPORT_FOOT);
    out
}

/// Standalone printable document for a single card.
pub fn export_card(card: &InsightCard) -> String {
    let mut out = String::from(REPORT_HEAD);
    out.push_str(&format!(
        "<div class=\"header\">\n<h1>AI Analytics Insights</h1>\n\
         <div class=\"meta\">Report for: {} — {}</div>\n</div>\n",
        card.team.display_name(),
        chrono::Local::now().format("%Y-%m-%d"),
    ));
    out.push_str(&card_markup(card));
    out.push_str(REPORT_FOOT);
    out
}

fn card_markup(card: &InsightCard) -> String {
    format!(
        "<div class=\"insight-card {key}\">\n\
         <div class=\"team-badge\"><span>{icon}</span><span>{name}</span></div>\n\
         <div class=\"insight-content\" id=\"content-{key}\">{content}</div>\n\
         </div>\n",
        key = card.team.key(),
        icon = card.team.icon(),
        name = card.team.display_name(),
        content = card.html,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::FileKind;
    use serde_json::json;

    fn result_with_all_teams() -> AnalysisResult {
        let raw = json!({
            "valid": true,
            "insights": {
                "product": "Product looks fine",
                "business": {"priority": "High"},
                "tech": ["Slow queries"],
                "marketing": "Double down on search"
            }
        });
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn deselected_teams_produce_no_cards() {
        let result = result_with_all_teams();
        let selected = SelectedTeams {
            product: true,
            business: false,
            tech: true,
            marketing: false,
        };

        let cards = build_cards(&result, &selected);
        let teams: Vec<TeamKey> = cards.iter().map(|c| c.team).collect();
        assert_eq!(teams, [TeamKey::Product, TeamKey::Tech]);
    }

    #[test]
    fn empty_and_missing_payloads_are_skipped() {
        let raw = json!({
            "valid": true,
            "insights": { "product": "Something", "business": "" }
        });
        let result: AnalysisResult = serde_json::from_value(raw).unwrap();

        let cards = build_cards(&result, &SelectedTeams::default());
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].team, TeamKey::Product);
    }

    #[test]
    fn unknown_insight_keys_are_ignored() {
        let raw = json!({
            "valid": true,
            "insights": { "sales": "Not a team", "tech": "Fix the index" }
        });
        let result: AnalysisResult = serde_json::from_value(raw).unwrap();

        let cards = build_cards(&result, &SelectedTeams::default());
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].team, TeamKey::Tech);
    }

    #[test]
    fn plain_text_form_drops_markup() {
        let raw = json!({
            "valid": true,
            "insights": { "product": {"key_findings": ["A", "B"], "priority": "High"} }
        });
        let result: AnalysisResult = serde_json::from_value(raw).unwrap();
        let cards = build_cards(&result, &SelectedTeams::default());

        let text = &cards[0].text;
        assert!(text.contains("Key Findings"));
        assert!(text.contains("• A"));
        assert!(text.contains("High"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn report_contains_badges_and_duration() {
        let result = result_with_all_teams();
        let cards = build_cards(&result, &SelectedTeams::default());
        let file = UploadedFile {
            name: "metrics.csv".into(),
            size_bytes: 2048,
            kind: FileKind::Csv,
            text: String::new(),
        };

        let report = render_report(&cards, &file, Duration::from_millis(2340));
        assert!(report.contains("Product Team"));
        assert!(report.contains("Marketing Team"));
        assert!(report.contains("analysis done in 2.34 seconds"));
        assert!(report.contains("metrics.csv"));
        assert!(report.contains("content-product"));
    }

    #[test]
    fn export_is_a_standalone_document() {
        let result = result_with_all_teams();
        let cards = build_cards(&result, &SelectedTeams::default());
        let doc = export_card(&cards[0]);
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("Report for: Product Team"));
    }
}
