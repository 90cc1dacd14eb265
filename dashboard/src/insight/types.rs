use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The four fixed audiences insights are segmented by, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamKey {
    Product,
    Business,
    Tech,
    Marketing,
}

impl TeamKey {
    /// Fixed display order: product, business, tech, marketing.
    pub const ALL: [TeamKey; 4] = [
        TeamKey::Product,
        TeamKey::Business,
        TeamKey::Tech,
        TeamKey::Marketing,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            TeamKey::Product => "product",
            TeamKey::Business => "business",
            TeamKey::Tech => "tech",
            TeamKey::Marketing => "marketing",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TeamKey::Product => "Product Team",
            TeamKey::Business => "Business Team",
            TeamKey::Tech => "Tech Team",
            TeamKey::Marketing => "Marketing Team",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TeamKey::Product => "🎯",
            TeamKey::Business => "💼",
            TeamKey::Tech => "⚙️",
            TeamKey::Marketing => "📢",
        }
    }

    pub fn parse(s: &str) -> Option<TeamKey> {
        match s.trim().to_ascii_lowercase().as_str() {
            "product" => Some(TeamKey::Product),
            "business" => Some(TeamKey::Business),
            "tech" => Some(TeamKey::Tech),
            "marketing" => Some(TeamKey::Marketing),
            _ => None,
        }
    }
}

impl fmt::Display for TeamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Structured result of one analysis, as returned by the model.
///
/// `valid` is deliberately non-defaulted: a reply missing it does not
/// deserialize and is routed through the textual fallback instead of being
/// silently trusted. Keys outside the four team keys are carried but
/// ignored by the renderer.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisResult {
    pub valid: bool,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub insights: serde_json::Map<String, Value>,
}

impl AnalysisResult {
    pub fn insight(&self, team: TeamKey) -> Option<&Value> {
        self.insights.get(team.key())
    }
}
