use thiserror::Error;

/// Everything that can stop an analysis, classified for user display.
/// None of these are retried automatically; the caller surfaces a single
/// notice and returns the app to its pre-analysis state.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Caught before any network call (no file, no API key, bad file type).
    #[error("{title}: {message}")]
    Validation { title: String, message: String },

    /// Non-success HTTP status (or transport failure) from the Gemini API.
    #[error("{0}")]
    Api(String),

    /// API failure whose message mentions quota/limit/rate.
    #[error("{0}")]
    QuotaExceeded(String),

    /// Success status but the candidates/content/parts/text path is missing.
    #[error("Invalid response from Gemini API")]
    MalformedResponse,

    /// The model judged the uploaded data insufficient (`valid: false`).
    #[error("{0}")]
    InvalidInputData(String),
}

impl DashboardError {
    pub fn validation(title: &str, message: &str) -> Self {
        Self::Validation {
            title: title.to_string(),
            message: message.to_string(),
        }
    }
}

/// User-facing notice: icon + title + message, one per failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub icon: &'static str,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn from_error(err: &DashboardError) -> Self {
        match err {
            DashboardError::Validation { title, message } => Self {
                icon: "❌",
                title: title.clone(),
                message: message.clone(),
            },
            DashboardError::Api(message) => Self {
                icon: "❌",
                title: "Analysis Failed".to_string(),
                message: format!(
                    "An error occurred while analyzing your data: {message}. \
                     Please check your API key and try again."
                ),
            },
            DashboardError::QuotaExceeded(_) => Self {
                icon: "❌",
                title: "Quota Exceeded".to_string(),
                message: "Quota is completed. Please enter a new API key, obtain from Google AI Studio."
                    .to_string(),
            },
            DashboardError::MalformedResponse => Self {
                icon: "❌",
                title: "Analysis Failed".to_string(),
                message: format!(
                    "An error occurred while analyzing your data: {err}. \
                     Please check your API key and try again."
                ),
            },
            DashboardError::InvalidInputData(message) => Self {
                icon: "⚠️",
                title: "Invalid Analytics Data".to_string(),
                message: message.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_notice_uses_fixed_copy() {
        let err = DashboardError::QuotaExceeded("Quota exceeded for requests".to_string());
        let notice = Notice::from_error(&err);
        assert_eq!(notice.title, "Quota Exceeded");
        assert!(notice.message.contains("Google AI Studio"));
    }

    #[test]
    fn api_notice_embeds_message() {
        let err = DashboardError::Api("API Error: 500 Internal Server Error".to_string());
        let notice = Notice::from_error(&err);
        assert_eq!(notice.title, "Analysis Failed");
        assert!(notice.message.contains("API Error: 500 Internal Server Error"));
    }
}
