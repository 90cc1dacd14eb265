pub mod extract;
pub mod format;
pub mod types;

pub use extract::extract_result;
pub use format::format_insight;
pub use types::{AnalysisResult, TeamKey};
