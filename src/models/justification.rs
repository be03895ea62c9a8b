use serde::Serialize;

/// Standardized justification categories for late arrivals and early
/// departures. Free text always travels alongside the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JustificationCategory {
    Traffic,
    Health,
    Transport,
    Permits,
    Weather,
    Other,
}

impl JustificationCategory {
    pub fn code(&self) -> &'static str {
        match self {
            JustificationCategory::Traffic => "traffic",
            JustificationCategory::Health => "health",
            JustificationCategory::Transport => "transport",
            JustificationCategory::Permits => "permits",
            JustificationCategory::Weather => "weather",
            JustificationCategory::Other => "other",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "traffic" => Some(JustificationCategory::Traffic),
            "health" => Some(JustificationCategory::Health),
            "transport" => Some(JustificationCategory::Transport),
            "permits" => Some(JustificationCategory::Permits),
            "weather" => Some(JustificationCategory::Weather),
            "other" => Some(JustificationCategory::Other),
            _ => None,
        }
    }
}
