use serde::{Deserialize, Serialize};

// ============================================================================
// Calendar API Types
// ============================================================================

/// Client-visible metadata for one configured calendar.
///
/// The upstream feed url is deliberately absent: it is a secret held by the
/// server only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarInfo {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// One entry of the `/api/calendars/all` response.
///
/// Exactly one of `data` and `error` is set. Both are always serialized, the
/// unset one as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarResult {
    pub id: String,
    pub name: String,
    pub color: String,
    pub data: Option<String>,
    pub error: Option<String>,
}

impl CalendarResult {
    pub fn success(info: CalendarInfo, data: impl Into<String>) -> Self {
        Self {
            id: info.id,
            name: info.name,
            color: info.color,
            data: Some(data.into()),
            error: None,
        }
    }

    pub fn failure(info: CalendarInfo, error: impl Into<String>) -> Self {
        Self {
            id: info.id,
            name: info.name,
            color: info.color,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.data.is_some()
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}
