use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{EventId, FestivalDate, LineupId, SignupToken, TicketId};

/// Body of both `POST /user/dku/verify` and `POST /user/dku/refresh`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DkuVerificationRequest {
    pub dku_student_id: String,
    pub dku_password: String,
}

impl std::fmt::Debug for DkuVerificationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DkuVerificationRequest")
            .field("dku_student_id", &self.dku_student_id)
            .field("dku_password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub student_name: String,
    pub student_id: String,
    pub age: String,
    pub gender: String,
    pub major: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DkuVerificationResponse {
    pub signup_token: SignupToken,
    pub student: StudentProfile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FestivalEvent {
    pub id: EventId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub festival_date: Option<FestivalDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticketing_opens_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketInfo {
    pub id: TicketId,
    pub name: String,
    pub major: String,
    pub student_id: String,
    /// Whether the physical ticket has been handed out.
    pub issued: bool,
    /// Position in the waiting queue.
    pub turn: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineupInfo {
    pub id: LineupId,
    pub singer: String,
    pub festival_date: FestivalDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_time: Option<DateTime<Utc>>,
}
