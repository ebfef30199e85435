// models.rs
use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Where a poll sits in its open window.
///
/// The API reports this in two vocabularies (`draft|active|completed` from the
/// admin side, `upcoming|active|past` from the listing side); both are accepted
/// and collapse onto these three states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollStatus {
    NotStarted,
    Open,
    Closed,
}

impl PollStatus {
    pub const ACCEPTED: &'static [&'static str] =
        &["draft", "upcoming", "active", "completed", "past"];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "draft" | "upcoming" => Some(Self::NotStarted),
            "active" => Some(Self::Open),
            "completed" | "past" => Some(Self::Closed),
            _ => None,
        }
    }

    /// Wire name, in the admin vocabulary.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "draft",
            Self::Open => "active",
            Self::Closed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Draft",
            Self::Open => "Active",
            Self::Closed => "Completed",
        }
    }
}

impl Serialize for PollStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PollStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        PollStatus::parse(&raw)
            .ok_or_else(|| serde::de::Error::unknown_variant(&raw, PollStatus::ACCEPTED))
    }
}

/// A poll as returned by `GET /admin/myQuestions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "question")]
    pub question_text: String,
    pub options: Vec<String>,
    pub start_time: String,
    pub duration: u32,
    pub status: PollStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<HashMap<String, u64>>,
}

/// Body of `POST /admin/questionUpload`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollRequest {
    pub question: String,
    pub options: Vec<String>,
    pub start_time: String,
    pub duration: u32,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Presentation colors for a voting widget option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamColors {
    pub primary: String,
    pub secondary: String,
}

/// One answer in the voting widget's fixture poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollOption {
    pub id: String,
    pub text: String,
    pub votes: u64,
    pub logo: String,
    pub colors: TeamColors,
}
