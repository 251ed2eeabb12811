use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::datetime::parse_canonical_date;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    InProgress,
    Pending,
    OnHold,
    Done,
}

impl Status {
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Pending => "pending",
            Self::OnHold => "on_hold",
            Self::Done => "done",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::InProgress => "in progress",
            Self::Pending => "pending",
            Self::OnHold => "on hold",
            Self::Done => "done",
        }
    }
}

impl std::str::FromStr for Status {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "in_progress" | "in-progress" => Ok(Self::InProgress),
            "pending" => Ok(Self::Pending),
            "on_hold" | "on-hold" => Ok(Self::OnHold),
            "done" => Ok(Self::Done),
            other => Err(anyhow::anyhow!("unknown status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskRecord {
    pub uuid: Uuid,

    pub title: String,

    pub date: String,

    #[serde(default)]
    pub client: String,

    #[serde(default)]
    pub owner: String,

    #[serde(default)]
    pub status: Status,

    #[serde(default)]
    pub completed: bool,
}

impl TaskRecord {
    // Validated dates always parse; anything else can only come from a
    // hand-edited blob, which the store deliberately does not re-check.
    pub fn due_date(&self) -> Option<chrono::NaiveDate> {
        parse_canonical_date(&self.date)
    }

    pub fn search_haystack(&self) -> String {
        format!("{} {} {}", self.title, self.client, self.owner)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub title: String,
    pub date: String,
    pub client: String,
    pub owner: String,
    pub status: Option<Status>,
}
