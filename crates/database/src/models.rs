//! Database models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Moderation state shared by actions, resources and stories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModerationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ModerationStatus::Pending),
            "approved" => Ok(ModerationStatus::Approved),
            "rejected" => Ok(ModerationStatus::Rejected),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

/// Kind of record a comment or report points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TargetType {
    Action,
    Resource,
    Story,
}

impl TargetType {
    /// Table holding records of this kind.
    pub fn table(&self) -> &'static str {
        match self {
            TargetType::Action => "actions",
            TargetType::Resource => "resources",
            TargetType::Story => "stories",
        }
    }

    /// Entity name used in error messages.
    pub fn entity(&self) -> &'static str {
        match self {
            TargetType::Action => "Action",
            TargetType::Resource => "Resource",
            TargetType::Story => "Story",
        }
    }
}

impl FromStr for TargetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "action" => Ok(TargetType::Action),
            "resource" => Ok(TargetType::Resource),
            "story" => Ok(TargetType::Story),
            other => Err(format!("unknown target type '{}'", other)),
        }
    }
}

/// Review state of an abuse report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ReportStatus {
    Open,
    Resolved,
    Dismissed,
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(ReportStatus::Open),
            "resolved" => Ok(ReportStatus::Resolved),
            "dismissed" => Ok(ReportStatus::Dismissed),
            other => Err(format!("unknown report status '{}'", other)),
        }
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: String,
}

/// An event or campaign people can join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Action {
    pub id: i64,
    /// Submitting user.
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Free-text place name (city, venue).
    pub location: String,
    /// Country as typed by the submitter, not normalized.
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Event start, `YYYY-MM-DD HH:MM:SS`.
    pub start_date: Option<String>,
    pub status: ModerationStatus,
    pub created_at: String,
}

/// A shared resource (organization, guide, service).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Resource {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub url: Option<String>,
    pub location: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: ModerationStatus,
    pub created_at: String,
}

/// A personal story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Story {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub body: String,
    pub country: Option<String>,
    pub status: ModerationStatus,
    pub created_at: String,
}

/// A comment on an action, resource or story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub target_type: TargetType,
    pub target_id: i64,
    pub body: String,
    pub created_at: String,
}

/// An in-app notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

/// A user's reminder for an upcoming action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Reminder {
    pub id: i64,
    pub user_id: i64,
    pub action_id: i64,
    pub remind_at: String,
    pub created_at: String,
}

/// An abuse report against a piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Report {
    pub id: i64,
    pub reporter_id: i64,
    pub target_type: TargetType,
    pub target_id: i64,
    pub reason: String,
    pub status: ReportStatus,
    pub created_at: String,
    pub resolved_at: Option<String>,
}

/// Fields supplied when submitting an action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewAction {
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub start_date: Option<String>,
}

/// Fields supplied when submitting a resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewResource {
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub url: Option<String>,
    pub location: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Records that carry optional coordinates.
pub trait Located {
    fn coordinates(&self) -> Option<(f64, f64)>;
}

impl Located for Action {
    fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

impl Located for Resource {
    fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}
