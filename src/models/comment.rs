use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use mongodb::bson::{Bson, oid::ObjectId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Represents a document in the 'comments' collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    pub movie_id: ObjectId,

    #[serde(default)]
    pub text: String,

    /// ISO-8601 string when written here; older datasets hold a BSON date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Bson>,
}

impl Comment {
    pub fn new(movie_id: ObjectId, name: String, email: String, text: String) -> Self {
        Self {
            id: ObjectId::new(),
            name,
            email,
            movie_id,
            text,
            date: Some(Bson::String(now_iso())),
        }
    }

    /// The stored timestamp as text, unformatted.
    pub fn date_text(&self) -> String {
        match &self.date {
            Some(Bson::String(s)) => s.clone(),
            Some(Bson::DateTime(dt)) => dt.try_to_rfc3339_string().unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// The stored timestamp as `MM/DD/YYYY`.
    /// Values that cannot be read as a date are returned as stored.
    pub fn display_date(&self) -> String {
        self.date
            .as_ref()
            .and_then(parse_stored_date)
            .map(|dt| dt.format("%m/%d/%Y").to_string())
            .unwrap_or_else(|| self.date_text())
    }
}

/// Current time as an ISO-8601 string with millisecond precision,
/// e.g. `2024-03-05T14:07:12.345Z`.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Formats an ISO-8601 timestamp as `MM/DD/YYYY`, or returns it unchanged
/// when it cannot be read as a date.
pub fn format_display_date(raw: &str) -> String {
    parse_stored_date(&Bson::String(raw.to_string()))
        .map(|dt| dt.format("%m/%d/%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_stored_date(value: &Bson) -> Option<DateTime<Utc>> {
    match value {
        Bson::DateTime(dt) => DateTime::from_timestamp_millis(dt.timestamp_millis()),
        Bson::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            }),
        _ => None,
    }
}

/// DTO for creating a new comment. All four fields must be strings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    /// 24-character hexadecimal movie identifier.
    pub movie_id: String,
    pub name: String,
    pub email: String,
    pub text: String,
}

/// DTO for replacing a comment's text.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, message = "Comment ID is required"))]
    pub comment_id: String,
    pub text: String,
}

/// DTO for deleting a comment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCommentRequest {
    #[validate(length(min = 1, message = "Comment ID is required"))]
    pub comment_id: String,
}

/// DTO for a stored comment as returned after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommentRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub movie_id: String,
    pub name: String,
    pub email: String,
    pub text: String,
    /// ISO-8601 creation time.
    pub date: String,
}

impl From<&Comment> for CommentRecord {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.to_hex(),
            movie_id: comment.movie_id.to_hex(),
            name: comment.name.clone(),
            email: comment.email.clone(),
            text: comment.text.clone(),
            date: comment.date_text(),
        }
    }
}

/// Response for a created comment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentCreated {
    pub success: bool,
    pub comment: CommentRecord,
}

/// DTO for a comment inside the movie details view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommentSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    /// `MM/DD/YYYY`.
    pub date: String,
}

impl From<&Comment> for CommentSummary {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.to_hex(),
            text: comment.text.clone(),
            date: comment.display_date(),
        }
    }
}

impl From<&CommentRecord> for CommentSummary {
    fn from(record: &CommentRecord) -> Self {
        Self {
            id: record.id.clone(),
            text: record.text.clone(),
            date: format_display_date(&record.date),
        }
    }
}
