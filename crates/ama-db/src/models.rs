//! Database models

use ama_auth::UserRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

/// Timestamps are stored as RFC3339 text. An unreadable value falls back to
/// the current time rather than failing the whole query.
fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// User model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user (for insertion)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

/// Question with its (possibly empty) answer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: i64,
    pub author_email: String,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New question (for insertion)
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub author_email: String,
    pub question: String,
}

impl From<User> for UserRecord {
    fn from(user: User) -> Self {
        UserRecord {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            password_hash: user.password_hash,
        }
    }
}

// ==================== TryFrom Implementations ====================

impl TryFrom<&SqliteRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &SqliteRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            password_hash: row.try_get("password_hash")?,
            created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_timestamp(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&SqliteRow> for Question {
    type Error = sqlx::Error;

    fn try_from(row: &SqliteRow) -> Result<Self, Self::Error> {
        Ok(Question {
            id: row.try_get("id")?,
            author_email: row.try_get("author_email")?,
            question: row.try_get("question")?,
            answer: row.try_get("answer")?,
            created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_timestamp(&row.try_get::<String, _>("updated_at")?),
        })
    }
}
