//! Question operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewQuestion, Question};
use crate::repository::Database;

impl Database {
    // ==================== Question Operations ====================

    /// List all questions, newest first
    pub async fn list_questions(&self) -> Result<Vec<Question>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, author_email, question, answer, created_at, updated_at
            FROM questions
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Question::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Get a question by ID
    pub async fn get_question(&self, id: i64) -> Result<Option<Question>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, author_email, question, answer, created_at, updated_at
            FROM questions WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result
            .map(|row| Question::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// Insert a new question. The answer always starts out empty.
    pub async fn insert_question(&self, question: NewQuestion) -> Result<Question, DbError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO questions (author_email, question, answer, created_at, updated_at)
            VALUES (?, ?, '', ?, ?)
            RETURNING id
            "#,
        )
        .bind(&question.author_email)
        .bind(&question.question)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        Ok(Question {
            id: result.get("id"),
            author_email: question.author_email,
            question: question.question,
            answer: String::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Set the answer of a question, returns false if it does not exist
    pub async fn update_question_answer(&self, id: i64, answer: &str) -> Result<bool, DbError> {
        let now = Utc::now();
        let result = sqlx::query("UPDATE questions SET answer = ?, updated_at = ? WHERE id = ?")
            .bind(answer)
            .bind(now.to_rfc3339())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a question, returns false if nothing was deleted
    pub async fn delete_question(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
