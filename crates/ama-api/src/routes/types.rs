//! Request/Response DTOs

use serde::{Deserialize, Serialize};

// ==================== Auth Types ====================

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ==================== Question Types ====================

/// Create question request
#[derive(Deserialize)]
pub struct NewQuestionRequest {
    pub author_email: String,
    pub question: String,
}

/// Answer question request
#[derive(Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

// ==================== Envelope ====================

/// Generic `{error, message}` response body
#[derive(Serialize, Deserialize, Debug)]
pub struct JsonResponse {
    pub error: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            error: false,
            message: message.into(),
        }
    }
}
