use serde::Serialize;

use crate::domain::CommentFields;

/// The only codes a caller ever sees. Bad input and internal faults share
/// `UnexpectedError` so a response never reveals which check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    UnexpectedError,
    NotAuthorized,
}

/// `success` is true exactly when `errors` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResult {
    success: bool,
    errors: Vec<ErrorCode>,
}

impl OperationResult {
    pub fn from_errors(errors: Vec<ErrorCode>) -> Self {
        Self {
            success: errors.is_empty(),
            errors,
        }
    }

    pub fn succeeded() -> Self {
        Self::from_errors(Vec::new())
    }

    pub fn failed(code: ErrorCode) -> Self {
        Self::from_errors(vec![code])
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn errors(&self) -> &[ErrorCode] {
        &self.errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentListResult {
    #[serde(flatten)]
    outcome: OperationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    comments: Option<CommentFields>,
}

impl CommentListResult {
    pub fn succeeded(comments: CommentFields) -> Self {
        Self {
            outcome: OperationResult::succeeded(),
            comments: Some(comments),
        }
    }

    pub fn failed(code: ErrorCode) -> Self {
        Self {
            outcome: OperationResult::failed(code),
            comments: None,
        }
    }

    pub fn success(&self) -> bool {
        self.outcome.success()
    }

    pub fn errors(&self) -> &[ErrorCode] {
        self.outcome.errors()
    }

    pub fn comments(&self) -> Option<&CommentFields> {
        self.comments.as_ref()
    }
}
