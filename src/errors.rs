use reqwest::StatusCode;
use std::fmt;
use thiserror::Error;

/// Remote calls made by the controller, each with the message shown when the
/// backend gives no `erro` of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LoadCategories,
    LoadItems,
    AddItem,
    UpdateItem,
    DeleteItem,
    ClearList,
    LoadSummary,
}

impl Operation {
    pub fn default_message(self) -> &'static str {
        match self {
            Operation::LoadCategories => "Failed to load categories",
            Operation::LoadItems => "Failed to load items",
            Operation::AddItem => "Failed to add item",
            Operation::UpdateItem => "Failed to update item",
            Operation::DeleteItem => "Failed to delete item",
            Operation::ClearList => "Failed to clear list",
            Operation::LoadSummary => "Failed to load summary",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::LoadCategories => "load categories",
            Operation::LoadItems => "load items",
            Operation::AddItem => "add item",
            Operation::UpdateItem => "update item",
            Operation::DeleteItem => "delete item",
            Operation::ClearList => "clear list",
            Operation::LoadSummary => "load summary",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{message}")]
    Http {
        operation: Operation,
        status: StatusCode,
        message: String,
    },

    #[error("{0}")]
    Validation(String),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("item {0} already has a pending change")]
    Busy(i64),

    #[error("invalid API url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl SyncError {
    pub fn validation(message: impl Into<String>) -> Self {
        SyncError::Validation(message.into())
    }

    /// Builds the error for a non-success response, preferring the server's message.
    pub fn http(operation: Operation, status: StatusCode, server_message: Option<String>) -> Self {
        let message = server_message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| operation.default_message().to_string());
        SyncError::Http {
            operation,
            status,
            message,
        }
    }

    /// Text shown to the user in a notification.
    pub fn user_message(&self, operation: Operation) -> String {
        match self {
            SyncError::Http { message, .. } | SyncError::Validation(message) => message.clone(),
            SyncError::Busy(_) => self.to_string(),
            _ => operation.default_message().to_string(),
        }
    }
}
