//! Backend-to-UI events and error modeling for the verification controller.

use client_core::ClientError;
use shared::{
    domain::TicketId,
    error::ErrorCode,
    protocol::{DkuVerificationResponse, LineupInfo},
};

use crate::controller::flow::VerificationTicket;

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    Error(UiError),
    Verified {
        ticket: VerificationTicket,
        result: Result<DkuVerificationResponse, UiError>,
    },
    Reverified {
        ticket: VerificationTicket,
        result: Result<(), UiError>,
    },
    TicketsResolved(Result<Vec<TicketId>, UiError>),
    LineupLoaded(Result<Vec<LineupInfo>, UiError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Verification,
    Reverification,
    Tickets,
    Lineup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("401")
            || message_lower.contains("403")
            || message_lower.contains("unauthorized")
            || message_lower.contains("forbidden")
            || message_lower.contains("invalid credential")
        {
            UiErrorCategory::Auth
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("unavailable")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    /// Keeps the server's message verbatim; the category comes from the
    /// error code when the server sent one.
    pub fn from_client(context: UiErrorContext, err: &ClientError) -> Self {
        let message = err.to_string();
        let category = match err {
            ClientError::Transport(_) => UiErrorCategory::Transport,
            ClientError::Decode(_) => UiErrorCategory::Unknown,
            ClientError::Api(api) => match api.code {
                ErrorCode::Unauthorized | ErrorCode::Forbidden => UiErrorCategory::Auth,
                ErrorCode::Validation | ErrorCode::NotFound => UiErrorCategory::Validation,
                ErrorCode::RateLimited | ErrorCode::Internal => UiErrorCategory::Transport,
                ErrorCode::Unknown => return Self::from_message(context, message),
            },
        };
        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
