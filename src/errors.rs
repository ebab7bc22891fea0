//! Typed error hierarchy for the brand console.
//!
//! One type per subsystem:
//! - `DocumentError`: path mutation and raw-text parsing (validation)
//! - `GatewayError`: transport and non-2xx server failures
//! - `EditorError`: profile editor operations (validation or gateway)
//! - `TransitionError`: post lifecycle actions (validation or gateway)
//! - `BrandError`: brand administration forms (validation or gateway)

use console_common::{PostId, PostStatus};
use thiserror::Error;

/// Message shown in place of a server-side document parsing complaint.
pub const RAW_SYNTAX_HINT: &str =
    "Invalid JSON in the raw view. Check your raw-view syntax and try again.";

/// Errors from the configuration document layer. Always detected locally.
#[derive(Debug, Error, PartialEq)]
pub enum DocumentError {
    #[error("Field path must have at least one segment")]
    EmptyPath,

    #[error("Field path segment {index} is empty")]
    EmptySegment { index: usize },

    #[error("Cannot descend into '{segment}': it holds a list, not a section")]
    SequenceInPath { segment: String },

    #[error("Raw document is not valid JSON: {0}")]
    RawSyntax(String),

    #[error("Profile root must be a keyed document, found {found}")]
    RootNotObject { found: &'static str },

    #[error("Unknown structured field '{0}'")]
    UnknownField(String),

    #[error("Unknown profile section '{0}'")]
    UnknownSection(String),
}

/// Failure reported by the request gateway.
///
/// `status` is `None` when no HTTP response was received at all.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct GatewayError {
    pub message: String,
    pub status: Option<u16>,
}

impl GatewayError {
    pub fn new(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(message, None)
    }

    /// True for 401/403. Only the command boundary acts on this.
    pub fn is_auth(&self) -> bool {
        matches!(self.status, Some(401) | Some(403))
    }

    /// The message to show an operator.
    ///
    /// Server complaints about document parsing are rephrased into an
    /// actionable hint about the raw view; everything else passes verbatim.
    pub fn user_message(&self) -> String {
        let lower = self.message.to_lowercase();
        let mentions_document = lower.contains("json") || lower.contains("document");
        let mentions_parsing = ["pars", "decod", "expecting", "malformed", "syntax"]
            .iter()
            .any(|needle| lower.contains(needle));
        if mentions_document && mentions_parsing {
            return RAW_SYNTAX_HINT.to_string();
        }
        match self.status {
            Some(status) => format!("{} (HTTP {})", self.message, status),
            None => self.message.clone(),
        }
    }
}

/// Errors from profile editing, loading and saving.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("Raw view has unapplied edits; apply or discard them first")]
    PendingRawEdits,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Profile session was closed before the request completed")]
    Detached,
}

impl EditorError {
    /// Validation errors never reached the network.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Document(_) | Self::PendingRawEdits)
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Gateway(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// Errors from post lifecycle transitions.
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Post {post_id} not found on this board")]
    UnknownPost { post_id: PostId },

    #[error("Cannot {action} a post that is {status}")]
    NotAllowed {
        action: &'static str,
        status: PostStatus,
    },

    #[error("Pick a date and time before scheduling")]
    MissingTime,

    #[error("Could not read '{input}' as a local date-time (expected YYYY-MM-DDTHH:MM)")]
    InvalidTime { input: String },

    #[error("{input} does not exist in the local timezone {timezone}")]
    NonexistentLocalTime { input: String, timezone: String },

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Post board was closed before the request completed")]
    Detached,

    /// The server accepted the action; only the follow-up reload failed.
    #[error("{action} was accepted, but the post list could not be reloaded: {source}")]
    ReloadFailed {
        action: &'static str,
        source: GatewayError,
    },
}

impl TransitionError {
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            Self::Gateway(_) | Self::Detached | Self::ReloadFailed { .. }
        )
    }

    /// True when the server applied the action despite the error.
    pub fn was_accepted(&self) -> bool {
        matches!(self, Self::ReloadFailed { .. })
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Gateway(err) => err.user_message(),
            Self::ReloadFailed { action, source } => format!(
                "{} was accepted, but the post list could not be reloaded: {}",
                action,
                source.user_message()
            ),
            other => other.to_string(),
        }
    }
}

/// Errors from brand creation, update and credential forms.
#[derive(Debug, Error)]
pub enum BrandError {
    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl BrandError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Gateway(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}
