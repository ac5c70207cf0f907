//! Validation failures (data) and loader errors.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The question is required and has no answer.
    Required,
    /// A validator in the question's chain rejected the answer.
    Validation,
    /// The owning container's custom validation rejected the answer.
    Container,
    /// A shape-specific check of the question variant (e.g. too few matrix rows).
    Custom,
}

/// A single user-facing validation failure attached to a question.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{text}")]
pub struct SurveyError {
    /// Which stage produced the failure.
    pub kind: ErrorKind,
    /// Displayable message.
    pub text: String,
}

impl SurveyError {
    /// Create an error of `kind` with `text`.
    pub fn new(kind: ErrorKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Shorthand for a [`ErrorKind::Required`] error.
    pub fn required(text: impl Into<String>) -> Self {
        Self::new(ErrorKind::Required, text)
    }

    /// Shorthand for a [`ErrorKind::Validation`] error.
    pub fn validation(text: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, text)
    }
}

#[derive(Debug, Error, Clone)]
/// Errors produced while loading settings or form definitions.
pub enum Error {
    #[error("{message}")]
    /// I/O or filesystem read error.
    Read {
        /// Optional path associated with the read error.
        path: Option<PathBuf>,
        /// Human-readable error message.
        message: String,
    },
    #[error("{message}")]
    /// RON syntax or shape error.
    Parse {
        /// Optional path associated with the parse error.
        path: Option<PathBuf>,
        /// Human-readable error message, including the parser's location.
        message: String,
    },
    #[error("{message}")]
    /// The document parsed but describes something invalid (bad regex, duplicate name).
    Validation {
        /// Optional path associated with the validation error.
        path: Option<PathBuf>,
        /// Human-readable error message.
        message: String,
    },
}

impl Error {
    /// Render a human-friendly error message including the path when available.
    pub fn pretty(&self) -> String {
        let (label, path, message) = match self {
            Self::Read { path, message } => ("Read error", path, message),
            Self::Parse { path, message } => ("Parse error", path, message),
            Self::Validation { path, message } => ("Validation error", path, message),
        };
        match path {
            Some(p) => format!("{} at {}: {}", label, p.display(), message),
            None => format!("{}: {}", label, message),
        }
    }

    /// Access the optional path attached to this error.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } | Self::Validation { path, .. } => {
                path.as_deref()
            }
        }
    }
}
