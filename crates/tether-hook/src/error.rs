#![forbid(unsafe_code)]

//! Error taxonomy for the hook layer.
//!
//! Three classes of failure, handled differently:
//!
//! - **Destroyed target** ([`HostError::Destroyed`], or a backend message
//!   matching a known destroyed-object shape): benign. Guarded calls yield
//!   no result instead of erroring.
//! - **Resolution failures** during installation: logged per entry and
//!   skipped; never raised, so one bad configuration entry cannot block
//!   startup.
//! - **Everything else**: propagated unchanged. Errors are only swallowed
//!   when positively classified as destroyed-target conditions.

use thiserror::Error;

/// Result alias for hook-layer operations.
pub type Result<T> = std::result::Result<T, HookError>;

/// Message fragments that identify a destroyed native object when the host
/// only surfaces stringly errors.
const DESTROYED_PATTERNS: &[&str] = &["already deleted", "object destroyed", "wrapped native object"];

/// Errors surfaced by the host toolkit capability layer.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("target destroyed: {message}")]
    Destroyed { message: String },

    #[error("unknown property: {name}")]
    UnknownProperty { name: String },

    #[error("unknown signal: {name}")]
    UnknownSignal { name: String },

    #[error("{message}")]
    Backend { message: String },
}

impl HostError {
    /// A destroyed-target error with the given diagnostic message.
    #[must_use]
    pub fn destroyed(message: impl Into<String>) -> Self {
        Self::Destroyed {
            message: message.into(),
        }
    }

    /// An opaque backend error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Whether this error positively identifies a destroyed target.
    ///
    /// Backend errors are classified by message pattern, mirroring hosts
    /// that only report destruction through error strings.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        match self {
            Self::Destroyed { .. } => true,
            Self::Backend { message } => DESTROYED_PATTERNS
                .iter()
                .any(|pattern| message.contains(pattern)),
            _ => false,
        }
    }
}

/// Errors surfaced by the binding engine itself.
#[derive(Debug, Error)]
pub enum HookError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error("no hook installed for {class}.{method}")]
    UnknownHook { class: String, method: String },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
