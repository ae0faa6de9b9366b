//! Errors reported by document store collaborators.

/// Failure reported by the underlying store.
///
/// The kind decides how the gateway surfaces it: server failures are
/// translated into an operation-specific error, the rest pass through.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The server rejected the command
    #[error("{message} (code {code})")]
    Server {
        code: i32,
        code_name: Option<String>,
        message: String,
    },

    /// The driver was used incorrectly (bad arguments, closed client)
    #[error("{message}")]
    Api { message: String },

    /// Anything else: network, timeouts, serialization
    #[error("{message}")]
    Other { message: String },
}

/// Server code for a missing database, collection or index.
pub const NAMESPACE_NOT_FOUND: i32 = 26;

impl StoreError {
    pub fn server(code: i32, message: impl Into<String>) -> Self {
        Self::Server {
            code,
            code_name: None,
            message: message.into(),
        }
    }

    pub fn server_named(code: i32, code_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Server {
            code,
            code_name: Some(code_name.into()),
            message: message.into(),
        }
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    pub fn namespace_not_found(message: impl Into<String>) -> Self {
        Self::server_named(NAMESPACE_NOT_FOUND, "NamespaceNotFound", message)
    }

    /// True for a "namespace not found" server failure, matched by code or
    /// by code name.
    pub fn is_namespace_not_found(&self) -> bool {
        match self {
            Self::Server {
                code, code_name, ..
            } => *code == NAMESPACE_NOT_FOUND || code_name.as_deref() == Some("NamespaceNotFound"),
            _ => false,
        }
    }
}
