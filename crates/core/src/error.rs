/// Every failure the CRM core can surface to a page.
///
/// Remote failures are normalized into one of these variants at the
/// operation boundary; the controller stores them in state instead of
/// propagating them to the host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CrmError {
    /// The endpoint could not be reached (connection refused, DNS, timeout).
    #[error("{message}")]
    Transport { message: String },

    /// The server answered with a non-2xx status or `{"success": false}`.
    ///
    /// `message` is the API's own message when it supplied one, otherwise a
    /// fallback naming the failed operation.
    #[error("{message}")]
    ServerRejection {
        status: Option<u16>,
        message: String,
    },

    /// A local check on a form draft failed. Never reaches the network.
    #[error("{message}")]
    Validation { message: String },
}

impl CrmError {
    pub fn transport(message: impl Into<String>) -> Self {
        CrmError::Transport {
            message: message.into(),
        }
    }

    pub fn rejection(status: Option<u16>, message: impl Into<String>) -> Self {
        CrmError::ServerRejection {
            status,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CrmError::Validation {
            message: message.into(),
        }
    }

    /// Short machine-readable category, used in JSON output and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CrmError::Transport { .. } => "transport",
            CrmError::ServerRejection { .. } => "server_rejection",
            CrmError::Validation { .. } => "validation",
        }
    }

    /// The user-facing message.
    pub fn message(&self) -> &str {
        match self {
            CrmError::Transport { message }
            | CrmError::ServerRejection { message, .. }
            | CrmError::Validation { message } => message,
        }
    }
}
