//! Error types for zap operations.
//!
//! Every error is terminal for the current call: nothing in this crate
//! retries internally. The only failures that are deliberately not surfaced
//! through this type are SDK probe failures inside the provider locator and
//! deep-link navigation failures, both of which only eliminate an optional
//! path.

/// Comprehensive error type for zap operations.
#[derive(thiserror::Error, Debug)]
pub enum ZapError {
    /// The lightning address is not of the `local@host` shape.
    #[error("invalid lightning address: {address}")]
    InvalidAddress {
        /// The offending address as supplied by the caller.
        address: String,
    },

    /// The well-known LNURL-pay endpoint answered with a non-success status.
    #[error("failed to resolve lightning address: {status} {status_text}")]
    DiscoveryFailed {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status.
        status_text: String,
    },

    /// The invoice callback answered with a non-success status.
    #[error("failed to request invoice: {status}")]
    InvoiceRequestFailed {
        /// HTTP status code.
        status: u16,
    },

    /// The callback answered 200 but carried an LNURL-level error marker.
    #[error("lnurl error: {reason}")]
    Protocol {
        /// Reason string reported by the LNURL server.
        reason: String,
    },

    /// The requested amount is zero (or does not fit in millisats).
    #[error("amount must be greater than 0")]
    InvalidAmount,

    /// The requested amount falls outside the recipient's sendable range.
    ///
    /// Bounds are reported in whole sats, rounded inward (min up, max down)
    /// so the advertised boundary is always payable.
    #[error("amount out of bounds, allowed: {min_sats} - {max_sats} sats")]
    AmountOutOfBounds {
        /// Smallest payable amount in sats.
        min_sats: u64,
        /// Largest payable amount in sats.
        max_sats: u64,
    },

    /// Network-level failure (connect, timeout, TLS) at a required step.
    #[error("transport error: {0}")]
    Transport(String),

    /// A response body could not be parsed into its expected shape.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A settlement provider failed to enable or to pay the invoice.
    #[error("provider error: {0}")]
    Provider(String),
}

impl ZapError {
    /// Create an invalid address error.
    pub fn invalid_address(address: impl Into<String>) -> Self {
        Self::InvalidAddress {
            address: address.into(),
        }
    }

    /// Create a protocol error from an LNURL error reason.
    pub fn protocol(reason: impl Into<String>) -> Self {
        Self::Protocol {
            reason: reason.into(),
        }
    }

    /// Create a provider error.
    pub fn provider(reason: impl Into<String>) -> Self {
        Self::Provider(reason.into())
    }

    /// Returns true if this error is potentially recoverable by retrying.
    ///
    /// The crate never retries on its own; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::DiscoveryFailed { status, .. } | Self::InvoiceRequestFailed { status } => {
                (500..=599).contains(status)
            }
            _ => false,
        }
    }
}

impl From<serde_json::Error> for ZapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ZapError::AmountOutOfBounds {
            min_sats: 1,
            max_sats: 10_000_000,
        };
        assert_eq!(
            err.to_string(),
            "amount out of bounds, allowed: 1 - 10000000 sats"
        );

        let err = ZapError::invalid_address("nobody");
        assert!(err.to_string().contains("nobody"));
    }

    #[test]
    fn test_retryable() {
        assert!(ZapError::Transport("connection reset".into()).is_retryable());
        assert!(ZapError::DiscoveryFailed {
            status: 503,
            status_text: "Service Unavailable".into()
        }
        .is_retryable());
        assert!(!ZapError::DiscoveryFailed {
            status: 404,
            status_text: "Not Found".into()
        }
        .is_retryable());
        assert!(!ZapError::InvalidAmount.is_retryable());
    }
}
