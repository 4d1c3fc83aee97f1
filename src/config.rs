//! Zap configuration supplied by the embedding application.
//!
//! These are read-only inputs: the sender never mutates them.

use serde::{Deserialize, Serialize};

/// Configuration for a [`ZapSender`](crate::ZapSender).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ZapConfig {
    /// Default lightning address to zap.
    pub zap_address: String,

    /// Default amount in sats.
    #[serde(default = "default_amount_sats")]
    pub default_amount_sats: u64,

    /// Whether WebLN-style providers may be used for settlement. When
    /// disabled, every zap takes the manual-completion path.
    #[serde(default = "default_enable_webln")]
    pub enable_webln: bool,

    /// Comment template; `{title}` is substituted per zap.
    ///
    /// Consumed by the embedding UI (via [`render_message`]) when it
    /// builds a [`ZapRequest`](crate::ZapRequest) comment; the sender
    /// pipeline itself never reads it.
    ///
    /// [`render_message`]: Self::render_message
    #[serde(default = "default_message_template")]
    pub message_template: String,

    /// Request timeout in seconds for discovery and invoice requests.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_amount_sats() -> u64 {
    2100
}

fn default_enable_webln() -> bool {
    true
}

fn default_message_template() -> String {
    "Zap for {title}".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl ZapConfig {
    /// Create a configuration for the given address with default settings.
    pub fn new(zap_address: impl Into<String>) -> Self {
        Self {
            zap_address: zap_address.into(),
            default_amount_sats: default_amount_sats(),
            enable_webln: default_enable_webln(),
            message_template: default_message_template(),
            timeout_secs: default_timeout(),
        }
    }

    /// Render the message template for a given title.
    ///
    /// Helper for the embedding layer; pass the result as the
    /// [`ZapRequest`](crate::ZapRequest) comment.
    pub fn render_message(&self, title: &str) -> String {
        self.message_template.replace("{title}", title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ZapConfig::new("satoshi@vida.page");
        assert_eq!(config.default_amount_sats, 2100);
        assert!(config.enable_webln);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: ZapConfig =
            serde_json::from_str(r#"{"zap_address": "satoshi@vida.page"}"#).unwrap();
        assert_eq!(config.zap_address, "satoshi@vida.page");
        assert_eq!(config.message_template, "Zap for {title}");
    }

    #[test]
    fn test_render_message() {
        let config = ZapConfig::new("satoshi@vida.page");
        assert_eq!(config.render_message("my post"), "Zap for my post");

        let mut config = config;
        config.message_template = "thanks!".to_string();
        assert_eq!(config.render_message("ignored"), "thanks!");
    }
}
