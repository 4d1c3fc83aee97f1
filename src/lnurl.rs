//! LNURL-pay protocol client.
//!
//! Covers the two outbound HTTP calls of a zap: resolving a lightning
//! address into its pay metadata, and asking the discovered callback for a
//! BOLT11 invoice at a concrete amount.
//!
//! Both calls are single-attempt. Response bodies are deserialized into
//! typed structs so a missing required field fails loudly instead of
//! surfacing later as an empty value.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::address::LightningAddress;
use crate::{Result, ZapError};

/// LNURL-pay metadata returned by the well-known discovery endpoint.
///
/// Created fresh per resolution; never cached. Amount bounds are in
/// millisats, as the protocol communicates them.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayMetadata {
    /// Callback URL to request invoices from.
    pub callback: String,
    /// Smallest payable amount in millisats.
    pub min_sendable: u64,
    /// Largest payable amount in millisats.
    pub max_sendable: u64,
    /// Opaque metadata string the recipient committed to.
    pub metadata: String,
    /// Maximum comment length the recipient accepts, if any.
    #[serde(default)]
    pub comment_allowed: Option<u64>,
    /// Whether the recipient understands nostr zap requests.
    #[serde(default)]
    pub allows_nostr: Option<bool>,
}

impl PayMetadata {
    /// Smallest payable amount in whole sats, rounded up.
    pub fn min_sats(&self) -> u64 {
        self.min_sendable.div_ceil(1000)
    }

    /// Largest payable amount in whole sats, rounded down.
    pub fn max_sats(&self) -> u64 {
        self.max_sendable / 1000
    }

    /// Whether the amount falls inside the sendable range.
    pub fn accepts_msat(&self, amount_msat: u64) -> bool {
        (self.min_sendable..=self.max_sendable).contains(&amount_msat)
    }
}

/// Body of a callback response.
///
/// LNURL servers signal failure in-band: a 200 response may still carry
/// `status: "ERROR"`, so both shapes share one struct and the marker is
/// checked before looking for the invoice.
#[derive(Debug, Deserialize)]
struct CallbackResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    pr: Option<String>,
}

/// HTTP client for the LNURL-pay flow.
pub struct LnurlClient {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl LnurlClient {
    /// Create a client with the given request timeout.
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ZapError::Transport(format!("failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            timeout_secs,
        })
    }

    /// Resolve a lightning address into its LNURL-pay metadata.
    ///
    /// Single GET against the well-known endpoint; a non-success status is
    /// a [`ZapError::DiscoveryFailed`].
    pub async fn resolve(&self, address: &LightningAddress) -> Result<PayMetadata> {
        let url = address.well_known_url()?;
        tracing::debug!(%url, "resolving lightning address");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error("discovery", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ZapError::DiscoveryFailed {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        response.json::<PayMetadata>().await.map_err(|e| {
            ZapError::Serialization(format!("failed to parse lnurl-pay metadata: {}", e))
        })
    }

    /// Request a BOLT11 invoice from a callback URL.
    ///
    /// `amount` (millisats) and, when present, `comment` are appended as
    /// query parameters. Returns the bearer invoice string (`pr`).
    pub async fn request_invoice(
        &self,
        callback: &str,
        amount_msat: u64,
        comment: Option<&str>,
    ) -> Result<String> {
        if amount_msat == 0 {
            return Err(ZapError::InvalidAmount);
        }

        let mut url = Url::parse(callback)
            .map_err(|e| ZapError::Serialization(format!("invalid callback url: {}", e)))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("amount", &amount_msat.to_string());
            if let Some(comment) = comment {
                pairs.append_pair("comment", comment);
            }
        }
        tracing::debug!(%url, amount_msat, "requesting invoice");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error("invoice request", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ZapError::InvoiceRequestFailed {
                status: status.as_u16(),
            });
        }

        let body: CallbackResponse = response.json().await.map_err(|e| {
            ZapError::Serialization(format!("failed to parse callback response: {}", e))
        })?;

        if body.status.as_deref() == Some("ERROR") {
            return Err(ZapError::protocol(
                body.reason.unwrap_or_else(|| "LNURL error".to_string()),
            ));
        }

        body.pr
            .ok_or_else(|| ZapError::Serialization("callback response missing 'pr'".to_string()))
    }

    /// Map reqwest errors to ZapError.
    fn map_reqwest_error(&self, operation: &str, e: reqwest::Error) -> ZapError {
        if e.is_timeout() {
            ZapError::Transport(format!(
                "{} timed out after {}s",
                operation, self.timeout_secs
            ))
        } else if e.is_connect() {
            ZapError::Transport(format!("{} connection failed: {}", operation, e))
        } else {
            ZapError::Transport(format!("{} failed: {}", operation, e))
        }
    }
}
