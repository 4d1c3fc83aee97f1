//! Zap orchestration: resolve, request an invoice, settle or fall back.
//!
//! Each [`ZapSender::send_zap`] call is an independent linear pipeline;
//! nothing persists across calls except the reqwest client's connection
//! pool. Concurrent calls are safe and never coalesced.

use std::sync::Arc;

use crate::address::LightningAddress;
use crate::config::ZapConfig;
use crate::lnurl::LnurlClient;
use crate::provider::{ProviderLocator, ProviderSource, SettlementProvider};
use crate::uri::lightning_uri;
use crate::{Result, ZapError};

/// A surface capable of opening payment deep links, such as a browser
/// location. Server-side deployments simply configure none.
pub trait NavigationSurface: Send + Sync {
    /// Open the URI. Failures are logged and swallowed by the sender; the
    /// returned invoice stays usable either way.
    fn open(&self, uri: &str) -> Result<()>;
}

/// One zap: who to pay, how much, and an optional comment.
#[derive(Clone, Debug)]
pub struct ZapRequest {
    /// Lightning address of the recipient.
    pub address: String,
    /// Amount in sats. Must be greater than zero.
    pub amount_sats: u64,
    /// Optional comment, forwarded when the recipient accepts comments.
    pub comment: Option<String>,
}

impl ZapRequest {
    /// Create a request without a comment.
    pub fn new(address: impl Into<String>, amount_sats: u64) -> Self {
        Self {
            address: address.into(),
            amount_sats,
            comment: None,
        }
    }

    /// Attach a comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Build a request against the configured default address and amount.
    pub fn from_config(config: &ZapConfig) -> Self {
        Self::new(config.zap_address.clone(), config.default_amount_sats)
    }
}

/// Outcome of a zap.
///
/// Exactly one of two shapes: provider-settled (`preimage` present, invoice
/// echoed) or unsettled fallback (invoice only). Callers distinguish the
/// two with [`is_settled`](Self::is_settled); the fallback shape means the
/// user must complete payment out-of-band, not that the zap failed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZapReceipt {
    /// The BOLT11 invoice that was (or still must be) paid.
    pub invoice: String,
    /// Proof of settlement, present only when a provider paid the invoice.
    pub preimage: Option<String>,
    /// Payment hash reported by the provider.
    pub payment_hash: Option<String>,
}

impl ZapReceipt {
    /// Whether a provider settled the invoice.
    pub fn is_settled(&self) -> bool {
        self.preimage.is_some()
    }
}

/// Top-level zap sender.
///
/// Stateless across calls; environment capabilities (settlement providers,
/// a navigation surface) are injected at construction time.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use zapkit::{AmbientSource, ZapConfig, ZapRequest, ZapSender};
///
/// let sender = ZapSender::new(ZapConfig::new("satoshi@vida.page"))?
///     .with_provider_source(Box::new(AmbientSource::with_provider(webln)));
///
/// let receipt = sender
///     .send_zap(&ZapRequest::new("satoshi@vida.page", 21).with_comment("Hi"))
///     .await?;
/// if !receipt.is_settled() {
///     // hand receipt.invoice to the user, e.g. as a QR code
/// }
/// ```
pub struct ZapSender {
    config: ZapConfig,
    lnurl: LnurlClient,
    locator: ProviderLocator,
    navigator: Option<Box<dyn NavigationSurface>>,
}

impl ZapSender {
    /// Create a sender with no provider sources and no navigation surface.
    pub fn new(config: ZapConfig) -> Result<Self> {
        let lnurl = LnurlClient::new(config.timeout_secs)?;
        Ok(Self {
            config,
            lnurl,
            locator: ProviderLocator::new(),
            navigator: None,
        })
    }

    /// Append a settlement provider source to the probe order.
    pub fn with_provider_source(mut self, source: Box<dyn ProviderSource>) -> Self {
        self.locator.push(source);
        self
    }

    /// Attach a navigation surface for `lightning:` deep-link hand-off.
    pub fn with_navigator(mut self, navigator: Box<dyn NavigationSurface>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// The configuration this sender was built with.
    pub fn config(&self) -> &ZapConfig {
        &self.config
    }

    /// Capability check: probe for a settlement provider without performing
    /// a settlement. Re-probes from scratch on every call.
    pub async fn locate_provider(&self) -> Result<Option<Arc<dyn SettlementProvider>>> {
        if !self.config.enable_webln {
            return Ok(None);
        }
        self.locator.locate().await
    }

    /// Send a zap to a lightning address.
    ///
    /// Resolves the address, validates the amount against the recipient's
    /// sendable range, requests an invoice, and settles it through the
    /// first available provider. Without a provider the invoice is handed
    /// off via the navigation surface (best-effort) and returned unsettled.
    ///
    /// # Errors
    ///
    /// All errors are terminal for this call; see [`ZapError`]. A missing
    /// provider is not an error.
    #[tracing::instrument(
        skip(self, request),
        fields(address = %request.address, amount_sats = request.amount_sats)
    )]
    pub async fn send_zap(&self, request: &ZapRequest) -> Result<ZapReceipt> {
        if request.amount_sats == 0 {
            return Err(ZapError::InvalidAmount);
        }
        let amount_msat = request
            .amount_sats
            .checked_mul(1000)
            .ok_or(ZapError::InvalidAmount)?;

        let address = LightningAddress::parse(&request.address)?;
        let metadata = self.lnurl.resolve(&address).await?;

        if !metadata.accepts_msat(amount_msat) {
            return Err(ZapError::AmountOutOfBounds {
                min_sats: metadata.min_sats(),
                max_sats: metadata.max_sats(),
            });
        }

        let comment = clamp_comment(request.comment.as_deref(), metadata.comment_allowed);
        let invoice = self
            .lnurl
            .request_invoice(&metadata.callback, amount_msat, comment.as_deref())
            .await?;

        if let Some(provider) = self.locate_provider().await? {
            tracing::debug!("settling invoice via provider");
            let response = provider.send_payment(&invoice).await?;
            return Ok(ZapReceipt {
                invoice,
                preimage: response.preimage,
                payment_hash: response.payment_hash,
            });
        }

        if let Some(navigator) = &self.navigator {
            let uri = lightning_uri(&invoice);
            tracing::debug!(%uri, "no provider available, opening deep link");
            if let Err(err) = navigator.open(&uri) {
                tracing::debug!(error = %err, "deep link navigation failed");
            }
        }

        Ok(ZapReceipt {
            invoice,
            preimage: None,
            payment_hash: None,
        })
    }
}

/// Fit a comment to the recipient's advertised limit.
///
/// `commentAllowed: 0` means comments are not accepted at all; absence of
/// the field leaves the comment untouched for servers that accept them
/// without advertising a limit.
fn clamp_comment(comment: Option<&str>, allowed: Option<u64>) -> Option<String> {
    let comment = comment.filter(|c| !c.is_empty())?;
    match allowed {
        Some(0) => None,
        Some(limit) => Some(comment.chars().take(limit as usize).collect()),
        None => Some(comment.to_string()),
    }
}
