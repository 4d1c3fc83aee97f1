//! Settlement provider discovery.
//!
//! A zap can be settled by whatever WebLN-style capability the calling
//! environment happens to have: an injected SDK, an ambient provider
//! (`window.webln` in a browser), or nothing at all.
//! Sources are probed in a fixed order on every call; nothing is cached,
//! because providers can appear mid-session (a wallet extension installed
//! while the page is open).
//!
//! Absence is not an error. Only the ambient provider's `enable()` failing
//! propagates; SDK probe failures are swallowed since they merely eliminate
//! one optional path.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::Result;

/// Proof of payment returned by a settlement provider.
///
/// Providers disagree on field spelling: both `paymentHash` and
/// `payment_hash` deserialize into the canonical [`payment_hash`] field.
///
/// [`payment_hash`]: PaymentResponse::payment_hash
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct PaymentResponse {
    /// The payment preimage, the recipient's proof of settlement.
    #[serde(default)]
    pub preimage: Option<String>,
    /// The payment hash.
    #[serde(default, rename = "paymentHash", alias = "payment_hash")]
    pub payment_hash: Option<String>,
}

/// A WebLN-style settlement capability.
///
/// Borrowed for the duration of one settlement call; never stored across
/// calls and never mutated by this crate.
#[async_trait]
pub trait SettlementProvider: Send + Sync {
    /// Whether the provider is already enabled for payments.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Ask the provider for permission to send payments.
    ///
    /// Called by [`AmbientSource`] before handing out a provider that
    /// reports [`is_enabled`](Self::is_enabled) as false.
    async fn enable(&self) -> Result<()> {
        Ok(())
    }

    /// Pay a BOLT11 invoice, returning proof of payment.
    async fn send_payment(&self, invoice: &str) -> Result<PaymentResponse>;
}

/// One place a settlement provider may be found.
#[async_trait]
pub trait ProviderSource: Send + Sync {
    /// Probe this source. `Ok(None)` means the source has nothing to offer,
    /// which is not a failure.
    async fn locate(&self) -> Result<Option<Arc<dyn SettlementProvider>>>;
}

/// Entry points an optional settlement SDK may export.
///
/// Real SDKs disagree on where the provider factory lives, so each shape is
/// a separate optional probe. The default for every probe is `Ok(None)`;
/// an injected SDK implements whichever shapes it actually has.
#[async_trait]
pub trait ProviderSdk: Send + Sync {
    /// Namespaced shape: `Provider.requestProvider()`.
    async fn namespaced_request_provider(&self) -> Result<Option<Arc<dyn SettlementProvider>>> {
        Ok(None)
    }

    /// Flat shape: `requestProvider()`.
    async fn request_provider(&self) -> Result<Option<Arc<dyn SettlementProvider>>> {
        Ok(None)
    }

    /// Getter shape: `getProvider()`.
    async fn get_provider(&self) -> Result<Option<Arc<dyn SettlementProvider>>> {
        Ok(None)
    }
}

/// Probes an injected SDK for a provider, trying the three entry-point
/// shapes in fixed order and stopping at the first hit.
///
/// Probe failures are logged and swallowed: a broken or missing SDK only
/// eliminates this path, it never aborts the zap.
pub struct SdkSource {
    sdk: Arc<dyn ProviderSdk>,
}

impl SdkSource {
    /// Create a source around an injected SDK.
    pub fn new(sdk: Arc<dyn ProviderSdk>) -> Self {
        Self { sdk }
    }
}

#[async_trait]
impl ProviderSource for SdkSource {
    async fn locate(&self) -> Result<Option<Arc<dyn SettlementProvider>>> {
        if let Some(provider) = swallow(
            "requestProvider (namespaced)",
            self.sdk.namespaced_request_provider().await,
        ) {
            return Ok(Some(provider));
        }
        if let Some(provider) = swallow("requestProvider", self.sdk.request_provider().await) {
            return Ok(Some(provider));
        }
        if let Some(provider) = swallow("getProvider", self.sdk.get_provider().await) {
            return Ok(Some(provider));
        }
        Ok(None)
    }
}

fn swallow(
    probe: &str,
    outcome: Result<Option<Arc<dyn SettlementProvider>>>,
) -> Option<Arc<dyn SettlementProvider>> {
    match outcome {
        Ok(found) => found,
        Err(err) => {
            tracing::debug!(probe, error = %err, "sdk probe failed");
            None
        }
    }
}

/// Looks up the environment's ambient provider.
///
/// The lookup closure runs on every call so a provider that appears
/// mid-session is picked up. A provider that reports itself not enabled and
/// exposes `enable()` is enabled before being handed out; enable failures
/// propagate.
pub struct AmbientSource {
    lookup: Box<dyn Fn() -> Option<Arc<dyn SettlementProvider>> + Send + Sync>,
}

impl AmbientSource {
    /// Create a source that re-runs `lookup` on every probe.
    pub fn new<F>(lookup: F) -> Self
    where
        F: Fn() -> Option<Arc<dyn SettlementProvider>> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
        }
    }

    /// Convenience for environments where the provider handle is fixed.
    pub fn with_provider(provider: Arc<dyn SettlementProvider>) -> Self {
        Self::new(move || Some(Arc::clone(&provider)))
    }
}

#[async_trait]
impl ProviderSource for AmbientSource {
    async fn locate(&self) -> Result<Option<Arc<dyn SettlementProvider>>> {
        let Some(provider) = (self.lookup)() else {
            return Ok(None);
        };
        if !provider.is_enabled() {
            provider.enable().await?;
        }
        Ok(Some(provider))
    }
}

/// Ordered list of provider sources, tried in strict order, stopping at the
/// first that yields a provider.
#[derive(Default)]
pub struct ProviderLocator {
    sources: Vec<Box<dyn ProviderSource>>,
}

impl ProviderLocator {
    /// Create an empty locator. `locate` on it always answers `Ok(None)`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source to the probe order.
    pub fn push(&mut self, source: Box<dyn ProviderSource>) {
        self.sources.push(source);
    }

    /// Probe every source from scratch.
    pub async fn locate(&self) -> Result<Option<Arc<dyn SettlementProvider>>> {
        for source in &self.sources {
            if let Some(provider) = source.locate().await? {
                return Ok(Some(provider));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ZapError;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    struct StubProvider {
        enabled: AtomicBool,
        enable_calls: AtomicU32,
    }

    impl StubProvider {
        fn new(enabled: bool) -> Self {
            Self {
                enabled: AtomicBool::new(enabled),
                enable_calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl SettlementProvider for StubProvider {
        fn is_enabled(&self) -> bool {
            self.enabled.load(Ordering::SeqCst)
        }

        async fn enable(&self) -> Result<()> {
            self.enable_calls.fetch_add(1, Ordering::SeqCst);
            self.enabled.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn send_payment(&self, _invoice: &str) -> Result<PaymentResponse> {
            Ok(PaymentResponse::default())
        }
    }

    #[test]
    fn test_payment_response_normalizes_both_hash_spellings() {
        let camel: PaymentResponse =
            serde_json::from_str(r#"{"preimage": "00aa", "paymentHash": "11bb"}"#).unwrap();
        let snake: PaymentResponse =
            serde_json::from_str(r#"{"preimage": "00aa", "payment_hash": "11bb"}"#).unwrap();
        assert_eq!(camel.payment_hash.as_deref(), Some("11bb"));
        assert_eq!(camel, snake);
    }

    #[test]
    fn test_payment_response_fields_optional() {
        let empty: PaymentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.preimage, None);
        assert_eq!(empty.payment_hash, None);
    }

    #[tokio::test]
    async fn test_sdk_probe_order_and_swallowed_failures() {
        struct BrokenThenFlat;

        #[async_trait]
        impl ProviderSdk for BrokenThenFlat {
            async fn namespaced_request_provider(
                &self,
            ) -> Result<Option<Arc<dyn SettlementProvider>>> {
                Err(ZapError::provider("sdk failed to load"))
            }

            async fn request_provider(&self) -> Result<Option<Arc<dyn SettlementProvider>>> {
                Ok(Some(Arc::new(StubProvider::new(true))))
            }
        }

        let source = SdkSource::new(Arc::new(BrokenThenFlat));
        let provider = source.locate().await.unwrap();
        assert!(provider.is_some());
    }

    #[tokio::test]
    async fn test_sdk_without_any_shape_is_absent() {
        struct EmptySdk;
        impl ProviderSdk for EmptySdk {}

        let source = SdkSource::new(Arc::new(EmptySdk));
        assert!(source.locate().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ambient_source_enables_disabled_provider() {
        let provider = Arc::new(StubProvider::new(false));
        let handle: Arc<dyn SettlementProvider> = provider.clone();
        let source = AmbientSource::with_provider(handle);

        let located = source.locate().await.unwrap();
        assert!(located.is_some());
        assert_eq!(provider.enable_calls.load(Ordering::SeqCst), 1);

        // Already enabled now: no second enable call.
        source.locate().await.unwrap();
        assert_eq!(provider.enable_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_locator_stops_at_first_hit() {
        struct CountingSource {
            calls: Arc<AtomicU32>,
            provider: Option<Arc<dyn SettlementProvider>>,
        }

        #[async_trait]
        impl ProviderSource for CountingSource {
            async fn locate(&self) -> Result<Option<Arc<dyn SettlementProvider>>> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(self.provider.clone())
            }
        }

        let first_calls = Arc::new(AtomicU32::new(0));
        let second_calls = Arc::new(AtomicU32::new(0));

        let mut locator = ProviderLocator::new();
        locator.push(Box::new(CountingSource {
            calls: Arc::clone(&first_calls),
            provider: Some(Arc::new(StubProvider::new(true))),
        }));
        locator.push(Box::new(CountingSource {
            calls: Arc::clone(&second_calls),
            provider: None,
        }));

        assert!(locator.locate().await.unwrap().is_some());
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);

        // No caching: a second locate re-probes.
        locator.locate().await.unwrap();
        assert_eq!(first_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_locator_is_absent() {
        assert!(ProviderLocator::new().locate().await.unwrap().is_none());
    }
}
