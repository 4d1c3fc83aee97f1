//! Zapkit: Lightning address zaps over LNURL-pay.
//!
//! This crate intentionally stays stateless and delegates environment
//! capabilities to callers through trait-based dependency injection.
//!
//! # Features
//!
//! - **Address resolution**: `user@host` lightning addresses resolve to pay
//!   metadata via the `/.well-known/lnurlp/` discovery endpoint
//! - **Invoice requests**: the discovered callback is queried for a BOLT11
//!   invoice at a concrete amount, with an optional comment
//! - **Settlement**: an injected SDK or ambient WebLN-style provider pays
//!   the invoice; without one, the invoice is handed back to the caller,
//!   optionally through a `lightning:` deep link
//!
//! # Example
//!
//! ```ignore
//! use zapkit::{AmbientSource, ZapConfig, ZapRequest, ZapSender};
//!
//! let sender = ZapSender::new(ZapConfig::new("satoshi@vida.page"))?
//!     .with_provider_source(Box::new(AmbientSource::with_provider(webln)));
//!
//! let receipt = sender
//!     .send_zap(&ZapRequest::new("satoshi@vida.page", 21).with_comment("Hi"))
//!     .await?;
//! if !receipt.is_settled() {
//!     // show receipt.invoice as a QR code or copyable string
//! }
//! ```

pub mod address;
pub mod config;
pub mod errors;
pub mod lnurl;
pub mod provider;
pub mod sender;
pub mod uri;

pub use address::LightningAddress;
pub use config::ZapConfig;
pub use errors::ZapError;
pub use lnurl::{LnurlClient, PayMetadata};
pub use provider::{
    AmbientSource, PaymentResponse, ProviderLocator, ProviderSdk, ProviderSource, SdkSource,
    SettlementProvider,
};
pub use sender::{NavigationSurface, ZapReceipt, ZapRequest, ZapSender};

/// Common result alias for zap operations.
pub type Result<T> = std::result::Result<T, ZapError>;
