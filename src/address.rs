//! Lightning address parsing and discovery URLs.
//!
//! A lightning address looks like an email address (`local@host`) and
//! resolves to LNURL-pay metadata via the well-known path
//! `/.well-known/lnurlp/{local}` on the host.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::{Result, ZapError};

/// A validated `local@host` lightning address.
///
/// # Example
///
/// ```
/// use zapkit::LightningAddress;
///
/// let address: LightningAddress = "satoshi@vida.page".parse()?;
/// assert_eq!(address.local(), "satoshi");
/// assert_eq!(address.host(), "vida.page");
/// # Ok::<(), zapkit::ZapError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LightningAddress {
    local: String,
    host: String,
}

impl LightningAddress {
    /// Parse a lightning address, requiring a non-empty part on each side
    /// of the first `@`.
    pub fn parse(address: &str) -> Result<Self> {
        let Some((local, host)) = address.split_once('@') else {
            return Err(ZapError::invalid_address(address));
        };
        if local.is_empty() || host.is_empty() {
            return Err(ZapError::invalid_address(address));
        }
        // A second '@' or a path separator would change which server the
        // discovery URL points at.
        if host.contains('@') || host.contains('/') {
            return Err(ZapError::invalid_address(address));
        }
        Ok(Self {
            local: local.to_string(),
            host: host.to_string(),
        })
    }

    /// The part before the `@`.
    pub fn local(&self) -> &str {
        &self.local
    }

    /// The domain part after the `@`.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Build the LNURL-pay discovery URL for this address.
    ///
    /// The local part is percent-encoded into the final path segment.
    /// Tor hidden services and loopback hosts are served over plain http,
    /// everything else over https.
    pub fn well_known_url(&self) -> Result<Url> {
        let scheme = if self.host.ends_with(".onion") || is_loopback_host(&self.host) {
            "http"
        } else {
            "https"
        };
        let base = format!("{}://{}/.well-known/lnurlp/", scheme, self.host);
        let mut url =
            Url::parse(&base).map_err(|_| ZapError::invalid_address(self.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ZapError::invalid_address(self.to_string()))?
            .pop_if_empty()
            .push(&self.local);
        Ok(url)
    }
}

impl FromStr for LightningAddress {
    type Err = ZapError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for LightningAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local, self.host)
    }
}

fn is_loopback_host(host: &str) -> bool {
    let bare = host.split(':').next().unwrap_or(host);
    bare == "localhost" || bare == "127.0.0.1"
}
