//! Payment URI helpers.

/// Render an invoice as a `lightning:` deep link.
///
/// Invoices that already carry the scheme are returned unchanged.
///
/// # Example
///
/// ```
/// use zapkit::uri::lightning_uri;
///
/// assert_eq!(lightning_uri("lnbc1..."), "lightning:lnbc1...");
/// assert_eq!(lightning_uri("lightning:lnbc1..."), "lightning:lnbc1...");
/// ```
pub fn lightning_uri(invoice: &str) -> String {
    if invoice.starts_with("lightning:") {
        invoice.to_string()
    } else {
        format!("lightning:{}", invoice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_bare_invoice() {
        assert_eq!(lightning_uri("lnbc1u1ptest"), "lightning:lnbc1u1ptest");
    }

    #[test]
    fn test_keeps_existing_scheme() {
        assert_eq!(lightning_uri("lightning:lnbc1u1ptest"), "lightning:lnbc1u1ptest");
    }
}
