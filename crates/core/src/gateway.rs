//! Rewriting of content-addressed image URLs to a preferred IPFS gateway.
//!
//! This is plain prefix substitution. The resulting address is not validated.

/// URL scheme for content-addressed references.
const IPFS_SCHEME: &str = "ipfs://";

/// Public gateway the server embeds in stored image URLs.
const PUBLIC_GATEWAY_PREFIX: &str = "https://ipfs.io/ipfs/";

/// Resolves image URLs against a configured gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayRewriter {
    gateway: String,
}

impl GatewayRewriter {
    /// Create a rewriter for the given gateway base (e.g. `http://localhost:8081`).
    #[must_use]
    pub fn new(gateway: impl Into<String>) -> Self {
        let gateway = gateway.into();
        Self {
            gateway: gateway.trim_end_matches('/').to_owned(),
        }
    }

    #[must_use]
    pub fn gateway(&self) -> &str {
        &self.gateway
    }

    /// Map an image URL to the address that should be displayed.
    ///
    /// - `ipfs://<cid>` becomes `<gateway>/ipfs/<cid>`
    /// - `https://ipfs.io/ipfs/<path>` becomes `<gateway>/ipfs/<path>`
    /// - anything else is returned unchanged
    #[must_use]
    pub fn display_url(&self, url: &str) -> String {
        if let Some(cid) = url.strip_prefix(IPFS_SCHEME) {
            return format!("{}/ipfs/{cid}", self.gateway);
        }
        if let Some(rest) = url.strip_prefix(PUBLIC_GATEWAY_PREFIX) {
            return format!("{}/ipfs/{rest}", self.gateway);
        }
        url.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipfs_scheme_is_rewritten() {
        let rewriter = GatewayRewriter::new("http://localhost:8081");
        assert_eq!(
            rewriter.display_url("ipfs://QmHash"),
            "http://localhost:8081/ipfs/QmHash"
        );
    }

    #[test]
    fn test_public_gateway_is_rewritten() {
        let rewriter = GatewayRewriter::new("https://gw.example.com/");
        assert_eq!(
            rewriter.display_url("https://ipfs.io/ipfs/QmHash/file.png"),
            "https://gw.example.com/ipfs/QmHash/file.png"
        );
    }

    #[test]
    fn test_other_urls_pass_through() {
        let rewriter = GatewayRewriter::new("http://localhost:8081");
        assert_eq!(
            rewriter.display_url("https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
        assert_eq!(rewriter.display_url(""), "");
    }

    #[test]
    fn test_gateway_trailing_slash_trimmed() {
        assert_eq!(
            GatewayRewriter::new("http://gw/").gateway(),
            "http://gw"
        );
    }
}
