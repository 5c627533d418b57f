//! Offset pagination for list endpoints.

use serde::{Deserialize, Serialize};

/// A `limit`/`offset` window over a list endpoint.
///
/// Defaults to the first 20 items, which is what the feed requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Page {
    /// Default page size.
    pub const DEFAULT_LIMIT: u32 = 20;

    #[must_use]
    pub const fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// The page following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset.saturating_add(self.limit),
        }
    }

    /// Render as a query string (without the leading `?`).
    #[must_use]
    pub fn query(&self) -> String {
        format!("limit={}&offset={}", self.limit, self.offset)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_query() {
        assert_eq!(Page::default().query(), "limit=20&offset=0");
    }

    #[test]
    fn test_next_page() {
        let page = Page::new(10, 30).next();
        assert_eq!(page, Page::new(10, 40));
    }

    #[test]
    fn test_next_page_saturates() {
        let page = Page::new(10, u32::MAX - 5).next();
        assert_eq!(page.offset, u32::MAX);
    }
}
