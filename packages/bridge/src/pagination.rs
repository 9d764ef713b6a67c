//! Page tokens for list calls.
//!
//! A token is minted only when a page is truncated and maps to the offset the
//! next page starts at. A token is consumed only once its page is served, so a
//! list call that fails at the backend can be retried with the same token.

use std::collections::HashMap;

use crate::Status;

/// Where a requested page starts and how long it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Page {
    /// Zero means "everything remaining".
    pub size: usize,
    pub offset: usize,
    /// Token this page was resolved from, retired by `paginate`.
    pub token: Option<String>,
}

#[derive(Debug, Default)]
pub(crate) struct PageCursors {
    tokens: HashMap<String, usize>,
}

impl PageCursors {
    /// Resolve a list request's paging fields.
    pub fn extract(&mut self, page_size: i32, page_token: &str) -> Result<Page, Status> {
        let size = usize::try_from(page_size)
            .map_err(|_| Status::invalid_argument("negative PageSize is not allowed"))?;

        if page_token.is_empty() {
            return Ok(Page {
                size,
                offset: 0,
                token: None,
            });
        }

        let offset = *self.tokens.get(page_token).ok_or_else(|| {
            Status::not_found(format!("unable to find pagination token {}", page_token))
        })?;

        Ok(Page {
            size,
            offset,
            token: Some(page_token.to_string()),
        })
    }

    /// Slice `items` to `page`; returns the page and the next token, which is
    /// empty when nothing remains.
    pub fn paginate<T>(&mut self, items: Vec<T>, page: Page) -> (Vec<T>, String) {
        if let Some(used) = &page.token {
            self.tokens.remove(used);
        }

        let remaining = items.len().saturating_sub(page.offset);
        let truncated = page.size != 0 && page.size < remaining;
        let take = if truncated { page.size } else { remaining };

        let slice: Vec<T> = items.into_iter().skip(page.offset).take(take).collect();
        if !truncated {
            return (slice, String::new());
        }

        let token = uuid::Uuid::new_v4().to_string();
        self.tokens.insert(token.clone(), page.offset + page.size);
        tracing::debug!(token = %token, offset = page.offset + page.size, "minted page token");
        (slice, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Code;

    #[test]
    fn negative_size_rejected() {
        let mut cursors = PageCursors::default();
        let err = cursors.extract(-1, "").unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
        assert_eq!(err.message(), "negative PageSize is not allowed");
    }

    #[test]
    fn unknown_token_not_found() {
        let mut cursors = PageCursors::default();
        let err = cursors.extract(1, "unknown-pagination-token").unwrap_err();
        assert_eq!(err.code(), Code::NotFound);
        assert_eq!(
            err.message(),
            "unable to find pagination token unknown-pagination-token"
        );
    }

    #[test]
    fn walks_pages_and_consumes_tokens() {
        let mut cursors = PageCursors::default();

        let page = cursors.extract(2, "").unwrap();
        let (items, token) = cursors.paginate(vec![1, 2, 3, 4, 5], page);
        assert_eq!(items, vec![1, 2]);
        assert!(!token.is_empty());

        let page = cursors.extract(2, &token).unwrap();
        assert_eq!(page.offset, 2);
        let (items, next) = cursors.paginate(vec![1, 2, 3, 4, 5], page);
        assert_eq!(items, vec![3, 4]);

        // Consumed.
        assert!(cursors.extract(2, &token).is_err());

        let page = cursors.extract(2, &next).unwrap();
        let (items, last) = cursors.paginate(vec![1, 2, 3, 4, 5], page);
        assert_eq!(items, vec![5]);
        assert!(last.is_empty());
    }

    #[test]
    fn token_survives_until_page_is_served() {
        let mut cursors = PageCursors::default();
        let page = cursors.extract(1, "").unwrap();
        let (_, token) = cursors.paginate(vec![1, 2, 3], page);

        // Resolved but never served, e.g. the backend call failed.
        let abandoned = cursors.extract(1, &token).unwrap();
        assert_eq!(abandoned.offset, 1);

        let page = cursors.extract(1, &token).unwrap();
        let (items, _) = cursors.paginate(vec![1, 2, 3], page);
        assert_eq!(items, vec![2]);
        assert!(cursors.extract(1, &token).is_err());
    }

    #[test]
    fn zero_or_oversized_returns_everything() {
        let mut cursors = PageCursors::default();
        for size in [0, 3, 1000] {
            let page = cursors.extract(size, "").unwrap();
            let (items, token) = cursors.paginate(vec!['a', 'b', 'c'], page);
            assert_eq!(items, vec!['a', 'b', 'c']);
            assert!(token.is_empty());
        }
        assert!(cursors.tokens.is_empty());
    }

    #[test]
    fn offset_past_end_is_empty() {
        let mut cursors = PageCursors::default();
        let page = Page {
            size: 1,
            offset: 5,
            token: None,
        };
        let (items, token) = cursors.paginate(vec![1, 2], page);
        assert!(items.is_empty());
        assert!(token.is_empty());
    }
}
