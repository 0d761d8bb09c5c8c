//! Offset pagination over a countable, ordered source.

use async_trait::async_trait;
use serde::Serialize;

/// Page size used when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 5;
/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 20;

/// A filtered and ordered collection that can be counted and sliced.
///
/// Both calls must observe the same filter so the count describes the
/// slices. Errors are passed through the paginator untouched.
#[async_trait]
pub trait PagedSource: Send + Sync {
    type Item: Send;
    type Error: Send;

    async fn count(&self) -> Result<u64, Self::Error>;

    async fn fetch(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Self::Item>, Self::Error>;
}

/// A normalized page position: page is at least 1, size is within
/// `1..=max_page_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: u64,
    size: u64,
}

impl PageRequest {
    pub fn new(page_number: i64, page_size: i64, max_page_size: u32) -> Self {
        let max = u64::from(max_page_size.max(1));
        let number = u64::try_from(page_number).unwrap_or(0).max(1);
        let size = u64::try_from(page_size).unwrap_or(0).clamp(1, max);
        Self { number, size }
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn offset(&self) -> u64 {
        (self.number - 1).saturating_mul(self.size)
    }

    pub fn limit(&self) -> u64 {
        self.size
    }
}

/// Navigation data for one page, independent of its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub total_count: u64,
    pub page_size: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageMetadata {
    pub fn new(total_count: u64, request: PageRequest) -> Self {
        let total_pages = total_count.div_ceil(request.size());
        let current_page = request.number();
        Self {
            total_count,
            page_size: request.size(),
            current_page,
            total_pages,
            has_previous: current_page > 1,
            has_next: current_page < total_pages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_size: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        let PageMetadata {
            total_count,
            page_size,
            current_page,
            total_pages,
            has_previous,
            has_next,
        } = PageMetadata::new(total_count, request);

        Self {
            items,
            total_count,
            page_size,
            current_page,
            total_pages,
            has_previous,
            has_next,
        }
    }

    pub fn metadata(&self) -> PageMetadata {
        PageMetadata {
            total_count: self.total_count,
            page_size: self.page_size,
            current_page: self.current_page,
            total_pages: self.total_pages,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }

    /// Converts the items while keeping the navigation data.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_size: self.page_size,
            current_page: self.current_page,
            total_pages: self.total_pages,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }
}

/// Counts `source` once and fetches the requested window once.
pub async fn fetch_page<S>(
    source: &S,
    request: PageRequest,
) -> Result<Page<S::Item>, S::Error>
where
    S: PagedSource + ?Sized,
{
    let total_count = source.count().await?;
    let items = source.fetch(request.offset(), request.limit()).await?;
    Ok(Page::new(items, total_count, request))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    default_page_size: u32,
    max_page_size: u32,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(MAX_PAGE_SIZE)
    }
}

impl Paginator {
    pub fn new(max_page_size: u32) -> Self {
        let max_page_size = max_page_size.max(1);
        Self {
            default_page_size: DEFAULT_PAGE_SIZE.min(max_page_size),
            max_page_size,
        }
    }

    /// Page size used when a request leaves it out; kept within
    /// `1..=max_page_size`.
    pub fn with_default_page_size(mut self, page_size: u32) -> Self {
        self.default_page_size = page_size.clamp(1, self.max_page_size);
        self
    }

    pub fn default_page_size(&self) -> u32 {
        self.default_page_size
    }

    pub fn max_page_size(&self) -> u32 {
        self.max_page_size
    }

    pub fn request(&self, page_number: i64, page_size: i64) -> PageRequest {
        PageRequest::new(page_number, page_size, self.max_page_size)
    }

    pub fn request_or_default(
        &self,
        page_number: i64,
        page_size: Option<i64>,
    ) -> PageRequest {
        self.request(
            page_number,
            page_size.unwrap_or(i64::from(self.default_page_size)),
        )
    }

    pub async fn paginate<S>(
        &self,
        source: &S,
        page_number: i64,
        page_size: i64,
    ) -> Result<Page<S::Item>, S::Error>
    where
        S: PagedSource + ?Sized,
    {
        fetch_page(source, self.request(page_number, page_size)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        items: Vec<u32>,
        counts: AtomicUsize,
        fetches: AtomicUsize,
    }

    impl CountingSource {
        fn with_len(len: u32) -> Self {
            Self {
                items: (1..=len).collect(),
                counts: AtomicUsize::new(0),
                fetches: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PagedSource for CountingSource {
        type Item = u32;
        type Error = Infallible;

        async fn count(&self) -> Result<u64, Infallible> {
            self.counts.fetch_add(1, Ordering::SeqCst);
            Ok(self.items.len() as u64)
        }

        async fn fetch(
            &self,
            offset: u64,
            limit: u64,
        ) -> Result<Vec<u32>, Infallible> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .items
                .iter()
                .skip(offset as usize)
                .take(limit as usize)
                .copied()
                .collect())
        }
    }

    struct FailingSource;

    #[derive(Debug, PartialEq, Eq)]
    struct StoreDown;

    #[async_trait]
    impl PagedSource for FailingSource {
        type Item = u32;
        type Error = StoreDown;

        async fn count(&self) -> Result<u64, StoreDown> {
            Err(StoreDown)
        }

        async fn fetch(&self, _: u64, _: u64) -> Result<Vec<u32>, StoreDown> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn request_normalizes_out_of_range_values() {
        let request = PageRequest::new(0, 0, 20);
        assert_eq!((request.number(), request.size()), (1, 1));

        let request = PageRequest::new(-4, 500, 20);
        assert_eq!((request.number(), request.size()), (1, 20));

        let request = PageRequest::new(3, 5, 20);
        assert_eq!(request.offset(), 10);
        assert_eq!(request.limit(), 5);
    }

    #[test]
    fn metadata_holds_for_all_small_totals_and_sizes() {
        for total in 0..40u64 {
            for size in 1..12i64 {
                for page in 1..8i64 {
                    let meta =
                        PageMetadata::new(total, PageRequest::new(page, size, 20));
                    let expected_pages = total.div_ceil(size as u64);
                    assert_eq!(meta.total_pages, expected_pages);
                    assert_eq!(meta.has_next, meta.current_page < expected_pages);
                    assert_eq!(meta.has_previous, meta.current_page > 1);
                }
            }
        }
    }

    #[tokio::test]
    async fn empty_source_yields_empty_first_page() {
        let source = CountingSource::with_len(0);
        let page = Paginator::default().paginate(&source, 1, 5).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_previous);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn last_partial_page() {
        let source = CountingSource::with_len(12);
        let page = Paginator::default().paginate(&source, 3, 5).await.unwrap();
        assert_eq!(page.items, vec![11, 12]);
        assert_eq!(page.total_count, 12);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_previous);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn page_beyond_last_is_empty_with_metadata() {
        let source = CountingSource::with_len(12);
        let page = Paginator::default().paginate(&source, 9, 5).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 12);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 9);
        assert!(page.has_previous);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn counts_and_fetches_exactly_once() {
        let source = CountingSource::with_len(30);
        let page = Paginator::new(10).paginate(&source, 2, 50).await.unwrap();
        assert_eq!(page.page_size, 10);
        assert_eq!(page.items.first(), Some(&11));
        assert_eq!(source.counts.load(Ordering::SeqCst), 1);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn storage_error_propagates_unchanged() {
        let err = Paginator::default()
            .paginate(&FailingSource, 1, 5)
            .await
            .unwrap_err();
        assert_eq!(err, StoreDown);
    }

    #[test]
    fn map_keeps_navigation() {
        let page = Page::new(vec![1, 2], 7, PageRequest::new(2, 2, 20));
        let mapped = page.clone().map(|n| n.to_string());
        assert_eq!(mapped.items, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(mapped.metadata(), page.metadata());
    }

    #[test]
    fn configured_default_applies_only_when_size_missing() {
        let paginator = Paginator::new(10).with_default_page_size(15);
        assert_eq!(paginator.default_page_size(), 10);

        let paginator = Paginator::new(10).with_default_page_size(3);
        assert_eq!(paginator.request_or_default(1, None).size(), 3);
        assert_eq!(paginator.request_or_default(1, Some(8)).size(), 8);
        assert_eq!(paginator.request_or_default(1, Some(0)).size(), 1);
    }
}
