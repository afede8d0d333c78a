//! Page sources: materialized lists and lazily-consumed streams.

use std::sync::{
    OnceLock,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use futures::{
    StreamExt,
    stream::{self, BoxStream, Stream},
};
use parking_lot::RwLock;

use super::error::MenuError;
use super::page::{Page, page_start, total_pages};

/// Produces pages on demand for a paginator.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Send + Sync + 'static;

    /// Maximum number of entries on a page.
    fn per_page(&self) -> usize;

    /// Warm-up before the first render. Streams read one page plus one entry
    /// so `is_paginating` can answer.
    async fn prepare(&self) -> Result<(), MenuError> {
        Ok(())
    }

    /// Return the page at `index`, producing it if needed.
    async fn get_page(&self, index: usize) -> Result<Page<Self::Item>, MenuError>;

    /// Total page count, once known.
    fn max_pages(&self) -> Option<usize>;

    /// Whether more than one page exists.
    fn is_paginating(&self) -> bool;

    /// Entries produced so far. A lower bound until the source is exhausted.
    fn known_entries(&self) -> usize;

    /// Index of the final page, exhausting the source if needed.
    async fn last_page(&self) -> Result<usize, MenuError>;
}

/// Page source over an in-memory list. Pages are sliced up front.
pub struct ListPageSource<T> {
    pages: Vec<Page<T>>,
    per_page: usize,
    entries: usize,
}

impl<T> ListPageSource<T> {
    pub fn new(entries: Vec<T>, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let count = entries.len();
        let mut rest = entries.into_iter();
        let mut pages = Vec::with_capacity(total_pages(count, per_page));

        loop {
            let chunk: Vec<T> = rest.by_ref().take(per_page).collect();
            if chunk.is_empty() && !pages.is_empty() {
                break;
            }

            let last = chunk.len() < per_page;
            pages.push(Page::new(pages.len(), chunk));
            if last {
                break;
            }
        }

        Self {
            pages,
            per_page,
            entries: count,
        }
    }
}

#[async_trait]
impl<T> PageSource for ListPageSource<T>
where
    T: Send + Sync + 'static,
{
    type Item = T;

    fn per_page(&self) -> usize {
        self.per_page
    }

    async fn get_page(&self, index: usize) -> Result<Page<T>, MenuError> {
        self.pages
            .get(index)
            .cloned()
            .ok_or(MenuError::OutOfRange {
                index,
                max_pages: self.pages.len(),
            })
    }

    fn max_pages(&self) -> Option<usize> {
        Some(self.pages.len())
    }

    fn is_paginating(&self) -> bool {
        self.pages.len() > 1
    }

    fn known_entries(&self) -> usize {
        self.entries
    }

    async fn last_page(&self) -> Result<usize, MenuError> {
        Ok(self.pages.len() - 1)
    }
}

struct StreamState<T> {
    stream: Option<BoxStream<'static, T>>,
    pending: Vec<T>,
}

impl<T> StreamState<T> {
    /// Pull until `target` entries are pending or the stream ends.
    async fn fill(&mut self, target: usize) {
        while self.pending.len() < target {
            let Some(stream) = self.stream.as_mut() else {
                return;
            };

            match stream.next().await {
                Some(item) => self.pending.push(item),
                None => self.stream = None,
            }
        }
    }
}

/// Page source over an async stream, consumed strictly in order.
///
/// Produced pages are cached and only ever appended to. Requests past the
/// highest cached page pull from the stream until that page exists or the
/// stream ends.
pub struct StreamPageSource<T> {
    per_page: usize,
    state: tokio::sync::Mutex<StreamState<T>>,
    pages: RwLock<Vec<Page<T>>>,
    max_pages: OnceLock<usize>,
    known: AtomicUsize,
}

impl<T> StreamPageSource<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(stream: impl Stream<Item = T> + Send + 'static, per_page: usize) -> Self {
        Self {
            per_page: per_page.max(1),
            state: tokio::sync::Mutex::new(StreamState {
                stream: Some(stream.boxed()),
                pending: Vec::new(),
            }),
            pages: RwLock::new(Vec::new()),
            max_pages: OnceLock::new(),
            known: AtomicUsize::new(0),
        }
    }

    pub fn from_iter<I>(entries: I, per_page: usize) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        Self::new(stream::iter(entries), per_page)
    }

    fn cached_pages(&self) -> usize {
        self.pages.read().len()
    }

    fn cached_page(&self, index: usize) -> Option<Page<T>> {
        self.pages.read().get(index).cloned()
    }

    /// Produce pages in order until `index` is cached or the stream is done.
    async fn produce_until(&self, index: usize) {
        let mut state = self.state.lock().await;

        while self.max_pages.get().is_none() && self.cached_pages() <= index {
            // One entry of lookahead tells whether this page is the last.
            state.fill(self.per_page.saturating_add(1)).await;
            let exhausted = state.stream.is_none();
            let cached = self.cached_pages();

            if state.pending.is_empty() && cached > 0 {
                let _ = self.max_pages.set(cached);
                break;
            }

            let take = self.per_page.min(state.pending.len());
            let items: Vec<T> = state.pending.drain(..take).collect();
            let produced = items.len();

            self.pages.write().push(Page::new(cached, items));
            let previous = self.known.load(Ordering::Acquire);
            self.known.store(
                previous.max(
                    page_start(cached, self.per_page)
                        .saturating_add(produced + state.pending.len()),
                ),
                Ordering::Release,
            );

            if exhausted && state.pending.is_empty() {
                let _ = self.max_pages.set(cached + 1);
            }
        }
    }
}

#[async_trait]
impl<T> PageSource for StreamPageSource<T>
where
    T: Send + Sync + 'static,
{
    type Item = T;

    fn per_page(&self) -> usize {
        self.per_page
    }

    async fn prepare(&self) -> Result<(), MenuError> {
        self.produce_until(0).await;
        Ok(())
    }

    async fn get_page(&self, index: usize) -> Result<Page<T>, MenuError> {
        if let Some(page) = self.cached_page(index) {
            return Ok(page);
        }

        self.produce_until(index).await;

        self.cached_page(index).ok_or_else(|| MenuError::OutOfRange {
            index,
            max_pages: self
                .max_pages
                .get()
                .copied()
                .unwrap_or_else(|| self.cached_pages()),
        })
    }

    fn max_pages(&self) -> Option<usize> {
        self.max_pages.get().copied()
    }

    fn is_paginating(&self) -> bool {
        match self.max_pages.get() {
            Some(max_pages) => *max_pages > 1,
            None => self.cached_pages() > 1 || self.known_entries() > self.per_page,
        }
    }

    fn known_entries(&self) -> usize {
        self.known.load(Ordering::Acquire)
    }

    async fn last_page(&self) -> Result<usize, MenuError> {
        self.produce_until(usize::MAX).await;
        Ok(self.max_pages().unwrap_or_else(|| self.cached_pages()).max(1) - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters() -> Vec<&'static str> {
        vec!["a", "b", "c", "d", "e"]
    }

    #[tokio::test]
    async fn list_source_slices_fixed_pages() {
        let source = ListPageSource::new(letters(), 2);

        assert_eq!(source.get_page(0).await.unwrap().items(), ["a", "b"]);
        assert_eq!(source.get_page(1).await.unwrap().items(), ["c", "d"]);
        assert_eq!(source.get_page(2).await.unwrap().items(), ["e"]);
        assert_eq!(source.max_pages(), Some(3));
        assert!(source.is_paginating());
        assert_eq!(source.known_entries(), 5);
    }

    #[tokio::test]
    async fn unbounded_page_size_holds_everything_on_one_page() {
        let list = ListPageSource::new(letters(), usize::MAX);
        assert_eq!(list.max_pages(), Some(1));
        assert_eq!(list.get_page(0).await.unwrap().len(), 5);

        let stream = StreamPageSource::from_iter(letters(), usize::MAX);
        stream.prepare().await.unwrap();
        assert_eq!(stream.get_page(0).await.unwrap().len(), 5);
        assert_eq!(stream.max_pages(), Some(1));
        assert_eq!(stream.known_entries(), 5);
    }

    #[tokio::test]
    async fn list_source_rejects_pages_past_the_end() {
        let source = ListPageSource::new(letters(), 2);

        let err = source.get_page(3).await.unwrap_err();
        assert!(matches!(
            err,
            MenuError::OutOfRange {
                index: 3,
                max_pages: 3
            }
        ));
    }

    #[tokio::test]
    async fn empty_list_has_one_empty_page() {
        let source = ListPageSource::<u32>::new(Vec::new(), 4);

        assert_eq!(source.max_pages(), Some(1));
        assert!(source.get_page(0).await.unwrap().is_empty());
        assert!(!source.is_paginating());
        assert_eq!(source.last_page().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn exact_multiple_does_not_add_trailing_page() {
        let source = ListPageSource::new(vec![1, 2, 3, 4], 2);
        assert_eq!(source.max_pages(), Some(2));
    }

    #[tokio::test]
    async fn stream_source_learns_max_pages_only_after_exhaustion() {
        let source = StreamPageSource::from_iter(letters(), 2);
        source.prepare().await.unwrap();

        assert_eq!(source.max_pages(), None);
        assert!(source.is_paginating());
        assert_eq!(source.get_page(0).await.unwrap().items(), ["a", "b"]);
        assert_eq!(source.known_entries(), 3);

        assert_eq!(source.get_page(2).await.unwrap().items(), ["e"]);
        assert_eq!(source.max_pages(), Some(3));
        assert_eq!(source.known_entries(), 5);
        assert_eq!(source.get_page(1).await.unwrap().items(), ["c", "d"]);
    }

    #[tokio::test]
    async fn stream_source_out_of_range_only_after_exhaustion() {
        let source = StreamPageSource::from_iter(letters(), 2);

        let err = source.get_page(7).await.unwrap_err();
        assert!(matches!(
            err,
            MenuError::OutOfRange {
                index: 7,
                max_pages: 3
            }
        ));
        assert_eq!(source.max_pages(), Some(3));
    }

    #[tokio::test]
    async fn stream_source_single_page_is_not_paginating() {
        let source = StreamPageSource::from_iter(vec![1, 2], 2);
        source.prepare().await.unwrap();

        assert!(!source.is_paginating());
        assert_eq!(source.max_pages(), Some(1));
        assert_eq!(source.last_page().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn stream_source_last_page_drains_stream() {
        let source = StreamPageSource::from_iter(1..=7, 3);

        assert_eq!(source.last_page().await.unwrap(), 2);
        assert_eq!(source.get_page(2).await.unwrap().items(), [7]);
        assert_eq!(source.known_entries(), 7);
    }

    #[tokio::test]
    async fn empty_stream_has_one_empty_page() {
        let source = StreamPageSource::from_iter(Vec::<u8>::new(), 3);
        source.prepare().await.unwrap();

        assert_eq!(source.max_pages(), Some(1));
        assert!(source.get_page(0).await.unwrap().is_empty());
        assert!(source.get_page(1).await.is_err());
    }
}
