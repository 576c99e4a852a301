//! Lazy cursor pagination
//!
//! [`Paginator`] drives a page fetch function one page at a time. It never
//! prefetches: a page is requested only when the consumer asks for an item
//! and the buffer is empty. A fetch error ends the sequence and is kept in
//! the terminal state, retrievable through [`Paginator::error`].

use super::types::{ListOptions, Page, PageQuery};
use crate::error::{Error, Result};
use futures::Stream;
use serde_json::Value;
use std::collections::{HashSet, VecDeque};
use std::future::Future;
use tracing::debug;

/// Pagination state machine
#[derive(Debug, Clone)]
enum State {
    /// No page requested yet
    NotStarted,
    /// Items waiting to be yielded, and the cursor for the page after them
    Buffered {
        items: VecDeque<Value>,
        cursor: Option<String>,
    },
    /// No further pages; holds the error that ended iteration, if any
    Terminal { error: Option<Error> },
}

/// Drops items whose key was already yielded
#[derive(Debug, Clone)]
struct Dedup {
    field: String,
    seen: HashSet<String>,
}

impl Dedup {
    fn new(field: String) -> Self {
        Self {
            field,
            seen: HashSet::new(),
        }
    }

    /// Record the item's key, returning false if it was seen before
    ///
    /// Items missing the field share the `null` key.
    fn admit(&mut self, item: &Value) -> bool {
        let key = item.get(&self.field).unwrap_or(&Value::Null).to_string();
        self.seen.insert(key)
    }
}

/// Lazy, resumable sequence of items drawn from a page fetch function
pub struct Paginator<F> {
    fetch: F,
    limit: usize,
    starting_after: Option<String>,
    state: State,
    dedup: Option<Dedup>,
    fetch_count: usize,
}

impl<F, Fut> Paginator<F>
where
    F: FnMut(PageQuery) -> Fut,
    Fut: Future<Output = Result<Page>>,
{
    /// Create a paginator; nothing is fetched until the first item is pulled
    pub fn new(fetch: F, options: ListOptions) -> Self {
        Self {
            fetch,
            limit: options.limit,
            starting_after: options.starting_after,
            state: State::NotStarted,
            dedup: options.unique_by.map(Dedup::new),
            fetch_count: 0,
        }
    }

    /// Pull the next item
    ///
    /// Returns `Some(Err(_))` exactly once when a fetch fails, then `None`.
    pub async fn next(&mut self) -> Option<Result<Value>> {
        loop {
            let item = match self.next_raw().await? {
                Ok(item) => item,
                Err(err) => return Some(Err(err)),
            };

            if let Some(dedup) = self.dedup.as_mut() {
                if !dedup.admit(&item) {
                    continue;
                }
            }
            return Some(Ok(item));
        }
    }

    async fn next_raw(&mut self) -> Option<Result<Value>> {
        loop {
            // Outer None: buffer drained and no cursor left
            let next = match &mut self.state {
                State::Terminal { .. } => return None,
                State::NotStarted => Some(self.starting_after.take()),
                State::Buffered { items, cursor } => {
                    if let Some(item) = items.pop_front() {
                        return Some(Ok(item));
                    }
                    cursor.take().map(Some)
                }
            };

            let Some(starting_after) = next else {
                debug!("Pagination finished: last page had no cursor");
                self.state = State::Terminal { error: None };
                return None;
            };

            let query = PageQuery {
                limit: self.limit,
                starting_after,
            };
            self.fetch_count += 1;

            match (self.fetch)(query).await {
                Ok(page) if page.is_empty() => {
                    debug!("Pagination finished: page {} was empty", self.fetch_count);
                    self.state = State::Terminal { error: None };
                    return None;
                }
                Ok(page) => {
                    let cursor = page.next_cursor();
                    debug!(
                        "Fetched page {}: {} items, next cursor {:?}",
                        self.fetch_count,
                        page.len(),
                        cursor
                    );
                    self.state = State::Buffered {
                        items: page.items.into(),
                        cursor,
                    };
                }
                Err(err) => {
                    debug!("Pagination aborted on page {}: {}", self.fetch_count, err);
                    self.state = State::Terminal {
                        error: Some(err.clone()),
                    };
                    return Some(Err(err));
                }
            }
        }
    }

    /// Consume every remaining item
    ///
    /// All-or-nothing: a failed fetch discards the items gathered so far.
    pub async fn collect_all(mut self) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await {
            items.push(item?);
        }
        Ok(items)
    }

    /// Adapt into a [`Stream`] of items
    pub fn into_stream(self) -> impl Stream<Item = Result<Value>> {
        futures::stream::unfold(self, |mut paginator| async move {
            paginator.next().await.map(|item| (item, paginator))
        })
    }
}

impl<F> Paginator<F> {
    /// The error that ended iteration, if it ended with one
    pub fn error(&self) -> Option<&Error> {
        match &self.state {
            State::Terminal { error } => error.as_ref(),
            _ => None,
        }
    }

    /// Whether no further pages will be fetched
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, State::Terminal { .. })
    }

    /// Number of page fetches issued so far
    pub fn fetch_count(&self) -> usize {
        self.fetch_count
    }
}

impl<F> std::fmt::Debug for Paginator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("limit", &self.limit)
            .field("state", &self.state)
            .field("unique_by", &self.dedup.as_ref().map(|d| &d.field))
            .field("fetch_count", &self.fetch_count)
            .finish_non_exhaustive()
    }
}
