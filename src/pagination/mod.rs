//! Pagination module
//!
//! Cursor pagination over any "fetch one page" function.
//!
//! # Overview
//!
//! A fetch function takes a [`PageQuery`] (`limit`, `starting_after`) and
//! returns a [`Page`]. [`stream`] wraps it in a lazy [`Paginator`]; [`list`]
//! drains one eagerly. The cursor for the next page is the `id` of the last
//! item on the current page. An empty page, or a last item without an `id`,
//! ends pagination.

mod stream;
mod types;

pub use stream::Paginator;
pub use types::{item_cursor, ListOptions, Page, PageQuery, DEFAULT_LIMIT};

use crate::error::Result;
use serde_json::Value;
use std::future::Future;

/// Lazily paginate over `fetch`
///
/// Does not call `fetch` until the first item is requested.
pub fn stream<F, Fut>(fetch: F, options: ListOptions) -> Paginator<F>
where
    F: FnMut(PageQuery) -> Fut,
    Fut: Future<Output = Result<Page>>,
{
    Paginator::new(fetch, options)
}

/// Fetch every page and return all items
///
/// Returns the first fetch error instead of a partial list.
pub async fn list<F, Fut>(fetch: F, options: ListOptions) -> Result<Vec<Value>>
where
    F: FnMut(PageQuery) -> Fut,
    Fut: Future<Output = Result<Page>>,
{
    Paginator::new(fetch, options).collect_all().await
}
