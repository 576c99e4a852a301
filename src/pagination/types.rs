//! Pagination types
//!
//! Items are opaque JSON values; the only field this module ever reads is
//! `id` on the last item of a page, to derive the next cursor.

use serde_json::Value;

/// Default page size
pub const DEFAULT_LIMIT: usize = 100;

/// One fetched batch of items
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Items in server order
    pub items: Vec<Value>,
    /// The full response body
    pub raw: Value,
}

impl Page {
    /// Create a page from items, with no raw body
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            items,
            raw: Value::Null,
        }
    }

    /// Build a page from a list response body
    ///
    /// Accepts `{"objects": [...]}`, `{"events": [...]}` or a bare array.
    /// Anything else is an empty page.
    pub fn from_body(raw: Value) -> Self {
        let items = match &raw {
            Value::Array(items) => items.clone(),
            Value::Object(map) => ["objects", "events"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_array))
                .cloned()
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        Self { items, raw }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cursor for the page after this one
    ///
    /// `None` when the page is empty or its last item has no usable `id`.
    pub fn next_cursor(&self) -> Option<String> {
        self.items.last().and_then(item_cursor)
    }
}

/// Cursor value of a single item
pub fn item_cursor(item: &Value) -> Option<String> {
    match item.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Arguments handed to a page fetch function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub limit: usize,
    pub starting_after: Option<String>,
}

impl PageQuery {
    /// Render as query parameters
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("limit".to_string(), self.limit.to_string())];
        if let Some(cursor) = &self.starting_after {
            params.push(("starting_after".to_string(), cursor.clone()));
        }
        params
    }
}

/// Options for a paginated listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// Page size requested from the server
    pub limit: usize,
    /// Resume after this cursor
    pub starting_after: Option<String>,
    /// Drop items whose value at this field was already yielded
    pub unique_by: Option<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            starting_after: None,
            unique_by: None,
        }
    }
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn starting_after(mut self, cursor: impl Into<String>) -> Self {
        self.starting_after = Some(cursor.into());
        self
    }

    #[must_use]
    pub fn unique_by(mut self, field: impl Into<String>) -> Self {
        self.unique_by = Some(field.into());
        self
    }
}
