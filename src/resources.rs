//! Resource handles
//!
//! Thin, struct-free handles over the platform's object endpoints. Every
//! call goes through [`Client::execute`] and list calls through the
//! pagination engine; bodies stay as raw JSON so typed mapping can happen
//! downstream.

use crate::error::Result;
use crate::http::{Client, RequestOptions};
use crate::pagination::{self, ListOptions, Page, PageQuery, Paginator};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Boxed page fetch function handed to the pagination engine
pub type PageFetcher = Box<dyn FnMut(PageQuery) -> BoxFuture<'static, Result<Page>> + Send>;

/// Object types exposed by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Project,
    Dataset,
    Experiment,
    Prompt,
    Function,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Project,
        ResourceKind::Dataset,
        ResourceKind::Experiment,
        ResourceKind::Prompt,
        ResourceKind::Function,
    ];

    /// Singular name used in URLs
    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Project => "project",
            ResourceKind::Dataset => "dataset",
            ResourceKind::Experiment => "experiment",
            ResourceKind::Prompt => "prompt",
            ResourceKind::Function => "function",
        }
    }

    /// Collection path, e.g. `/v1/project`
    pub fn path(self) -> String {
        format!("/v1/{}", self.name())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let singular = s.trim().to_ascii_lowercase();
        let singular = singular.strip_suffix('s').unwrap_or(&singular);
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.name() == singular)
            .ok_or_else(|| format!("unknown resource '{s}'"))
    }
}

/// Handle for one object collection
#[derive(Debug, Clone)]
pub struct Resource {
    client: Client,
    kind: ResourceKind,
    filters: BTreeMap<String, String>,
}

impl Resource {
    pub fn new(client: Client, kind: ResourceKind) -> Self {
        Self {
            client,
            kind,
            filters: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Add a query filter sent with every list request (e.g. `project_id`)
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Lazily page through the collection
    pub fn stream(&self, options: ListOptions) -> Paginator<PageFetcher> {
        pagination::stream(self.page_fetcher(), options)
    }

    /// Fetch the whole collection
    pub async fn list(&self, options: ListOptions) -> Result<Vec<Value>> {
        pagination::list(self.page_fetcher(), options).await
    }

    pub async fn get(&self, id: &str) -> Result<Value> {
        self.client.get(&self.object_path(id)).await
    }

    pub async fn create(&self, body: Value) -> Result<Value> {
        self.client.post(&self.kind.path(), body).await
    }

    pub async fn update(&self, id: &str, body: Value) -> Result<Value> {
        self.client.patch(&self.object_path(id), body).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value> {
        self.client.delete(&self.object_path(id)).await
    }

    fn object_path(&self, id: &str) -> String {
        format!("{}/{}", self.kind.path(), id)
    }

    fn page_fetcher(&self) -> PageFetcher {
        let client = self.client.clone();
        let path = self.kind.path();
        let filters = self.filters.clone();

        Box::new(move |query: PageQuery| {
            let client = client.clone();
            let path = path.clone();
            let mut options = RequestOptions::new();
            for (key, value) in &filters {
                options = options.query(key, value);
            }
            for (key, value) in query.to_params() {
                options = options.query(key, value);
            }
            async move { client.get_with(&path, options).await.map(Page::from_body) }.boxed()
        })
    }
}

/// Handle for an append-only event log (project logs, experiment or
/// dataset events)
#[derive(Debug, Clone)]
pub struct EventLog {
    client: Client,
    prefix: String,
}

impl EventLog {
    /// Logs of a project
    pub fn project_logs(client: Client, project_id: &str) -> Self {
        Self {
            client,
            prefix: format!("/v1/project_logs/{project_id}"),
        }
    }

    /// Events of an experiment or dataset
    pub fn for_object(client: Client, kind: ResourceKind, id: &str) -> Self {
        Self {
            client,
            prefix: format!("{}/{}", kind.path(), id),
        }
    }

    /// Append events; returns the server's acknowledgement body
    pub async fn insert(&self, events: Vec<Value>) -> Result<Value> {
        self.client
            .post(&format!("{}/insert", self.prefix), json!({ "events": events }))
            .await
    }

    /// Lazily page through events
    ///
    /// Fetch pages can overlap, so results are de-duplicated by `id` unless
    /// `options.unique_by` names another field.
    pub fn stream(&self, mut options: ListOptions) -> Paginator<PageFetcher> {
        if options.unique_by.is_none() {
            options.unique_by = Some("id".to_string());
        }
        pagination::stream(self.page_fetcher(), options)
    }

    /// Fetch every event
    pub async fn fetch_all(&self, options: ListOptions) -> Result<Vec<Value>> {
        self.stream(options).collect_all().await
    }

    fn page_fetcher(&self) -> PageFetcher {
        let client = self.client.clone();
        let path = format!("{}/fetch", self.prefix);

        Box::new(move |query: PageQuery| {
            let client = client.clone();
            let path = path.clone();
            let mut body = json!({ "limit": query.limit });
            if let Some(cursor) = query.starting_after {
                body["cursor"] = Value::String(cursor);
            }
            async move { client.post(&path, body).await.map(Page::from_body) }.boxed()
        })
    }
}

impl Client {
    pub fn resource(&self, kind: ResourceKind) -> Resource {
        Resource::new(self.clone(), kind)
    }

    pub fn projects(&self) -> Resource {
        self.resource(ResourceKind::Project)
    }

    pub fn datasets(&self) -> Resource {
        self.resource(ResourceKind::Dataset)
    }

    pub fn experiments(&self) -> Resource {
        self.resource(ResourceKind::Experiment)
    }

    pub fn prompts(&self) -> Resource {
        self.resource(ResourceKind::Prompt)
    }

    pub fn functions(&self) -> Resource {
        self.resource(ResourceKind::Function)
    }

    pub fn project_logs(&self, project_id: &str) -> EventLog {
        EventLog::project_logs(self.clone(), project_id)
    }

    pub fn experiment_events(&self, experiment_id: &str) -> EventLog {
        EventLog::for_object(self.clone(), ResourceKind::Experiment, experiment_id)
    }

    pub fn dataset_events(&self, dataset_id: &str) -> EventLog {
        EventLog::for_object(self.clone(), ResourceKind::Dataset, dataset_id)
    }
}
