//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ClientConfig;
use crate::http::Client;
use crate::pagination::{ListOptions, Page, PageQuery, Paginator};
use crate::resources::ResourceKind;
use anyhow::{Context, Result};
use serde_json::Value;
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let client = self.client()?;

        match &self.cli.command {
            Commands::List {
                kind,
                limit,
                starting_after,
                unique_by,
                max,
                filters,
            } => {
                let mut resource = client.resource(*kind);
                for (key, value) in filters {
                    resource = resource.filter(key, value);
                }
                let options = ListOptions {
                    limit: *limit,
                    starting_after: starting_after.clone(),
                    unique_by: unique_by.clone(),
                };
                let count = self.drain(resource.stream(options), *max).await?;
                info!("Listed {} {} objects", count, kind);
                Ok(())
            }
            Commands::Get { kind, id } => {
                let object = client.resource(*kind).get(id).await?;
                self.emit(&object)
            }
            Commands::Delete { kind, id } => {
                let object = client.resource(*kind).delete(id).await?;
                self.emit(&object)
            }
            Commands::Insert { project_id, file } => {
                let events = read_events(file)?;
                let count = events.len();
                let ack = client.project_logs(project_id).insert(events).await?;
                info!("Inserted {} events into project {}", count, project_id);
                self.emit(&ack)
            }
            Commands::Fetch {
                project_id,
                limit,
                max,
            } => {
                let options = ListOptions::new().limit(*limit);
                let count = self
                    .drain(client.project_logs(project_id).stream(options), *max)
                    .await?;
                info!("Fetched {} events from project {}", count, project_id);
                Ok(())
            }
        }
    }

    /// Build the API client from flags
    fn client(&self) -> Result<Client> {
        let mut builder = ClientConfig::builder()
            .base_url(&self.cli.base_url)
            .timeout(Duration::from_secs(self.cli.timeout))
            .max_retries(self.cli.max_retries);

        if let Some(key) = &self.cli.api_key {
            builder = builder.api_key(key);
        }

        Client::new(builder.build()).context("Failed to create API client")
    }

    /// Print items as they arrive; stops pulling pages once `max` is reached
    async fn drain<F, Fut>(
        &self,
        mut items: Paginator<F>,
        max: Option<usize>,
    ) -> Result<usize>
    where
        F: FnMut(PageQuery) -> Fut,
        Fut: Future<Output = crate::Result<Page>>,
    {
        let mut count = 0;
        while max.map_or(true, |max| count < max) {
            let Some(item) = items.next().await else {
                break;
            };
            self.emit(&item?)?;
            count += 1;
        }
        Ok(count)
    }

    fn emit(&self, value: &Value) -> Result<()> {
        let line = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{line}");
        Ok(())
    }
}

/// Load events from a JSON file holding one object or an array of them
fn read_events(path: &Path) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;

    Ok(match value {
        Value::Array(events) => events,
        event => vec![event],
    })
}
