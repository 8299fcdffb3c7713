//! CLI runner - executes commands

use crate::app::App;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::AppConfig;
use crate::error::Result;
use crate::types::SortOrder;
use crate::view::{self, ViewOptions};
use serde::Serialize;
use serde_json::json;

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
        let mut config = AppConfig::load(&self.cli.config)?;

        if let Commands::Serve { port: Some(port) } = self.cli.command {
            config.server.port = port;
        }

        let app = App::build(config).await?;

        match &self.cli.command {
            Commands::Serve { .. } => app.run().await,
            Commands::Refresh { key } => self.refresh(&app, key.as_deref()).await,
            Commands::Get {
                key,
                sort,
                then,
                desc,
                limit,
            } => {
                let options = ViewOptions {
                    sort: sort.clone(),
                    then: then.clone(),
                    order: if *desc { SortOrder::Desc } else { SortOrder::Asc },
                    limit: *limit,
                };
                let items = app.service().get_resource(key).await?;
                self.output(&view::apply(items, &options))
            }
            Commands::Keys => self.output(&app.service().list_keys().await?),
            Commands::Clear { key } => self.clear(&app, key.as_deref()).await,
            Commands::Resources => {
                let resources: Vec<_> = app.service().catalog().iter().collect();
                self.output(&resources)
            }
        }
    }

    async fn refresh(&self, app: &App, key: Option<&str>) -> Result<()> {
        match key {
            Some(key) => {
                let outcome = app.orchestrator().force_refresh(key).await?;
                self.output(&json!({ "key": key, "outcome": outcome }))
            }
            None => {
                let report = app.orchestrator().refresh_all().await;
                self.output(&report)
            }
        }
    }

    async fn clear(&self, app: &App, key: Option<&str>) -> Result<()> {
        match key {
            Some(key) => {
                let deleted = app.service().invalidate(key).await?;
                self.output(&json!({ "key": key, "deleted": deleted }))
            }
            None => {
                app.service().clear_all().await?;
                self.output(&json!({ "cleared": true }))
            }
        }
    }

    /// Print a value in the selected format
    fn output<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}
