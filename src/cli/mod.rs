pub mod commands;
pub mod utils;

use anyhow::Context;
use clap::{Parser, Subcommand};
use reqwest::StatusCode;
use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "campus")]
#[command(about = "Campus CLI - operator tooling for the school management API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        help = "API base URL (defaults to CAMPUS_API_URL, then http://localhost:3000)"
    )]
    pub server: Option<String>,

    #[arg(long, global = true, help = "Operator token (defaults to CAMPUS_ROOT_TOKEN)")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "School tenant management")]
    School {
        #[command(subcommand)]
        cmd: commands::school::SchoolCommands,
    },

    #[command(about = "Server health and information")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let client = ApiClient::from_cli(&cli);

    match cli.command {
        Commands::School { cmd } => commands::school::handle(cmd, &client, format).await,
        Commands::Server { cmd } => commands::server::handle(cmd, &client, format).await,
    }
}

/// Thin HTTP client for the API. All school provisioning goes through the
/// server's root endpoints; the CLI never opens tenant databases itself.
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    fn from_cli(cli: &Cli) -> Self {
        let base_url = cli
            .server
            .clone()
            .or_else(|| std::env::var("CAMPUS_API_URL").ok())
            .unwrap_or_else(|| "http://localhost:3000".to_string());

        let token = cli
            .token
            .clone()
            .or_else(|| std::env::var("CAMPUS_ROOT_TOKEN").ok());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            http: reqwest::Client::new(),
        }
    }

    pub async fn get(&self, path: &str) -> anyhow::Result<(StatusCode, Value)> {
        self.request(reqwest::Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> anyhow::Result<(StatusCode, Value)> {
        self.request(reqwest::Method::POST, path, Some(body)).await
    }

    pub async fn post_empty(&self, path: &str) -> anyhow::Result<(StatusCode, Value)> {
        self.request(reqwest::Method::POST, path, None).await
    }

    pub async fn delete(&self, path: &str) -> anyhow::Result<(StatusCode, Value)> {
        self.request(reqwest::Method::DELETE, path, None).await
    }

    async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method, &url);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;
        let status = response.status();
        let value = response.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, value))
    }
}
