use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{api_error_message, fail, output_success};
use crate::cli::{ApiClient, OutputFormat};

#[derive(Subcommand)]
pub enum SchoolCommands {
    #[command(about = "Onboard a new school tenant (provisions its database)")]
    Create {
        #[arg(long, help = "Human-readable school name")]
        name: String,
        #[arg(long, help = "Routing slug, e.g. aspire-intl")]
        slug: String,
        #[arg(long, help = "Plan label (defaults to 'standard')")]
        plan: Option<String>,
    },

    #[command(about = "List all schools")]
    List,

    #[command(about = "Suspend a school (requests start failing with 403)")]
    Suspend {
        #[arg(help = "School slug")]
        slug: String,
    },

    #[command(about = "Restore a suspended school")]
    Restore {
        #[arg(help = "School slug")]
        slug: String,
    },

    #[command(about = "Evict the school's cached database connection")]
    Evict {
        #[arg(help = "School slug")]
        slug: String,
    },

    #[command(about = "Ping a school's database")]
    Health {
        #[arg(help = "School slug")]
        slug: String,
    },
}

pub async fn handle(
    cmd: SchoolCommands,
    client: &ApiClient,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        SchoolCommands::Create { name, slug, plan } => {
            let body = json!({ "name": name, "slug": &slug, "plan": plan });
            let (status, response) = client.post("/api/root/schools", body).await?;
            if !status.is_success() {
                return fail(format, &api_error_message(&response), &response);
            }
            output_success(
                format,
                &format!("School '{}' created", slug),
                response.get("data"),
            )
        }
        SchoolCommands::List => {
            let (status, response) = client.get("/api/root/schools").await?;
            if !status.is_success() {
                return fail(format, &api_error_message(&response), &response);
            }
            output_success(format, "Schools", response.get("data"))
        }
        SchoolCommands::Suspend { slug } => {
            let (status, response) = client
                .post_empty(&format!("/api/root/schools/{}/suspend", slug))
                .await?;
            if !status.is_success() {
                return fail(format, &api_error_message(&response), &response);
            }
            output_success(
                format,
                &format!("School '{}' suspended", slug),
                response.get("data"),
            )
        }
        SchoolCommands::Restore { slug } => {
            let (status, response) = client
                .post_empty(&format!("/api/root/schools/{}/restore", slug))
                .await?;
            if !status.is_success() {
                return fail(format, &api_error_message(&response), &response);
            }
            output_success(
                format,
                &format!("School '{}' restored", slug),
                response.get("data"),
            )
        }
        SchoolCommands::Evict { slug } => {
            let (status, response) = client
                .delete(&format!("/api/root/schools/{}/connection", slug))
                .await?;
            if !status.is_success() {
                return fail(format, &api_error_message(&response), &response);
            }
            output_success(
                format,
                &format!("Connection for '{}' evicted", slug),
                response.get("data"),
            )
        }
        SchoolCommands::Health { slug } => {
            let (status, response) = client
                .get(&format!("/api/root/schools/{}/health", slug))
                .await?;
            if !status.is_success() {
                return fail(format, &api_error_message(&response), &response);
            }
            output_success(
                format,
                &format!("School '{}' database is reachable", slug),
                response.get("data"),
            )
        }
    }
}
