use clap::Subcommand;

use crate::cli::utils::{api_error_message, fail, output_success};
use crate::cli::{ApiClient, OutputFormat};

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Check API health (master database connectivity)")]
    Health,

    #[command(about = "Show server information from the API root endpoint")]
    Info,
}

pub async fn handle(
    cmd: ServerCommands,
    client: &ApiClient,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Health => {
            let (status, response) = client.get("/health").await?;
            if !status.is_success() {
                return fail(format, &api_error_message(&response), &response);
            }
            output_success(format, "Server is healthy", response.get("data"))
        }
        ServerCommands::Info => {
            let (status, response) = client.get("/").await?;
            if !status.is_success() {
                return fail(format, &api_error_message(&response), &response);
            }
            output_success(format, "Server info", response.get("data"))
        }
    }
}
