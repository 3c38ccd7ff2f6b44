use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::DatabaseManager;
use crate::services::UserService;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Issue a bearer token for an existing user")]
    Issue {
        #[arg(long, help = "User id")]
        user_id: Uuid,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { user_id } => {
            let pool = DatabaseManager::main_pool().await?;
            let user = UserService::new(pool).find(user_id).await?;
            let claims = Claims::new(user.id, user.role());
            let token = generate_jwt(&claims)?;

            match output_format {
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
                OutputFormat::Json => output_success(
                    &output_format,
                    "Token issued",
                    Some(json!({ "token": token, "expires_at": claims.exp })),
                ),
            }
        }
    }
}
