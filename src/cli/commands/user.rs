use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::models::Role;
use crate::database::DatabaseManager;
use crate::services::UserService;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user account")]
    Add {
        #[arg(long, help = "Display name (4-30 characters)")]
        name: String,
        #[arg(long, help = "Email address")]
        email: String,
        #[arg(long, default_value = "user", help = "user, creator or admin")]
        role: String,
        #[arg(long, help = "Mark the email as verified")]
        verified: bool,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Add { name, email, role, verified } => {
            let role: Role = role.parse().map_err(anyhow::Error::msg)?;
            let pool = DatabaseManager::main_pool().await?;
            let user = UserService::new(pool)
                .create(&name, &email, role, verified)
                .await?;
            output_success(
                &output_format,
                &format!("Created {} {} ({})", user.role, user.email, user.id),
                Some(json!({ "user": user })),
            )
        }
    }
}
