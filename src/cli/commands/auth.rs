use clap::Subcommand;
use serde_json::json;

use crate::cli::client::ApiClient;
use crate::cli::token_store::token_is_valid;
use crate::cli::utils::output_success;
use crate::cli::validate::{validate_login, validate_signup};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Create a new account")]
    Signup {
        #[arg(help = "Display name")]
        name: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (at least 8 characters)")]
        password: String,
        #[arg(long, help = "Password again, must match")]
        confirm_password: String,
    },

    #[command(about = "Log in and store the session token")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password")]
        password: String,
    },

    #[command(about = "Forget the stored session token")]
    Logout,

    #[command(about = "Show whether a usable session token is stored")]
    Status,
}

pub async fn handle(cmd: AuthCommands, api: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Signup {
            name,
            email,
            password,
            confirm_password,
        } => {
            validate_signup(&name, &email, &password, &confirm_password)?;

            let user_id = api.signup(name.trim(), email.trim(), &password).await?;
            output_success(
                &output_format,
                "Sign up complete, you can now log in",
                Some(json!({ "userId": user_id })),
            )
        }
        AuthCommands::Login { email, password } => {
            validate_login(&email, &password)?;

            let login = api.login(email.trim(), &password).await?;
            output_success(
                &output_format,
                &format!("Logged in as {} <{}>", login.user.name, login.user.email),
                Some(json!({ "user": login.user })),
            )
        }
        AuthCommands::Logout => {
            api.logout()?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let logged_in = token_is_valid(api.store())?;
            let message = if logged_in { "Logged in" } else { "Not logged in" };
            output_success(&output_format, message, Some(json!({ "loggedIn": logged_in })))
        }
    }
}
