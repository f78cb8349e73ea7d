use chrono::DateTime;
use clap::Subcommand;
use dialoguer::{Input, Password};
use tam::{ApiResponse, Client, TokenStore};
use tam_core::authentication::peek_claims;

use crate::{
    commands::error::AuthError,
    console::{print_success_message, print_warn_message},
    credentials::{FileTokenStore, get_storage_dir, list_profiles},
};

#[derive(Subcommand)]
pub enum AuthCommand {
    /// Sign in with a phone number and password
    Login {
        /// optional - Prompted for when not given
        #[clap(long)]
        phone_number: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show who the stored session belongs to and when it expires
    Status,
    /// Exchange the refresh token for a new access token now
    Refresh,
}

pub async fn handle_auth_command(
    cmd: &AuthCommand,
    client: &Client,
    store: &FileTokenStore,
    profile: &str,
) -> Result<(), AuthError> {
    match cmd {
        AuthCommand::Login { phone_number } => login(phone_number, client, profile).await,
        AuthCommand::Logout => {
            client.auth().logout().await?;
            print_success_message(&format!("Signed out of profile '{}'", profile));
            Ok(())
        }
        AuthCommand::Status => status(store, profile).await,
        AuthCommand::Refresh => {
            if store.get().await?.is_none() {
                return Err(AuthError::NotSignedIn);
            }
            client.auth().refresh().await?;
            print_success_message("✅ Access token refreshed");
            Ok(())
        }
    }
}

async fn login(
    phone_number: &Option<String>,
    client: &Client,
    profile: &str,
) -> Result<(), AuthError> {
    let phone_number = match phone_number {
        Some(phone_number) => phone_number.clone(),
        None => Input::<String>::new().with_prompt("Phone number").interact_text()?,
    };
    let password = Password::new().with_prompt("Password").interact()?;

    match client.auth().login(&phone_number, &password).await? {
        ApiResponse::Success(_) => {
            print_success_message(&format!(
                "✅ Signed in as {} (profile '{}')",
                phone_number, profile
            ));
            if client.auth().has_admin_access().await? {
                println!("Admin panel access: yes");
            } else {
                println!("Admin panel access: no");
            }
            Ok(())
        }
        ApiResponse::Failure { content, .. } => Err(AuthError::Rejected(content.summary())),
    }
}

fn format_expiry(exp: Option<i64>) -> String {
    exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

async fn status(store: &FileTokenStore, profile: &str) -> Result<(), AuthError> {
    println!("Profile: {}", profile);

    let Some(tokens) = store.get().await? else {
        print_warn_message("❌ Not signed in");
        return Ok(());
    };

    match peek_claims(&tokens.access) {
        Ok(claims) => {
            match claims.user_id {
                Some(user_id) => print_success_message(&format!("✅ Signed in as user {}", user_id)),
                None => print_warn_message("❌ Access token carries no user"),
            }
            println!("Access token expires: {}", format_expiry(claims.exp));
            if claims.is_expired() {
                print_warn_message("Access token has expired, it is refreshed on the next request");
            }
        }
        Err(e) => print_warn_message(&format!("❌ Stored access token is unreadable: {}", e)),
    }

    if let Ok(claims) = peek_claims(&tokens.refresh) {
        println!("Refresh token expires: {}", format_expiry(claims.exp));
        if claims.is_expired() {
            print_warn_message("Refresh token has expired, run `tam auth login` again");
        }
    }

    let others: Vec<String> = list_profiles(&get_storage_dir()?)?
        .into_iter()
        .filter(|other| other != profile)
        .collect();
    if !others.is_empty() {
        println!("\nOther stored profiles: {}", others.join(", "));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_expiry() {
        assert_eq!(format_expiry(Some(1_700_000_000)), "2023-11-14 22:13:20 UTC");
        assert_eq!(format_expiry(None), "unknown");
    }
}
