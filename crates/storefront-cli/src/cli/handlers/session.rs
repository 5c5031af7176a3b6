//! Session management handlers

use crate::error::{CliError, Result};
use console::style;
use storefront_client::{SessionStore, StorefrontClient, TokenPair};

/// Handle storing a token pair
pub async fn handle_login(
    client: &StorefrontClient,
    access_token: String,
    refresh_token: String,
) -> Result<()> {
    if access_token.trim().is_empty() || refresh_token.trim().is_empty() {
        return Err(CliError::InvalidArgument(
            "both tokens must be non-empty".to_string(),
        ));
    }

    client
        .login_with_tokens(&TokenPair::new(access_token, refresh_token))
        .await?;

    println!("{}", style("Session stored.").green().bold());
    Ok(())
}

/// Handle clearing the session
pub async fn handle_logout(client: &StorefrontClient) -> Result<()> {
    client.logout().await;
    println!("{}", style("Logged out.").green());
    Ok(())
}

/// Handle changing the preferred language
pub async fn handle_locale(client: &StorefrontClient, tag: &str) -> Result<()> {
    validate_locale(tag)?;
    client.session_store().set_locale(tag).await?;
    println!("Locale set to {}", style(tag).cyan());
    Ok(())
}

fn validate_locale(tag: &str) -> Result<()> {
    let valid = !tag.is_empty()
        && tag
            .split('-')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric()));
    if valid {
        Ok(())
    } else {
        Err(CliError::InvalidArgument(format!(
            "'{tag}' is not a language tag"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_locale() {
        assert!(validate_locale("vi").is_ok());
        assert!(validate_locale("en-US").is_ok());
        assert!(validate_locale("").is_err());
        assert!(validate_locale("en--US").is_err());
        assert!(validate_locale("en US").is_err());
    }
}
