use {
    anyhow::{Result, bail},
    clap::Subcommand,
    sayvai_config::SayvaiConfig,
    sayvai_oauth::{TokenManager, TokenState},
    secrecy::Secret,
};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Exchange a one-time authorization code for a token pair.
    Login {
        /// Authorization code from the Zoho API console (defaults to ZOHO_AUTH_CODE).
        #[arg(long)]
        code: Option<String>,
    },
    /// Show whether a credential is stored and how long it stays valid.
    Status,
    /// Refresh the access token now.
    Refresh,
    /// Remove the stored credential.
    Logout,
}

pub async fn handle_auth(action: AuthAction, config: &SayvaiConfig) -> Result<()> {
    let tokens = TokenManager::from_config(config)?;
    match action {
        AuthAction::Login { code } => login(&tokens, code, config).await,
        AuthAction::Status => {
            status(&tokens);
            Ok(())
        },
        AuthAction::Refresh => refresh(&tokens).await,
        AuthAction::Logout => logout(&tokens),
    }
}

async fn login(tokens: &TokenManager, code: Option<String>, config: &SayvaiConfig) -> Result<()> {
    let Some(code) = code
        .or_else(|| config.zoho.auth_code.clone())
        .filter(|c| !c.is_empty())
    else {
        bail!("no authorization code: pass --code or set ZOHO_AUTH_CODE");
    };

    println!("Exchanging authorization code for tokens...");
    let credential = tokens.authorize(&Secret::new(code)).await?;
    println!(
        "Logged in to Zoho ({})",
        describe_expiry(credential.remaining_secs(tokens.now()))
    );
    Ok(())
}

fn status(tokens: &TokenManager) {
    match tokens.state() {
        TokenState::Unauthenticated => println!("Not logged in."),
        TokenState::AuthenticatedExpired => {
            println!("zoho [expired] (refreshed automatically on next call)")
        },
        TokenState::AuthenticatedValid => {
            let remaining = tokens
                .credential()
                .map(|c| c.remaining_secs(tokens.now()))
                .unwrap_or(0);
            println!("zoho [{}]", describe_expiry(remaining));
        },
    }
}

async fn refresh(tokens: &TokenManager) -> Result<()> {
    let credential = tokens.refresh().await?;
    println!(
        "Access token refreshed ({})",
        describe_expiry(credential.remaining_secs(tokens.now()))
    );
    Ok(())
}

fn logout(tokens: &TokenManager) -> Result<()> {
    tokens.logout()?;
    println!("Removed stored Zoho credential");
    Ok(())
}

fn describe_expiry(remaining: u64) -> String {
    let hours = remaining / 3600;
    let mins = (remaining % 3600) / 60;
    format!("valid, {hours}h {mins}m remaining")
}
