use anyhow::Context;
use rizz_auth::token_store;
use serde::Serialize;

use crate::cli::{AuthCommands, AuthLoginArgs, GlobalFlags};
use crate::context::CliContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthLoginResponse {
    authenticated: bool,
    username: String,
    persisted: bool,
}

#[derive(Serialize)]
struct AuthLogoutResponse {
    cleared: bool,
}

#[derive(Serialize)]
struct AuthStatusResponse {
    authenticated: bool,
    username: Option<String>,
    issued_at: Option<String>,
    token_source: Option<&'static str>,
}

/// Handle `rizz auth <subcommand>`.
pub async fn handle(
    action: &AuthCommands,
    ctx: &CliContext,
    flags: GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AuthCommands::Login(args) => login(args, ctx, flags).await,
        AuthCommands::Logout => {
            token_store::delete()?;
            output(&AuthLogoutResponse { cleared: true }, flags.format)
        }
        AuthCommands::Status => status(flags),
    }
}

async fn login(args: &AuthLoginArgs, ctx: &CliContext, flags: GlobalFlags) -> anyhow::Result<()> {
    let (username, password) = match (args.username.as_deref(), args.password.as_deref()) {
        (Some(username), Some(password)) => (username, password),
        (username, password) => {
            let (default_username, default_password) = ctx.config.account.require().context(
                "auth login: pass --username and --password or set RIZZ_ACCOUNT__USERNAME and RIZZ_ACCOUNT__PASSWORD",
            )?;
            (
                username.unwrap_or(default_username),
                password.unwrap_or(default_password),
            )
        }
    };

    let session = ctx.app.login(username, password).await?;
    let persisted = match token_store::store(&session) {
        Ok(()) => true,
        Err(error) => {
            tracing::warn!(%error, "session could not be persisted; later commands will ask to log in");
            false
        }
    };

    output(
        &AuthLoginResponse {
            authenticated: true,
            username: session.username,
            persisted,
        },
        flags.format,
    )
}

fn status(flags: GlobalFlags) -> anyhow::Result<()> {
    let response = match token_store::load() {
        Some((session, source)) => AuthStatusResponse {
            authenticated: true,
            username: Some(session.username),
            issued_at: Some(session.issued_at.to_rfc3339()),
            token_source: Some(source.as_str()),
        },
        None => AuthStatusResponse {
            authenticated: false,
            username: None,
            issued_at: None,
            token_source: None,
        },
    };
    output(&response, flags.format)
}
