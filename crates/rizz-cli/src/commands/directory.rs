use rizz_core::{Contact, DirectoryMode};
use serde::Serialize;

use crate::cli::{ContactsArgs, GlobalFlags, SearchArgs};
use crate::context::CliContext;
use crate::output::output;

#[derive(Serialize)]
struct ListingResponse<'a> {
    mode: DirectoryMode,
    query: &'a str,
    contacts: &'a [Contact],
}

/// Handle `rizz contacts`.
pub async fn handle_contacts(
    args: &ContactsArgs,
    ctx: &CliContext,
    flags: GlobalFlags,
) -> anyhow::Result<()> {
    ctx.resume()?;
    if args.pending {
        ctx.app.switch_directory_mode(DirectoryMode::Pending).await?;
    } else {
        ctx.app.refresh().await?;
    }
    print_listing(ctx, flags)
}

/// Handle `rizz search <query>`.
pub async fn handle_search(
    args: &SearchArgs,
    ctx: &CliContext,
    flags: GlobalFlags,
) -> anyhow::Result<()> {
    ctx.resume()?;
    if args.pending {
        ctx.app.switch_directory_mode(DirectoryMode::Pending).await?;
    }
    ctx.app.search(&args.query).await?;
    print_listing(ctx, flags)
}

fn print_listing(ctx: &CliContext, flags: GlobalFlags) -> anyhow::Result<()> {
    let snapshot = ctx.app.snapshot();
    output(
        &ListingResponse {
            mode: snapshot.directory.mode,
            query: &snapshot.directory.query,
            contacts: &snapshot.directory.contacts,
        },
        flags.format,
    )
}
