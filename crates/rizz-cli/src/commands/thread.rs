use std::sync::Arc;

use rizz_core::{ChatMessage, Contact};
use rizz_directory::DirectorySync;
use serde::Serialize;

use crate::cli::{GlobalFlags, ThreadArgs};
use crate::context::CliContext;
use crate::output::output;

#[derive(Serialize)]
struct ThreadResponse<'a> {
    contact: &'a Contact,
    messages: &'a [ChatMessage],
}

/// Handle `rizz thread <username>`.
pub async fn handle(args: &ThreadArgs, ctx: &CliContext, flags: GlobalFlags) -> anyhow::Result<()> {
    let session = ctx.resume()?;
    if args.thread_id.is_none() {
        tracing::warn!(username = %args.username, "no --thread-id given; the thread has no messages to show");
    }

    let directory = DirectorySync::new(Arc::clone(&ctx.backend), ctx.config.directory.clone());
    let contact = Contact {
        id: args.thread_id.clone(),
        ..Contact::named(args.username.as_str())
    };
    let view = directory.open_thread(&session, contact).await;

    output(
        &ThreadResponse {
            contact: &view.contact,
            messages: &view.messages,
        },
        flags.format,
    )
}
