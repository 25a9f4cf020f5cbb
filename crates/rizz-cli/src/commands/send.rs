use rizz_analysis::send_pickup_line;
use rizz_core::Contact;
use serde::Serialize;

use crate::cli::{GlobalFlags, SendArgs};
use crate::context::CliContext;
use crate::output::output;

#[derive(Serialize)]
struct SendResponse<'a> {
    sent: bool,
    username: &'a str,
}

/// Handle `rizz send <username> <message>`.
pub async fn handle(args: &SendArgs, ctx: &CliContext, flags: GlobalFlags) -> anyhow::Result<()> {
    let session = ctx.resume()?;
    let contact = Contact::named(args.username.as_str());
    send_pickup_line(ctx.backend.as_ref(), &session, &contact, &args.message).await?;
    output(
        &SendResponse {
            sent: true,
            username: &args.username,
        },
        flags.format,
    )
}
