pub mod analyze;
pub mod auth;
pub mod directory;
pub mod send;
pub mod thread;

use crate::cli::{Commands, GlobalFlags};
use crate::context::CliContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &CliContext, flags: GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Auth { action } => auth::handle(&action, ctx, flags).await,
        Commands::Contacts(args) => directory::handle_contacts(&args, ctx, flags).await,
        Commands::Search(args) => directory::handle_search(&args, ctx, flags).await,
        Commands::NewChat(args) => analyze::handle_new_chat(&args, ctx, flags).await,
        Commands::Thread(args) => thread::handle(&args, ctx, flags).await,
        Commands::Analyze(args) => analyze::handle(&args, ctx, flags).await,
        Commands::Send(args) => send::handle(&args, ctx, flags).await,
    }
}
