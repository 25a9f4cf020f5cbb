use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Log in, log out, or show the stored session.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// List inbox (or pending) contacts.
    Contacts(ContactsArgs),
    /// Search threads and users.
    Search(SearchArgs),
    /// Find or create a thread with these participants and analyse it.
    NewChat(NewChatArgs),
    /// Show the recent messages of a thread.
    Thread(ThreadArgs),
    /// Analyse a contact and print its pickup lines.
    Analyze(AnalyzeArgs),
    /// Send a direct message.
    Send(SendArgs),
}

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Log in and persist the session.
    Login(AuthLoginArgs),
    /// Delete the persisted session.
    Logout,
    /// Show whether a session is stored and where.
    Status,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    /// Account username (defaults to `account.username`).
    #[arg(short, long)]
    pub username: Option<String>,
    /// Account password (defaults to `account.password`).
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ContactsArgs {
    /// List pending requests instead of the inbox.
    #[arg(long)]
    pub pending: bool,
}

#[derive(Clone, Debug, Args)]
pub struct SearchArgs {
    /// Search text.
    pub query: String,
    /// Fall back to pending requests when the query is blank.
    #[arg(long)]
    pub pending: bool,
}

#[derive(Clone, Debug, Args)]
pub struct NewChatArgs {
    /// Participant user ids.
    #[arg(required = true, num_args = 1..)]
    pub user_ids: Vec<u64>,
    #[command(flatten)]
    pub results: ResultArgs,
}

#[derive(Clone, Debug, Args)]
pub struct ThreadArgs {
    /// Contact username.
    pub username: String,
    /// Thread id, when known.
    #[arg(long)]
    pub thread_id: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AnalyzeArgs {
    /// Contact username.
    pub username: String,
    /// Thread id, when known.
    #[arg(long)]
    pub thread_id: Option<String>,
    #[command(flatten)]
    pub results: ResultArgs,
}

/// What to do on the results screen.
#[derive(Clone, Debug, Default, Args)]
pub struct ResultArgs {
    /// Cycle to the next pickup line this many times.
    #[arg(long, default_value_t = 0)]
    pub regenerate: usize,
    /// Send the shown pickup line to the contact.
    #[arg(long)]
    pub send: bool,
}

#[derive(Clone, Debug, Args)]
pub struct SendArgs {
    /// Recipient username.
    pub username: String,
    /// Message text.
    pub message: String,
}
