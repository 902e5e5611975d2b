use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tf", about = concat!("TaskFlow v", env!("CARGO_PKG_VERSION"), " - tasks, synced"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with email and password
    Login(LoginArgs),
    /// Create an account
    Signup(SignupArgs),
    /// Sign out and forget the saved session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List your tasks, newest first
    List(ListArgs),
    /// Add a task
    Add(AddArgs),
    /// Change fields of a task
    Edit(EditArgs),
    /// Delete a task
    Delete(DeleteArgs),
    /// Rate a password the way the signup form does
    Strength(StrengthArgs),
    /// View or change configuration
    Config(ConfigCmd),
}

#[derive(Args)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: Option<String>,
    /// Password (read from stdin when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct SignupArgs {
    /// Full name shown on the account
    #[arg(long)]
    pub name: String,
    /// Account email
    #[arg(long)]
    pub email: String,
    /// Password, at least 6 characters (read from stdin when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only tasks with this status (all, todo, inprogress, done)
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Longer description
    #[arg(long, short = 'd')]
    pub description: Option<String>,
    /// Initial status (todo, inprogress, done)
    #[arg(long, short = 's')]
    pub status: Option<String>,
    /// Due date, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: String,
    /// New title
    #[arg(long, short = 't')]
    pub title: Option<String>,
    /// New description
    #[arg(long, short = 'd')]
    pub description: Option<String>,
    /// New status (todo, inprogress, done)
    #[arg(long, short = 's')]
    pub status: Option<String>,
    /// New due date, YYYY-MM-DD
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct StrengthArgs {
    /// Password to rate (read from stdin when omitted)
    pub password: Option<String>,
}

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the effective configuration
    Show,
    /// Set a value in the config file
    Set {
        /// Dotted key, e.g. backend.url
        key: String,
        value: String,
    },
}
