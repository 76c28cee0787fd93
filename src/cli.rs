use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;

use crate::types::Urgency;

#[derive(Parser)]
#[command(name = "gatedesk")]
#[command(about = "Support tickets and account tools for the payment gateway")]
#[command(version)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Support tickets
    #[command(visible_alias = "t")]
    Tickets {
        #[command(subcommand)]
        action: TicketsAction,
    },

    /// Merchant stores
    Stores {
        #[command(subcommand)]
        action: StoresAction,
    },

    /// Quote a currency price
    Price {
        /// Currency code (e.g. BTC)
        currency: String,

        /// Fiat currency (default: config `default_fiat`)
        #[arg(long)]
        fiat: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Password recovery
    Password {
        #[command(subcommand)]
        action: PasswordAction,
    },

    /// Send a message to the gateway team (no login needed)
    Contact {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        message: String,
    },

    /// Manage the stored session token
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Interactive support desk
    Desk,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum TicketsAction {
    /// List tickets, most urgent first
    Ls {
        /// Reveal pages 1 through N
        #[arg(long, value_parser = parse_page)]
        page: Option<usize>,

        /// Show every ticket
        #[arg(long, conflicts_with = "page")]
        all: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a ticket and its messages
    Show {
        /// Ticket ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Open a new ticket
    Create {
        /// Ticket title
        title: String,

        /// Severity: normal, high, critical
        #[arg(short, long, default_value = "normal", value_parser = parse_severity)]
        severity: Urgency,

        /// First message (reads from stdin if not provided)
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reply to a ticket
    Reply {
        /// Ticket ID
        id: String,

        /// Message text (reads from stdin if not provided)
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Close a ticket
    Close {
        /// Ticket ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Copy a ticket ID to the clipboard
    Copy {
        /// Ticket ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum StoresAction {
    /// List stores
    Ls {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a store
    Create {
        /// Store name
        name: String,

        /// Store website
        #[arg(long)]
        url: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum PasswordAction {
    /// Check a password recovery token
    Check {
        /// Recovery token from the reset email
        token: String,
    },
    /// Set a new password using a recovery token
    Update {
        /// Recovery token from the reset email
        token: String,

        /// New password
        password: String,

        /// Repeat the new password
        #[arg(long)]
        confirm: String,
    },
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// Store a session token (reads from stdin if not provided)
    Set {
        token: Option<String>,
    },
    /// Show the active session
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Forget the stored session
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (api_url, request_timeout, page_size, default_fiat)
        key: String,
        /// Value to set
        value: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get a configuration value
    Get {
        /// Configuration key (api_url, request_timeout, page_size, default_fiat)
        key: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self) -> crate::error::Result<()> {
        use crate::commands::{
            ListOptions, cmd_config_get, cmd_config_set, cmd_config_show, cmd_contact, cmd_desk,
            cmd_password_check, cmd_password_update, cmd_price, cmd_session_clear,
            cmd_session_set, cmd_session_show, cmd_stores_create, cmd_stores_ls,
            cmd_tickets_close, cmd_tickets_copy, cmd_tickets_create, cmd_tickets_ls,
            cmd_tickets_reply, cmd_tickets_show,
        };

        match self {
            Commands::Tickets { action } => match action {
                TicketsAction::Ls { page, all, json } => {
                    cmd_tickets_ls(ListOptions { page, all, json }).await
                }
                TicketsAction::Show { id, json } => cmd_tickets_show(&id, json).await,
                TicketsAction::Create {
                    title,
                    severity,
                    message,
                    json,
                } => cmd_tickets_create(&title, severity, &message, json).await,
                TicketsAction::Reply { id, message, json } => {
                    cmd_tickets_reply(&id, &message, json).await
                }
                TicketsAction::Close { id, json } => cmd_tickets_close(&id, json).await,
                TicketsAction::Copy { id } => cmd_tickets_copy(&id),
            },

            Commands::Stores { action } => match action {
                StoresAction::Ls { json } => cmd_stores_ls(json).await,
                StoresAction::Create { name, url, json } => {
                    cmd_stores_create(&name, url.as_deref(), json).await
                }
            },

            Commands::Price {
                currency,
                fiat,
                json,
            } => cmd_price(&currency, fiat.as_deref(), json).await,

            Commands::Password { action } => match action {
                PasswordAction::Check { token } => cmd_password_check(&token).await,
                PasswordAction::Update {
                    token,
                    password,
                    confirm,
                } => cmd_password_update(&token, &password, &confirm).await,
            },

            Commands::Contact {
                name,
                email,
                message,
            } => cmd_contact(&name, &email, &message).await,

            Commands::Session { action } => match action {
                SessionAction::Set { token } => cmd_session_set(token.as_deref()),
                SessionAction::Show { json } => cmd_session_show(json),
                SessionAction::Clear => cmd_session_clear(),
            },

            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(json),
                ConfigAction::Set { key, value, json } => cmd_config_set(&key, &value, json),
                ConfigAction::Get { key, json } => cmd_config_get(&key, json),
            },

            Commands::Desk => cmd_desk().await,

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

fn parse_severity(s: &str) -> Result<Urgency, String> {
    s.parse::<Urgency>().map_err(|e| e.to_string())
}

fn parse_page(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("Invalid page '{s}'. Must be a number starting at 1")),
        Ok(n) => Ok(n),
    }
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "gatedesk", &mut io::stdout());
}
