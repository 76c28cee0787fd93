#[macro_use]
mod macros;

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod session;
pub mod tickets;
pub mod tui;
pub mod types;

pub use api::{Backend, HttpBackend};
pub use config::Config;
pub use error::{DeskError, Result};
pub use session::{Session, SessionStore};
pub use tickets::{DetailScreen, LoadState, TicketList, sort_tickets};
pub use types::{CurrencyPrice, Message, Store, Ticket, TicketStatus, Urgency};
