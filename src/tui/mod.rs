//! Terminal UI built on iocraft.

pub mod components;
pub mod desk;
pub mod theme;

pub use desk::SupportDesk;
