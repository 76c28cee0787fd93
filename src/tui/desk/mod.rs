//! Interactive support desk: ticket list plus detail screen.

pub mod model;
pub mod view;

pub use model::{DeskAction, DeskEffect, DeskState, Layout, Screen};
pub use view::{SupportDesk, SupportDeskProps};
