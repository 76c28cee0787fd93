//! Shared TUI components

pub mod footer;
pub mod toast;

pub use footer::{Footer, FooterProps, Shortcut};
pub use toast::{TOAST_DURATION, Toast, ToastLevel, render_toast};
