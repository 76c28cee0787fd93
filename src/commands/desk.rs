//! Interactive support desk (`gatedesk desk`)

use iocraft::prelude::*;

use crate::error::{DeskError, Result};
use crate::tui::SupportDesk;

use super::connect;

/// Launch the support desk TUI
///
/// The session is resolved before the terminal is taken over, so a missing
/// login is reported as a normal CLI error.
pub async fn cmd_desk() -> Result<()> {
    let conn = connect()?;
    tracing::debug!(session = %conn.session.masked(), "starting support desk");

    element!(SupportDesk(
        backend: Some(conn.backend),
        session: Some(conn.session),
        page_size: conn.config.page_size,
    ))
    .fullscreen()
    .await
    .map_err(|e| DeskError::Other(format!("TUI error: {e}")))
}
