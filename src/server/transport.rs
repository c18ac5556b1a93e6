// Transport utilities for the MCP server

use tracing::{debug, warn};

/// Whether stdin is attached to a terminal instead of an MCP client
#[must_use]
pub fn stdin_is_terminal() -> bool {
    atty::is(atty::Stream::Stdin)
}

/// Log how the stdio transport is connected
pub fn check_stdio_transport() {
    if stdin_is_terminal() {
        warn!("Stdin is a terminal; the server expects an MCP client speaking JSON-RPC on stdio");
    } else {
        debug!("Stdio transport detected - ready for MCP communication");
    }
}
