//! Structured logging helpers for the adapter layer.
//!
//! Consistent `tracing` call sites for protocol traffic and session
//! lifecycle. The library never installs a subscriber; that is the host
//! application's job. Console-facing user output does not go through here,
//! it belongs to the output sink.

use std::net::SocketAddr;

/// Log one raw request line as it arrived from the IDE.
pub fn log_command_received(raw: &str) {
    tracing::debug!(command = raw, "command from IDE");
}

/// Log an unrecognized wire command. The wire emits nothing for these.
pub fn log_unknown_command(cmd: &str) {
    tracing::warn!("Unknown command : {}", cmd);
}

/// Log a reply that was written to the wire.
pub fn log_reply_sent(xml: &str) {
    tracing::trace!(reply = xml, "reply sent");
}

/// Log an engine refusal for a bookkeeping operation.
pub fn log_engine_refused(operation: &str) {
    tracing::warn!(operation, "engine refused operation");
}

/// Log rejection of an interpreter-routed command while one is in flight.
pub fn log_task_rejected(cmd: &str) {
    tracing::warn!(command = cmd, "interpreter task rejected, one is already pending");
}

pub fn log_listening(port: u16) {
    tracing::info!(port, "debug wire listening");
}

pub fn log_client_connected(peer: &SocketAddr) {
    tracing::info!(%peer, "IDE connected");
}

/// Log the interpreter being released back to the host.
pub fn log_interpreter_released() {
    tracing::debug!("interpreter released");
}

pub fn log_transport_error(err: &dyn std::fmt::Display) {
    tracing::error!(error = %err, "wire transport failed");
}
