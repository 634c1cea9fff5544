//! The host-facing surface of a debugger front-end.

use std::sync::Arc;

use crate::engine::DebugEngine;
use crate::types::BreakPoint;
use crate::Result;

/// A controller front-end: either the interactive console or the wire
/// protocol server.
///
/// The host constructs one, calls `initialize` once, and from then on
/// invokes the break hooks synchronously on the interpreter thread whenever
/// the engine reaches a stopped state. Both hooks block until a controller
/// command releases the interpreter again.
pub trait FrontEnd: Send + Sync {
    /// Spawn the adapter thread and start accepting controller input.
    /// `options` is the free-form debugger argument string (see
    /// `config::port_from_options`).
    fn initialize(&mut self, engine: Arc<dyn DebugEngine>, options: &str) -> Result<()>;

    /// The engine hit a registered breakpoint. Interpreter thread; blocks
    /// until resumption.
    fn on_breakpoint_hit(&self, bp: &BreakPoint);

    /// The engine suspended without a breakpoint (single-step completion,
    /// explicit pause). Interpreter thread; blocks until resumption.
    fn on_suspend(&self, file: &str, line: u64);
}
