//! The contract consumed from the debug engine.
//!
//! The engine owns breakpoints, the stack, variables, and stepping; the
//! adapter layer only drives it. Implementations must be shareable across
//! the interpreter thread and the adapter thread, but not every operation
//! may be called from both sides: variable enumeration and expression
//! evaluation are only valid on the interpreter thread, which is why the
//! front-ends route them through the rendezvous instead of calling them
//! directly.

use crate::types::{BreakPoint, StackFrame, Variable};

pub trait DebugEngine: Send + Sync {
    /// Register a breakpoint. On success the engine stores it and, when
    /// `assign_index` is set, writes the assigned index back into `bp`.
    /// `bp.file` may be empty, meaning the file of the current break.
    fn add_breakpoint(&self, bp: &mut BreakPoint, assign_index: bool) -> bool;

    /// Remove the breakpoint with the given index. Returns false if no such
    /// breakpoint is registered.
    fn remove_breakpoint(&self, index: u64) -> bool;

    /// Snapshot of all registered breakpoints.
    fn breakpoints(&self) -> Vec<BreakPoint>;

    /// Whether the interpreter is currently parked at a break.
    fn is_stopped(&self) -> bool;

    /// Request single-step mode for the next resumption.
    fn step(&self);
    fn step_out(&self);
    fn step_over(&self);

    /// Terminate the debug session.
    fn stop(&self);

    /// Stack of the current break, outermost last.
    fn stack_frames(&self) -> Vec<StackFrame>;

    fn active_frame_index(&self) -> u64;
    fn set_active_frame_index(&self, index: u64);
    fn shift_active_frame(&self, up: bool);

    /// Interpreter thread only.
    fn local_variables(&self) -> Vec<Variable>;
    /// Interpreter thread only.
    fn global_variables(&self) -> Vec<Variable>;
    /// Interpreter thread only.
    fn instance_variables(&self, object_id: u64) -> Vec<Variable>;
    /// Interpreter thread only.
    fn evaluate_expression(&self, expression: &str) -> Variable;

    /// Line number of the current break.
    fn break_line_number(&self) -> u64;

    /// Source lines `[from, to]` of the current file as `(line_no, text)`
    /// pairs; `from == to == 0` means the whole file.
    fn code_lines(&self, from: u64, to: u64) -> Vec<(u64, String)>;
}
