use std::collections::HashMap;
use std::sync::Mutex;
use std::thread::{self, ThreadId};

use sudb::types::{BreakPoint, StackFrame, Variable};
use sudb::DebugEngine;

/// One recorded engine call.
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub op: String,
    pub thread: ThreadId,
}

#[derive(Default)]
pub(crate) struct EngineState {
    pub breakpoints: Vec<BreakPoint>,
    pub next_index: u64,
    pub stopped: bool,
    pub stop_called: bool,
    pub frames: Vec<StackFrame>,
    pub active_frame: u64,
    pub locals: Vec<Variable>,
    pub globals: Vec<Variable>,
    pub instances: HashMap<u64, Vec<Variable>>,
    pub eval_results: HashMap<String, String>,
    pub code: Vec<(u64, String)>,
    pub break_line: u64,
    pub current_file: String,
    pub refuse_mutations: bool,
}

/// A deterministic engine driven entirely by its builder script.
pub struct MockEngine {
    state: Mutex<EngineState>,
    calls: Mutex<Vec<CallRecord>>,
}

impl MockEngine {
    pub fn builder() -> crate::MockEngineBuilder {
        crate::MockEngineBuilder::new()
    }

    pub(crate) fn from_state(state: EngineState) -> Self {
        MockEngine {
            state: Mutex::new(state),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, op: &str) {
        self.calls.lock().unwrap().push(CallRecord {
            op: op.to_string(),
            thread: thread::current().id(),
        });
    }

    /// Names of all engine calls so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|c| c.op.clone()).collect()
    }

    /// Thread the first call of `op` ran on.
    pub fn call_thread(&self, op: &str) -> Option<ThreadId> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.op == op)
            .map(|c| c.thread)
    }

    /// Flip the stopped flag, as the interpreter would around a break.
    pub fn set_stopped(&self, stopped: bool) {
        self.state.lock().unwrap().stopped = stopped;
    }

    pub fn stop_called(&self) -> bool {
        self.state.lock().unwrap().stop_called
    }
}

impl DebugEngine for MockEngine {
    fn add_breakpoint(&self, bp: &mut BreakPoint, _assign_index: bool) -> bool {
        self.record("add_breakpoint");
        let mut state = self.state.lock().unwrap();
        if state.refuse_mutations {
            return false;
        }
        if bp.file.is_empty() {
            bp.file = state.current_file.clone();
        }
        state.next_index += 1;
        bp.index = state.next_index;
        state.breakpoints.push(bp.clone());
        true
    }

    fn remove_breakpoint(&self, index: u64) -> bool {
        self.record("remove_breakpoint");
        let mut state = self.state.lock().unwrap();
        if state.refuse_mutations {
            return false;
        }
        let before = state.breakpoints.len();
        state.breakpoints.retain(|bp| bp.index != index);
        state.breakpoints.len() != before
    }

    fn breakpoints(&self) -> Vec<BreakPoint> {
        self.record("breakpoints");
        self.state.lock().unwrap().breakpoints.clone()
    }

    fn is_stopped(&self) -> bool {
        self.state.lock().unwrap().stopped
    }

    fn step(&self) {
        self.record("step");
    }

    fn step_out(&self) {
        self.record("step_out");
    }

    fn step_over(&self) {
        self.record("step_over");
    }

    fn stop(&self) {
        self.record("stop");
        self.state.lock().unwrap().stop_called = true;
    }

    fn stack_frames(&self) -> Vec<StackFrame> {
        self.record("stack_frames");
        self.state.lock().unwrap().frames.clone()
    }

    fn active_frame_index(&self) -> u64 {
        self.state.lock().unwrap().active_frame
    }

    fn set_active_frame_index(&self, index: u64) {
        self.record("set_active_frame_index");
        self.state.lock().unwrap().active_frame = index;
    }

    fn shift_active_frame(&self, up: bool) {
        self.record("shift_active_frame");
        let mut state = self.state.lock().unwrap();
        let last = state.frames.len().saturating_sub(1) as u64;
        if up {
            state.active_frame = (state.active_frame + 1).min(last);
        } else {
            state.active_frame = state.active_frame.saturating_sub(1);
        }
    }

    fn local_variables(&self) -> Vec<Variable> {
        self.record("local_variables");
        self.state.lock().unwrap().locals.clone()
    }

    fn global_variables(&self) -> Vec<Variable> {
        self.record("global_variables");
        self.state.lock().unwrap().globals.clone()
    }

    fn instance_variables(&self, object_id: u64) -> Vec<Variable> {
        self.record("instance_variables");
        self.state
            .lock()
            .unwrap()
            .instances
            .get(&object_id)
            .cloned()
            .unwrap_or_default()
    }

    fn evaluate_expression(&self, expression: &str) -> Variable {
        self.record("evaluate_expression");
        let state = self.state.lock().unwrap();
        let value = state
            .eval_results
            .get(expression)
            .cloned()
            .unwrap_or_else(|| "nil".to_string());
        Variable {
            name: String::new(),
            value,
            type_name: "Object".to_string(),
            object_id: 0,
            has_children: false,
        }
    }

    fn break_line_number(&self) -> u64 {
        self.state.lock().unwrap().break_line
    }

    fn code_lines(&self, from: u64, to: u64) -> Vec<(u64, String)> {
        self.record("code_lines");
        let state = self.state.lock().unwrap();
        if from == 0 && to == 0 {
            return state.code.clone();
        }
        state
            .code
            .iter()
            .filter(|(no, _)| *no >= from && *no <= to)
            .cloned()
            .collect()
    }
}
