use sudb::types::{StackFrame, Variable};

use crate::engine::{EngineState, MockEngine};
use crate::var;

/// Scripts the world a [`MockEngine`] reports: frames, variables, source
/// lines, and whether mutations are refused.
pub struct MockEngineBuilder {
    state: EngineState,
}

impl Default for MockEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngineBuilder {
    pub fn new() -> Self {
        let mut state = EngineState::default();
        state.current_file = "/x.rb".to_string();
        MockEngineBuilder { state }
    }

    pub fn stopped(mut self, stopped: bool) -> Self {
        self.state.stopped = stopped;
        self
    }

    /// File used when a breakpoint arrives without one.
    pub fn current_file(mut self, file: &str) -> Self {
        self.state.current_file = file.to_string();
        self
    }

    pub fn frame(mut self, name: &str, file: &str, line: u64) -> Self {
        self.state.frames.push(StackFrame {
            name: name.to_string(),
            file: file.to_string(),
            line,
        });
        self
    }

    pub fn active_frame(mut self, index: u64) -> Self {
        self.state.active_frame = index;
        self
    }

    pub fn local(mut self, name: &str, value: &str) -> Self {
        self.state.locals.push(var(name, value));
        self
    }

    pub fn global(mut self, name: &str, value: &str) -> Self {
        self.state.globals.push(var(name, value));
        self
    }

    pub fn instance(mut self, object_id: u64, vars: Vec<Variable>) -> Self {
        self.state.instances.insert(object_id, vars);
        self
    }

    /// Canned answer for `evaluate_expression`.
    pub fn eval(mut self, expression: &str, result: &str) -> Self {
        self.state
            .eval_results
            .insert(expression.to_string(), result.to_string());
        self
    }

    pub fn code_line(mut self, line_no: u64, text: &str) -> Self {
        self.state.code.push((line_no, text.to_string()));
        self
    }

    /// The current break position, with its source text.
    pub fn break_line(mut self, line_no: u64, text: &str) -> Self {
        self.state.break_line = line_no;
        self.code_line_mut(line_no, text);
        self
    }

    /// Engine refuses breakpoint add/remove, for failure-path tests.
    pub fn refuse_mutations(mut self) -> Self {
        self.state.refuse_mutations = true;
        self
    }

    fn code_line_mut(&mut self, line_no: u64, text: &str) {
        if !self.state.code.iter().any(|(no, _)| *no == line_no) {
            self.state.code.push((line_no, text.to_string()));
        }
    }

    pub fn build(self) -> MockEngine {
        MockEngine::from_state(self.state)
    }
}
