//! Rendezvous between the interpreter thread and the adapter thread.
//!
//! The interpreter thread calls [`Rendezvous::on_break_enter`] whenever the
//! engine reaches a stopped state and stays parked inside it until the
//! adapter sets the continue flag. While parked it drains a single-slot
//! mailbox of tasks that can only run on the interpreter thread (variable
//! enumeration, expression evaluation); each task is paired with an adapter
//! follow-up that formats and emits the result.
//!
//! Invariants kept by this module:
//! - at most one `(task, follow-up)` pair is in flight at any time; further
//!   requests fail with [`AdapterError::Busy`] until the follow-up flushes,
//! - a pending task always runs before the interpreter resumes, even when
//!   the continue signal arrives while the task is still in flight,
//! - the continue flag only flips `false -> true` together with a condvar
//!   notification.

use std::sync::{Condvar, Mutex};

use crate::engine::DebugEngine;
use crate::types::Variable;
use crate::AdapterError;

/// Adapter-side follow-up to an interpreter task. Runs on the interpreter
/// thread, so it must confine itself to the serialized output sink (or to
/// handing the work to the adapter's event queue).
pub type AdapterTask = Box<dyn FnOnce() + Send + 'static>;

/// An action that must run on the interpreter thread at its next wake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpreterTask {
    CollectLocals,
    CollectGlobals,
    CollectInstance(u64),
    EvalExpression(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskState {
    Idle,
    Pending,
    Running,
    Completed,
}

struct State {
    may_continue: bool,
    /// A resumption command arrived while a task was in flight; honor it
    /// as soon as the task's follow-up has flushed.
    resume_pending: bool,
    task_state: TaskState,
    pending: Option<(InterpreterTask, AdapterTask)>,
}

pub struct Rendezvous {
    state: Mutex<State>,
    wake: Condvar,
    /// Result slot filled on the interpreter thread, drained by the
    /// follow-up. Guarded separately so follow-ups never contend with the
    /// rendezvous state itself.
    results: Mutex<Vec<Variable>>,
}

impl Rendezvous {
    pub fn new() -> Self {
        Rendezvous {
            state: Mutex::new(State {
                may_continue: false,
                resume_pending: false,
                task_state: TaskState::Idle,
                pending: None,
            }),
            wake: Condvar::new(),
            results: Mutex::new(Vec::new()),
        }
    }

    /// Park the interpreter thread at a break. Runs every posted task
    /// exactly once, then its follow-up, and returns only once the adapter
    /// has allowed resumption.
    pub fn on_break_enter(&self, engine: &dyn DebugEngine) {
        let mut state = self.state.lock().unwrap();
        state.may_continue = false;
        state.resume_pending = false;
        loop {
            if let Some((task, after)) = state.pending.take() {
                state.task_state = TaskState::Running;
                drop(state);
                let vars = run_task(&task, engine);
                *self.results.lock().unwrap() = vars;
                {
                    let mut s = self.state.lock().unwrap();
                    s.task_state = TaskState::Completed;
                }
                after();
                state = self.state.lock().unwrap();
                continue;
            }
            if state.may_continue {
                break;
            }
            state = self.wake.wait(state).unwrap();
        }
    }

    /// Allow the interpreter to resume. If a task is still in flight the
    /// resumption is deferred until its follow-up flushes, so a reply never
    /// trails the resumption that should have followed it.
    pub fn signal_continue(&self) {
        let mut state = self.state.lock().unwrap();
        if state.task_state == TaskState::Idle {
            state.may_continue = true;
        } else {
            state.resume_pending = true;
        }
        self.wake.notify_all();
    }

    /// Post a task for the interpreter's next wake, together with the
    /// adapter follow-up that emits its result. Fails with `Busy` while a
    /// previous pair has not finished flushing.
    pub fn request_interpreter_task(
        &self,
        task: InterpreterTask,
        after: AdapterTask,
    ) -> Result<(), AdapterError> {
        let mut state = self.state.lock().unwrap();
        if state.task_state != TaskState::Idle {
            return Err(AdapterError::Busy);
        }
        state.task_state = TaskState::Pending;
        state.pending = Some((task, after));
        self.wake.notify_all();
        Ok(())
    }

    /// Drain the result slot. Called by follow-ups.
    pub fn take_variables(&self) -> Vec<Variable> {
        std::mem::take(&mut *self.results.lock().unwrap())
    }

    /// Mark the in-flight task as flushed. Every follow-up path must end
    /// here; a deferred resumption fires now.
    pub fn finish_task(&self) {
        let mut state = self.state.lock().unwrap();
        state.pending = None;
        state.task_state = TaskState::Idle;
        if state.resume_pending {
            state.resume_pending = false;
            state.may_continue = true;
        }
        self.wake.notify_all();
    }

    /// Block the adapter thread until no task is in flight. The console
    /// loop uses this to hold its prompt back until a routed command's
    /// output has been written.
    pub fn wait_task_idle(&self) {
        let mut state = self.state.lock().unwrap();
        while state.task_state != TaskState::Idle {
            state = self.wake.wait(state).unwrap();
        }
    }

    /// Unconditionally release the interpreter and drop any in-flight
    /// task. Used when the controller transport dies so the host never
    /// deadlocks on a controller that will not come back.
    pub fn release(&self) {
        let mut state = self.state.lock().unwrap();
        state.pending = None;
        state.task_state = TaskState::Idle;
        state.resume_pending = false;
        state.may_continue = true;
        self.wake.notify_all();
    }
}

impl Default for Rendezvous {
    fn default() -> Self {
        Self::new()
    }
}

fn run_task(task: &InterpreterTask, engine: &dyn DebugEngine) -> Vec<Variable> {
    match task {
        InterpreterTask::CollectLocals => engine.local_variables(),
        InterpreterTask::CollectGlobals => engine.global_variables(),
        InterpreterTask::CollectInstance(object_id) => engine.instance_variables(*object_id),
        InterpreterTask::EvalExpression(expression) => {
            if expression.is_empty() {
                Vec::new()
            } else {
                vec![engine.evaluate_expression(expression)]
            }
        }
    }
}
