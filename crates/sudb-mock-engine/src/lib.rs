//! Scripted [`DebugEngine`](sudb::DebugEngine) for exercising the sudb
//! front-ends without a real interpreter.
//!
//! Build one with [`MockEngine::builder`], hand it to a front-end, and
//! drive "breaks" from a test thread. Every engine call is recorded with
//! the thread it ran on, so tests can assert that interpreter-only
//! operations really were routed to the interpreter thread.

pub mod builder;
pub mod engine;

pub use builder::MockEngineBuilder;
pub use engine::{CallRecord, MockEngine};

use sudb::types::Variable;

/// Shorthand for a plain variable with no children.
pub fn var(name: &str, value: &str) -> Variable {
    Variable {
        name: name.to_string(),
        value: value.to_string(),
        type_name: "Object".to_string(),
        object_id: 0,
        has_children: false,
    }
}
