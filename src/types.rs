//! Data model shared between the engine interface and the front-ends.

/// A registered breakpoint. `index` is assigned by the engine and is the
/// handle controllers use to refer to it for the rest of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakPoint {
    pub index: u64,
    pub file: String,
    pub line: u64,
    pub enabled: bool,
}

impl BreakPoint {
    /// A pending breakpoint at `file:line`, not yet registered with the
    /// engine. An empty `file` means "the file of the current break".
    pub fn at(file: impl Into<String>, line: u64) -> Self {
        BreakPoint {
            index: 0,
            file: file.into(),
            line,
            enabled: true,
        }
    }
}

/// One frame of the call stack at the current stop. Snapshots are
/// invalidated by any resumption command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    pub name: String,
    pub file: String,
    pub line: u64,
}

/// A variable as reported by the engine. The value is already stringified;
/// front-ends only escape it for their transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub value: String,
    pub type_name: String,
    pub object_id: u64,
    pub has_children: bool,
}

/// The scope label attached to a batch of variables on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Local,
    Global,
    Instance,
    Watch,
}

impl VariableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Local => "local",
            VariableKind::Global => "global",
            VariableKind::Instance => "instance",
            VariableKind::Watch => "watch",
        }
    }
}
