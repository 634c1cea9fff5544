//! Plain-text rendering for the console front-end.
//!
//! Every function returns a complete message so callers can hand it to the
//! output sink in one write. Messages that start a new block begin with a
//! newline, mirroring how the prompt always sits on a fresh line.

use crate::types::{BreakPoint, StackFrame, Variable};

pub(crate) fn banner() -> &'static str {
    "sudb command line debugger\n"
}

pub(crate) fn prompt(state: &str) -> String {
    format!("sudb ({state}): ")
}

/// A one-off message line.
pub(crate) fn text(message: &str) -> String {
    format!("\n{message}\n")
}

pub(crate) fn breakpoint_line(bp: &BreakPoint) -> String {
    format!("  {} {}:{}\n", bp.index, bp.file, bp.line)
}

pub(crate) fn breakpoints(bps: &[BreakPoint]) -> String {
    if bps.is_empty() {
        return text("No breakpoints");
    }
    let mut out = text("Breakpoints:");
    for bp in bps {
        out.push_str(&breakpoint_line(bp));
    }
    out
}

/// One frame per line, numbered from 1, the active frame marked `--> `.
pub(crate) fn frames(frames: &[StackFrame], active_index: u64) -> String {
    let mut out = String::from("\n");
    for (i, frame) in frames.iter().enumerate() {
        let prefix = if i as u64 == active_index {
            "--> "
        } else {
            "    "
        };
        out.push_str(&format!("{prefix}#{} {}\n", i + 1, frame.name));
    }
    out
}

pub(crate) fn variables(vars: &[Variable]) -> String {
    let mut out = String::from("\n");
    for var in vars {
        out.push_str(&format!("  {} => {}\n", var.name, var.value));
    }
    out
}

/// Full listing with the current line marked `=>` and line numbers
/// right-aligned in a four-column field.
pub(crate) fn code_listing(lines: &[(u64, String)], current_line: u64) -> String {
    let mut out = String::from("\n");
    for (line_no, code) in lines {
        let prefix = if *line_no == current_line { "=>" } else { "  " };
        out.push_str(&format!("{prefix}{line_no:>4}  {code}\n"));
    }
    out
}

pub(crate) fn current_line(line_no: u64, code: &str) -> String {
    format!("\nLine {line_no}: {code}")
}

pub(crate) fn help() -> &'static str {
    "\nDebugger help\n\
     Commands\n\
     \x20 b[reak] file:line          set breakpoint to some position\n\
     \x20 b[reak]                    list breakpoints\n\
     \x20 del[ete] <n>               delete a breakpoint\n\
     \x20 c[ont]                     run until program ends or hits a breakpoint\n\
     \x20 s[tep]                     step (into methods) one line\n\
     \x20 s[tep] o[ut]               step out of the current method\n\
     \x20 n[ext]                     go over one line, stepping over methods\n\
     \x20 w[here]                    display frames\n\
     \x20 f[rame]                    alias for where\n\
     \x20 l[ist]                     list program\n\
     \x20 up                         move to higher frame\n\
     \x20 down                       move to lower frame\n\
     \x20 v[ar] g[lobal]             show global variables\n\
     \x20 v[ar] l[ocal]              show local variables\n\
     \x20 v[ar] i[nstance] <id>      show instance variables of object <id> (hex)\n\
     \x20 p expression               evaluate expression and print its value\n\
     \x20 h[elp]                     print this help\n\
     \x20 <everything else>          evaluate\n"
}
