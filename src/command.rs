//! Controller command grammar.
//!
//! One `Command` vocabulary, two dialects. Both parsers are ordered chains
//! of anchored patterns with abbreviation prefixes; the first match wins
//! and anything left over is `Unknown`. The console additionally treats any
//! unmatched non-empty line as an expression to evaluate.

use once_cell::sync::Lazy;
use regex::Regex;

/// Scope selector for variable enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarScope {
    Local,
    Global,
    Instance(u64),
}

/// A parsed controller command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ListBreakpoints,
    AddBreakpoint { file: Option<String>, line: u64 },
    DeleteBreakpoint { index: u64 },
    Continue,
    Step,
    StepOut,
    StepOver,
    Where,
    Frame { index: u64 },
    FrameUp,
    FrameDown,
    ListSource,
    Vars { scope: VarScope },
    Eval { expression: String },
    ThreadList,
    Start,
    Exit,
    Help,
    Unknown,
}

// Forms shared by both dialects.
static BRK_ADD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*b(?:reak)?\s+(?:(.+):)?([^.:]+)$").unwrap());
// The argument is captured loosely so `del junk` is rejected as malformed
// instead of falling through to the console's evaluate-anything rule.
static BRK_DEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*del(?:ete)?(?:\s+(\S+))?$").unwrap());
static CONT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*c(?:ont)?$").unwrap());
static WHERE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*w(?:here)?$").unwrap());
static NEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*n(?:ext)?$").unwrap());

// Console-only forms.
static BRK_LIST: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*b(?:reak)?$").unwrap());
static STEP_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*s(?:tep)?\s?").unwrap());
static STEP_OUT_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^o(?:ut)?$").unwrap());
static HELP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*h(?:elp)?$").unwrap());
static FRAME_BARE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*f(?:rame)?$").unwrap());
static UP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*up?$").unwrap());
static DOWN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*down?$").unwrap());
static LIST: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*l(?:ist)?$").unwrap());
static EVAL_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*p\s+").unwrap());
static VAR_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*v(?:ar)?\s+").unwrap());
static VAR_GLOBAL_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^g(?:lobal)?$").unwrap());
static VAR_LOCAL_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^l(?:ocal)?$").unwrap());
static VAR_INSTANCE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^i(?:nstance)?\s+(.+)$").unwrap());

// Wire-only forms.
static START: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*start$").unwrap());
static EXIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*exit?$").unwrap());
static FRAME_N: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*f(?:rame)? ([0-9]+)$").unwrap());
static STEP_WIRE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*s(?:tep)?\s?$").unwrap());
static FINISH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*finish?$").unwrap());
static THREAD_LIST: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*th(?:read)? l(?:ist)?$").unwrap());
static VAR_INSPECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"v inspect\s+").unwrap());
static VAR_LOCAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*v(?:ar)? l(?:ocal)?$").unwrap());
static VAR_GLOBAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*v(?:ar)? g(?:lobal)?$").unwrap());
static VAR_INSTANCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*v(?:ar)? i(?:nstance)? (.+)$").unwrap());

impl Command {
    /// Parse one console input line.
    pub fn parse_console(line: &str) -> Command {
        if BRK_LIST.is_match(line) {
            return Command::ListBreakpoints;
        }
        if let Some(caps) = BRK_DEL.captures(line) {
            return match caps.get(1).and_then(|m| m.as_str().parse::<u64>().ok()) {
                Some(index) => Command::DeleteBreakpoint { index },
                None => Command::Unknown,
            };
        }
        if let Some(caps) = BRK_ADD.captures(line) {
            return build_add_breakpoint(&caps);
        }
        if CONT.is_match(line) {
            return Command::Continue;
        }
        if let Some(m) = STEP_PREFIX.find(line) {
            let suffix = &line[m.end()..];
            return if STEP_OUT_SUFFIX.is_match(suffix) {
                Command::StepOut
            } else {
                Command::Step
            };
        }
        if NEXT.is_match(line) {
            return Command::StepOver;
        }
        if HELP.is_match(line) {
            return Command::Help;
        }
        if UP.is_match(line) {
            return Command::FrameUp;
        }
        if DOWN.is_match(line) {
            return Command::FrameDown;
        }
        if WHERE.is_match(line) || FRAME_BARE.is_match(line) {
            return Command::Where;
        }
        if LIST.is_match(line) {
            return Command::ListSource;
        }
        if let Some(m) = EVAL_PREFIX.find(line) {
            return Command::Eval {
                expression: line[m.end()..].to_string(),
            };
        }
        if let Some(m) = VAR_PREFIX.find(line) {
            let suffix = &line[m.end()..];
            if VAR_GLOBAL_SUFFIX.is_match(suffix) {
                return Command::Vars {
                    scope: VarScope::Global,
                };
            }
            if VAR_LOCAL_SUFFIX.is_match(suffix) {
                return Command::Vars {
                    scope: VarScope::Local,
                };
            }
            if let Some(caps) = VAR_INSTANCE_SUFFIX.captures(suffix) {
                return match parse_hex_id(&caps[1]) {
                    Some(object_id) => Command::Vars {
                        scope: VarScope::Instance(object_id),
                    },
                    None => Command::Unknown,
                };
            }
            return Command::Unknown;
        }
        if line.is_empty() {
            return Command::Unknown;
        }
        // Anything else is handed to the evaluator verbatim.
        Command::Eval {
            expression: line.to_string(),
        }
    }

    /// Parse one wire command (already split on `;` and trimmed).
    pub fn parse_wire(cmd: &str) -> Command {
        if let Some(caps) = BRK_ADD.captures(cmd) {
            return build_add_breakpoint(&caps);
        }
        if let Some(caps) = BRK_DEL.captures(cmd) {
            return match caps.get(1).and_then(|m| m.as_str().parse::<u64>().ok()) {
                Some(index) => Command::DeleteBreakpoint { index },
                None => Command::Unknown,
            };
        }
        if START.is_match(cmd) {
            return Command::Start;
        }
        if CONT.is_match(cmd) {
            return Command::Continue;
        }
        if EXIT.is_match(cmd) {
            return Command::Exit;
        }
        if WHERE.is_match(cmd) {
            return Command::Where;
        }
        if THREAD_LIST.is_match(cmd) {
            return Command::ThreadList;
        }
        if let Some(caps) = FRAME_N.captures(cmd) {
            return match caps[1].parse::<u64>() {
                Ok(index) => Command::Frame { index },
                Err(_) => Command::Unknown,
            };
        }
        if STEP_WIRE.is_match(cmd) {
            return Command::Step;
        }
        if FINISH.is_match(cmd) {
            return Command::StepOut;
        }
        if NEXT.is_match(cmd) {
            return Command::StepOver;
        }
        if let Some(m) = VAR_INSPECT.find(cmd) {
            return Command::Eval {
                expression: cmd[m.end()..].to_string(),
            };
        }
        if VAR_LOCAL.is_match(cmd) {
            return Command::Vars {
                scope: VarScope::Local,
            };
        }
        if VAR_GLOBAL.is_match(cmd) {
            return Command::Vars {
                scope: VarScope::Global,
            };
        }
        if let Some(caps) = VAR_INSTANCE.captures(cmd) {
            return match parse_hex_id(&caps[1]) {
                Some(object_id) => Command::Vars {
                    scope: VarScope::Instance(object_id),
                },
                None => Command::Unknown,
            };
        }
        Command::Unknown
    }
}

fn build_add_breakpoint(caps: &regex::Captures<'_>) -> Command {
    let file = caps.get(1).map(|m| m.as_str().to_string());
    match caps[2].parse::<u64>() {
        Ok(line) => Command::AddBreakpoint { file, line },
        Err(_) => Command::Unknown,
    }
}

/// Object ids arrive in hexadecimal, with or without a `0x` prefix.
fn parse_hex_id(text: &str) -> Option<u64> {
    let digits = text.trim();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);
    u64::from_str_radix(digits, 16).ok()
}
