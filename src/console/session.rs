//! Console command loop and dispatch.
//!
//! The loop reads one line at a time, applies it, and records legal
//! commands in the editor history. Bookkeeping commands run right here on
//! the adapter thread; variable enumeration and evaluation are posted to
//! the rendezvous and the next prompt is held back until their output has
//! been written.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use super::render;
use crate::command::{Command, VarScope};
use crate::engine::DebugEngine;
use crate::rendezvous::{AdapterTask, InterpreterTask, Rendezvous};
use crate::sink::OutputSink;
use crate::types::{BreakPoint, Variable};

/// Everything the command loop shares with the break handlers.
pub(crate) struct SessionContext {
    pub engine: Arc<dyn DebugEngine>,
    pub rendezvous: Arc<Rendezvous>,
    pub sink: Arc<OutputSink>,
    /// Set by a resumption command, cleared on the next break; keeps the
    /// prompt reading `running` while the resumption is under way.
    pub will_continue: Arc<AtomicBool>,
}

pub(crate) struct CommandOutcome {
    pub legal: bool,
    /// The command was routed to the interpreter; the prompt must wait for
    /// the result to flush.
    pub routed: bool,
}

pub(crate) fn prompt_state(engine: &dyn DebugEngine, will_continue: &AtomicBool) -> &'static str {
    if will_continue.load(Ordering::SeqCst) || !engine.is_stopped() {
        "running"
    } else {
        "stopped"
    }
}

/// Apply one input line. Returns whether it was legal (and thus worth
/// remembering) and whether its output is still pending on the interpreter.
pub(crate) fn evaluate_command(ctx: &SessionContext, line: &str) -> CommandOutcome {
    let engine = ctx.engine.as_ref();
    let mut legal = true;
    let mut routed = false;
    let mut resume = false;

    match Command::parse_console(line) {
        Command::ListBreakpoints => {
            ctx.sink.write(&render::breakpoints(&engine.breakpoints()));
        }
        Command::AddBreakpoint { file, line } => {
            let mut bp = BreakPoint::at(file.unwrap_or_default(), line);
            if engine.add_breakpoint(&mut bp, true) {
                let mut msg = render::text("Added breakpoint:");
                msg.push_str(&render::breakpoint_line(&bp));
                ctx.sink.write(&msg);
            } else {
                ctx.sink.write(&render::text("Cannot add breakpoint"));
            }
        }
        Command::DeleteBreakpoint { index } => {
            if !engine.remove_breakpoint(index) {
                ctx.sink.write(&render::text("Cannot remove breakpoint"));
            }
        }
        Command::Continue => resume = true,
        Command::Step => {
            engine.step();
            resume = true;
        }
        Command::StepOut => {
            engine.step_out();
            resume = true;
        }
        Command::StepOver => {
            engine.step_over();
            resume = true;
        }
        Command::Help => ctx.sink.write(render::help()),
        Command::FrameUp => {
            engine.shift_active_frame(true);
            write_frames(ctx);
        }
        Command::FrameDown => {
            engine.shift_active_frame(false);
            write_frames(ctx);
        }
        Command::Where => write_frames(ctx),
        Command::ListSource => {
            let listing =
                render::code_listing(&engine.code_lines(0, 0), engine.break_line_number());
            ctx.sink.write(&listing);
        }
        Command::Eval { expression } => {
            (legal, routed) = route_task(
                ctx,
                InterpreterTask::EvalExpression(expression),
                render_eval_result,
            );
        }
        Command::Vars { scope } => {
            let task = match scope {
                VarScope::Local => InterpreterTask::CollectLocals,
                VarScope::Global => InterpreterTask::CollectGlobals,
                VarScope::Instance(object_id) => InterpreterTask::CollectInstance(object_id),
            };
            (legal, routed) = route_task(ctx, task, render_variables);
        }
        Command::Unknown => legal = false,
        // Wire-only forms; the console parser never produces them.
        Command::Frame { .. } | Command::ThreadList | Command::Start | Command::Exit => {
            legal = false;
        }
    }

    if !legal {
        ctx.sink.write(&render::text("Illegal command"));
    }
    if resume {
        ctx.rendezvous.signal_continue();
        ctx.will_continue.store(true, Ordering::SeqCst);
    }
    CommandOutcome { legal, routed }
}

fn write_frames(ctx: &SessionContext) {
    let frames = ctx.engine.stack_frames();
    let active = ctx.engine.active_frame_index();
    ctx.sink.write(&render::frames(&frames, active));
}

fn render_eval_result(vars: &[Variable]) -> String {
    vars.first()
        .map(|var| render::text(&var.value))
        .unwrap_or_default()
}

fn render_variables(vars: &[Variable]) -> String {
    render::variables(vars)
}

/// Post an interpreter task whose follow-up writes the rendered result.
/// A still-pending previous task surfaces as an illegal command.
fn route_task(
    ctx: &SessionContext,
    task: InterpreterTask,
    render_result: fn(&[Variable]) -> String,
) -> (bool, bool) {
    let sink = ctx.sink.clone();
    let rendezvous = ctx.rendezvous.clone();
    let after: AdapterTask = Box::new(move || {
        let vars = rendezvous.take_variables();
        let out = render_result(&vars);
        if !out.is_empty() {
            sink.write(&out);
        }
        rendezvous.finish_task();
    });
    match ctx.rendezvous.request_interpreter_task(task, after) {
        Ok(()) => (true, true),
        Err(_) => (false, false),
    }
}

/// The interactive loop. Runs on the adapter thread until the console
/// detaches; the host process outlives it.
pub(crate) fn run_session(ctx: SessionContext) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            tracing::error!(error = %err, "cannot start console editor");
            return;
        }
    };
    let history_path = dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".sudb_history");
    let _ = editor.load_history(&history_path);

    ctx.sink.write(render::banner());

    loop {
        let prompt = render::prompt(prompt_state(ctx.engine.as_ref(), &ctx.will_continue));
        match editor.readline(&prompt) {
            Ok(line) => {
                let outcome = evaluate_command(&ctx, &line);
                if outcome.legal {
                    let _ = editor.add_history_entry(line.as_str());
                }
                if outcome.routed {
                    ctx.rendezvous.wait_task_idle();
                }
            }
            Err(ReadlineError::Interrupted) => {
                ctx.sink
                    .write(&render::text("Use Ctrl-D to detach the console"));
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                tracing::error!(error = %err, "console read failed");
                break;
            }
        }
    }

    let _ = editor.save_history(&history_path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::test_support::capture_sink;
    use std::thread;
    use std::time::Duration;
    use sudb_mock_engine::MockEngine;

    fn context(engine: Arc<MockEngine>) -> SessionContext {
        let (sink, _) = capture_sink();
        SessionContext {
            engine,
            rendezvous: Arc::new(Rendezvous::new()),
            sink,
            will_continue: Arc::new(AtomicBool::new(false)),
        }
    }

    fn context_with_capture(
        engine: Arc<MockEngine>,
    ) -> (SessionContext, crate::sink::test_support::Capture) {
        let (sink, capture) = capture_sink();
        let ctx = SessionContext {
            engine,
            rendezvous: Arc::new(Rendezvous::new()),
            sink,
            will_continue: Arc::new(AtomicBool::new(false)),
        };
        (ctx, capture)
    }

    #[test]
    fn add_and_list_breakpoints() {
        let engine = Arc::new(MockEngine::builder().stopped(true).build());
        let (ctx, capture) = context_with_capture(engine);

        let outcome = evaluate_command(&ctx, "b /a/b.rb:42");
        assert!(outcome.legal);
        assert!(!outcome.routed);
        assert!(capture
            .contents()
            .contains("\nAdded breakpoint:\n  1 /a/b.rb:42\n"));

        evaluate_command(&ctx, "b");
        assert!(capture
            .contents()
            .contains("\nBreakpoints:\n  1 /a/b.rb:42\n"));
    }

    #[test]
    fn delete_refusal_is_reported() {
        let engine = Arc::new(MockEngine::builder().stopped(true).build());
        let (ctx, capture) = context_with_capture(engine);
        assert!(evaluate_command(&ctx, "del 9").legal);
        assert!(capture.contents().contains("Cannot remove breakpoint"));
    }

    #[test]
    fn malformed_lines_are_illegal() {
        let engine = Arc::new(MockEngine::builder().stopped(true).build());
        let (ctx, capture) = context_with_capture(engine);
        assert!(!evaluate_command(&ctx, "del x").legal);
        assert!(!evaluate_command(&ctx, "").legal);
        assert!(!evaluate_command(&ctx, "v x").legal);
        assert_eq!(capture.contents().matches("Illegal command").count(), 3);
    }

    #[test]
    fn eval_at_break_prints_value_after_flush() {
        let engine = Arc::new(
            MockEngine::builder()
                .stopped(true)
                .eval("1+1", "2")
                .build(),
        );
        let (ctx, capture) = context_with_capture(engine.clone());

        let parked = {
            let rendezvous = ctx.rendezvous.clone();
            let engine = engine.clone();
            thread::spawn(move || rendezvous.on_break_enter(engine.as_ref()))
        };
        thread::sleep(Duration::from_millis(10));

        let outcome = evaluate_command(&ctx, "p 1+1");
        assert!(outcome.legal);
        assert!(outcome.routed);
        ctx.rendezvous.wait_task_idle();
        assert!(capture.contents().contains("\n2\n"));

        ctx.rendezvous.signal_continue();
        parked.join().unwrap();
    }

    #[test]
    fn locals_render_name_value_pairs() {
        let engine = Arc::new(
            MockEngine::builder()
                .stopped(true)
                .local("count", "3")
                .local("name", "\"ada\"")
                .build(),
        );
        let (ctx, capture) = context_with_capture(engine.clone());

        let parked = {
            let rendezvous = ctx.rendezvous.clone();
            let engine = engine.clone();
            thread::spawn(move || rendezvous.on_break_enter(engine.as_ref()))
        };
        thread::sleep(Duration::from_millis(10));

        assert!(evaluate_command(&ctx, "v l").routed);
        ctx.rendezvous.wait_task_idle();
        let output = capture.contents();
        assert!(output.contains("  count => 3\n"));
        assert!(output.contains("  name => \"ada\"\n"));

        ctx.rendezvous.signal_continue();
        parked.join().unwrap();
    }

    #[test]
    fn busy_rendezvous_rejects_second_routed_command() {
        let engine = Arc::new(MockEngine::builder().stopped(true).build());
        let (ctx, capture) = context_with_capture(engine);
        // Park a task without an interpreter to drain it.
        assert!(evaluate_command(&ctx, "v l").routed);
        let outcome = evaluate_command(&ctx, "v g");
        assert!(!outcome.legal);
        assert!(capture.contents().contains("Illegal command"));
    }

    #[test]
    fn resumption_marks_prompt_running() {
        let engine = Arc::new(MockEngine::builder().stopped(true).build());
        let ctx = context(engine.clone());
        assert_eq!(prompt_state(ctx.engine.as_ref(), &ctx.will_continue), "stopped");
        evaluate_command(&ctx, "c");
        assert_eq!(prompt_state(ctx.engine.as_ref(), &ctx.will_continue), "running");
    }

    #[test]
    fn stepping_requests_engine_modes() {
        let engine = Arc::new(MockEngine::builder().stopped(true).build());
        let ctx = context(engine.clone());
        evaluate_command(&ctx, "s");
        evaluate_command(&ctx, "s o");
        evaluate_command(&ctx, "n");
        let calls = engine.calls();
        assert!(calls.contains(&"step".to_string()));
        assert!(calls.contains(&"step_out".to_string()));
        assert!(calls.contains(&"step_over".to_string()));
    }
}
