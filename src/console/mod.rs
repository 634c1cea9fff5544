//! Interactive console front-end.
//!
//! Presents the debugger as a prompt-driven text UI on the process's
//! console streams. Console allocation and stream rebinding are the host's
//! responsibility; the front-end only reads lines and writes through its
//! output sink, which a host may replace to route output elsewhere.

mod render;
mod session;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::Context;

use crate::engine::DebugEngine;
use crate::front_end::FrontEnd;
use crate::rendezvous::Rendezvous;
use crate::sink::OutputSink;
use crate::types::BreakPoint;
use crate::Result;

use session::SessionContext;

pub struct ConsoleFrontEnd {
    engine: Option<Arc<dyn DebugEngine>>,
    rendezvous: Arc<Rendezvous>,
    sink: Arc<OutputSink>,
    will_continue: Arc<AtomicBool>,
}

impl ConsoleFrontEnd {
    pub fn new() -> Self {
        Self::with_sink(OutputSink::stdout())
    }

    /// Use a custom output sink instead of standard output. Hosts that
    /// rebind the process streams can direct debugger text explicitly.
    pub fn with_sink(sink: OutputSink) -> Self {
        ConsoleFrontEnd {
            engine: None,
            rendezvous: Arc::new(Rendezvous::new()),
            sink: Arc::new(sink),
            will_continue: Arc::new(AtomicBool::new(false)),
        }
    }

    fn current_line_text(engine: &dyn DebugEngine) -> String {
        let line_no = engine.break_line_number();
        engine
            .code_lines(line_no, line_no)
            .first()
            .map(|(no, text)| render::current_line(*no, text))
            .unwrap_or_default()
    }

    /// Write a stop banner followed by the current source line and a fresh
    /// prompt, then park the interpreter on the rendezvous.
    fn enter_break(&self, engine: &dyn DebugEngine, banner: String) {
        self.will_continue.store(false, Ordering::SeqCst);
        let mut msg = banner;
        msg.push_str(&Self::current_line_text(engine));
        msg.push('\n');
        msg.push_str(&render::prompt(session::prompt_state(
            engine,
            &self.will_continue,
        )));
        self.sink.write(&msg);
        self.rendezvous.on_break_enter(engine);
    }
}

impl Default for ConsoleFrontEnd {
    fn default() -> Self {
        Self::new()
    }
}

impl FrontEnd for ConsoleFrontEnd {
    fn initialize(&mut self, engine: Arc<dyn DebugEngine>, _options: &str) -> Result<()> {
        self.engine = Some(engine.clone());
        let ctx = SessionContext {
            engine,
            rendezvous: self.rendezvous.clone(),
            sink: self.sink.clone(),
            will_continue: self.will_continue.clone(),
        };
        // Detached; the loop ends when the console goes away, and the host
        // process outlives it either way.
        thread::Builder::new()
            .name("sudb-console".into())
            .spawn(move || session::run_session(ctx))
            .context("failed to spawn console thread")?;
        Ok(())
    }

    fn on_breakpoint_hit(&self, bp: &BreakPoint) {
        let Some(engine) = self.engine.as_deref() else {
            tracing::warn!("break delivered before console initialization");
            return;
        };
        let banner = format!("\nBreakPoint {} at {}:{}", bp.index, bp.file, bp.line);
        self.enter_break(engine, banner);
    }

    fn on_suspend(&self, file: &str, line: u64) {
        let Some(engine) = self.engine.as_deref() else {
            tracing::warn!("suspend delivered before console initialization");
            return;
        };
        let banner = format!("\nStopped at {file}:{line}");
        self.enter_break(engine, banner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::test_support::{capture_sink, Capture};
    use std::time::Duration;
    use sudb_mock_engine::MockEngine;

    fn console_with(engine: Arc<MockEngine>) -> (ConsoleFrontEnd, Capture) {
        let (sink, capture) = capture_sink();
        let mut fe = ConsoleFrontEnd {
            engine: None,
            rendezvous: Arc::new(Rendezvous::new()),
            sink,
            will_continue: Arc::new(AtomicBool::new(false)),
        };
        fe.engine = Some(engine);
        (fe, capture)
    }

    #[test]
    fn breakpoint_hit_prints_banner_line_and_prompt() {
        let engine = Arc::new(
            MockEngine::builder()
                .stopped(true)
                .break_line(7, "puts x")
                .build(),
        );
        let (fe, capture) = console_with(engine);
        let fe = Arc::new(fe);

        let parked = {
            let fe = fe.clone();
            thread::spawn(move || {
                fe.on_breakpoint_hit(&BreakPoint {
                    index: 1,
                    file: "/x.rb".into(),
                    line: 7,
                    enabled: true,
                });
            })
        };
        thread::sleep(Duration::from_millis(20));
        assert_eq!(
            capture.contents(),
            "\nBreakPoint 1 at /x.rb:7\nLine 7: puts x\nsudb (stopped): "
        );

        fe.rendezvous.signal_continue();
        parked.join().unwrap();
    }

    #[test]
    fn suspend_prints_stopped_banner() {
        let engine = Arc::new(
            MockEngine::builder()
                .stopped(true)
                .break_line(3, "y = 2")
                .build(),
        );
        let (fe, capture) = console_with(engine);
        let fe = Arc::new(fe);

        let parked = {
            let fe = fe.clone();
            thread::spawn(move || fe.on_suspend("/m.rb", 3))
        };
        thread::sleep(Duration::from_millis(20));
        assert!(capture.contents().starts_with("\nStopped at /m.rb:3\nLine 3: y = 2\n"));

        fe.rendezvous.signal_continue();
        parked.join().unwrap();
    }
}
