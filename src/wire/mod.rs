//! Remote IDE front-end speaking line-oriented XML over TCP.
//!
//! Listens on the configured port (`port=<n>` in the debugger options,
//! default 1234), accepts a single IDE connection, and runs it on a
//! dedicated adapter thread. Stop notifications from the interpreter
//! thread are posted onto the connection's event channel; variable
//! enumeration and expression evaluation run on the interpreter thread via
//! the rendezvous and flush their replies back through the same channel.

mod session;
pub mod xml;

use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Context};
use tokio::sync::mpsc;

use crate::config;
use crate::engine::DebugEngine;
use crate::front_end::FrontEnd;
use crate::logging;
use crate::rendezvous::Rendezvous;
use crate::types::BreakPoint;
use crate::Result;

use session::WireEvent;

pub struct WireFrontEnd {
    engine: Option<Arc<dyn DebugEngine>>,
    rendezvous: Arc<Rendezvous>,
    events: Option<mpsc::UnboundedSender<WireEvent>>,
    port: Option<u16>,
}

impl WireFrontEnd {
    pub fn new() -> Self {
        WireFrontEnd {
            engine: None,
            rendezvous: Arc::new(Rendezvous::new()),
            events: None,
            port: None,
        }
    }

    /// The port the listener actually bound, once initialized. With
    /// `port=0` the OS assigns one; embedders and tests read it here.
    pub fn bound_port(&self) -> Option<u16> {
        self.port
    }

    fn notify(&self, message: String) {
        match &self.events {
            Some(events) => {
                let _ = events.send(WireEvent::Notify(message));
            }
            None => tracing::warn!("stop notification dropped, wire not initialized"),
        }
    }
}

impl Default for WireFrontEnd {
    fn default() -> Self {
        Self::new()
    }
}

impl FrontEnd for WireFrontEnd {
    fn initialize(&mut self, engine: Arc<dyn DebugEngine>, options: &str) -> Result<()> {
        let port = config::port_from_options(options);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = std::sync::mpsc::channel();

        // The service thread is detached; it ends with its connection and
        // may still be parked in accept when the front-end is dropped.
        thread::Builder::new()
            .name("sudb-wire".into())
            .spawn({
                let engine = engine.clone();
                let rendezvous = self.rendezvous.clone();
                let requests = events_tx.clone();
                move || {
                    let runtime = match tokio::runtime::Builder::new_current_thread()
                        .enable_io()
                        .build()
                    {
                        Ok(runtime) => runtime,
                        Err(err) => {
                            let _ =
                                ready_tx.send(Err(format!("failed to start wire runtime: {err}")));
                            return;
                        }
                    };
                    if let Err(err) = runtime.block_on(session::serve(
                        engine, rendezvous, events_rx, requests, port, ready_tx,
                    )) {
                        logging::log_transport_error(&err);
                    }
                }
            })
            .context("failed to spawn wire thread")?;

        match ready_rx.recv() {
            Ok(Ok(bound)) => self.port = Some(bound),
            Ok(Err(message)) => return Err(anyhow!(message)),
            Err(_) => return Err(anyhow!("wire thread exited before binding")),
        }
        self.engine = Some(engine);
        self.events = Some(events_tx);
        Ok(())
    }

    fn on_breakpoint_hit(&self, bp: &BreakPoint) {
        self.notify(xml::breakpoint_stop(bp));
        let Some(engine) = self.engine.as_deref() else {
            return;
        };
        self.rendezvous.on_break_enter(engine);
    }

    fn on_suspend(&self, file: &str, line: u64) {
        self.notify(xml::suspended(file, line));
        let Some(engine) = self.engine.as_deref() else {
            return;
        };
        self.rendezvous.on_break_enter(engine);
    }
}
