//! Wire session: one accepted IDE connection driven by a cooperative
//! reactor on the adapter thread.
//!
//! Two tasks share the connection: the read loop parses newline-delimited
//! request frames (several commands may arrive joined by `;`) and answers
//! bookkeeping commands in place; the writer task drains an event channel
//! carrying stop notifications and deferred variable flushes posted from
//! the interpreter thread. Every socket write goes through the session
//! sink, one complete XML message per lock hold.

use std::io;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;

use super::xml;
use crate::command::{Command, VarScope};
use crate::engine::DebugEngine;
use crate::logging;
use crate::rendezvous::{AdapterTask, InterpreterTask, Rendezvous};
use crate::types::{BreakPoint, VariableKind};

/// Work posted onto the reactor from outside the read loop.
pub(crate) enum WireEvent {
    /// Pre-formatted stop notification from the interpreter thread.
    Notify(String),
    /// An interpreter task finished; drain its result and send it.
    FlushVariables { kind: VariableKind },
}

/// Serialized writer for the connection.
struct WireSink {
    out: Mutex<OwnedWriteHalf>,
}

impl WireSink {
    async fn write(&self, message: &str) -> io::Result<()> {
        let mut out = self.out.lock().await;
        out.write_all(message.as_bytes()).await?;
        out.flush().await?;
        logging::log_reply_sent(message);
        Ok(())
    }
}

pub(crate) struct WireSession {
    engine: Arc<dyn DebugEngine>,
    pub(crate) rendezvous: Arc<Rendezvous>,
    sink: WireSink,
}

impl WireSession {
    fn new(engine: Arc<dyn DebugEngine>, rendezvous: Arc<Rendezvous>, out: OwnedWriteHalf) -> Self {
        WireSession {
            engine,
            rendezvous,
            sink: WireSink {
                out: Mutex::new(out),
            },
        }
    }

    pub(crate) async fn handle_event(&self, event: WireEvent) -> io::Result<()> {
        match event {
            WireEvent::Notify(message) => self.sink.write(&message).await,
            WireEvent::FlushVariables { kind } => {
                let vars = self.rendezvous.take_variables();
                let result = self.sink.write(&xml::variables(&vars, kind)).await;
                self.rendezvous.finish_task();
                result
            }
        }
    }

    async fn read_loop(
        &self,
        read_half: OwnedReadHalf,
        requests: &UnboundedSender<WireEvent>,
    ) -> io::Result<()> {
        let mut reader = BufReader::new(read_half);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = reader.read_until(b'\n', &mut buf).await?;
            if n == 0 {
                tracing::info!("IDE disconnected");
                return Ok(());
            }
            let frame = String::from_utf8_lossy(&buf);
            logging::log_command_received(frame.trim_end());
            for cmd in frame.trim_end_matches(&['\r', '\n'][..]).split(';') {
                self.dispatch(cmd.trim(), requests).await?;
            }
        }
    }

    async fn dispatch(&self, cmd: &str, requests: &UnboundedSender<WireEvent>) -> io::Result<()> {
        match Command::parse_wire(cmd) {
            Command::AddBreakpoint { file, line } => {
                let file = file.unwrap_or_default().replace('\\', "/");
                let mut bp = BreakPoint::at(file, line);
                if self.engine.add_breakpoint(&mut bp, true) {
                    self.sink.write(&xml::breakpoint_added(&bp)).await?;
                } else {
                    logging::log_engine_refused("add breakpoint");
                }
            }
            Command::DeleteBreakpoint { index } => {
                if self.engine.remove_breakpoint(index) {
                    self.sink.write(&xml::breakpoint_deleted(index)).await?;
                } else {
                    logging::log_engine_refused("remove breakpoint");
                }
            }
            Command::Start | Command::Continue => self.rendezvous.signal_continue(),
            Command::Exit => {
                // Release the interpreter first in case it is parked at a
                // break, then ask the engine to end the session.
                self.rendezvous.signal_continue();
                self.engine.stop();
            }
            Command::Where => {
                let frames = self.engine.stack_frames();
                let active = self.engine.active_frame_index();
                self.sink.write(&xml::frames(&frames, active)).await?;
            }
            Command::ThreadList => self.sink.write(xml::threads()).await?,
            // Sets the active frame and sends no acknowledgement.
            Command::Frame { index } => self.engine.set_active_frame_index(index),
            Command::Step => {
                self.engine.step();
                self.rendezvous.signal_continue();
            }
            Command::StepOut => {
                self.engine.step_out();
                self.rendezvous.signal_continue();
            }
            Command::StepOver => {
                self.engine.step_over();
                self.rendezvous.signal_continue();
            }
            Command::Eval { expression } => self.route(
                InterpreterTask::EvalExpression(expression),
                VariableKind::Watch,
                cmd,
                requests,
            ),
            Command::Vars { scope } => {
                let (task, kind) = match scope {
                    VarScope::Local => (InterpreterTask::CollectLocals, VariableKind::Local),
                    VarScope::Global => (InterpreterTask::CollectGlobals, VariableKind::Global),
                    VarScope::Instance(object_id) => (
                        InterpreterTask::CollectInstance(object_id),
                        VariableKind::Instance,
                    ),
                };
                self.route(task, kind, cmd, requests);
            }
            Command::Unknown
            | Command::ListBreakpoints
            | Command::Help
            | Command::FrameUp
            | Command::FrameDown
            | Command::ListSource => logging::log_unknown_command(cmd),
        }
        Ok(())
    }

    /// Post an interpreter task; its follow-up hands the flush back to the
    /// reactor so the reply is written from the adapter side.
    fn route(
        &self,
        task: InterpreterTask,
        kind: VariableKind,
        cmd: &str,
        requests: &UnboundedSender<WireEvent>,
    ) {
        let requests = requests.clone();
        let after: AdapterTask = Box::new(move || {
            let _ = requests.send(WireEvent::FlushVariables { kind });
        });
        if self.rendezvous.request_interpreter_task(task, after).is_err() {
            logging::log_task_rejected(cmd);
        }
    }
}

/// Accept exactly one IDE connection and run it to completion. Reports the
/// bound port (or the bind failure) through `ready` before accepting.
pub(crate) async fn serve(
    engine: Arc<dyn DebugEngine>,
    rendezvous: Arc<Rendezvous>,
    events: UnboundedReceiver<WireEvent>,
    requests: UnboundedSender<WireEvent>,
    port: u16,
    ready: std::sync::mpsc::Sender<Result<u16, String>>,
) -> crate::Result<()> {
    let listener = match TcpListener::bind(format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(err) => {
            let _ = ready.send(Err(format!("failed to bind port {port}: {err}")));
            return Err(err.into());
        }
    };
    let bound = match listener.local_addr() {
        Ok(addr) => addr.port(),
        Err(err) => {
            let _ = ready.send(Err(format!("listener has no local address: {err}")));
            return Err(err.into());
        }
    };
    let _ = ready.send(Ok(bound));
    logging::log_listening(bound);

    let (stream, peer) = listener.accept().await?;
    drop(listener); // one client per session
    logging::log_client_connected(&peer);

    let (read_half, write_half) = stream.into_split();
    let session = Arc::new(WireSession::new(engine, rendezvous.clone(), write_half));

    let writer = {
        let session = session.clone();
        let mut events = events;
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if let Err(err) = session.handle_event(event).await {
                    logging::log_transport_error(&err);
                    session.rendezvous.release();
                    break;
                }
            }
        })
    };

    let result = session.read_loop(read_half, &requests).await;
    writer.abort();
    // However the session ended, never leave the interpreter parked on a
    // controller that is gone.
    rendezvous.release();
    logging::log_interpreter_released();
    result.map_err(|err| crate::AdapterError::Transport(err).into())
}
