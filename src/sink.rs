//! Serialized writer for controller-visible console text.
//!
//! Every writer composes one complete logical message (text plus any
//! trailing prompt) and hands it over in a single call, so output from the
//! adapter thread and the interpreter thread never interleaves.

use std::io::Write;
use std::sync::Mutex;

pub struct OutputSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl OutputSink {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        OutputSink {
            out: Mutex::new(out),
        }
    }

    /// A sink over the process's standard output, flushed per message.
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Write one complete message. Errors are ignored; a console that went
    /// away has nowhere to report to.
    pub fn write(&self, message: &str) {
        let mut out = self.out.lock().unwrap();
        let _ = out.write_all(message.as_bytes());
        let _ = out.flush();
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::OutputSink;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    /// In-memory writer for asserting on console output.
    #[derive(Clone, Default)]
    pub(crate) struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// A sink writing into a capture buffer the test can inspect.
    pub(crate) fn capture_sink() -> (Arc<OutputSink>, Capture) {
        let capture = Capture::default();
        let sink = Arc::new(OutputSink::new(Box::new(capture.clone())));
        (sink, capture)
    }
}
