//! Background line reader feeding the command channel.
//!
//! The reader runs on its own OS thread because line input blocks. It is the
//! sole producer into the [`CommandChannel`] and never touches aircraft
//! state. It stops for good on end-of-stream, on a read error, or when it
//! notices the running flag has been cleared after a line arrives.
//!
//! # Shutdown
//!
//! A blocked read cannot be interrupted portably, so [`ReaderHandle::shutdown`]
//! is best-effort: it joins the thread if it has already finished and
//! detaches it otherwise. A detached reader exits on the next line or at
//! end-of-stream; the process does not wait for it.

use std::io::BufRead;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::channel::CommandChannel;
use crate::control::ControlState;

/// Why the reader stopped producing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderExit {
    /// The input reached end-of-stream.
    EndOfStream,
    /// A read failed; the message describes the error.
    ReadFailed(String),
    /// The running flag was cleared.
    Stopped,
}

/// Handle to a running reader thread.
#[derive(Debug)]
pub struct ReaderHandle {
    handle: JoinHandle<ReaderExit>,
}

impl ReaderHandle {
    /// Whether the reader thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the reader exits.
    ///
    /// Only use this when the input is known to end (files, pipes, tests).
    /// A panicked reader is reported as a read failure.
    pub fn join(self) -> ReaderExit {
        self.handle.join().unwrap_or_else(|_panic| {
            ReaderExit::ReadFailed("reader thread panicked".to_owned())
        })
    }

    /// Join the reader if it already exited, otherwise detach it.
    ///
    /// Returns the exit reason when the thread was joined.
    pub fn shutdown(self) -> Option<ReaderExit> {
        if self.handle.is_finished() {
            let exit = self.join();
            debug!(?exit, "Input reader joined");
            Some(exit)
        } else {
            debug!("Input reader still blocked on input, detaching");
            None
        }
    }
}

/// Spawn a thread that reads lines from `input` into `channel`.
///
/// Empty lines are discarded. Trailing line terminators are stripped;
/// everything else is forwarded verbatim for the tick engine to parse.
pub fn spawn_line_reader<R>(
    input: R,
    channel: CommandChannel,
    control: Arc<ControlState>,
) -> ReaderHandle
where
    R: BufRead + Send + 'static,
{
    let handle = thread::spawn(move || read_lines(input, &channel, &control));
    ReaderHandle { handle }
}

/// Reader loop body, run on the reader thread.
fn read_lines<R: BufRead>(mut input: R, channel: &CommandChannel, control: &ControlState) -> ReaderExit {
    info!("Input reader started");
    let mut line = String::new();

    let exit = loop {
        if !control.is_running() {
            break ReaderExit::Stopped;
        }

        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => break ReaderExit::EndOfStream,
            Ok(_) => {
                let command = line.trim_end_matches(['\n', '\r']);
                if command.is_empty() {
                    continue;
                }
                channel.push(command);
            }
            Err(e) => {
                warn!(error = %e, "Input read failed, no further commands will be accepted");
                break ReaderExit::ReadFailed(e.to_string());
            }
        }
    };

    info!(?exit, "Input reader stopped");
    exit
}
