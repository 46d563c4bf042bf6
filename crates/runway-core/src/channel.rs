//! Command channel between the input reader and the tick engine.
//!
//! One producer pushes raw operator lines; the tick engine drains everything
//! queued so far once per tick. There is no blocking receive: a drain takes
//! the lock, swaps the buffer out, and returns.
//!
//! The [`CommandSource`] trait is the seam the tick cycle consumes, so tests
//! can feed scripted commands without a channel or a thread.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

/// A source of raw operator commands, drained once per tick.
pub trait CommandSource {
    /// Remove and return every command queued so far, oldest first.
    ///
    /// Must not block waiting for input. Returns an empty vector when
    /// nothing is pending.
    fn drain_all(&mut self) -> Vec<String>;
}

/// Unbounded FIFO of raw command lines, shared between threads.
///
/// Cloning yields another handle to the same queue.
#[derive(Debug, Clone, Default)]
pub struct CommandChannel {
    queue: Arc<Mutex<VecDeque<String>>>,
}

impl CommandChannel {
    /// Create an empty channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue one command line. Never blocks beyond the short-held lock.
    pub fn push(&self, line: impl Into<String>) {
        // Push and take never leave the deque half-updated; poison is benign.
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        queue.push_back(line.into());
    }

    /// Atomically take every queued command, preserving arrival order.
    pub fn drain(&self) -> Vec<String> {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *queue).into()
    }

    /// Number of commands waiting.
    pub fn pending(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl CommandSource for CommandChannel {
    fn drain_all(&mut self) -> Vec<String> {
        self.drain()
    }
}

/// A fixed list of commands delivered on the first drain.
///
/// Useful for tests and for replaying a scripted opening.
#[derive(Debug, Clone, Default)]
pub struct ScriptedCommands {
    pending: Vec<String>,
}

impl ScriptedCommands {
    /// Queue the given lines for the next drain.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pending: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Append another line for the next drain.
    pub fn push(&mut self, line: impl Into<String>) {
        self.pending.push(line.into());
    }
}

impl CommandSource for ScriptedCommands {
    fn drain_all(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn drain_preserves_fifo_order() {
        let channel = CommandChannel::new();
        channel.push("c1");
        channel.push("c2");
        channel.push("c3");
        assert_eq!(channel.pending(), 3);
        assert_eq!(channel.drain(), vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn drain_empties_the_queue() {
        let mut channel = CommandChannel::new();
        assert!(channel.drain_all().is_empty());
        channel.push("abcd 0");
        assert_eq!(channel.drain_all().len(), 1);
        assert!(channel.drain_all().is_empty());
    }

    #[test]
    fn clones_share_one_queue() {
        let producer = CommandChannel::new();
        let consumer = producer.clone();
        producer.push("delay abcd");
        assert_eq!(consumer.drain(), vec!["delay abcd"]);
    }

    #[test]
    fn concurrent_push_keeps_per_producer_order() {
        let channel = CommandChannel::new();
        let producer = channel.clone();
        let handle = thread::spawn(move || {
            for i in 0..500 {
                producer.push(format!("cmd {i}"));
            }
        });

        let mut seen = Vec::new();
        while !handle.is_finished() {
            seen.extend(channel.drain());
        }
        handle.join().unwrap();
        seen.extend(channel.drain());

        let expected: Vec<String> = (0..500).map(|i| format!("cmd {i}")).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn scripted_commands_drain_once() {
        let mut script = ScriptedCommands::new(["aaaa 0", "delay aaaa"]);
        script.push("bbbb 1");
        assert_eq!(script.drain_all(), vec!["aaaa 0", "delay aaaa", "bbbb 1"]);
        assert!(script.drain_all().is_empty());
    }
}
