//! Operator command parsing.
//!
//! Two command forms exist, both case-insensitive:
//!
//! - `<CALLSIGN> <PRIORITY>` -- clear an aircraft in the airspace to land
//! - `delay <CALLSIGN>` -- send a queued aircraft back to the airspace
//!
//! Any first token other than `delay` is taken as a call sign. Tokens after
//! the ones a form needs are ignored.

use runway_types::CallSign;

/// Keyword that selects the delay form.
const DELAY_KEYWORD: &str = "DELAY";

/// Recoverable format errors in operator input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The line had no tokens at all.
    #[error("empty command")]
    Empty,

    /// A grant had no priority token.
    #[error("invalid command format, use: <CALLSIGN> <PRIORITY>")]
    MissingPriority {
        /// The call sign token that was given.
        call_sign: CallSign,
    },

    /// A grant's priority token is not an integer.
    #[error("invalid priority {token:?}, use: <CALLSIGN> <PRIORITY>")]
    InvalidPriority {
        /// The call sign token that was given.
        call_sign: CallSign,
        /// The offending priority token.
        token: String,
    },

    /// A delay had no call sign.
    #[error("invalid delay command, use: delay <CALLSIGN>")]
    MissingDelayTarget,
}

/// A parsed operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Clear an aircraft to land at the requested priority.
    Grant {
        /// Target aircraft, expected in the airspace.
        call_sign: CallSign,
        /// Requested queue priority.
        priority: i32,
    },
    /// Return a queued aircraft to the airspace.
    Delay {
        /// Target aircraft, expected in the landing queue.
        call_sign: CallSign,
    },
}

impl Command {
    /// The call sign the command refers to.
    pub const fn call_sign(&self) -> &CallSign {
        match self {
            Self::Grant { call_sign, .. } | Self::Delay { call_sign } => call_sign,
        }
    }
}

impl core::str::FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        parse(line)
    }
}

/// Parse one line of operator input.
///
/// # Errors
///
/// Returns a [`CommandError`] describing the format problem. Unknown call
/// signs are not detected here; they fail later as order errors.
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let mut tokens = line.split_whitespace();
    let first = tokens.next().ok_or(CommandError::Empty)?;

    if first.eq_ignore_ascii_case(DELAY_KEYWORD) {
        let target = tokens.next().ok_or(CommandError::MissingDelayTarget)?;
        return Ok(Command::Delay {
            call_sign: CallSign::new(target),
        });
    }

    let call_sign = CallSign::new(first);
    let Some(token) = tokens.next() else {
        return Err(CommandError::MissingPriority { call_sign });
    };
    let priority = token
        .parse::<i32>()
        .map_err(|_err| CommandError::InvalidPriority {
            call_sign: call_sign.clone(),
            token: token.to_owned(),
        })?;

    Ok(Command::Grant {
        call_sign,
        priority,
    })
}
