//! Line protocol for driving the host from a terminal or script.
//!
//! ```text
//! write <attribute> <offset> [hex]   store bytes, replies "ok <count>"
//! read <attribute> <offset> <count>  show bytes, replies "ok <hex>"
//! wipe                               zero both buffers
//! quit                               shut down
//! ```

use std::{fmt, str::FromStr};

use thiserror::Error;
use zeroize::Zeroizing;

use crate::{error::HostError, host::SecureMemoryHost};

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Store bytes into an attribute
    Write {
        /// Attribute name
        attribute: String,
        /// Start offset
        offset: usize,
        /// Bytes to store; empty when omitted
        data: Zeroizing<Vec<u8>>,
    },
    /// Show bytes from an attribute
    Read {
        /// Attribute name
        attribute: String,
        /// Start offset
        offset: usize,
        /// Maximum number of bytes
        count: usize,
    },
    /// Zero both buffers
    Wipe,
    /// Shut the host down
    Quit,
}

/// Errors parsing a command line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Line had no command
    #[error("empty command")]
    Empty,

    /// First word is not a known command
    #[error("unknown command: {0}")]
    Unknown(String),

    /// Required argument missing
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    /// Argument is not a non-negative integer
    #[error("invalid {field}: {value}")]
    InvalidNumber {
        /// Argument name
        field: &'static str,
        /// Rejected text
        value: String,
    },

    /// Data argument is not valid hex
    #[error("invalid hex data: {0}")]
    InvalidHex(String),

    /// More arguments than the command takes
    #[error("unexpected argument: {0}")]
    TrailingArgument(String),
}

/// Successful command outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Bytes consumed by a write
    Written(usize),
    /// Bytes served by a read
    Data(Zeroizing<Vec<u8>>),
    /// Buffers wiped
    Wiped,
    /// Host shut down
    Quit,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Written(count) => write!(f, "ok {count}"),
            Self::Data(bytes) if !bytes.is_empty() => write!(f, "ok {}", hex::encode(&bytes[..])),
            Self::Data(_) | Self::Wiped | Self::Quit => f.write_str("ok"),
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(CommandError::Empty);
        };

        let command = match verb {
            "write" => {
                let attribute = required(&mut words, "attribute")?.to_string();
                let offset = number(required(&mut words, "offset")?, "offset")?;
                let data = match words.next() {
                    Some(text) => Zeroizing::new(
                        hex::decode(text).map_err(|e| CommandError::InvalidHex(e.to_string()))?,
                    ),
                    None => Zeroizing::new(Vec::new()),
                };
                Self::Write { attribute, offset, data }
            },
            "read" => {
                let attribute = required(&mut words, "attribute")?.to_string();
                let offset = number(required(&mut words, "offset")?, "offset")?;
                let count = number(required(&mut words, "count")?, "count")?;
                Self::Read { attribute, offset, count }
            },
            "wipe" => Self::Wipe,
            "quit" | "exit" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        if let Some(extra) = words.next() {
            return Err(CommandError::TrailingArgument(extra.to_string()));
        }

        Ok(command)
    }
}

impl Command {
    /// Run the command against `host`.
    pub fn execute(&self, host: &SecureMemoryHost) -> Result<Reply, HostError> {
        match self {
            Self::Write { attribute, offset, data } => {
                host.store(attribute, *offset, data).map(Reply::Written)
            },
            Self::Read { attribute, offset, count } => {
                host.show(attribute, *offset, *count).map(Reply::Data)
            },
            Self::Wipe => host.wipe().map(|()| Reply::Wiped),
            Self::Quit => {
                host.shutdown();
                Ok(Reply::Quit)
            },
        }
    }
}

fn required<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    field: &'static str,
) -> Result<&'a str, CommandError> {
    words.next().ok_or(CommandError::MissingArgument(field))
}

fn number(text: &str, field: &'static str) -> Result<usize, CommandError> {
    text.parse().map_err(|_| CommandError::InvalidNumber { field, value: text.to_string() })
}
