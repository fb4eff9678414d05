//! # Operator commands.
//!
//! The host hands over the words typed after its command prefix; [`Command::parse`]
//! turns them into a [`Command`], and `Scheduler::execute` runs it and returns the
//! reply text.
//!
//! ```text
//! cancel                 cancel the native restart, else the pending one
//! restart [time]         arm in 10s, or at "hh:mm:ss" / after N seconds
//! status                 current restart status
//! testNotify | discord   send a test notice to the external sink
//! help                   command list
//! ```
//!
//! Extra arguments after `cancel`, `status`, `testNotify` and `help` are ignored.

use crate::error::CommandError;

/// A parsed operator command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Cancel,
    /// `time` is left unparsed; it is resolved against the clock at execution.
    Restart {
        time: Option<String>,
    },
    Status,
    TestNotify,
    Help,
}

impl Command {
    /// Parses the argument vector (command word first).
    ///
    /// # Example
    /// ```
    /// use rebootvisor::Command;
    ///
    /// assert_eq!(
    ///     Command::parse(&["restart", "04:00:00"]),
    ///     Ok(Command::Restart { time: Some("04:00:00".into()) })
    /// );
    /// assert!(Command::parse(&["reboot"]).is_err());
    /// ```
    pub fn parse(args: &[&str]) -> Result<Self, CommandError> {
        let Some((&word, rest)) = args.split_first() else {
            return Err(CommandError::UnknownCommand {
                name: String::new(),
            });
        };

        match word {
            "cancel" => Ok(Command::Cancel),
            "status" => Ok(Command::Status),
            "help" => Ok(Command::Help),
            "testNotify" | "discord" => Ok(Command::TestNotify),
            "restart" => match rest {
                [] => Ok(Command::Restart { time: None }),
                [time] => Ok(Command::Restart {
                    time: Some((*time).to_string()),
                }),
                _ => Err(CommandError::WrongNumberOfArguments {
                    command: "restart",
                    got: rest.len(),
                }),
            },
            other => Err(CommandError::UnknownCommand {
                name: other.to_string(),
            }),
        }
    }
}
