//! # Script interpreter module
//!
//! This module provides an interpreter for timed command scripts. A script is
//! a text file of `<time_s>: <json payload>;` entries, for example:
//!
//! ```text
//! 0.5: {"family": "Forward"};
//! 2.0: {"family": "RotateLeft"};
//! ```
//!
//! Each entry sits on its own line and ends at the last `;` of that line, so
//! payloads may contain `;` themselves. Payloads are deserialised into any
//! `serde` type chosen by the caller.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::fs;
use regex::RegexBuilder;
use serde::de::DeserializeOwned;
use thiserror::Error;

// Internal
use crate::session::get_elapsed_seconds;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command which is scripted to occur at a specific time.
struct Command<T> {
    /// The time the command is supposed to execute at
    exec_time_s: f64,

    /// The payload to deliver
    payload: T
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use
/// `.get_pending()` to acquire the list of commands that are now due.
pub struct ScriptInterpreter<T> {
    _script_path: Option<PathBuf>,
    cmds: VecDeque<Command<T>>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0:?}")]
    ScriptNotFound(PathBuf),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script contains an invalid command at {0} s: {1}")]
    InvalidPayload(f64, serde_json::Error)
}

/// Commands which are due for execution.
#[derive(Debug, PartialEq)]
pub enum Pending<T> {
    None,
    Some(Vec<T>),
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<T: DeserializeOwned> ScriptInterpreter<T> {

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {

        let path = PathBuf::from(script_path.as_ref());
        
        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path));
        }

        let script = fs::read_to_string(&path)
            .map_err(ScriptError::ScriptLoadError)?;

        let mut si = Self::from_script_str(&script)?;
        si._script_path = Some(path);

        Ok(si)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_script_str(script: &str) -> Result<Self, ScriptError> {
        let mut queue: VecDeque<Command<T>> = VecDeque::new();

        // Go through the script executing __the magic regex__.
        let re = RegexBuilder::
            new(r"^\s*(\d+(\.\d+)?)\s*:\s*(.*);\s*$")
            .multi_line(true)
            .build()
            .expect("Script regex is invalid");

        for cap in re.captures_iter(script) {
            // Groups 1 and 3 are not optional so they are present on every
            // match.
            let exec_time_s: f64 = cap[1].parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            let payload = serde_json::from_str(&cap[3])
                .map_err(|e| ScriptError::InvalidPayload(exec_time_s, e))?;

            queue.push_back(Command {
                exec_time_s,
                payload
            });
        }

        if queue.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        Ok(ScriptInterpreter {
            _script_path: None,
            cmds: queue
        })
    }
}

impl<T> ScriptInterpreter<T> {
    /// Return the commands that are due at the current session time.
    pub fn get_pending(&mut self) -> Pending<T> {
        self.get_pending_at(get_elapsed_seconds())
    }

    /// Return the commands whose execution time is before `current_time_s`.
    pub fn get_pending_at(&mut self, current_time_s: f64) -> Pending<T> {

        // If the queue is empty the script is over
        if self.cmds.is_empty() {
            return Pending::EndOfScript
        }

        let mut due: Vec<T> = vec![];

        // Pop items from the front of the queue while their exec time has
        // passed.
        while self.cmds
            .front()
            .map(|c| c.exec_time_s < current_time_s)
            .unwrap_or(false)
        {
            if let Some(c) = self.cmds.pop_front() {
                due.push(c.payload);
            }
        }

        if due.is_empty() {
            Pending::None
        }
        else {
            Pending::Some(due)
        }
    }

    /// Get the number of commands remaining in the script
    pub fn get_num_cmds(&self) -> usize {
        self.cmds.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.cmds.back() {
            Some(c) => c.exec_time_s,
            None => 0f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Req {
        family: String
    }

    const SCRIPT: &str = r#"
        0.5: {"family": "Forward"};
        2.0: {"family": "Idle"};
        2.0: {"family": "RotateLeft"};
    "#;

    #[test]
    fn test_parse_and_pending() {
        let mut si: ScriptInterpreter<Req> = 
            ScriptInterpreter::from_script_str(SCRIPT).unwrap();

        assert_eq!(si.get_num_cmds(), 3);
        assert_eq!(si.get_duration(), 2.0);

        assert_eq!(si.get_pending_at(0.1), Pending::None);
        assert_eq!(
            si.get_pending_at(1.0), 
            Pending::Some(vec![Req { family: "Forward".into() }])
        );
        match si.get_pending_at(2.5) {
            Pending::Some(v) => {
                assert_eq!(v.len(), 2);
                assert_eq!(v[1].family, "RotateLeft");
            },
            p => panic!("Expected two pending commands, got {:?}", p)
        }
        assert_eq!(si.get_pending_at(3.0), Pending::EndOfScript);
    }

    #[test]
    fn test_empty_script() {
        let r: Result<ScriptInterpreter<Req>, _> = 
            ScriptInterpreter::from_script_str("# nothing here\n");
        assert!(matches!(r, Err(ScriptError::ScriptEmpty)));
    }

    #[test]
    fn test_bad_payload() {
        let r: Result<ScriptInterpreter<Req>, _> = 
            ScriptInterpreter::from_script_str("1.0: {\"colour\": 3};");
        assert!(matches!(r, Err(ScriptError::InvalidPayload(t, _)) if t == 1.0));
    }

    #[test]
    fn test_semicolon_in_payload() {
        let mut si: ScriptInterpreter<Req> = ScriptInterpreter::from_script_str(
            "1.0: {\"family\": \"Ext; search\"};\n\
            2.0: {\"family\": \"Idle\"};  \n"
        ).unwrap();

        assert_eq!(si.get_num_cmds(), 2);
        assert_eq!(
            si.get_pending_at(1.5),
            Pending::Some(vec![Req { family: "Ext; search".into() }])
        );
    }

    #[test]
    fn test_missing_file() {
        let r: Result<ScriptInterpreter<Req>, _> = 
            ScriptInterpreter::new("/definitely/not/a/script.txt");
        assert!(matches!(r, Err(ScriptError::ScriptNotFound(_))));
    }
}
