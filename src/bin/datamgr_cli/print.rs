#![deny(clippy::all, clippy::pedantic)]

use std::io::IsTerminal;

use datamgr::application::submit::{LoadingIndicator, ResultSink};
use serde::Serialize;

use crate::client::CliError;

pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let out =
        serde_json::to_string_pretty(value).map_err(|e| CliError::Output(e.to_string()))?;
    println!("{out}");
    Ok(())
}

/// Results on stdout, alerts on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalSink;

impl ResultSink for TerminalSink {
    fn show(&self, text: &str) {
        println!("{text}");
    }

    fn alert(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

/// Progress line on stderr, only when a person is watching.
#[derive(Debug, Clone, Copy)]
pub struct StderrIndicator {
    enabled: bool,
}

impl StderrIndicator {
    pub fn detect() -> Self {
        Self {
            enabled: std::io::stderr().is_terminal(),
        }
    }
}

impl LoadingIndicator for StderrIndicator {
    fn on(&self, label: &str) {
        if self.enabled {
            eprint!("{label}: waiting for server...");
        }
    }

    fn off(&self) {
        if self.enabled {
            eprintln!(" done");
        }
    }
}
