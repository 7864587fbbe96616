//! The one-time form shown before the menu starts.
//!
//! Prompts run in order and any of them can be cancelled (Esc / Ctrl+C), in which case the
//! caller exits without starting the menu. Answers are only used for the greeting.

use std::fmt;
use std::io;

use anyhow::{Context, Result};
use cliclack::{confirm, input, select};
use colored::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "dev",
            Environment::Staging => "staging",
            Environment::Production => "prod",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormAnswers {
    pub name: String,
    pub environment: Environment,
}

impl FormAnswers {
    pub fn greeting(&self) -> String {
        format!(
            "Hello {}! Running demo in {} environment.",
            self.name.bold(),
            self.environment.to_string().cyan()
        )
    }
}

/// Map a cancelled prompt to `None`; other I/O failures are errors.
fn answered<T>(result: io::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e).context("Setup form failed"),
    }
}

/// Run the form. `Ok(None)` means the user cancelled or declined to continue.
pub fn run_setup_form() -> Result<Option<FormAnswers>> {
    let Some(name) = answered(
        input("What's your name?")
            .placeholder("Enter your name")
            .interact::<String>(),
    )?
    else {
        return Ok(None);
    };

    let Some(environment) = answered(
        select("Choose environment")
            .item(Environment::Development, "Development", "")
            .item(Environment::Staging, "Staging", "")
            .item(Environment::Production, "Production", "")
            .interact(),
    )?
    else {
        return Ok(None);
    };

    let Some(proceed) = answered(confirm("Continue with demo?").interact())? else {
        return Ok(None);
    };
    if !proceed {
        return Ok(None);
    }

    Ok(Some(FormAnswers { name, environment }))
}
