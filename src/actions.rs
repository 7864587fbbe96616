//! Registered menu actions.
//!
//! An `Action` is a named unit of work with a label and description for the menu.
//! Work is an async closure producing a short summary string on success.
//! The registry is filled once at startup and then handed to the TUI by value.

use std::fmt;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

pub type WorkFuture = Pin<Box<dyn Future<Output = Result<String>> + Send + 'static>>;

type Work = Arc<dyn Fn() -> WorkFuture + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Action '{0}' is already registered")]
    DuplicateAction(String),
}

pub struct Action {
    name: String,
    label: String,
    description: String,
    work: Work,
}

impl Action {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Build the future for one execution of this action's work.
    pub fn run(&self) -> WorkFuture {
        (self.work)()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: Vec<Arc<Action>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action. Names must be unique; on conflict the registry is left unchanged.
    pub fn register<F, Fut>(
        &mut self,
        name: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
        work: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(RegistryError::DuplicateAction(name));
        }

        self.actions.push(Arc::new(Action {
            name,
            label: label.into(),
            description: description.into(),
            work: Arc::new(move || -> WorkFuture { Box::pin(work()) }),
        }));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Action>> {
        self.actions.iter().find(|a| a.name == name)
    }

    /// All actions in registration order.
    pub fn list(&self) -> &[Arc<Action>] {
        &self.actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn into_actions(self) -> Vec<Arc<Action>> {
        self.actions
    }
}

/// The demo menu shipped with the binary.
pub fn default_registry(
    store_path: PathBuf,
    accent_color: &str,
) -> Result<ActionRegistry, RegistryError> {
    let mut registry = ActionRegistry::new();

    registry.register(
        "database",
        "Database Demo",
        "Test local database operations",
        move || {
            let path = store_path.clone();
            async move {
                let user = insert_demo_user(&path).await?;
                info!("Database demo completed (user #{} in {})", user.id, path.display());
                Ok::<_, anyhow::Error>(format!("Inserted user #{}", user.id))
            }
        },
    )?;

    registry.register(
        "ssh",
        "SSH Demo",
        "Simulate SSH connection handling",
        || async {
            // Stand-in for a handshake round trip.
            tokio::time::sleep(Duration::from_millis(300)).await;
            info!("SSH demo - connection simulation completed");
            Ok("Connection simulated".to_string())
        },
    )?;

    registry.register(
        "form",
        "Form Demo",
        "Show interactive form capabilities",
        || async {
            info!("Form demo completed");
            Ok("Form shown".to_string())
        },
    )?;

    let accent = accent_color.to_string();
    registry.register(
        "styling",
        "Styling Demo",
        "Demonstrate terminal styling features",
        move || {
            let accent = accent.clone();
            async move {
                info!("Styling demo completed (accent {})", accent);
                Ok(format!("Accent colour {}", accent))
            }
        },
    )?;

    Ok(registry)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
}

/// Append a "Demo User" row to the JSON user store, creating the store if missing.
pub async fn insert_demo_user(path: &Path) -> Result<User> {
    let mut users: Vec<User> = match tokio::fs::read_to_string(path).await {
        Ok(content) => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse user store {}", path.display()))?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read user store {}", path.display()))
        }
    };

    let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
    let user = User {
        id,
        name: "Demo User".to_string(),
    };
    users.push(user.clone());

    let content = serde_json::to_string_pretty(&users).context("Failed to serialize user store")?;
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write user store {}", path.display()))?;

    Ok(user)
}
