//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;

use crate::actions::{Action, ActionRegistry};
use crate::tui::app::App;
use crate::tui::theme::Theme;

fn single<F, Fut>(name: &str, work: F) -> Arc<Action>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = anyhow::Result<String>> + Send + 'static,
{
    let mut registry = ActionRegistry::new();
    registry
        .register(name, name, format!("{} (test)", name), work)
        .unwrap();
    registry.into_actions().remove(0)
}

/// An action whose work returns immediately with "<name> done".
pub fn instant_action(name: &str) -> Arc<Action> {
    let summary = format!("{} done", name);
    single(name, move || {
        let summary = summary.clone();
        async move { Ok(summary) }
    })
}

pub fn slow_action(name: &str, delay: Duration) -> Arc<Action> {
    let summary = format!("{} done", name);
    single(name, move || {
        let summary = summary.clone();
        async move {
            tokio::time::sleep(delay).await;
            Ok(summary)
        }
    })
}

pub fn failing_action(name: &str, reason: &'static str) -> Arc<Action> {
    single(name, move || async move { Err::<String, _>(anyhow!(reason)) })
}

async fn explode() -> anyhow::Result<String> {
    panic!("work panicked")
}

pub fn panicking_action(name: &str) -> Arc<Action> {
    single(name, explode)
}

/// A registry of instant actions whose labels are the given names.
pub fn registry_of(names: &[&str]) -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    for name in names {
        let summary = format!("{} done", name);
        registry
            .register(*name, *name, format!("{} (test)", name), move || {
                let summary = summary.clone();
                async move { Ok(summary) }
            })
            .unwrap();
    }
    registry
}

/// Creates an App over instant test actions with the default theme.
pub fn test_app(names: &[&str]) -> App {
    App::new(registry_of(names), Theme::default())
}
