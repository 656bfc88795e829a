//! TUI rendering traits for calsync types.
//!
//! Extension traits that add colored terminal rendering to calsync-core
//! types using owo_colors.

use calsync_core::config::SyncConfig;
use calsync_core::{Event, SyncPlan, SyncResult};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        format!("{} {}", self, self.start.to_string().dimmed())
    }
}

impl Render for SyncConfig {
    fn render(&self) -> String {
        format!(
            "📅 {} → {}  {}",
            self.source_calendar,
            self.target_calendar,
            format!("({})", self.criterion).dimmed()
        )
    }
}

impl Render for SyncResult {
    fn render(&self) -> String {
        if self.is_noop() {
            return "   No changes".dimmed().to_string();
        }

        let mut lines = Vec::new();

        if self.copy.staged > 0 {
            let label = format!("{} {} copied", self.copied(), pluralize("event", self.copied()));
            lines.push(format!("   {} {}", "+".green(), label.green()));
            if self.copy.is_partial() {
                lines.push(format!(
                    "     {}",
                    format!("{} staged, target accepted {}", self.copy.staged, self.copy.reported).yellow()
                ));
            }
        }

        if self.delete.staged > 0 {
            let label = format!("{} orphaned {} deleted", self.deleted(), pluralize("event", self.deleted()));
            lines.push(format!("   {} {}", "-".red(), label.red()));
            if self.delete.is_partial() {
                lines.push(format!(
                    "     {}",
                    format!("{} staged, target deleted {}", self.delete.staged, self.delete.reported).yellow()
                ));
            }
        }

        lines.join("\n")
    }
}

/// Threshold for compact view (show counts instead of individual events)
const COMPACT_THRESHOLD: usize = 5;

pub trait PlanRender {
    fn render(&self, verbose: bool) -> String;
}

impl PlanRender for SyncPlan {
    fn render(&self, verbose: bool) -> String {
        if self.is_empty() {
            return "   In sync".dimmed().to_string();
        }

        let mut lines = Vec::new();
        render_event_list(&self.to_copy, "+", "to copy", verbose, &mut lines);
        render_event_list(&self.to_delete, "-", "to delete", verbose, &mut lines);
        lines.join("\n")
    }
}

fn render_event_list(events: &[Event], symbol: &str, label: &str, verbose: bool, lines: &mut Vec<String>) {
    if events.is_empty() {
        return;
    }

    let colorize = |text: &str| match symbol {
        "+" => text.green().to_string(),
        _ => text.red().to_string(),
    };

    if verbose || events.len() <= COMPACT_THRESHOLD {
        for event in events {
            lines.push(format!("   {} {}", colorize(symbol), event.render()));
        }
    } else {
        let summary = format!("({} {} {})", events.len(), pluralize("event", events.len()), label);
        lines.push(format!("   {} {}", colorize(symbol), colorize(&summary)));
    }
}

/// Simple pluralization helper
fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
