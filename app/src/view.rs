//! Plain-text rendering of the application state.
//!
//! Rendering is a pure function of [`AppState`]; the binary decides when
//! to print.

use crate::app::{AppState, Overlay};
use crate::filter::Filter;
use crate::timer::TimerPhase;
use std::fmt::Write;

/// Renders the screen that currently takes input
#[must_use]
pub fn render(state: &AppState) -> String {
    if state.overlay_open() {
        render_timer(state)
    } else {
        render_main(state)
    }
}

/// Renders the todo list with its filter bar
#[must_use]
pub fn render_main(state: &AppState) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "== todos ({}/{} done) ==",
        state.todos.completed_count(),
        state.todos.count()
    );

    let bar: Vec<String> = Filter::ALL
        .iter()
        .map(|&filter| {
            if filter == state.filter {
                format!("[{filter}]")
            } else {
                filter.to_string()
            }
        })
        .collect();
    let _ = writeln!(out, "filter: {}", bar.join(" "));

    let visible = state.visible_todos();
    if visible.is_empty() {
        let _ = writeln!(out, "  (no todos)");
    }
    for todo in visible {
        let mark = if todo.completed { 'x' } else { ' ' };
        let editing = if state.editing == Some(todo.id) {
            "  <- editing"
        } else {
            ""
        };
        let _ = writeln!(out, "  {:>3} [{mark}] {}{editing}", todo.id.get(), todo.body);
    }

    if let Some(status) = status_line(state) {
        let _ = writeln!(out, "{status}");
    }

    out
}

/// Renders the open timer overlay
#[must_use]
pub fn render_timer(state: &AppState) -> String {
    let timer = &state.timer;
    let mut out = String::new();

    let _ = writeln!(out, "== {} ==", timer.title());
    match timer.phase() {
        TimerPhase::Running {
            remaining_minutes, ..
        } => {
            let _ = writeln!(out, "  {remaining_minutes} min");
        },
        TimerPhase::Idle | TimerPhase::Expired => {
            let _ = writeln!(out, "  enter 60 minutes or less");
            if let Some(error) = timer.error() {
                let _ = writeln!(out, "  ! {error}");
            }
            let _ = writeln!(out, "  duration: {} min", timer.duration_field());
        },
    }

    out
}

/// One-line timer summary for the main screen
///
/// `None` when there is nothing to report: no countdown, or the overlay is
/// already showing it.
#[must_use]
pub fn status_line(state: &AppState) -> Option<String> {
    if state.overlay == Overlay::Open {
        return None;
    }

    let timer = &state.timer;
    match timer.phase() {
        TimerPhase::Running {
            remaining_minutes,
            started_at,
            ..
        } => Some(format!(
            "timer: {} ({remaining_minutes} min left, started {})",
            timer.title(),
            started_at.format("%H:%M")
        )),
        TimerPhase::Expired => Some(format!("timer: {}", timer.title())),
        TimerPhase::Idle => None,
    }
}
