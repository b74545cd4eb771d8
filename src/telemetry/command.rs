//! CLI command span helpers.

use std::time::Instant;

use opentelemetry::KeyValue;
use tracing::Span;

use super::metrics;

/// Start a span covering one CLI command.
///
/// The `board.events` field is declared empty and filled by
/// [`record_events`].
pub fn start_command_span(command: &str) -> Span {
    tracing::info_span!(
        "moodboard.command",
        "command.name" = command,
        "board.events" = tracing::field::Empty,
    )
}

/// Record how many board events the command produced.
pub fn record_events(span: &Span, count: usize) {
    span.record("board.events", count as u64);
}

/// Record the command's wall-clock duration.
pub fn record_duration(command: &str, started: Instant) {
    let ms = started.elapsed().as_secs_f64() * 1000.0;
    metrics::operation_duration_ms().record(ms, &[KeyValue::new("command", command.to_string())]);
}
