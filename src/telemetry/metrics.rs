//! Metric instrument factories for moodboard.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! Without a provider the instruments are no-ops.

use opentelemetry::metrics::{Counter, Histogram, Meter};

fn meter() -> Meter {
    opentelemetry::global::meter("moodboard")
}

/// Counter: items given a rankable score.
/// Labels: `outcome`.
pub fn recommendations_scored() -> Counter<u64> {
    meter()
        .u64_counter("moodboard.recommendations.scored")
        .with_description("Number of catalog items ranked as recommendations")
        .build()
}

/// Counter: daily activity lookups.
/// Labels: `cache` ("hit" | "miss").
pub fn activity_aggregations() -> Counter<u64> {
    meter()
        .u64_counter("moodboard.activity.aggregations")
        .with_description("Number of daily activity lookups")
        .build()
}

/// Counter: board mutations.
/// Labels: `operation`.
pub fn board_mutations() -> Counter<u64> {
    meter()
        .u64_counter("moodboard.board.mutations")
        .with_description("Number of board mutations")
        .build()
}

/// Histogram: command duration in milliseconds.
/// Labels: `command`.
pub fn operation_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("moodboard.operation.duration_ms")
        .with_description("Command duration in milliseconds")
        .with_unit("ms")
        .build()
}
