//! Calculator engine and history snapshots.

/// Engine state machine: perform, undo/redo, persistence round-trip.
pub mod engine;
/// History mementos for undo/redo and export.
pub mod memento;
