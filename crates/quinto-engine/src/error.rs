//! Error types for the game engine.

/// Errors that can occur while building engine values.
///
/// Gameplay itself never errors: invalid moves are ignored and reported
/// as an absence of events. These variants only guard construction of
/// grids from untrusted cell data.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A cell held a number outside 1..=25.
    #[error("grid cell value {0} is outside 1..=25")]
    CellOutOfRange(u8),

    /// A number appeared in more than one cell.
    #[error("grid repeats the number {0}")]
    DuplicateCell(u8),
}
