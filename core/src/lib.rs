use serde::{Deserialize, Serialize};

pub use config::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use movement::*;
pub use overlay::*;
pub use session::*;
pub use types::*;
pub use viewport::*;

mod config;
mod engine;
mod error;
mod generator;
mod grid;
mod movement;
mod overlay;
mod session;
mod types;
mod viewport;

/// Result of clicking a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractOutcome {
    /// Out of reach, empty, or not matching the held token.
    NoChange,
    PickedUp(TokenValue),
    /// The clicked cell now holds the doubled value.
    Merged(TokenValue),
    /// Picked up a token that reached the win target for the first time.
    Won(TokenValue),
}

impl InteractOutcome {
    pub const fn has_update(self) -> bool {
        use InteractOutcome::*;
        match self {
            NoChange => false,
            PickedUp(_) => true,
            Merged(_) => true,
            Won(_) => true,
        }
    }

    pub const fn value(self) -> Option<TokenValue> {
        use InteractOutcome::*;
        match self {
            NoChange => None,
            PickedUp(value) | Merged(value) | Won(value) => Some(value),
        }
    }
}
