use std::fmt;

use crate::{app_data::ItemKind, docker_data::InventoryError};

/// app errors to set in gui_state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    DockerConnect,
    Fetch(ItemKind, InventoryError),
    Remove {
        kind: ItemKind,
        id: String,
        source: InventoryError,
    },
    Terminal,
}

/// Convert errors into strings to display
impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DockerConnect => write!(
                f,
                "Docker is not running or unreachable. Please start Docker and try again."
            ),
            Self::Fetch(kind, source) => write!(f, "Unable to list {}s: {source}", kind),
            Self::Remove { kind, id, source } => {
                write!(f, "Failed to remove {kind} {id}: {source}")
            }
            Self::Terminal => write!(f, "Unable to draw to terminal"),
        }
    }
}
