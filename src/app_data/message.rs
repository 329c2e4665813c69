use crate::app_error::AppError;

use super::{CleanupSummary, ContainerRecord, ImageRecord};

/// Everything that can change AppData, from either the keyboard or the docker task
#[derive(Debug, Clone)]
pub enum AppEvent {
    MoveUp,
    MoveDown,
    ToggleSelection,
    TriggerCleanup,
    ImagesFetched(Vec<ImageRecord>),
    ContainersFetched(Vec<ContainerRecord>),
    CleanupCompleted(CleanupSummary),
    CleanupFailed(AppError),
    FetchFailed(AppError),
    Quit,
}
