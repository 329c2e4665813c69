use crate::app_data::CleanupItem;

#[derive(Debug, Clone)]
pub enum DockerMessage {
    Cleanup(Vec<CleanupItem>),
    Fetch,
    Quit,
}
