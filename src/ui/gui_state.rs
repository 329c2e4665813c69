use std::{collections::HashSet, fmt};

use uuid::Uuid;

/// State for the loading animation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Loading {
    #[default]
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
}

impl Loading {
    pub const fn next(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::Three,
            Self::Three => Self::Four,
            Self::Four => Self::Five,
            Self::Five => Self::Six,
            Self::Six => Self::Seven,
            Self::Seven => Self::Eight,
            Self::Eight => Self::Nine,
            Self::Nine => Self::Ten,
            Self::Ten => Self::One,
        }
    }
}

impl fmt::Display for Loading {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let disp = match self {
            Self::One => '⠋',
            Self::Two => '⠙',
            Self::Three => '⠹',
            Self::Four => '⠸',
            Self::Five => '⠼',
            Self::Six => '⠴',
            Self::Seven => '⠦',
            Self::Eight => '⠧',
            Self::Nine => '⠇',
            Self::Ten => '⠏',
        };
        write!(f, "{disp}")
    }
}

/// The application gui state can be in multiple of these states at the same time
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Status {
    /// No docker data has been received yet
    Init,
    DockerConnect,
}

/// Shared between the ui loop & the docker task, stored in an Arc<Mutex>
#[derive(Debug, Default, Clone)]
pub struct GuiState {
    is_loading: HashSet<Uuid>,
    loading_icon: Loading,
    status: HashSet<Status>,
}

impl GuiState {
    /// Check if the current gui_status contains any of the given status'
    pub fn status_contains(&self, status: &[Status]) -> bool {
        status.iter().any(|i| self.status.contains(i))
    }

    /// Remove a gui_status from the current gui_status HashSet
    pub fn status_del(&mut self, status: Status) {
        self.status.remove(&status);
    }

    /// Insert a gui_status into the current gui_status HashSet
    pub fn status_push(&mut self, status: Status) {
        self.status.insert(status);
    }

    /// Insert a new loading_uuid into HashSet, and advance the animation by one frame
    pub fn next_loading(&mut self, uuid: Uuid) {
        self.loading_icon = self.loading_icon.next();
        self.is_loading.insert(uuid);
    }

    /// Advance the animation, only if something is currently loading
    pub fn tick_loading(&mut self) {
        if !self.is_loading.is_empty() {
            self.loading_icon = self.loading_icon.next();
        }
    }

    /// If is_loading has any entries, return the current loading_icon, else an empty string, which needs to take up the same space, hence ' '
    pub fn get_loading(&self) -> String {
        if self.is_loading.is_empty() {
            String::from(" ")
        } else {
            self.loading_icon.to_string()
        }
    }

    /// Remove a loading_uuid from the is_loading HashSet
    pub fn remove_loading(&mut self, uuid: Uuid) {
        self.is_loading.remove(&uuid);
    }
}
