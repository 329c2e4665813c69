use std::fmt;

use bollard::models::{ContainerSummary, ImageSummary};

const NONE: &str = "<none>";
const NONE_TAG: &str = "<none>:<none>";
const SHORT_ID_LEN: usize = 12;

/// The two kinds of docker objects that can be listed & removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Image,
    Container,
}

impl ItemKind {
    /// Section title, used for the header rows
    pub const fn title(self) -> &'static str {
        match self {
            Self::Image => "Images",
            Self::Container => "Containers",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let disp = match self {
            Self::Image => "image",
            Self::Container => "container",
        };
        write!(f, "{disp}")
    }
}

/// Remove any `sha256:` prefix, and take the first 12 chars
pub fn short_id(id: &str) -> String {
    id.trim_start_matches("sha256:")
        .chars()
        .take(SHORT_ID_LEN)
        .collect()
}

/// An image as returned by the docker daemon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: String,
    pub tags: Vec<String>,
}

impl From<ImageSummary> for ImageRecord {
    fn from(summary: ImageSummary) -> Self {
        Self {
            id: summary.id,
            tags: summary.repo_tags,
        }
    }
}

impl ImageRecord {
    /// First tag, unless the image is untagged
    fn name(&self) -> &str {
        match self.tags.first() {
            Some(tag) if tag != NONE_TAG && !tag.is_empty() => tag,
            _ => NONE,
        }
    }

    pub fn label(&self) -> String {
        format!("{} (ID: {})", self.name(), short_id(&self.id))
    }
}

/// A container as returned by the docker daemon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRecord {
    pub id: String,
    pub names: Vec<String>,
    pub image: String,
}

impl From<ContainerSummary> for ContainerRecord {
    fn from(summary: ContainerSummary) -> Self {
        Self {
            id: summary.id.unwrap_or_default(),
            names: summary.names.unwrap_or_default(),
            image: summary.image.unwrap_or_default(),
        }
    }
}

impl ContainerRecord {
    /// Docker prefixes container names with a `/`
    fn name(&self) -> &str {
        self.names
            .first()
            .map(|name| name.strip_prefix('/').unwrap_or(name))
            .filter(|name| !name.is_empty())
            .unwrap_or(NONE)
    }

    pub fn label(&self) -> String {
        format!(
            "{} (ID: {}, Image: {})",
            self.name(),
            short_id(&self.id),
            self.image
        )
    }
}

/// A selectable, displayable, docker object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    pub id: String,
    pub kind: ItemKind,
    pub label: String,
}

impl From<&ImageRecord> for InventoryItem {
    fn from(image: &ImageRecord) -> Self {
        Self {
            id: image.id.clone(),
            kind: ItemKind::Image,
            label: image.label(),
        }
    }
}

impl From<&ContainerRecord> for InventoryItem {
    fn from(container: &ContainerRecord) -> Self {
        Self {
            id: container.id.clone(),
            kind: ItemKind::Container,
            label: container.label(),
        }
    }
}

/// A single line in the menu, headers can't be selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayRow {
    Header(ItemKind),
    Item(InventoryItem),
}

impl DisplayRow {
    pub fn item(&self) -> Option<&InventoryItem> {
        match self {
            Self::Header(_) => None,
            Self::Item(item) => Some(item),
        }
    }
}

/// A single object to remove
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupItem {
    pub id: String,
    pub kind: ItemKind,
}

impl From<&InventoryItem> for CleanupItem {
    fn from(item: &InventoryItem) -> Self {
        Self {
            id: item.id.clone(),
            kind: item.kind,
        }
    }
}

/// Count of objects removed in a single cleanup batch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupSummary {
    pub images: usize,
    pub containers: usize,
}

impl CleanupSummary {
    pub fn record(&mut self, kind: ItemKind) {
        match kind {
            ItemKind::Image => self.images += 1,
            ItemKind::Container => self.containers += 1,
        }
    }
}

/// "1 image", "2 containers" etc
fn count(total: usize, kind: ItemKind) -> String {
    if total == 1 {
        format!("{total} {kind}")
    } else {
        format!("{total} {kind}s")
    }
}

impl fmt::Display for CleanupSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let images = count(self.images, ItemKind::Image);
        let containers = count(self.containers, ItemKind::Container);
        match (self.images, self.containers) {
            (0, 0) => write!(f, "Nothing deleted"),
            (_, 0) => write!(f, "Successfully deleted {images}"),
            (0, _) => write!(f, "Successfully deleted {containers}"),
            _ => write!(f, "Successfully deleted {images} and {containers}"),
        }
    }
}
