use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::{app_error::AppError, docker_data::DockerMessage};

mod inventory;
mod message;

pub use inventory::*;
pub use message::AppEvent;

/// The selection state, owned by the ui loop, and only ever mutated via `update()`
#[derive(Debug, Default, Clone)]
pub struct AppData {
    images: Vec<ImageRecord>,
    containers: Vec<ContainerRecord>,
    rows: Vec<DisplayRow>,
    cursor: usize,
    selected: BTreeSet<usize>,
    cleaning: bool,
    error: Option<AppError>,
    success: Option<String>,
}

impl AppData {
    /// Apply a single event, returning a message for the docker task if one needs to be sent
    pub fn update(&mut self, event: AppEvent) -> Option<DockerMessage> {
        match event {
            AppEvent::MoveUp => self.previous(),
            AppEvent::MoveDown => self.next(),
            AppEvent::ToggleSelection => self.toggle(),
            AppEvent::TriggerCleanup => return self.trigger_cleanup(),
            AppEvent::ImagesFetched(images) => {
                self.images = images;
                self.rebuild_rows();
            }
            AppEvent::ContainersFetched(containers) => {
                self.containers = containers;
                self.rebuild_rows();
            }
            AppEvent::CleanupCompleted(summary) => {
                self.cleaning = false;
                self.selected.clear();
                self.error = None;
                self.success = Some(summary.to_string());
                return Some(DockerMessage::Fetch);
            }
            AppEvent::CleanupFailed(error) => {
                self.set_error(error);
                // Some of the batch may have been removed before the failure
                return Some(DockerMessage::Fetch);
            }
            AppEvent::FetchFailed(error) => self.set_error(error),
            AppEvent::Quit => return Some(DockerMessage::Quit),
        }
        None
    }

    /// Getters for the renderer

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub const fn is_cleaning(&self) -> bool {
        self.cleaning
    }

    pub const fn get_error(&self) -> Option<&AppError> {
        self.error.as_ref()
    }

    pub fn get_success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// Cursor related methods

    fn previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn next(&mut self) {
        if self.cursor + 1 < self.rows.len() {
            self.cursor += 1;
        }
    }

    /// Flip selection of the current row, headers can't be selected
    fn toggle(&mut self) {
        if let Some(DisplayRow::Item(_)) = self.rows.get(self.cursor) {
            if !self.selected.remove(&self.cursor) {
                self.selected.insert(self.cursor);
            }
        }
    }

    /// Selected items, in row order
    fn selection_for_cleanup(&self) -> Vec<CleanupItem> {
        self.selected
            .iter()
            .filter_map(|index| self.rows.get(*index).and_then(DisplayRow::item))
            .map(CleanupItem::from)
            .collect()
    }

    fn trigger_cleanup(&mut self) -> Option<DockerMessage> {
        if self.cleaning || self.selected.is_empty() {
            return None;
        }
        let items = self.selection_for_cleanup();
        debug!("cleanup requested for {} items", items.len());
        self.error = None;
        self.success = None;
        self.cleaning = true;
        Some(DockerMessage::Cleanup(items))
    }

    /// Error & success messages are mutually exclusive
    fn set_error(&mut self, error: AppError) {
        self.cleaning = false;
        self.success = None;
        self.error = Some(error);
    }

    /// Replace all rows, images always before containers, in the order the daemon returned them.
    /// Any selection is carried over by id, and the cursor is kept in bounds
    fn rebuild_rows(&mut self) {
        let selected_ids = self
            .selected
            .iter()
            .filter_map(|index| self.rows.get(*index).and_then(DisplayRow::item))
            .map(|item| item.id.clone())
            .collect::<HashSet<_>>();

        let mut rows = Vec::with_capacity(self.images.len() + self.containers.len() + 2);
        rows.push(DisplayRow::Header(ItemKind::Image));
        rows.extend(
            self.images
                .iter()
                .map(|i| DisplayRow::Item(InventoryItem::from(i))),
        );
        rows.push(DisplayRow::Header(ItemKind::Container));
        rows.extend(
            self.containers
                .iter()
                .map(|i| DisplayRow::Item(InventoryItem::from(i))),
        );

        self.selected = rows
            .iter()
            .enumerate()
            .filter_map(|(index, row)| {
                row.item()
                    .filter(|item| selected_ids.contains(&item.id))
                    .map(|_| index)
            })
            .collect();
        self.cursor = self.cursor.min(rows.len().saturating_sub(1));
        self.rows = rows;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docker_data::InventoryError;

    fn image(id: &str) -> ImageRecord {
        ImageRecord {
            id: id.to_owned(),
            tags: vec![format!("{id}:latest")],
        }
    }

    fn container(id: &str) -> ContainerRecord {
        ContainerRecord {
            id: id.to_owned(),
            names: vec![format!("/{id}")],
            image: "alpine".to_owned(),
        }
    }

    /// rows = [Header(Images), A, Header(Containers), B]
    fn gen_app_data() -> AppData {
        let mut app_data = AppData::default();
        app_data.update(AppEvent::ImagesFetched(vec![image("A")]));
        app_data.update(AppEvent::ContainersFetched(vec![container("B")]));
        app_data
    }

    fn ids(app_data: &AppData) -> Vec<Option<String>> {
        app_data
            .rows()
            .iter()
            .map(|row| row.item().map(|item| item.id.clone()))
            .collect()
    }

    fn fetch_error() -> AppError {
        AppError::Fetch(
            ItemKind::Image,
            InventoryError::Connection("connection refused".to_owned()),
        )
    }

    #[test]
    fn initial_state_empty() {
        let app_data = AppData::default();
        assert!(app_data.rows().is_empty());
        assert_eq!(app_data.cursor(), 0);
        assert!(!app_data.is_cleaning());
        assert!(app_data.get_error().is_none());
        assert!(app_data.get_success().is_none());
    }

    #[test]
    fn rows_grouped_in_input_order() {
        let mut app_data = AppData::default();
        app_data.update(AppEvent::ContainersFetched(vec![
            container("c2"),
            container("c1"),
        ]));
        app_data.update(AppEvent::ImagesFetched(vec![
            image("i3"),
            image("i1"),
            image("i2"),
        ]));
        assert_eq!(
            app_data.rows()[0],
            DisplayRow::Header(ItemKind::Image)
        );
        assert_eq!(
            app_data.rows()[4],
            DisplayRow::Header(ItemKind::Container)
        );
        assert_eq!(
            ids(&app_data),
            vec![
                None,
                Some("i3".to_owned()),
                Some("i1".to_owned()),
                Some("i2".to_owned()),
                None,
                Some("c2".to_owned()),
                Some("c1".to_owned()),
            ]
        );
    }

    #[test]
    fn empty_fetch_still_has_headers() {
        let mut app_data = AppData::default();
        app_data.update(AppEvent::ImagesFetched(vec![]));
        assert_eq!(
            app_data.rows(),
            &[
                DisplayRow::Header(ItemKind::Image),
                DisplayRow::Header(ItemKind::Container)
            ]
        );
    }

    #[test]
    fn move_up_at_header_stays() {
        let mut app_data = gen_app_data();
        assert_eq!(app_data.cursor(), 0);
        assert!(app_data.update(AppEvent::MoveUp).is_none());
        assert_eq!(app_data.cursor(), 0);
    }

    #[test]
    fn cursor_always_in_bounds() {
        let mut app_data = gen_app_data();
        let len = app_data.rows().len();
        let moves = [
            AppEvent::MoveDown,
            AppEvent::MoveDown,
            AppEvent::MoveDown,
            AppEvent::MoveDown,
            AppEvent::MoveDown,
            AppEvent::MoveUp,
            AppEvent::MoveDown,
            AppEvent::MoveUp,
            AppEvent::MoveUp,
            AppEvent::MoveUp,
            AppEvent::MoveUp,
            AppEvent::MoveUp,
        ];
        for event in moves {
            app_data.update(event);
            assert!(app_data.cursor() < len);
        }
        assert_eq!(app_data.cursor(), 0);

        for _ in 0..10 {
            app_data.update(AppEvent::MoveDown);
        }
        assert_eq!(app_data.cursor(), len - 1);
    }

    #[test]
    fn move_on_empty_rows() {
        let mut app_data = AppData::default();
        app_data.update(AppEvent::MoveDown);
        assert_eq!(app_data.cursor(), 0);
        app_data.update(AppEvent::MoveUp);
        assert_eq!(app_data.cursor(), 0);
        app_data.update(AppEvent::ToggleSelection);
        assert!(app_data.update(AppEvent::TriggerCleanup).is_none());
    }

    #[test]
    fn toggle_on_header_is_noop() {
        let mut app_data = gen_app_data();
        app_data.update(AppEvent::ToggleSelection);
        assert!(!app_data.is_selected(0));

        app_data.update(AppEvent::MoveDown);
        app_data.update(AppEvent::MoveDown);
        app_data.update(AppEvent::ToggleSelection);
        assert!(!app_data.is_selected(2));
        assert!(app_data.selected.is_empty());
    }

    #[test]
    fn toggle_flips_selection() {
        let mut app_data = gen_app_data();
        app_data.update(AppEvent::MoveDown);
        app_data.update(AppEvent::ToggleSelection);
        assert!(app_data.is_selected(1));
        app_data.update(AppEvent::ToggleSelection);
        assert!(!app_data.is_selected(1));
    }

    #[test]
    fn trigger_cleanup_empty_selection_noop() {
        let mut app_data = gen_app_data();
        assert!(app_data.update(AppEvent::TriggerCleanup).is_none());
        assert!(!app_data.is_cleaning());
    }

    #[test]
    fn trigger_cleanup_emits_selected_items() {
        let mut app_data = gen_app_data();
        app_data.update(AppEvent::MoveDown);
        app_data.update(AppEvent::ToggleSelection);
        app_data.update(AppEvent::MoveDown);
        app_data.update(AppEvent::MoveDown);
        app_data.update(AppEvent::ToggleSelection);
        assert_eq!(app_data.selected, BTreeSet::from([1, 3]));

        let message = app_data.update(AppEvent::TriggerCleanup);
        let Some(DockerMessage::Cleanup(items)) = message else {
            panic!("expected a cleanup message");
        };
        assert_eq!(items.len(), 2);
        assert!(items.contains(&CleanupItem {
            id: "A".to_owned(),
            kind: ItemKind::Image
        }));
        assert!(items.contains(&CleanupItem {
            id: "B".to_owned(),
            kind: ItemKind::Container
        }));
        assert!(app_data.is_cleaning());
    }

    #[test]
    fn trigger_cleanup_clears_messages() {
        let mut app_data = gen_app_data();
        app_data.update(AppEvent::FetchFailed(fetch_error()));
        app_data.update(AppEvent::MoveDown);
        app_data.update(AppEvent::ToggleSelection);
        app_data.update(AppEvent::TriggerCleanup);
        assert!(app_data.get_error().is_none());
        assert!(app_data.get_success().is_none());
    }

    #[test]
    fn trigger_cleanup_ignored_while_cleaning() {
        let mut app_data = gen_app_data();
        app_data.update(AppEvent::MoveDown);
        app_data.update(AppEvent::ToggleSelection);
        assert!(app_data.update(AppEvent::TriggerCleanup).is_some());
        assert!(app_data.update(AppEvent::TriggerCleanup).is_none());
        // navigation still works
        app_data.update(AppEvent::MoveDown);
        assert_eq!(app_data.cursor(), 2);
    }

    #[test]
    fn cleanup_completed_resets_and_refetches() {
        let mut app_data = gen_app_data();
        app_data.update(AppEvent::MoveDown);
        app_data.update(AppEvent::ToggleSelection);
        app_data.update(AppEvent::MoveDown);
        app_data.update(AppEvent::MoveDown);
        app_data.update(AppEvent::ToggleSelection);
        app_data.update(AppEvent::TriggerCleanup);

        let message = app_data.update(AppEvent::CleanupCompleted(CleanupSummary {
            images: 1,
            containers: 1,
        }));
        assert!(matches!(message, Some(DockerMessage::Fetch)));
        assert!(app_data.selected.is_empty());
        assert!(!app_data.is_cleaning());
        assert!(app_data.get_error().is_none());
        assert_eq!(
            app_data.get_success(),
            Some("Successfully deleted 1 image and 1 container")
        );
    }

    #[test]
    fn cleanup_failed_sets_error() {
        let mut app_data = gen_app_data();
        app_data.update(AppEvent::CleanupCompleted(CleanupSummary {
            images: 2,
            containers: 0,
        }));
        app_data.update(AppEvent::MoveDown);
        app_data.update(AppEvent::ToggleSelection);
        app_data.update(AppEvent::TriggerCleanup);

        let error = AppError::Remove {
            kind: ItemKind::Image,
            id: "A".to_owned(),
            source: InventoryError::Daemon("conflict".to_owned()),
        };
        let message = app_data.update(AppEvent::CleanupFailed(error.clone()));
        assert!(matches!(message, Some(DockerMessage::Fetch)));
        assert!(!app_data.is_cleaning());
        assert_eq!(app_data.get_error(), Some(&error));
        assert!(app_data.get_success().is_none());
        assert!(app_data.is_selected(1));
    }

    #[test]
    fn fetch_failed_replaces_success() {
        let mut app_data = gen_app_data();
        app_data.update(AppEvent::CleanupCompleted(CleanupSummary {
            images: 0,
            containers: 1,
        }));
        assert!(app_data.get_success().is_some());
        assert!(app_data.update(AppEvent::FetchFailed(fetch_error())).is_none());
        assert_eq!(app_data.get_error(), Some(&fetch_error()));
        assert!(app_data.get_success().is_none());
    }

    #[test]
    fn refetch_keeps_selection_by_id() {
        let mut app_data = AppData::default();
        app_data.update(AppEvent::ImagesFetched(vec![image("i1"), image("i2")]));
        app_data.update(AppEvent::ContainersFetched(vec![container("c1")]));
        // select i2 (index 2) & c1 (index 4)
        app_data.update(AppEvent::MoveDown);
        app_data.update(AppEvent::MoveDown);
        app_data.update(AppEvent::ToggleSelection);
        app_data.update(AppEvent::MoveDown);
        app_data.update(AppEvent::MoveDown);
        app_data.update(AppEvent::ToggleSelection);
        assert_eq!(app_data.selected, BTreeSet::from([2, 4]));

        // i1 removed elsewhere, so everything shifts up by one
        app_data.update(AppEvent::ImagesFetched(vec![image("i2")]));
        assert_eq!(app_data.selected, BTreeSet::from([1, 3]));
        assert_eq!(app_data.cursor(), 3);
    }

    #[test]
    fn refetch_clamps_cursor_and_drops_missing() {
        let mut app_data = AppData::default();
        app_data.update(AppEvent::ImagesFetched(vec![image("i1")]));
        app_data.update(AppEvent::ContainersFetched(vec![
            container("c1"),
            container("c2"),
        ]));
        for _ in 0..4 {
            app_data.update(AppEvent::MoveDown);
        }
        app_data.update(AppEvent::ToggleSelection);
        assert_eq!(app_data.cursor(), 4);

        app_data.update(AppEvent::ContainersFetched(vec![]));
        assert_eq!(app_data.rows().len(), 3);
        assert_eq!(app_data.cursor(), 2);
        assert!(app_data.selected.is_empty());
    }

    #[test]
    fn quit_sends_quit() {
        let mut app_data = gen_app_data();
        assert!(matches!(
            app_data.update(AppEvent::Quit),
            Some(DockerMessage::Quit)
        ));
    }
}
