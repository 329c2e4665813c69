use crossterm::event::{KeyCode, KeyModifiers};

use crate::app_data::AppEvent;

/// Translate a keyboard button press into an AppEvent, unknown keys are ignored
pub fn button_press(key_code: KeyCode, key_modifier: KeyModifiers) -> Option<AppEvent> {
    // Always just quit on Ctrl + c/C or q/Q
    let is_c = matches!(key_code, KeyCode::Char('c' | 'C'));
    if is_c && key_modifier.contains(KeyModifiers::CONTROL) {
        return Some(AppEvent::Quit);
    }
    match key_code {
        KeyCode::Char('q' | 'Q') => Some(AppEvent::Quit),
        KeyCode::Up | KeyCode::Char('k' | 'K') => Some(AppEvent::MoveUp),
        KeyCode::Down | KeyCode::Char('j' | 'J') => Some(AppEvent::MoveDown),
        KeyCode::Enter | KeyCode::Char(' ') => Some(AppEvent::ToggleSelection),
        KeyCode::Char('d' | 'D') => Some(AppEvent::TriggerCleanup),
        _ => None,
    }
}
