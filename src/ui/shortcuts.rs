use imgui::{Condition, Ui};
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

use crate::ui::controls::ControlAction;
use crate::ui::display::DisplayElement;

/// Keyboard shortcut manager
pub struct ShortcutManager {
    shortcuts: Vec<Shortcut>,
}

#[derive(Clone)]
pub struct Shortcut {
    pub key: PhysicalKey,
    pub ctrl: bool,
    pub action: ControlAction,
    pub description: &'static str,
}

impl ShortcutManager {
    pub fn new() -> Self {
        let mut manager = Self {
            shortcuts: Vec::new(),
        };
        manager.register_defaults();
        manager
    }

    fn register_defaults(&mut self) {
        // File
        self.register(KeyCode::KeyO, true, ControlAction::OpenFile, "Open Trajectory");
        self.register(KeyCode::KeyQ, true, ControlAction::Quit, "Quit");

        // Playback
        self.register(KeyCode::Space, false, ControlAction::TogglePlay, "Play/Pause");
        self.register(KeyCode::ArrowLeft, false, ControlAction::StepBackward, "Step Backward");
        self.register(KeyCode::ArrowRight, false, ControlAction::StepForward, "Step Forward");
        self.register(KeyCode::KeyR, false, ControlAction::Reset, "Reset");
        self.register(KeyCode::KeyS, false, ControlAction::ToggleRealSpeed, "Toggle Real Speed");

        // View
        let toggles = [
            (KeyCode::Digit1, DisplayElement::Origin, "Toggle Origin"),
            (KeyCode::Digit2, DisplayElement::Velocity, "Toggle Velocity Indicator"),
            (KeyCode::Digit3, DisplayElement::AngularVelocity, "Toggle Angular V Indicator"),
            (KeyCode::Digit4, DisplayElement::Trail, "Toggle Trail"),
        ];
        for (key, element, description) in toggles {
            self.register(key, false, ControlAction::ToggleDisplay(element), description);
        }
    }

    fn register(&mut self, key: KeyCode, ctrl: bool, action: ControlAction, description: &'static str) {
        self.shortcuts.push(Shortcut {
            key: PhysicalKey::Code(key),
            ctrl,
            action,
            description,
        });
    }

    /// Find the action bound to a key and Ctrl state
    pub fn lookup(&self, key: PhysicalKey, ctrl: bool) -> Option<ControlAction> {
        self.shortcuts
            .iter()
            .find(|s| s.key == key && s.ctrl == ctrl)
            .map(|s| s.action)
    }

    /// Process a key event and return the matching action (if any)
    pub fn process_event(&self, event: &KeyEvent, modifiers: ModifiersState) -> Option<ControlAction> {
        if event.state != ElementState::Pressed || (event.repeat && !is_repeatable(event.physical_key)) {
            return None;
        }
        if modifiers.shift_key() || modifiers.alt_key() {
            return None;
        }
        self.lookup(event.physical_key, modifiers.control_key())
    }

    /// Render a shortcuts help window
    pub fn render_help(&self, ui: &Ui, is_open: &mut bool) {
        ui.window("Keyboard Shortcuts")
            .size([320.0, 320.0], Condition::FirstUseEver)
            .position([400.0, 200.0], Condition::FirstUseEver)
            .opened(is_open)
            .build(|| {
                let mut current_category = "";
                for shortcut in &self.shortcuts {
                    let category = category(shortcut.action);
                    if category != current_category {
                        if !current_category.is_empty() {
                            ui.separator();
                        }
                        ui.text(category);
                        current_category = category;
                    }

                    let mut shortcut_str = String::new();
                    if shortcut.ctrl {
                        shortcut_str.push_str("Ctrl+");
                    }
                    shortcut_str.push_str(&key_to_string(shortcut.key));

                    ui.text(format!("  {:10} - {}", shortcut_str, shortcut.description));
                }
            });
    }
}

impl Default for ShortcutManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Stepping keys keep firing while held
fn is_repeatable(key: PhysicalKey) -> bool {
    matches!(
        key,
        PhysicalKey::Code(KeyCode::ArrowLeft) | PhysicalKey::Code(KeyCode::ArrowRight)
    )
}

fn category(action: ControlAction) -> &'static str {
    match action {
        ControlAction::OpenFile | ControlAction::Quit => "File",
        ControlAction::Play
        | ControlAction::Pause
        | ControlAction::TogglePlay
        | ControlAction::StepBackward
        | ControlAction::StepForward
        | ControlAction::Reset
        | ControlAction::SetRealSpeed(_)
        | ControlAction::ToggleRealSpeed => "Playback",
        ControlAction::SetDisplay(..) | ControlAction::ToggleDisplay(_) => "View",
    }
}

fn key_to_string(key: PhysicalKey) -> String {
    match key {
        PhysicalKey::Code(code) => match code {
            KeyCode::Space => "Space".to_string(),
            KeyCode::ArrowLeft => "Left".to_string(),
            KeyCode::ArrowRight => "Right".to_string(),
            KeyCode::Digit1 => "1".to_string(),
            KeyCode::Digit2 => "2".to_string(),
            KeyCode::Digit3 => "3".to_string(),
            KeyCode::Digit4 => "4".to_string(),
            KeyCode::KeyO => "O".to_string(),
            KeyCode::KeyQ => "Q".to_string(),
            KeyCode::KeyR => "R".to_string(),
            KeyCode::KeyS => "S".to_string(),
            _ => format!("{:?}", code),
        },
        _ => "?".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> PhysicalKey {
        PhysicalKey::Code(code)
    }

    #[test]
    fn test_playback_bindings() {
        let manager = ShortcutManager::new();
        assert_eq!(manager.lookup(key(KeyCode::Space), false), Some(ControlAction::TogglePlay));
        assert_eq!(manager.lookup(key(KeyCode::ArrowLeft), false), Some(ControlAction::StepBackward));
        assert_eq!(manager.lookup(key(KeyCode::ArrowRight), false), Some(ControlAction::StepForward));
        assert_eq!(manager.lookup(key(KeyCode::KeyR), false), Some(ControlAction::Reset));
        assert_eq!(manager.lookup(key(KeyCode::KeyS), false), Some(ControlAction::ToggleRealSpeed));
    }

    #[test]
    fn test_ctrl_is_part_of_the_binding() {
        let manager = ShortcutManager::new();
        assert_eq!(manager.lookup(key(KeyCode::KeyO), true), Some(ControlAction::OpenFile));
        assert_eq!(manager.lookup(key(KeyCode::KeyO), false), None);
        assert_eq!(manager.lookup(key(KeyCode::KeyQ), true), Some(ControlAction::Quit));
        assert_eq!(manager.lookup(key(KeyCode::Space), true), None);
    }

    #[test]
    fn test_display_toggles() {
        let manager = ShortcutManager::new();
        assert_eq!(
            manager.lookup(key(KeyCode::Digit4), false),
            Some(ControlAction::ToggleDisplay(DisplayElement::Trail))
        );
        assert_eq!(
            manager.lookup(key(KeyCode::Digit1), false),
            Some(ControlAction::ToggleDisplay(DisplayElement::Origin))
        );
    }

    #[test]
    fn test_unbound_key() {
        let manager = ShortcutManager::new();
        assert_eq!(manager.lookup(key(KeyCode::KeyZ), false), None);
    }

    #[test]
    fn test_categories() {
        assert_eq!(category(ControlAction::Reset), "Playback");
        assert_eq!(category(ControlAction::Quit), "File");
        assert_eq!(category(ControlAction::ToggleDisplay(DisplayElement::Trail)), "View");
    }
}
