pub mod controls;
pub mod dialogs;
pub mod display;
pub mod field_view;
pub mod shortcuts;

pub use controls::{apply_action, AppCommand, ControlAction, ControlPanel};
pub use dialogs::FileDialogs;
pub use display::{DisplayElement, DisplayFlags};
pub use field_view::FieldView;
pub use shortcuts::ShortcutManager;
