use std::time::Instant;

use imgui::{Condition, ProgressBar, TreeNodeFlags, Ui};

use crate::playback::TimelineEngine;
use crate::ui::display::{DisplayElement, DisplayFlags};

/// A user request coming from a button, checkbox or shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Play,
    Pause,
    TogglePlay,
    StepBackward,
    StepForward,
    Reset,
    SetRealSpeed(bool),
    ToggleRealSpeed,
    SetDisplay(DisplayElement, bool),
    ToggleDisplay(DisplayElement),
    OpenFile,
    Quit,
}

/// Follow-up the application shell has to carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    None,
    OpenFile,
    Quit,
}

/// Route a control action to the engine or the display flags
pub fn apply_action(
    action: ControlAction,
    engine: &mut TimelineEngine,
    flags: &mut DisplayFlags,
    now: Instant,
) -> AppCommand {
    match action {
        ControlAction::Play => engine.play(),
        ControlAction::Pause => engine.pause(),
        ControlAction::TogglePlay => engine.toggle_playing(),
        ControlAction::StepBackward => engine.step_backward(),
        ControlAction::StepForward => engine.step_forward(),
        ControlAction::Reset => engine.reset(now),
        ControlAction::SetRealSpeed(real) => engine.set_real_speed(real),
        ControlAction::ToggleRealSpeed => engine.set_real_speed(!engine.is_real_speed()),
        ControlAction::SetDisplay(element, enabled) => flags.set(element, enabled),
        ControlAction::ToggleDisplay(element) => flags.toggle(element),
        ControlAction::OpenFile => return AppCommand::OpenFile,
        ControlAction::Quit => return AppCommand::Quit,
    }
    AppCommand::None
}

/// "Replay" and "Visual" control window
pub struct ControlPanel {
    width: f32,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self { width: 220.0 }
    }

    /// Draw the panel and return the actions the user triggered this frame
    pub fn render(
        &self,
        ui: &Ui,
        is_open: &mut bool,
        engine: &TimelineEngine,
        flags: &DisplayFlags,
    ) -> Vec<ControlAction> {
        let mut actions = Vec::new();
        let display_size = ui.io().display_size;

        ui.window("Controls")
            .size([self.width, 300.0], Condition::FirstUseEver)
            .position([display_size[0] - self.width - 10.0, 30.0], Condition::FirstUseEver)
            .opened(is_open)
            .build(|| {
                if ui.collapsing_header("Replay", TreeNodeFlags::DEFAULT_OPEN) {
                    self.render_replay(ui, engine, &mut actions);
                }
                if ui.collapsing_header("Visual", TreeNodeFlags::DEFAULT_OPEN) {
                    render_visual(ui, flags, &mut actions);
                }
            });

        actions
    }

    fn render_replay(&self, ui: &Ui, engine: &TimelineEngine, actions: &mut Vec<ControlAction>) {
        let spacing = ui.clone_style().item_spacing[0];
        let avail = ui.content_region_avail()[0];
        let button_width = ((avail - spacing * 4.0) / 5.0).max(24.0);

        let buttons = [
            ("Play", ControlAction::Play),
            ("Pause", ControlAction::Pause),
            ("<", ControlAction::StepBackward),
            (">", ControlAction::StepForward),
            ("Reset", ControlAction::Reset),
        ];
        for (i, (label, action)) in buttons.into_iter().enumerate() {
            if i > 0 {
                ui.same_line();
            }
            if ui.button_with_size(label, [button_width, 0.0]) {
                actions.push(action);
            }
        }

        let mut real_speed = engine.is_real_speed();
        if ui.checkbox("Real speed", &mut real_speed) {
            actions.push(ControlAction::SetRealSpeed(real_speed));
        }

        ui.separator();
        ui.text(format!("Status: {}", engine.status().label()));
        ui.text(format!("Frame: {} / {}", engine.frame(), engine.frame_count()));
        ui.text(format!(
            "Time: {:.2}s / {:.2}s",
            engine.current_time(),
            engine.samples().duration()
        ));
        ProgressBar::new(engine.progress())
            .size([-1.0, 0.0])
            .overlay_text(format!("{:.0}%", engine.progress() * 100.0))
            .build(ui);
    }
}

fn render_visual(ui: &Ui, flags: &DisplayFlags, actions: &mut Vec<ControlAction>) {
    for &element in DisplayElement::all() {
        let mut enabled = flags.is_enabled(element);
        if ui.checkbox(element.label(), &mut enabled) {
            actions.push(ControlAction::SetDisplay(element, enabled));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Sample, SampleBuffer};
    use std::sync::Arc;

    fn engine(frames: usize) -> TimelineEngine {
        let samples: SampleBuffer = (0..frames)
            .map(|i| Sample {
                time: i as f64,
                pos_x: i as f64,
                pos_y: 0.0,
                heading: 0.0,
                vel_x: 0.0,
                vel_y: 0.0,
                angular_vel: 0.0,
            })
            .collect();
        TimelineEngine::new(Arc::new(samples), Instant::now())
    }

    #[test]
    fn test_playback_actions_reach_engine() {
        let mut engine = engine(3);
        let mut flags = DisplayFlags::default();
        let now = Instant::now();

        assert_eq!(apply_action(ControlAction::Play, &mut engine, &mut flags, now), AppCommand::None);
        assert!(engine.is_playing());

        apply_action(ControlAction::StepForward, &mut engine, &mut flags, now);
        apply_action(ControlAction::StepForward, &mut engine, &mut flags, now);
        apply_action(ControlAction::StepBackward, &mut engine, &mut flags, now);
        assert_eq!(engine.frame(), 1);

        apply_action(ControlAction::Pause, &mut engine, &mut flags, now);
        assert!(!engine.is_playing());

        apply_action(ControlAction::TogglePlay, &mut engine, &mut flags, now);
        assert!(engine.is_playing());

        apply_action(ControlAction::Reset, &mut engine, &mut flags, now);
        assert_eq!(engine.frame(), 0);
        assert!(engine.is_playing());
    }

    #[test]
    fn test_speed_mode_actions() {
        let mut engine = engine(1);
        let mut flags = DisplayFlags::default();
        let now = Instant::now();

        apply_action(ControlAction::SetRealSpeed(true), &mut engine, &mut flags, now);
        assert!(engine.is_real_speed());
        apply_action(ControlAction::ToggleRealSpeed, &mut engine, &mut flags, now);
        assert!(!engine.is_real_speed());
    }

    #[test]
    fn test_display_actions_leave_engine_alone() {
        let mut engine = engine(2);
        let mut flags = DisplayFlags::default();
        let now = Instant::now();

        apply_action(
            ControlAction::SetDisplay(DisplayElement::Velocity, false),
            &mut engine,
            &mut flags,
            now,
        );
        apply_action(
            ControlAction::ToggleDisplay(DisplayElement::Trail),
            &mut engine,
            &mut flags,
            now,
        );

        assert!(!flags.velocity);
        assert!(!flags.trail);
        assert!(flags.origin);
        assert_eq!(engine.frame(), 0);
        assert!(!engine.is_playing());
    }

    #[test]
    fn test_shell_commands_are_returned() {
        let mut engine = engine(0);
        let mut flags = DisplayFlags::default();
        let now = Instant::now();

        assert_eq!(
            apply_action(ControlAction::OpenFile, &mut engine, &mut flags, now),
            AppCommand::OpenFile
        );
        assert_eq!(
            apply_action(ControlAction::Quit, &mut engine, &mut flags, now),
            AppCommand::Quit
        );
    }
}
