//! Top-down field view
//!
//! Draws the recorded robot on a metre grid: body and heading, the trail of
//! samples already played, the velocity vector, the angular-velocity arc and
//! a time readout. All geometry is computed in field metres and mapped to
//! screen pixels through [`FieldTransform`], with world +Y pointing up.

use std::f64::consts::FRAC_PI_2;

use imgui::{Condition, MouseButton, Ui};

use crate::core::Pose;
use crate::playback::TimelineEngine;
use crate::ui::display::DisplayFlags;

/// Screen pixels per field metre at zoom 1.0
pub const PX_PER_METER: f32 = 100.0;

/// Half the side of the drawn field in metres
const FIELD_HALF_SIZE: f64 = 5.0;
/// Side of the robot body in metres
const ROBOT_SIZE: f64 = 0.18;
/// Radius of the angular-velocity arc in metres
const ANGULAR_ARC_RADIUS: f64 = 0.25;
const ANGULAR_ARC_SEGMENTS: usize = 24;

const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 10.0;

const BACKGROUND_COLOR: [f32; 4] = [0.78, 0.78, 0.78, 1.0];
const FIELD_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const GRID_COLOR: [f32; 4] = [0.78, 0.78, 0.78, 1.0];
const TRAIL_COLOR: [f32; 4] = [0.59, 0.59, 0.59, 1.0];
const ROBOT_COLOR: [f32; 4] = [0.85, 0.85, 0.85, 1.0];
const ROBOT_OUTLINE_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const HEADING_COLOR: [f32; 4] = [1.0, 0.6, 0.27, 1.0];
const VELOCITY_COLOR: [f32; 4] = [0.27, 0.6, 1.0, 1.0];
const ANGULAR_COLOR: [f32; 4] = [0.4, 1.0, 0.4, 1.0];
const NO_DATA_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const HUD_COLOR: [f32; 4] = [0.08, 0.08, 0.08, 1.0];

/// Maps field metres to screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldTransform {
    /// Screen position of the field origin
    pub origin: [f32; 2],
    pub px_per_meter: f32,
}

impl FieldTransform {
    pub fn to_screen(&self, x: f64, y: f64) -> [f32; 2] {
        [
            self.origin[0] + x as f32 * self.px_per_meter,
            self.origin[1] - y as f32 * self.px_per_meter,
        ]
    }
}

/// Rotate a body-frame offset by the pose heading and translate it to the pose
pub fn body_to_world(pose: &Pose, dx: f64, dy: f64) -> (f64, f64) {
    let (sin, cos) = pose.heading.sin_cos();
    (pose.x + dx * cos - dy * sin, pose.y + dx * sin + dy * cos)
}

/// Corners of the robot body, counter-clockwise
pub fn robot_outline(pose: &Pose) -> [(f64, f64); 4] {
    let h = ROBOT_SIZE / 2.0;
    [
        body_to_world(pose, h, h),
        body_to_world(pose, -h, h),
        body_to_world(pose, -h, -h),
        body_to_world(pose, h, -h),
    ]
}

/// Heading marker in front of the robot body
pub fn heading_arrow(pose: &Pose) -> [(f64, f64); 3] {
    [
        body_to_world(pose, 0.23, 0.0),
        body_to_world(pose, 0.11, 0.05),
        body_to_world(pose, 0.11, -0.05),
    ]
}

/// Sweep of the angular-velocity arc in radians
///
/// Only counter-clockwise rotation is drawn, capped at a quarter turn.
pub fn angular_sweep(angular_vel: f64) -> f64 {
    angular_vel.clamp(0.0, FRAC_PI_2)
}

/// Points along an arc around `center`, starting at angle `start`
pub fn arc_points(
    center: (f64, f64),
    radius: f64,
    start: f64,
    sweep: f64,
    segments: usize,
) -> Vec<(f64, f64)> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let angle = start + sweep * i as f64 / segments as f64;
            (center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
        })
        .collect()
}

/// Field view state: zoom and pan survive between frames
pub struct FieldView {
    zoom: f32,
    /// Pan offset in screen pixels
    pan: [f32; 2],
}

impl Default for FieldView {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldView {
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            pan: [0.0, 0.0],
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Zoom by mouse wheel notches
    pub fn zoom_by(&mut self, wheel: f32) {
        self.set_zoom(self.zoom * 1.1f32.powf(wheel));
    }

    pub fn reset_view(&mut self) {
        self.zoom = 1.0;
        self.pan = [0.0, 0.0];
    }

    /// Transform for a canvas spanning `pos_min..pos_max`
    pub fn transform(&self, pos_min: [f32; 2], pos_max: [f32; 2]) -> FieldTransform {
        FieldTransform {
            origin: [
                (pos_min[0] + pos_max[0]) / 2.0 + self.pan[0],
                (pos_min[1] + pos_max[1]) / 2.0 + self.pan[1],
            ],
            px_per_meter: PX_PER_METER * self.zoom,
        }
    }

    pub fn render(&mut self, ui: &Ui, engine: &TimelineEngine, flags: &DisplayFlags) {
        ui.window("Field")
            .size([900.0, 700.0], Condition::FirstUseEver)
            .position([10.0, 30.0], Condition::FirstUseEver)
            .build(|| {
                self.render_content(ui, engine, flags);
            });
    }

    fn render_content(&mut self, ui: &Ui, engine: &TimelineEngine, flags: &DisplayFlags) {
        let avail = ui.content_region_avail();
        let size = [avail[0].max(50.0), avail[1].max(50.0)];
        let pos_min = ui.cursor_screen_pos();
        let pos_max = [pos_min[0] + size[0], pos_min[1] + size[1]];

        ui.invisible_button("field_canvas", size);
        self.handle_input(ui);

        let t = self.transform(pos_min, pos_max);
        let draw_list = ui.get_window_draw_list();

        draw_list.with_clip_rect_intersect(pos_min, pos_max, || {
            draw_list.add_rect(pos_min, pos_max, BACKGROUND_COLOR).filled(true).build();
            draw_field(&draw_list, &t);

            if flags.origin {
                draw_origin_axes(&draw_list, &t);
            }

            if engine.has_data() {
                if flags.trail {
                    draw_trail(&draw_list, &t, engine);
                }
            } else {
                draw_list.add_text(t.to_screen(0.0, 0.5), NO_DATA_COLOR, "No trajectory data");
            }

            let pose = engine.pose();
            draw_robot(&draw_list, &t, &pose);

            if engine.has_data() {
                if flags.velocity {
                    let v = engine.current_velocity();
                    draw_list
                        .add_line(
                            t.to_screen(pose.x, pose.y),
                            t.to_screen(pose.x + v.x, pose.y + v.y),
                            VELOCITY_COLOR,
                        )
                        .thickness(3.0)
                        .build();
                }
                if flags.angular_velocity {
                    let sweep = angular_sweep(engine.current_angular_velocity());
                    if sweep > 0.0 {
                        let points: Vec<[f32; 2]> = arc_points(
                            (pose.x, pose.y),
                            ANGULAR_ARC_RADIUS,
                            pose.heading,
                            sweep,
                            ANGULAR_ARC_SEGMENTS,
                        )
                        .into_iter()
                        .map(|(x, y)| t.to_screen(x, y))
                        .collect();
                        draw_list.add_polyline(points, ANGULAR_COLOR).thickness(3.0).build();
                    }
                }
            }

            draw_hud(&draw_list, pos_min, engine, self.zoom());
        });
    }

    fn handle_input(&mut self, ui: &Ui) {
        if !ui.is_item_hovered() {
            return;
        }

        let wheel = ui.io().mouse_wheel;
        if wheel != 0.0 {
            self.zoom_by(wheel);
        }

        if ui.is_mouse_dragging(MouseButton::Right) || ui.is_mouse_dragging(MouseButton::Middle) {
            let delta = ui.io().mouse_delta;
            self.pan[0] += delta[0];
            self.pan[1] += delta[1];
        }

        if ui.is_mouse_double_clicked(MouseButton::Middle) {
            self.reset_view();
        }
    }
}

fn draw_field(draw_list: &imgui::DrawListMut, t: &FieldTransform) {
    draw_list
        .add_rect(
            t.to_screen(-FIELD_HALF_SIZE, FIELD_HALF_SIZE),
            t.to_screen(FIELD_HALF_SIZE, -FIELD_HALF_SIZE),
            FIELD_COLOR,
        )
        .filled(true)
        .build();

    let n = FIELD_HALF_SIZE as i32;
    for i in -n..=n {
        let v = i as f64;
        draw_list
            .add_line(t.to_screen(v, -FIELD_HALF_SIZE), t.to_screen(v, FIELD_HALF_SIZE), GRID_COLOR)
            .build();
        draw_list
            .add_line(t.to_screen(-FIELD_HALF_SIZE, v), t.to_screen(FIELD_HALF_SIZE, v), GRID_COLOR)
            .build();
    }
}

fn draw_origin_axes(draw_list: &imgui::DrawListMut, t: &FieldTransform) {
    draw_list
        .add_line(t.to_screen(0.0, 0.0), t.to_screen(1.0, 0.0), [1.0, 0.0, 0.0, 1.0])
        .thickness(3.0)
        .build();
    draw_list
        .add_line(t.to_screen(0.0, 0.0), t.to_screen(0.0, 1.0), [0.0, 1.0, 0.0, 1.0])
        .thickness(3.0)
        .build();
}

fn draw_trail(draw_list: &imgui::DrawListMut, t: &FieldTransform, engine: &TimelineEngine) {
    let points: Vec<[f32; 2]> = engine.trail().map(|(x, y)| t.to_screen(x, y)).collect();
    if points.len() < 2 {
        return;
    }
    draw_list.add_polyline(points, TRAIL_COLOR).thickness(4.0).build();
}

fn draw_robot(draw_list: &imgui::DrawListMut, t: &FieldTransform, pose: &Pose) {
    let body: Vec<[f32; 2]> = robot_outline(pose).iter().map(|&(x, y)| t.to_screen(x, y)).collect();
    draw_list.add_polyline(body.clone(), ROBOT_COLOR).filled(true).build();

    let mut outline = body;
    if let Some(&first) = outline.first() {
        outline.push(first);
    }
    draw_list.add_polyline(outline, ROBOT_OUTLINE_COLOR).thickness(1.5).build();

    let [tip, left, right] = heading_arrow(pose);
    draw_list
        .add_triangle(
            t.to_screen(tip.0, tip.1),
            t.to_screen(left.0, left.1),
            t.to_screen(right.0, right.1),
            HEADING_COLOR,
        )
        .filled(true)
        .build();
}

fn draw_hud(draw_list: &imgui::DrawListMut, pos_min: [f32; 2], engine: &TimelineEngine, zoom: f32) {
    let x = pos_min[0] + 10.0;
    let y = pos_min[1] + 8.0;
    draw_list.add_text([x, y], HUD_COLOR, format!("Time: {:.1}s", engine.current_time()));
    draw_list.add_text(
        [x, y + 16.0],
        HUD_COLOR,
        format!("Frame: {} / {}", engine.frame(), engine.frame_count()),
    );
    let mode = if engine.is_real_speed() { "real speed" } else { "free run" };
    draw_list.add_text(
        [x, y + 32.0],
        HUD_COLOR,
        format!("{} ({})", engine.status().label(), mode),
    );
    if engine.has_data() {
        draw_list.add_text(
            [x, y + 48.0],
            HUD_COLOR,
            format!("Speed: {:.2} m/s", engine.current_velocity().speed()),
        );
    }
    draw_list.add_text([x, y + 64.0], HUD_COLOR, format!("Zoom: {:.0}%", zoom * 100.0));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn test_to_screen_flips_y() {
        let t = FieldTransform {
            origin: [400.0, 300.0],
            px_per_meter: 100.0,
        };
        assert_eq!(t.to_screen(0.0, 0.0), [400.0, 300.0]);
        assert_eq!(t.to_screen(1.0, 0.0), [500.0, 300.0]);
        assert_eq!(t.to_screen(0.0, 1.0), [400.0, 200.0]);
        assert_eq!(t.to_screen(-0.5, -2.0), [350.0, 500.0]);
    }

    #[test]
    fn test_transform_centres_canvas_and_applies_zoom() {
        let mut view = FieldView::new();
        let t = view.transform([0.0, 0.0], [800.0, 600.0]);
        assert_eq!(t.origin, [400.0, 300.0]);
        assert_eq!(t.px_per_meter, PX_PER_METER);

        view.set_zoom(2.0);
        assert_eq!(view.transform([0.0, 0.0], [800.0, 600.0]).px_per_meter, PX_PER_METER * 2.0);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut view = FieldView::new();
        view.set_zoom(100.0);
        assert_eq!(view.zoom(), MAX_ZOOM);
        view.set_zoom(0.0);
        assert_eq!(view.zoom(), MIN_ZOOM);

        view.reset_view();
        view.zoom_by(1.0);
        assert!(view.zoom() > 1.0);
        view.zoom_by(-2.0);
        assert!(view.zoom() < 1.0);
    }

    #[test]
    fn test_body_to_world_rotates_with_heading() {
        let pose = Pose {
            x: 1.0,
            y: 2.0,
            heading: FRAC_PI_2,
        };
        assert!(close(body_to_world(&pose, 1.0, 0.0), (1.0, 3.0)));
        assert!(close(body_to_world(&pose, 0.0, 1.0), (0.0, 2.0)));
    }

    #[test]
    fn test_robot_outline_is_centred_on_pose() {
        let pose = Pose {
            x: 2.0,
            y: -1.0,
            heading: 0.3,
        };
        let corners = robot_outline(&pose);
        let cx = corners.iter().map(|c| c.0).sum::<f64>() / 4.0;
        let cy = corners.iter().map(|c| c.1).sum::<f64>() / 4.0;
        assert!(close((cx, cy), (2.0, -1.0)));
    }

    #[test]
    fn test_heading_arrow_points_forward() {
        let [tip, ..] = heading_arrow(&Pose::ORIGIN);
        assert!(close(tip, (0.23, 0.0)));
    }

    #[test]
    fn test_angular_sweep_clamps() {
        assert_eq!(angular_sweep(-1.0), 0.0);
        assert_eq!(angular_sweep(0.5), 0.5);
        assert_eq!(angular_sweep(10.0), FRAC_PI_2);
    }

    #[test]
    fn test_arc_points_span_sweep() {
        let points = arc_points((0.0, 0.0), 1.0, 0.0, FRAC_PI_2, 4);
        assert_eq!(points.len(), 5);
        assert!(close(points[0], (1.0, 0.0)));
        assert!(close(points[4], (0.0, 1.0)));
    }
}
