use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::area::GestureKind;
use crate::geometry::Axis;
use crate::scene::Scene;
use crate::snap::Side;
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

pub struct StatusBar {
    left: String,
    right: String,
    style: Style,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            left: String::new(),
            right: String::new(),
            style: Style::default()
                .fg(crate::theme::status_fg())
                .bg(crate::theme::status_bg()),
        }
    }

    pub fn set_left<T: Into<String>>(&mut self, value: T) {
        self.left = value.into();
    }

    pub fn set_right<T: Into<String>>(&mut self, value: T) {
        self.right = value.into();
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn right(&self) -> &str {
        &self.right
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    /// Describe the scene: counts and threshold on the left, the running
    /// gesture on the right.
    pub fn update_from_scene(&mut self, scene: &Scene) {
        let field = scene.field();
        let magnet = scene
            .registry()
            .magnetic_distance(Axis::Vertical, &field);
        self.left = format!(
            " {} areas | magnet {:.0}px ({:.1}%) | {}x{}",
            scene.areas().len(),
            scene.registry().magnet_px(),
            magnet,
            field.width,
            field.height
        );
        self.right = match scene.active_gesture() {
            None => "q quit  r new  d log ".to_string(),
            Some((id, kind)) => {
                let verb = match kind {
                    GestureKind::Drag => "dragging".to_string(),
                    GestureKind::Resize(edge) => format!("resizing {edge:?}"),
                };
                let snapped: Vec<&str> = scene
                    .last_step()
                    .map(|step| [step.vertical, step.horizontal])
                    .into_iter()
                    .flatten()
                    .flatten()
                    .map(side_name)
                    .collect();
                if snapped.is_empty() {
                    format!("#{id} {verb} ")
                } else {
                    format!("#{id} {verb} | snapped {} ", snapped.join("+"))
                }
            }
        };
    }
}

fn side_name(side: Side) -> &'static str {
    match side {
        Side::Left => "left",
        Side::Right => "right",
        Side::Top => "top",
        Side::Bottom => "bottom",
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl super::Component for StatusBar {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _focused: bool) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let y = area.y;
        let x = area.x;
        let width = area.width as usize;
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }
        let fill = " ".repeat(width);
        safe_set_string(buffer, bounds, x, y, &fill, self.style);

        let left = truncate_to_width(&self.left, width);
        let left_width = left.chars().count();
        safe_set_string(buffer, bounds, x, y, &left, self.style);

        // The right side only shows when it fits beside the left one.
        let right_width = self.right.chars().count();
        if !self.right.is_empty() && left_width + right_width < width {
            let start_x = x.saturating_add((width - right_width) as u16);
            safe_set_string(buffer, bounds, start_x, y, &self.right, self.style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Component;
    use crate::geometry::AreaRect;
    use crate::scene::SceneOptions;
    use ratatui::buffer::Buffer;
    use ratatui::style::Color;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
            .collect()
    }

    #[test]
    fn renders_left_and_right() {
        let mut bar = StatusBar::new();
        bar.set_left("left");
        bar.set_right("right");
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        bar.render(&mut UiFrame::from_parts(area, &mut buf), area, false);
        let text = row_text(&buf, 0);
        assert!(text.starts_with("left"));
        assert!(text.ends_with("right"));
    }

    #[test]
    fn describes_idle_and_active_scene() {
        let field = Rect::new(0, 1, 100, 100);
        let mut scene = Scene::new(field, SceneOptions::default());
        scene.add_area(AreaRect::new(10.0, 20.0, 20.0, 20.0), Color::Gray);
        let mut bar = StatusBar::new();
        bar.update_from_scene(&scene);
        assert!(bar.left().contains("1 areas"));
        assert!(bar.left().contains("magnet 7px"));
        assert!(bar.right().contains("quit"));

        scene.pointer_down(15, 30);
        scene.pointer_drag(9, 30, std::time::Instant::now());
        bar.update_from_scene(&scene);
        assert!(bar.right().contains("dragging"));
        assert!(bar.right().contains("snapped left"));
    }
}
