use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear};

use crate::geometry::FIELD_EXTENT;
use crate::scene::Scene;
use crate::snap::{Rail, Side};
use crate::ui::UiFrame;

/// Cell index for a percent coordinate along a span of `cells` cells.
///
/// 100% maps onto the last cell instead of one past it, so a rail on the far
/// field edge stays visible.
pub fn percent_to_cell(pct: f64, origin: u16, cells: u16) -> u16 {
    if cells == 0 {
        return origin;
    }
    let last = cells - 1;
    let offset = ((pct.clamp(0.0, FIELD_EXTENT) / FIELD_EXTENT) * f64::from(cells)).round();
    origin.saturating_add((offset as u16).min(last))
}

/// Cell of the last column or row inside a box whose far side sits at `pct`.
///
/// Matches the border cell drawn for an area, whose width ends one cell
/// before the rounded far coordinate.
pub fn far_side_cell(pct: f64, origin: u16, cells: u16) -> u16 {
    if cells == 0 {
        return origin;
    }
    let offset = ((pct.clamp(0.0, FIELD_EXTENT) / FIELD_EXTENT) * f64::from(cells)).round();
    origin.saturating_add((offset as u16).saturating_sub(1).min(cells - 1))
}

/// Paint every area in creation order, then the rails on top.
pub fn render_scene(frame: &mut UiFrame<'_>, scene: &Scene, field: Rect) {
    if field.width == 0 || field.height == 0 {
        return;
    }
    let active = scene.active();
    for area in scene.areas() {
        let cells = area.rect().to_cells(field);
        if cells.width == 0 || cells.height == 0 {
            continue;
        }
        let border = if active == Some(area.id()) {
            Style::default()
                .fg(crate::theme::area_active_border())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(crate::theme::area_border())
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .style(Style::default().bg(area.color).fg(crate::theme::area_label()));
        frame.render_widget(Clear, cells);
        frame.render_widget(block, cells);
    }
    let style = Style::default()
        .fg(crate::theme::rail())
        .add_modifier(Modifier::BOLD);
    // A rail sits on the border cell of the side that snapped.
    let step = scene.last_step();
    if let Some(rail) = scene.rails().vertical() {
        let far = step.is_some_and(|s| s.vertical == Some(Side::Right));
        draw_vertical_rail(frame, rail, field, far, style);
    }
    if let Some(rail) = scene.rails().horizontal() {
        let far = step.is_some_and(|s| s.horizontal == Some(Side::Bottom));
        draw_horizontal_rail(frame, rail, field, far, style);
    }
}

/// Inclusive cell range covered by a rail running from `a` to `b` percent.
fn rail_span(a: f64, b: f64, origin: u16, cells: u16) -> (u16, u16) {
    let first = percent_to_cell(a.min(b), origin, cells);
    let last = far_side_cell(a.max(b), origin, cells).max(first);
    (first, last)
}

fn draw_vertical_rail(frame: &mut UiFrame<'_>, rail: Rail, field: Rect, far: bool, style: Style) {
    let x = if far {
        far_side_cell(rail.start.x, field.x, field.width)
    } else {
        percent_to_cell(rail.start.x, field.x, field.width)
    };
    let (first, last) = rail_span(rail.start.y, rail.end.y, field.y, field.height);
    for y in first..=last {
        frame.set_cell(x, y, "│", style);
    }
}

fn draw_horizontal_rail(
    frame: &mut UiFrame<'_>,
    rail: Rail,
    field: Rect,
    far: bool,
    style: Style,
) {
    let y = if far {
        far_side_cell(rail.start.y, field.y, field.height)
    } else {
        percent_to_cell(rail.start.y, field.y, field.height)
    };
    let (first, last) = rail_span(rail.start.x, rail.end.x, field.x, field.width);
    for x in first..=last {
        frame.set_cell(x, y, "─", style);
    }
}
