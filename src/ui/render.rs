use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::DashboardState;
use crate::simulation::controller::Mode;

/// Grid cell `(row, col)` containing world point `(x, z)`, clamped to the grid.
#[must_use]
pub fn world_to_grid_coords(
    x: f64,
    z: f64,
    half_extent: f64,
    rows: usize,
    cols: usize,
) -> (usize, usize) {
    let span = 2.0 * half_extent;
    let col = ((x + half_extent) / span * cols as f64).floor().max(0.0) as usize;
    let row = ((half_extent - z) / span * rows as f64).floor().max(0.0) as usize;
    (row.min(rows.saturating_sub(1)), col.min(cols.saturating_sub(1)))
}

/// Badge colors for the controller mode on the HUD.
#[must_use]
pub fn mode_style(mode: Mode) -> Style {
    let bg = match mode {
        Mode::Orientation => Color::Yellow,
        Mode::Forward => Color::Green,
        Mode::Follow => Color::Magenta,
        Mode::Stop => Color::Cyan,
    };
    Style::default()
        .fg(Color::Black)
        .bg(bg)
        .add_modifier(Modifier::BOLD)
}

/// HUD line: a colored mode badge followed by the sensor and command readout.
#[must_use]
pub fn hud_spans(hud: &DashboardState) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<11}", hud.mode.to_string()), mode_style(hud.mode)),
        Span::styled(
            format!(" | {}", hud.readout()),
            Style::default().add_modifier(Modifier::REVERSED),
        ),
    ])
}

pub fn draw_ui(f: &mut Frame, grid_lines: Vec<String>, hud: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(f.area());

    f.render_widget(Paragraph::new(hud_spans(hud)), chunks[0]);

    let text: Vec<Line> = grid_lines.into_iter().map(Line::from).collect();
    let field = Paragraph::new(text)
        .block(Block::default().borders(Borders::NONE))
        .style(Style::default().fg(Color::White).bg(Color::Black));

    f.render_widget(field, chunks[1]);
}
