use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;
use crate::ui::tabs::cars;
use crate::utils::{format_daily_rate, format_optional};

/// Render the Favorites tab - saved cars with the shared detail panel
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(area);

    render_favorite_table(frame, app, chunks[0]);
    // Detail panel is shared with the cars tab; it follows the selection
    cars::render_detail_panel(frame, app, chunks[1]);
}

fn render_favorite_table(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    let header = Row::new([
        Cell::from("Car"),
        Cell::from("Type"),
        Cell::from("Rate"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .favorites
        .iter()
        .enumerate()
        .map(|(i, car)| {
            let style = if i == app.favorite_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(car.display_name()),
                Cell::from(format_optional(&car.car_type, "-")),
                Cell::from(format_daily_rate(car.daily_rate)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(50),
        Constraint::Fill(1),
        Constraint::Length(12),
    ];

    let title = if app.favorites.is_empty() {
        " Favorites - no favorite cars yet ".to_string()
    } else {
        format!(" Favorites ({}) - [f] remove [b] book ", app.favorites.len())
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.favorite_selection));

    frame.render_stateful_widget(table, area, &mut state);
}
