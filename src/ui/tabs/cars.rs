use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;
use crate::utils::{format_daily_rate, format_optional};

/// Render the Cars tab - filterable listing with a detail panel
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(area);

    render_car_table(frame, app, chunks[0]);
    render_detail_panel(frame, app, chunks[1]);
}

fn filter_summary(app: &App) -> String {
    if app.search_active {
        return "search results".to_string();
    }
    let mut parts = Vec::new();
    if let Some(i) = app.type_filter {
        if let Some(t) = app.car_types.get(i) {
            parts.push(t.clone());
        }
    }
    if let Some(seats) = app.seats_filter {
        parts.push(format!("{} seats", seats));
    }
    if parts.is_empty() {
        "all cars".to_string()
    } else {
        parts.join(", ")
    }
}

fn render_car_table(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    let header = Row::new([
        Cell::from("Car"),
        Cell::from("Type"),
        Cell::from("Seats"),
        Cell::from("Rate"),
        Cell::from("♥"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .cars
        .iter()
        .enumerate()
        .map(|(i, car)| {
            let style = if i == app.car_selection {
                styles::selected_style()
            } else if car.is_available() {
                styles::list_item_style()
            } else {
                styles::muted_style()
            };

            let heart = if app.is_favorite(car.id) { "♥" } else { "" };

            Row::new(vec![
                Cell::from(car.display_name()),
                Cell::from(format_optional(&car.car_type, "-")),
                Cell::from(format!("{:>2}", car.seats.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()))),
                Cell::from(format_daily_rate(car.daily_rate)),
                Cell::from(heart),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(40),
        Constraint::Fill(2),
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Length(2),
    ];

    let title = if app.cars_loading {
        " Cars - loading... ".to_string()
    } else {
        format!(
            " Cars ({}) - {} - [t]ype [s]eats [r]eset [/] search ",
            app.cars.len(),
            filter_summary(app)
        )
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
    state.select(Some(app.car_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

/// Detail panel for the selected car; shared with the favorites tab.
pub fn render_detail_panel(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);
    let selected = match app.current_tab {
        crate::app::Tab::Favorites => app.favorites.get(app.favorite_selection),
        _ => app.cars.get(app.car_selection),
    };

    let content: Vec<Line> = match selected {
        Some(car) => {
            let mut lines = vec![
                Line::from(Span::styled(car.display_name(), styles::title_style())),
                Line::from(""),
            ];

            let row = |label: &'static str, value: String| {
                Line::from(vec![
                    Span::styled(format!("{:<14}", label), styles::muted_style()),
                    Span::raw(value),
                ])
            };

            lines.push(row(
                "Year:",
                car.year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string()),
            ));
            lines.push(row("Type:", format_optional(&car.car_type, "-")));
            lines.push(row(
                "Seats:",
                car.seats.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
            ));
            lines.push(row(
                "Doors:",
                car.doors.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
            ));
            lines.push(row("Transmission:", format_optional(&car.transmission, "-")));
            lines.push(row("Fuel:", format_optional(&car.fuel_type, "-")));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("Daily rate:   ", styles::muted_style()),
                Span::styled(format_daily_rate(car.daily_rate), styles::price_style()),
            ]));

            let (availability, style) = if car.is_available() {
                ("Available", styles::success_style())
            } else {
                ("Currently Unavailable", styles::error_style())
            };
            lines.push(Line::from(vec![
                Span::styled("Status:       ", styles::muted_style()),
                Span::styled(availability, style),
            ]));

            if let Some(count) = car.favorite_count {
                lines.push(Line::from(vec![
                    Span::styled("Favorites:    ", styles::muted_style()),
                    Span::raw(format!("♥ {}", count)),
                ]));
            }

            if let Some(ref description) = car.description {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled("Description", styles::highlight_style())));
                lines.push(Line::from(Span::raw(description.clone())));
            }

            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("[b] ", styles::help_key_style()),
                Span::styled("book  ", styles::help_desc_style()),
                Span::styled("[f] ", styles::help_key_style()),
                Span::styled("favorite", styles::help_desc_style()),
            ]));

            lines
        }
        None => vec![Line::from(Span::styled(
            "No car selected",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .title(" Details ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(content).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
