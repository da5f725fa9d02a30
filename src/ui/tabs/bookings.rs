use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::{format_datetime, format_price};

/// Render the My Bookings tab
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new([
        Cell::from("ID"),
        Cell::from("Car"),
        Cell::from("Pickup"),
        Cell::from("Drop-off"),
        Cell::from("From"),
        Cell::from("Until"),
        Cell::from("Total"),
        Cell::from("Status"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .bookings
        .iter()
        .enumerate()
        .map(|(i, booking)| {
            let style = if i == app.booking_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            Row::new(vec![
                Cell::from(format!("#{}", booking.id)),
                Cell::from(booking.car.display_name()),
                Cell::from(booking.pickup_location.clone()),
                Cell::from(booking.dropoff_location.clone()),
                Cell::from(format_datetime(&booking.pickup_datetime)),
                Cell::from(format_datetime(&booking.return_datetime)),
                Cell::from(format_price(booking.total_price)),
                Cell::from(booking.booking_status.label())
                    .style(styles::booking_status_style(booking.booking_status)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(20),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Length(19),
        Constraint::Length(19),
        Constraint::Length(10),
        Constraint::Length(10),
    ];

    let title = if app.bookings.is_empty() {
        " My Bookings - none yet ".to_string()
    } else {
        format!(" My Bookings ({}) - [c]ancel selected ", app.bookings.len())
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.booking_selection));

    frame.render_stateful_widget(table, area, &mut state);
}
