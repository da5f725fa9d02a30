use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::{format_date, format_datetime, format_optional};

/// Render the Dashboard tab - account info, stats and recent bookings
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),  // Account + stats
            Constraint::Min(5),     // Recent bookings
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[0]);

    render_account(frame, app, top[0]);
    render_stats(frame, app, top[1]);
    render_recent_bookings(frame, app, chunks[1]);
}

fn render_account(frame: &mut Frame, app: &App, area: Rect) {
    let content: Vec<Line> = match &app.account {
        Some(user) => {
            let field = |label: &'static str, value: String| {
                Line::from(vec![
                    Span::styled(format!("{:<10}", label), styles::muted_style()),
                    Span::raw(value),
                ])
            };

            vec![
                Line::from(Span::styled(user.full_name(), styles::title_style())),
                Line::from(""),
                field("Username:", user.username.clone()),
                field("Email:", user.email.clone()),
                field("Phone:", format_optional(&user.phone_number, "-")),
                field("Address:", format_optional(&user.address, "-")),
                field(
                    "Since:",
                    user.created_at
                        .as_deref()
                        .map(format_date)
                        .unwrap_or_else(|| "-".to_string()),
                ),
            ]
        }
        None => vec![Line::from(Span::styled("Loading account...", styles::muted_style()))],
    };

    let block = Block::default()
        .title(" Account - [p] edit profile  [o] log out ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn render_stats(frame: &mut Frame, app: &App, area: Rect) {
    let content: Vec<Line> = match &app.stats {
        Some(stats) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled("Total bookings:   ", styles::muted_style()),
                    Span::styled(stats.total_bookings.to_string(), styles::highlight_style()),
                ]),
                Line::from(vec![
                    Span::styled("Active bookings:  ", styles::muted_style()),
                    Span::styled(stats.active_bookings.to_string(), styles::highlight_style()),
                ]),
            ];
            if let Some(favorites) = stats.total_favorites {
                lines.push(Line::from(vec![
                    Span::styled("Favorite cars:    ", styles::muted_style()),
                    Span::styled(favorites.to_string(), styles::highlight_style()),
                ]));
            }
            lines
        }
        None => vec![Line::from(Span::styled("Loading stats...", styles::muted_style()))],
    };

    let block = Block::default()
        .title(" Overview ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn render_recent_bookings(frame: &mut Frame, app: &App, area: Rect) {
    let recent = app.recent_bookings();

    let content: Vec<Line> = if recent.is_empty() {
        vec![Line::from(Span::styled("No recent bookings", styles::muted_style()))]
    } else {
        recent
            .iter()
            .map(|booking| {
                Line::from(vec![
                    Span::styled(format!("#{:<5}", booking.id), styles::muted_style()),
                    Span::styled(
                        format!("{:<24}", booking.car.display_name()),
                        styles::list_item_style(),
                    ),
                    Span::raw(format!(
                        "{}  →  {}  ",
                        format_datetime(&booking.pickup_datetime),
                        format_datetime(&booking.return_datetime)
                    )),
                    Span::styled(
                        booking.booking_status.label(),
                        styles::booking_status_style(booking.booking_status),
                    ),
                ])
            })
            .collect()
    };

    let block = Block::default()
        .title(" Recent Bookings ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(content).block(block), area);
}
