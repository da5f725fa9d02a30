use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, FormKind, LoginFocus, MessageKind, Tab};
use crate::auth::{guard, NavBadge};
use crate::utils::format_price;
use crate::validation;

use super::styles;
use super::tabs::{bookings, cars, contact, dashboard, favorites, news};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::LoggingIn => render_login_overlay(frame, app),
        AppState::Form => render_form_overlay(frame, app),
        AppState::ConfirmingQuit => render_confirm_overlay(
            frame,
            "Are you sure you want to quit?",
            "[Y] quit, [N] cancel",
        ),
        AppState::ConfirmingCancel => render_confirm_overlay(
            frame,
            "Cancel this booking?",
            "[Y] cancel it, [N] keep it",
        ),
        _ => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  RENTALY · car rental";

    // Account chrome mirrors the session state
    let account_hint = match guard::nav_badge(&app.session) {
        NavBadge::LoginRegister => "[l] Login | [g] Register | [?] Help",
        NavBadge::DashboardLogout => "[6] Dashboard | [o] Logout | [?] Help",
    };

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + account_hint.len() + 4),
        )),
        Span::styled(account_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = [
        Tab::Cars,
        Tab::News,
        Tab::Contact,
        Tab::Bookings,
        Tab::Favorites,
        Tab::Dashboard,
    ];

    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, tab.title());
        if *tab == app.current_tab {
            spans.push(Span::styled(label, styles::tab_style(true)));
        } else if tab.screen().requires_auth() && !app.is_authenticated() {
            spans.push(Span::styled(label, styles::muted_style()));
        } else {
            spans.push(Span::styled(label, styles::tab_style(false)));
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Cars => cars::render(frame, app, area),
        Tab::News => news::render(frame, app, area),
        Tab::Contact => contact::render(frame, app, area),
        Tab::Bookings => bookings::render(frame, app, area),
        Tab::Favorites => favorites::render(frame, app, area),
        Tab::Dashboard => dashboard::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[u]pdate | [q]uit";

    let (left_text, left_style) = if let Some(ref status) = app.status {
        let style = match status.kind {
            MessageKind::Info => styles::muted_style(),
            MessageKind::Success => styles::success_style(),
            MessageKind::Error => styles::error_style(),
        };
        (format!(" {} ", status.text), style)
    } else {
        (String::from(" Ready "), styles::muted_style())
    };

    let right_text = format!(" {} ", shortcuts);
    let padding = (area.width as usize)
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(54, 25, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", k), styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled("  RENTALY", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        key("1-6", "Switch tabs"),
        key("←/→", "Prev/next tab"),
        key("↑/↓", "Navigate list"),
        key("Tab", "Switch focus (list ↔ detail)"),
        key("Esc", "Close overlay / go back"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        key("b", "Book the selected car"),
        key("f", "Toggle favorite"),
        key("t / s / r", "Filter cars by type / seats / reset"),
        key("/", "Search cars"),
        key("c", "Cancel selected booking"),
        key("m", "Load more news (news tab)"),
        key("p", "Edit profile (dashboard)"),
        key("l / g / o", "Login / register / logout"),
        key("u", "Refresh current tab"),
        key("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let height = if app.login_error.is_some() { 13 } else { 11 };
    let area = centered_rect_fixed(46, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled("      RENTALY · Sign in", styles::title_style())),
        Line::from(""),
    ];

    let field = |label: &'static str, value: String, focused: bool| {
        let style = if focused {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        let cursor = if focused { "▌" } else { "" };
        Line::from(vec![
            Span::raw("      "),
            Span::styled(label, styles::muted_style()),
            Span::styled(format!("{:<20}{}", value, cursor), style),
            Span::styled("]", styles::muted_style()),
        ])
    };

    lines.push(field(
        "Username: [",
        app.login_username.clone(),
        app.login_focus == LoginFocus::Username,
    ));
    lines.push(field(
        "Password: [",
        "*".repeat(app.login_password.len().min(20)),
        app.login_focus == LoginFocus::Password,
    ));

    lines.push(Line::from(""));
    let button_label = if app.login_submitting {
        " Logging in... "
    } else if app.login_focus == LoginFocus::Button {
        " ▶ Login ◀ "
    } else {
        "   Login   "
    };
    let button_style = if app.login_focus == LoginFocus::Button {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    lines.push(Line::from(vec![
        Span::raw("            ["),
        Span::styled(button_label, button_style),
        Span::raw("]"),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "      [g] register instead · [Esc] close",
        styles::muted_style(),
    )));

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_form_overlay(frame: &mut Frame, app: &App) {
    let Some(form) = &app.form else {
        return;
    };

    let mut extra = 0;
    if form.error.is_some() {
        extra += 2;
    }
    if form.kind == FormKind::Booking {
        extra += 2; // live total line
    }
    let height = (form.fields.len() as u16) + 7 + extra;
    let area = centered_rect_fixed(58, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(format!("  {}", form.title), styles::title_style())),
        Line::from(""),
    ];

    let label_width = form
        .fields
        .iter()
        .map(|f| f.label.len())
        .max()
        .unwrap_or(0)
        + 2;

    for (i, field) in form.fields.iter().enumerate() {
        let focused = form.focus == i;
        let style = if focused {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        let char_count = field.value.chars().count();
        let shown = if field.masked {
            "*".repeat(char_count.min(24))
        } else if char_count > 24 {
            // Keep the tail visible while typing long values
            field.value.chars().skip(char_count - 24).collect()
        } else {
            field.value.clone()
        };
        let cursor = if focused { "▌" } else { "" };
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                format!("{:<width$}", format!("{}:", field.label), width = label_width),
                styles::muted_style(),
            ),
            Span::styled("[", styles::muted_style()),
            Span::styled(format!("{:<24}{}", shown, cursor), style),
            Span::styled("]", styles::muted_style()),
        ]));
    }

    // Live rental total for the booking form
    if form.kind == FormKind::Booking {
        if let Some(car) = &app.booking_car {
            let pickup = validation::parse_datetime(form.value(2));
            let ret = validation::parse_datetime(form.value(3));
            let total_line = match (pickup, ret) {
                (Some(pickup), Some(ret)) if ret > pickup => {
                    let days = validation::rental_days(pickup, ret);
                    let total = validation::total_price(days, car.daily_rate);
                    format!(
                        "  Total: {} ({} days × {}/day)",
                        format_price(total),
                        days,
                        format_price(car.daily_rate)
                    )
                }
                _ => String::from("  Total: enter pickup and return dates"),
            };
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(total_line, styles::highlight_style())));
        }
    }

    lines.push(Line::from(""));
    let button_style = if form.on_submit() {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    lines.push(Line::from(vec![
        Span::raw("  ["),
        Span::styled(format!(" {} ", form.submit_label()), button_style),
        Span::raw("]  "),
        Span::styled("[Esc] close", styles::muted_style()),
    ]));

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_confirm_overlay(frame: &mut Frame, question: &str, hint: &str) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("   {}", question), styles::highlight_style())),
        Line::from(""),
        Line::from(Span::styled(format!("   {}", hint), styles::muted_style())),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
