use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;
use crate::utils::{format_date, truncate_string};

/// Render the News tab - headline list with a reading pane
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_headlines(frame, app, chunks[0]);
    render_reading_pane(frame, app, chunks[1]);
}

fn render_headlines(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    let items: Vec<ListItem> = app
        .news
        .iter()
        .map(|item| {
            let date = item
                .created_at
                .as_deref()
                .map(format_date)
                .unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<13}", date), styles::muted_style()),
                Span::raw(truncate_string(&item.title, area.width.saturating_sub(16) as usize)),
            ]))
        })
        .collect();

    let title = if app.news.is_empty() {
        " News - nothing here yet ".to_string()
    } else {
        format!(" News ({}) - [m] more ", app.news.len())
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .highlight_style(styles::selected_style());

    let mut state = ListState::default();
    state.select(Some(app.news_selection));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_reading_pane(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);

    let content: Vec<Line> = match app.news.get(app.news_selection) {
        Some(item) => {
            let mut lines = vec![Line::from(Span::styled(
                item.title.clone(),
                styles::title_style(),
            ))];
            if let Some(date) = item.created_at.as_deref() {
                lines.push(Line::from(Span::styled(format_date(date), styles::muted_style())));
            }
            lines.push(Line::from(""));
            let body = item.content.as_deref().unwrap_or_else(|| item.preview());
            for paragraph in body.split('\n') {
                lines.push(Line::from(Span::raw(paragraph.to_string())));
            }
            lines
        }
        None => vec![Line::from(Span::styled("No article selected", styles::muted_style()))],
    };

    let block = Block::default()
        .title(" Article ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(
        Paragraph::new(content).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
