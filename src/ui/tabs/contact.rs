use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

/// Render the Contact tab - office details and the compose hint. The message
/// form itself opens as an overlay.
pub fn render(frame: &mut Frame, _app: &App, area: Rect) {
    let content = vec![
        Line::from(Span::styled("Get in touch", styles::title_style())),
        Line::from(""),
        Line::from(Span::raw(
            "Questions about a booking, our fleet, or anything else?",
        )),
        Line::from(Span::raw(
            "Send us a message and we'll get back to you within one business day.",
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", styles::muted_style()),
            Span::styled("[Enter]", styles::help_key_style()),
            Span::styled(" to compose a message", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(" Contact ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(content).block(block), area);
}
