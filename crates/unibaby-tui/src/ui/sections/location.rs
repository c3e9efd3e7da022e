use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use unibaby_core::content::{map_url, OpeningHours, ADDRESS, EMAIL, INSTAGRAM_URL, PHONE, TAGLINE};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, _app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_contacts(frame, chunks[0]);
    render_links(frame, chunks[1]);
}

fn render_contacts(frame: &mut Frame, area: Rect) {
    let hours = OpeningHours::daily();
    let open_now = if hours.is_open_at(Local::now().time()) {
        Span::styled(" (open now)", styles::success_style())
    } else {
        Span::styled(" (closed now)", styles::muted_style())
    };

    let lines = vec![
        Line::from(vec![Span::styled("Address: ", styles::highlight_style()), Span::raw(ADDRESS)]),
        Line::from(vec![Span::styled("Phone:   ", styles::highlight_style()), Span::raw(PHONE)]),
        Line::from(vec![
            Span::styled("Hours:   ", styles::highlight_style()),
            Span::raw(hours.display()),
            open_now,
        ]),
        Line::from(vec![Span::styled("Email:   ", styles::highlight_style()), Span::raw(EMAIL)]),
    ];

    let block = Block::default()
        .title(" Contact information ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_links(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(vec![Span::styled("Instagram: ", styles::highlight_style()), Span::raw(INSTAGRAM_URL)]),
        Line::from(vec![Span::styled("Map:       ", styles::highlight_style()), Span::raw(map_url())]),
        Line::from(""),
        Line::from(Span::styled(TAGLINE, styles::muted_style())),
        Line::from(Span::styled("Come by for a trial lesson", styles::muted_style())),
    ];

    let block = Block::default()
        .title(" Find us ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
