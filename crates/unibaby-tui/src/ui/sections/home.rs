use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use unibaby_core::content::{FEATURES, HERO_TEXT, HERO_TITLE};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(6)])
        .split(area);

    render_hero(frame, app, chunks[0]);
    render_features(frame, chunks[1]);
}

fn render_hero(frame: &mut Frame, app: &App, area: Rect) {
    let packages_hint = if app.site.catalog.is_empty() {
        Span::styled("Packages are not available right now", styles::muted_style())
    } else {
        Span::styled(
            format!("[3] Choose from {} packages", app.site.catalog.len()),
            styles::highlight_style(),
        )
    };

    let lines = vec![
        Line::from(Span::styled(HERO_TITLE, styles::title_style())),
        Line::from(""),
        Line::from(HERO_TEXT),
        Line::from(""),
        Line::from(packages_hint),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_features(frame: &mut Frame, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    for (feature, column) in FEATURES.iter().zip(columns.iter()) {
        let block = Block::default()
            .title(format!(" {} ", feature.title))
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false));

        let paragraph = Paragraph::new(feature.description)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, *column);
    }
}
