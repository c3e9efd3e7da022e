use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use unibaby_core::content::{TRAINERS, TRAINER_RATING};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6)])
        .split(area);

    render_trainer_tabs(frame, app, chunks[0]);
    render_trainer_card(frame, app, chunks[1]);
}

fn render_trainer_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, trainer) in TRAINERS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        spans.push(Span::styled(trainer.name, styles::tab_style(i == app.site.active_trainer)));
    }

    let block = Block::default()
        .title(" Our trainers ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_trainer_card(frame: &mut Frame, app: &App, area: Rect) {
    let Some(trainer) = TRAINERS.get(app.site.active_trainer) else {
        return;
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(trainer.name, styles::title_style())),
        Line::from(Span::styled(trainer.specialty, styles::highlight_style())),
        Line::from(trainer.experience()),
        Line::from(""),
        Line::from(Span::styled(TRAINER_RATING, styles::highlight_style())),
        Line::from(""),
        Line::from(Span::styled("←/→ switch trainer", styles::muted_style())),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
