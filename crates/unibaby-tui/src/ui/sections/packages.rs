use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use unibaby_core::content::PACKAGE_PERKS;
use unibaby_core::utils::truncate_string;

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_package_list(frame, app, chunks[0]);
    render_package_detail(frame, app, chunks[1]);
}

/// One row per catalog entry, in catalog order
pub fn package_items(app: &App) -> Vec<ListItem<'static>> {
    app.site
        .catalog
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let line = Line::from(vec![
                Span::raw(format!("{:<26}", truncate_string(&entry.package.name, 26))),
                Span::styled(format!("{:>12}", entry.package.display_price()), styles::price_style()),
            ]);

            let style = if i == app.package_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(line).style(style)
        })
        .collect()
}

fn render_package_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Packages ({}) ", app.site.catalog.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let list = List::new(package_items(app)).block(block);

    let mut state = ListState::default();
    if !app.site.catalog.is_empty() {
        state.select(Some(app.package_selection));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_package_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let Some(entry) = app.site.catalog.entry_at(app.package_selection) else {
        frame.render_widget(block, area);
        return;
    };
    let package = &entry.package;

    let mut lines = vec![
        Line::from(Span::styled(package.name.clone(), styles::title_style())),
        Line::from(Span::styled(package.display_price(), styles::price_style())),
        Line::from(package.display_sessions()),
        Line::from(""),
    ];
    for perk in PACKAGE_PERKS {
        lines.push(Line::from(vec![
            Span::styled("✓ ", styles::success_style()),
            Span::raw(perk),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("[Enter]", styles::help_key_style()),
        Span::styled(" Register", styles::help_desc_style()),
    ]));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
