use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use unibaby_core::content::{copyright, SITE_NAME};
use unibaby_core::models::PaymentStatus;
use unibaby_core::poller::MAX_POLL_ATTEMPTS;
use unibaby_core::registration::FormField;
use unibaby_core::state::Section;
use unibaby_core::utils::{format_phone, format_price};

use crate::app::{App, AppState};

use super::sections::{home, location, packages, trainers};
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Section tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if app.site.menu_open {
        render_menu_overlay(frame, app);
    }

    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame, app);
    }

    if matches!(app.state, AppState::Registering) && app.site.registration_open {
        render_registration_overlay(frame, app);
    }

    if matches!(app.state, AppState::EnteringReturnUrl) {
        render_url_overlay(frame, app);
    }

    if app.site.payment.is_visible() {
        render_payment_overlay(frame, app);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("  {}", SITE_NAME);
    let backend = match app.backend_online {
        Some(true) => Span::styled("● online", styles::success_style()),
        Some(false) => Span::styled("● offline", styles::error_style()),
        None => Span::styled("○ connecting", styles::muted_style()),
    };
    let help_hint = "[m] Menu  [?] Help";
    let used = title.chars().count() + backend.content.chars().count() + help_hint.len() + 6;

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        backend,
        Span::raw("  "),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, section) in Section::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, section.title());
        if *section == app.site.section {
            spans.push(Span::styled(label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.site.section {
        Section::Home => home::render(frame, app, area),
        Section::Trainers => trainers::render(frame, app, area),
        Section::Packages => packages::render(frame, app, area),
        Section::Location => location::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[r] return URL | [q]uit";

    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => format!(" {} ", app.site.location),
    };
    let center_text = copyright(&Local::now().date_naive());
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let center_len = center_text.chars().count();
    let left_len = left_text.chars().count();
    let center_start = width.saturating_sub(center_len) / 2;
    let left_pad = center_start.saturating_sub(left_len);
    let right_pad = width
        .saturating_sub(left_len + left_pad + center_len)
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(left_pad)),
        Span::styled(center_text, styles::muted_style()),
        Span::raw(" ".repeat(right_pad)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn render_menu_overlay(frame: &mut Frame, app: &App) {
    let area = Rect::new(frame.area().x, frame.area().y, 28.min(frame.area().width), frame.area().height);
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(format!(" {}", SITE_NAME), styles::title_style())),
        Line::from(""),
    ];
    for (i, section) in Section::ALL.iter().enumerate() {
        let style = if *section == app.site.section {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {}  ", i + 1), styles::help_key_style()),
            Span::styled(section.title(), style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  Esc close", styles::muted_style())));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(52, 23, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", k), styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled(format!("  {}", SITE_NAME), styles::title_style())),
        Line::from(Span::styled(format!("  version {}", version), styles::muted_style())),
        Line::from(Span::styled(format!("  backend {}", app.config.backend_url()), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        key("1-4", "Switch section"),
        key("Tab", "Next section"),
        key("m", "Toggle menu"),
        key("←/→", "Switch trainer"),
        key("↑/↓", "Choose package"),
        key("Enter", "Register for package"),
        Line::from(""),
        Line::from(Span::styled(" Registration", styles::highlight_style())),
        key("Tab/↓", "Next field"),
        key("Enter", "Submit and pay"),
        key("Esc", "Close form"),
        Line::from(""),
        Line::from(Span::styled(" Payment", styles::highlight_style())),
        key("r", "Enter return URL after paying"),
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

fn render_registration_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(64, 24, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![];

    if let Some(package) = app.site.selected_package_info() {
        lines.push(Line::from(vec![
            Span::styled(" Selected package: ", styles::muted_style()),
            Span::styled(package.name.clone(), styles::highlight_style()),
        ]));
        lines.push(Line::from(vec![
            Span::raw("                   "),
            Span::styled(package.display_price(), styles::price_style()),
        ]));
    }
    lines.push(Line::from(""));

    for field in FormField::ALL {
        let focused = field == app.form_focus;
        let value = app.site.draft.field(field);
        let label = if field.is_required() {
            format!(" {:<20}", format!("{} *", field.label()))
        } else {
            format!(" {:<20}", field.label())
        };
        let style = if focused {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        let cursor = if focused { "▌" } else { "" };
        let mut spans = vec![
            Span::styled(label, styles::muted_style()),
            Span::styled(format!("[{}{}]", value, cursor), style),
        ];
        if field == FormField::Phone && !value.trim().is_empty() {
            spans.push(Span::styled(format!(" {}", format_phone(value)), styles::muted_style()));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    if app.site.submitting {
        lines.push(Line::from(Span::styled(" Processing...", styles::warning_style())));
    } else {
        lines.push(Line::from(vec![
            Span::raw(" "),
            Span::styled("[Enter]", styles::help_key_style()),
            Span::styled(" Proceed to payment  ", styles::help_desc_style()),
            Span::styled("[Esc]", styles::help_key_style()),
            Span::styled(" Cancel", styles::help_desc_style()),
        ]));
    }

    if let Some(ref error) = app.site.form_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", error), styles::error_style())));
    }

    let block = Block::default()
        .title(" Registration ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_url_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(70, 8, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            " Paste the address the payment page returned you to:",
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(format!(" {}▌", app.url_input), styles::selected_style())),
        Line::from(""),
        Line::from(vec![
            Span::raw(" "),
            Span::styled("[Enter]", styles::help_key_style()),
            Span::styled(" Open  ", styles::help_desc_style()),
            Span::styled("[Esc]", styles::help_key_style()),
            Span::styled(" Cancel", styles::help_desc_style()),
        ]),
    ];

    let block = Block::default()
        .title(" Return URL ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_payment_overlay(frame: &mut Frame, app: &App) {
    let status = app.site.payment;
    let area = centered_rect_fixed(52, 10, frame.area());
    frame.render_widget(Clear, area);

    let title_style = match status {
        PaymentStatus::Success => styles::success_style(),
        PaymentStatus::Expired => styles::warning_style(),
        PaymentStatus::Timeout | PaymentStatus::Error => styles::error_style(),
        PaymentStatus::Checking | PaymentStatus::Idle => styles::title_style(),
    };

    let mut lines = vec![
        Line::from(Span::styled(format!(" {}", status.title()), title_style)),
        Line::from(""),
        Line::from(format!(" {}", status.message())),
    ];

    match status {
        PaymentStatus::Checking => {
            let attempt = app.site.poll_attempts.max(1);
            lines.push(Line::from(Span::styled(
                format!(" Attempt {} of {}", attempt, MAX_POLL_ATTEMPTS),
                styles::muted_style(),
            )));
        }
        PaymentStatus::Success => {
            let amount = app.site.payment_reply.as_ref().and_then(|reply| reply.amount_major());
            if let Some(amount) = amount {
                lines.push(Line::from(Span::styled(
                    format!(" Paid: {} ₸", format_price(amount)),
                    styles::price_style(),
                )));
            }
        }
        _ => {}
    }

    if status.is_terminal() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::raw(" "),
            Span::styled("[Enter]", styles::help_key_style()),
            Span::styled(" Close", styles::help_desc_style()),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
