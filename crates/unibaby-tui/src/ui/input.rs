//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use tracing::warn;

use unibaby_core::state::{Action, Section};

use crate::app::{App, AppState};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.quit();
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Payment status overlay sits above everything else
    if app.site.payment.is_visible() {
        handle_payment_input(app, key);
        return Ok(false);
    }

    if matches!(app.state, AppState::EnteringReturnUrl) {
        handle_url_input(app, key);
        return Ok(false);
    }

    if matches!(app.state, AppState::Registering) {
        handle_registration_input(app, key);
        return Ok(false);
    }

    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    if app.site.menu_open {
        handle_menu_input(app, key);
        return Ok(false);
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char('m') => {
            app.site.apply(Action::ToggleMenu);
            return Ok(false);
        }
        KeyCode::Char('r') => {
            app.url_input.clear();
            app.status_message = None;
            app.state = AppState::EnteringReturnUrl;
            return Ok(false);
        }
        KeyCode::Char(c @ '1'..='4') => {
            let index = (c as usize) - ('1' as usize);
            app.show_section(Section::ALL[index]);
            return Ok(false);
        }
        KeyCode::Tab => {
            app.show_section(app.site.section.next());
            return Ok(false);
        }
        KeyCode::BackTab => {
            app.show_section(app.site.section.prev());
            return Ok(false);
        }
        _ => {}
    }

    match app.site.section {
        Section::Home => {
            if key.code == KeyCode::Enter {
                app.show_section(Section::Packages);
            }
        }
        Section::Trainers => match key.code {
            KeyCode::Left | KeyCode::Char('h') => app.site.apply(Action::PrevTrainer),
            KeyCode::Right | KeyCode::Char('l') => app.site.apply(Action::NextTrainer),
            _ => {}
        },
        Section::Packages => match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.select_prev_package(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next_package(),
            KeyCode::Enter => app.open_registration_for_selection(),
            _ => {}
        },
        Section::Location => {}
    }

    Ok(false)
}

fn handle_payment_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc if app.site.payment.is_terminal() => {
            app.dismiss_payment_status();
        }
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        _ => {}
    }
}

fn handle_menu_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('m') => app.site.apply(Action::CloseMenu),
        KeyCode::Char(c @ '1'..='4') => {
            let index = (c as usize) - ('1' as usize);
            app.show_section(Section::ALL[index]);
        }
        _ => {}
    }
}

fn handle_url_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.url_input.clear();
            app.state = AppState::Normal;
        }
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.url_input);
            app.state = AppState::Normal;
            if let Err(e) = app.enter_location(&input) {
                warn!(error = %e, "Could not open return URL");
                app.status_message = Some(format!("{}", e));
            }
        }
        KeyCode::Backspace => {
            app.url_input.pop();
        }
        KeyCode::Char(c) => {
            if app.can_add_url_char(c) {
                app.url_input.push(c);
            }
        }
        _ => {}
    }
}

fn handle_registration_input(app: &mut App, key: KeyEvent) {
    // The form is locked while the checkout request is in flight
    if app.site.submitting {
        return;
    }

    match key.code {
        KeyCode::Esc => app.close_registration(),
        KeyCode::Tab | KeyCode::Down => app.form_focus = app.form_focus.next(),
        KeyCode::BackTab | KeyCode::Up => app.form_focus = app.form_focus.prev(),
        KeyCode::Enter => app.submit_registration(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(c) => app.type_char(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::KeyModifiers;
    use unibaby_core::api::client::ApiClient;
    use unibaby_core::checkout::Navigator;
    use unibaby_core::config::Config;
    use unibaby_core::location::PageLocation;
    use unibaby_core::models::{Catalog, Package, PaymentStatus};
    use unibaby_core::registration::FormField;

    use super::*;

    struct NoBrowser;

    impl Navigator for NoBrowser {
        fn navigate(&self, _url: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn app() -> App {
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();
        let location = PageLocation::parse("https://unibaby-pool.kz/").unwrap();
        let mut app = App::with_navigator(Config::default(), api, location, Arc::new(NoBrowser));
        let catalog: Catalog = vec![(
            "aqua_kids".to_string(),
            Package {
                name: "Aqua Kids".into(),
                price: 20000.0,
                currency: None,
                sessions: 8,
            },
        )]
        .into_iter()
        .collect();
        app.site.apply(Action::CatalogLoaded(catalog));
        app
    }

    #[test]
    fn test_section_cycling() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.site.section, Section::Trainers);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.site.section, Section::Location);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.site.section, Section::Packages);
    }

    #[test]
    fn test_menu_navigation() {
        let mut app = app();
        press(&mut app, KeyCode::Char('m'));
        assert!(app.site.menu_open);
        press(&mut app, KeyCode::Char('2'));
        assert!(!app.site.menu_open);
        assert_eq!(app.site.section, Section::Trainers);
    }

    #[test]
    fn test_trainer_switching() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.site.active_trainer, 1);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.site.active_trainer, 2);
    }

    #[test]
    fn test_registration_typing_and_cancel() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Registering);

        // Letters go to the form, not the global shortcuts
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.site.draft.parent_name, "q");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.form_focus, FormField::Phone);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Normal);
        assert!(app.site.draft.is_empty());
    }

    #[test]
    fn test_checking_overlay_ignores_dismiss() {
        let mut app = app();
        app.site.apply(Action::PaymentCheckStarted("cs_1".into()));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.site.payment, PaymentStatus::Checking);

        app.site.apply(Action::PaymentResolved { status: PaymentStatus::Expired, reply: None });
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.site.payment, PaymentStatus::Idle);
    }

    #[test]
    fn test_bad_return_url_reports_error() {
        let mut app = app();
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.state, AppState::EnteringReturnUrl);
        for c in "nonsense".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Normal);
        assert!(app.status_message.is_some());
        assert_eq!(app.site.payment, PaymentStatus::Idle);
    }

    #[test]
    fn test_quit_confirmation() {
        let mut app = app();
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(press(&mut app, KeyCode::Char('y')));
    }
}
