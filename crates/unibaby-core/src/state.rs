//! Storefront UI state container.
//!
//! Every piece of mutable UI state lives in `SiteState` and changes only
//! through `SiteState::apply(Action)`. Actions that do not make sense in the
//! current state (a poll result while idle, a dismissal while still
//! checking) are ignored and logged at debug level.

use tracing::{debug, info, warn};

use crate::checkout::{build_checkout_request, CheckoutError};
use crate::location::PageLocation;
use crate::models::{Catalog, CheckoutRequest, CheckoutStatus, Package, PaymentStatus};
use crate::registration::{FormField, RegistrationDraft, ValidationError};

/// Page sections reachable from the navigation menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Home,
    Trainers,
    Packages,
    Location,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::Home, Section::Trainers, Section::Packages, Section::Location];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::Trainers => "Trainers",
            Section::Packages => "Packages",
            Section::Location => "Location",
        }
    }

    /// Get the next section (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Section::Home => Section::Trainers,
            Section::Trainers => Section::Packages,
            Section::Packages => Section::Location,
            Section::Location => Section::Home,
        }
    }

    /// Get the previous section (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Section::Home => Section::Location,
            Section::Trainers => Section::Home,
            Section::Packages => Section::Trainers,
            Section::Location => Section::Packages,
        }
    }
}

/// One discrete state change
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CatalogLoaded(Catalog),

    // Presentation toggles
    ToggleMenu,
    CloseMenu,
    ShowSection(Section),
    SelectTrainer(usize),
    NextTrainer,
    PrevTrainer,

    // Registration form
    OpenRegistration(String),
    CloseRegistration,
    SetField(FormField, String),
    SubmitStarted,
    SubmitRejected(ValidationError),
    SubmitFailed,
    Redirected(String),

    // Payment status machine
    LocationChanged(PageLocation),
    PaymentCheckStarted(String),
    PollAttempted(u32),
    PaymentResolved {
        status: PaymentStatus,
        reply: Option<CheckoutStatus>,
    },
    DismissPaymentStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiteState {
    pub catalog: Catalog,
    pub location: PageLocation,

    pub section: Section,
    pub menu_open: bool,
    pub active_trainer: usize,
    trainer_count: usize,

    pub selected_package: Option<String>,
    pub registration_open: bool,
    pub draft: RegistrationDraft,
    pub submitting: bool,
    pub form_error: Option<ValidationError>,

    pub payment: PaymentStatus,
    pub poll_attempts: u32,
    pub payment_reply: Option<CheckoutStatus>,
}

impl SiteState {
    pub fn new(location: PageLocation, trainer_count: usize) -> Self {
        Self {
            catalog: Catalog::default(),
            location,
            section: Section::Home,
            menu_open: false,
            active_trainer: 0,
            trainer_count,
            selected_package: None,
            registration_open: false,
            draft: RegistrationDraft::new(),
            submitting: false,
            form_error: None,
            payment: PaymentStatus::Idle,
            poll_attempts: 0,
            payment_reply: None,
        }
    }

    /// Session id that should start a payment check: present in the URL
    /// while no check is running or showing.
    pub fn pending_payment_session(&self) -> Option<String> {
        match self.payment {
            PaymentStatus::Idle => self.location.session_id(),
            _ => None,
        }
    }

    pub fn selected_package_info(&self) -> Option<&Package> {
        self.selected_package
            .as_deref()
            .and_then(|key| self.catalog.get(key))
    }

    /// Build the checkout request for the current draft and selection
    pub fn checkout_request(&self) -> Result<CheckoutRequest, CheckoutError> {
        build_checkout_request(&self.draft, self.selected_package.as_deref(), &self.location.origin())
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::CatalogLoaded(catalog) => {
                self.catalog = catalog;
            }

            Action::ToggleMenu => self.menu_open = !self.menu_open,
            Action::CloseMenu => self.menu_open = false,
            Action::ShowSection(section) => {
                self.section = section;
                self.menu_open = false;
            }
            Action::SelectTrainer(index) => {
                if index < self.trainer_count {
                    self.active_trainer = index;
                }
            }
            Action::NextTrainer => {
                if self.trainer_count > 0 {
                    self.active_trainer = (self.active_trainer + 1) % self.trainer_count;
                }
            }
            Action::PrevTrainer => {
                if self.trainer_count > 0 {
                    self.active_trainer = (self.active_trainer + self.trainer_count - 1) % self.trainer_count;
                }
            }

            Action::OpenRegistration(package_key) => {
                if !self.catalog.contains(&package_key) {
                    warn!(package_key = %package_key, "Ignoring registration for unknown package");
                    return;
                }
                self.selected_package = Some(package_key);
                self.registration_open = true;
                self.form_error = None;
            }
            Action::CloseRegistration => {
                if self.submitting {
                    debug!("Registration close ignored while submitting");
                    return;
                }
                self.close_registration();
            }
            Action::SetField(field, value) => {
                if self.registration_open {
                    self.draft.set_field(field, value);
                    if self.form_error.as_ref().map(|e| e.field()) == Some(field) {
                        self.form_error = None;
                    }
                }
            }
            Action::SubmitStarted => {
                if self.selected_package.is_none() || self.submitting {
                    debug!("Submit ignored");
                    return;
                }
                self.submitting = true;
                self.form_error = None;
            }
            Action::SubmitRejected(err) => {
                self.submitting = false;
                self.form_error = Some(err);
            }
            // The failure is logged where it happens; the form only unlocks
            Action::SubmitFailed => {
                self.submitting = false;
            }
            Action::Redirected(url) => {
                info!(url = %url, "Navigated to checkout");
                self.submitting = false;
                self.close_registration();
            }

            Action::LocationChanged(location) => {
                self.location = location;
            }
            Action::PaymentCheckStarted(session_id) => {
                if self.payment != PaymentStatus::Idle {
                    debug!(session_id = %session_id, current = %self.payment, "Payment check already in progress");
                    return;
                }
                info!(session_id = %session_id, "Checking payment status");
                self.payment = PaymentStatus::Checking;
                self.poll_attempts = 0;
                self.payment_reply = None;
            }
            Action::PollAttempted(attempt) => {
                if self.payment == PaymentStatus::Checking {
                    self.poll_attempts = attempt;
                }
            }
            Action::PaymentResolved { status, reply } => {
                if self.payment != PaymentStatus::Checking || !status.is_terminal() {
                    debug!(%status, current = %self.payment, "Ignoring payment resolution");
                    return;
                }
                self.payment = status;
                self.payment_reply = reply;
            }
            Action::DismissPaymentStatus => {
                if !self.payment.is_terminal() {
                    debug!(current = %self.payment, "Nothing to dismiss");
                    return;
                }
                self.payment = PaymentStatus::Idle;
                self.poll_attempts = 0;
                self.payment_reply = None;
                self.location = self.location.without_session_id();
            }
        }
    }

    fn close_registration(&mut self) {
        self.registration_open = false;
        self.selected_package = None;
        self.draft = RegistrationDraft::new();
        self.form_error = None;
    }
}
