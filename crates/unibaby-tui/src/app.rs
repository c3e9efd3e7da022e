//! Application state management for the UniBaby storefront TUI.
//!
//! `App` wraps the core `SiteState` with terminal-only concerns: which
//! overlay is open, which form field has focus, and the channels that carry
//! results back from background tasks.

use std::process::{Command, Stdio};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use unibaby_core::api::client::ApiClient;
use unibaby_core::api::StorefrontBackend;
use unibaby_core::catalog::load_catalog;
use unibaby_core::checkout::{initiate_checkout, CheckoutError, Navigator, OpenedCheckout};
use unibaby_core::config::Config;
use unibaby_core::content::TRAINERS;
use unibaby_core::location::PageLocation;
use unibaby_core::models::{Catalog, PaymentStatus};
use unibaby_core::poller::{spawn_poller, PollHandle, PollPolicy, PollUpdate};
use unibaby_core::registration::FormField;
use unibaby_core::state::{Action, Section, SiteState};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Buffer size for a single poll chain: one message per attempt plus the report.
const POLL_CHANNEL_SIZE: usize = 8;

/// Maximum length for the pasted return URL
const MAX_URL_LENGTH: usize = 2048;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    Registering,
    EnteringReturnUrl,
    ConfirmingQuit,
    Quitting,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent back from background tasks through the app channel.
#[derive(Debug)]
enum BackgroundResult {
    Catalog(Catalog),
    Health(bool),
    CheckoutOpened(OpenedCheckout),
    CheckoutFailed,
}

/// Opens URLs in the system browser
pub struct SystemBrowser;

impl Navigator for SystemBrowser {
    fn navigate(&self, url: &str) -> Result<()> {
        spawn_detached(launcher_command(url))
    }
}

/// Platform command that opens `url`, passed as a single argument
fn launcher_command(url: &str) -> Command {
    let mut cmd;
    if cfg!(target_os = "macos") {
        cmd = Command::new("open");
        cmd.arg(url);
    } else if cfg!(target_os = "windows") {
        // `cmd /C start` would split the URL at `&`
        cmd = Command::new("rundll32");
        cmd.args(["url.dll,FileProtocolHandler", url]);
    } else {
        cmd = Command::new("xdg-open");
        cmd.arg(url);
    }
    cmd
}

/// Start `cmd` with no access to the terminal and return without waiting.
/// The exit status is collected on a separate thread.
fn spawn_detached(mut cmd: Command) -> Result<()> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    std::thread::spawn(move || match child.wait() {
        Ok(status) if !status.success() => {
            warn!(%status, "Browser launcher exited with failure");
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Failed to wait for browser launcher"),
    });
    Ok(())
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    pub config: Config,
    api: Arc<ApiClient>,
    navigator: Arc<dyn Navigator>,

    pub site: SiteState,
    pub state: AppState,
    pub form_focus: FormField,
    pub package_selection: usize,
    pub url_input: String,
    pub status_message: Option<String>,
    pub backend_online: Option<bool>,

    bg_rx: mpsc::Receiver<BackgroundResult>,
    bg_tx: mpsc::Sender<BackgroundResult>,

    poll: Option<PollHandle>,
    poll_rx: Option<mpsc::Receiver<PollUpdate>>,
}

impl App {
    /// Create a new application instance showing `location`
    pub fn new(config: Config, location: PageLocation) -> Result<Self> {
        let api = ApiClient::new(config.backend_url())?;
        debug!(backend = %api.base_url(), location = %location, "App created");
        Ok(Self::with_navigator(config, api, location, Arc::new(SystemBrowser)))
    }

    pub fn with_navigator(
        config: Config,
        api: ApiClient,
        location: PageLocation,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (bg_tx, bg_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Self {
            config,
            api: Arc::new(api),
            navigator,
            site: SiteState::new(location, TRAINERS.len()),
            state: AppState::Normal,
            form_focus: FormField::ParentName,
            package_selection: 0,
            url_input: String::new(),
            status_message: None,
            backend_online: None,
            bg_rx,
            bg_tx,
            poll: None,
            poll_rx: None,
        }
    }

    /// Page mount: load the catalog, probe the backend and, when the
    /// location carries a session id, start checking its payment.
    pub fn start(&mut self) {
        self.load_catalog_background();
        self.check_health_background();
        self.start_payment_check_if_needed();
    }

    // =========================================================================
    // Background tasks
    // =========================================================================

    fn load_catalog_background(&self) {
        let api = Arc::clone(&self.api);
        let tx = self.bg_tx.clone();
        tokio::spawn(async move {
            let catalog = load_catalog(api.as_ref()).await;
            Self::send_result(&tx, BackgroundResult::Catalog(catalog)).await;
        });
    }

    fn check_health_background(&self) {
        let api = Arc::clone(&self.api);
        let tx = self.bg_tx.clone();
        tokio::spawn(async move {
            let healthy = match api.health().await {
                Ok(health) => health.is_healthy(),
                Err(e) => {
                    warn!(error = %e, "Backend health check failed");
                    false
                }
            };
            Self::send_result(&tx, BackgroundResult::Health(healthy)).await;
        });
    }

    async fn send_result(tx: &mpsc::Sender<BackgroundResult>, result: BackgroundResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send background result");
        }
    }

    /// Drain results from background tasks and the active poll chain
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.bg_rx.try_recv() {
            results.push(result);
        }
        for result in results {
            self.process_background_result(result);
        }

        let mut updates = Vec::new();
        if let Some(ref mut rx) = self.poll_rx {
            while let Ok(update) = rx.try_recv() {
                updates.push(update);
            }
        }
        for update in updates {
            self.process_poll_update(update);
        }
    }

    fn process_background_result(&mut self, result: BackgroundResult) {
        match result {
            BackgroundResult::Catalog(catalog) => {
                self.site.apply(Action::CatalogLoaded(catalog));
                self.package_selection = self
                    .package_selection
                    .min(self.site.catalog.len().saturating_sub(1));
            }
            BackgroundResult::Health(healthy) => {
                self.backend_online = Some(healthy);
            }
            BackgroundResult::CheckoutOpened(opened) => {
                let url = opened.session.checkout_url;
                self.status_message = Some(if opened.navigated {
                    "Checkout opened in your browser. Press [r] with the return URL when done".to_string()
                } else {
                    format!("Pay at {} then press [r]", url)
                });
                self.site.apply(Action::Redirected(url));
                self.form_focus = FormField::ParentName;
                self.state = AppState::Normal;
            }
            BackgroundResult::CheckoutFailed => {
                self.site.apply(Action::SubmitFailed);
            }
        }
    }

    fn process_poll_update(&mut self, update: PollUpdate) {
        match update {
            PollUpdate::Attempt(attempt) => {
                self.site.apply(Action::PollAttempted(attempt));
            }
            PollUpdate::Finished(report) => {
                info!(status = %report.status, attempts = report.attempts, "Payment check finished");
                self.site.apply(Action::PaymentResolved {
                    status: report.status,
                    reply: report.last_reply,
                });
                self.poll = None;
                self.poll_rx = None;
            }
        }
    }

    // =========================================================================
    // Payment status
    // =========================================================================

    /// Start polling when the location carries a session id and no check is
    /// running or showing
    pub fn start_payment_check_if_needed(&mut self) {
        let Some(session_id) = self.site.pending_payment_session() else {
            return;
        };

        self.stop_polling();
        self.site.apply(Action::PaymentCheckStarted(session_id.clone()));

        let (tx, rx) = mpsc::channel(POLL_CHANNEL_SIZE);
        let backend: Arc<dyn StorefrontBackend> = self.api.clone();
        self.poll = Some(spawn_poller(backend, session_id, PollPolicy::default(), tx));
        self.poll_rx = Some(rx);
    }

    /// Close a terminal payment status and clear the session id from the URL
    pub fn dismiss_payment_status(&mut self) {
        if !self.site.payment.is_terminal() {
            return;
        }
        self.stop_polling();
        self.site.apply(Action::DismissPaymentStatus);
    }

    fn stop_polling(&mut self) {
        if let Some(handle) = self.poll.take() {
            handle.cancel();
        }
        self.poll_rx = None;
    }

    /// Navigate to a pasted URL, typically the payment page's return URL
    pub fn enter_location(&mut self, input: &str) -> Result<()> {
        if self.site.payment == PaymentStatus::Checking {
            anyhow::bail!("A payment check is already in progress");
        }
        let location = PageLocation::parse(input)?;
        self.dismiss_payment_status();
        self.site.apply(Action::LocationChanged(location));
        self.start_payment_check_if_needed();
        Ok(())
    }

    // =========================================================================
    // Registration
    // =========================================================================

    pub fn open_registration_for_selection(&mut self) {
        let Some(key) = self
            .site
            .catalog
            .entry_at(self.package_selection)
            .map(|entry| entry.key.clone())
        else {
            return;
        };
        self.site.apply(Action::OpenRegistration(key));
        if self.site.registration_open {
            self.form_focus = FormField::ParentName;
            self.state = AppState::Registering;
        }
    }

    pub fn close_registration(&mut self) {
        self.site.apply(Action::CloseRegistration);
        if !self.site.registration_open {
            self.state = AppState::Normal;
        }
    }

    pub fn type_char(&mut self, c: char) {
        let current = self.site.draft.field(self.form_focus);
        if !self.form_focus.accepts_char(current.chars().count(), c) {
            return;
        }
        let mut value = current.to_string();
        value.push(c);
        self.site.apply(Action::SetField(self.form_focus, value));
    }

    pub fn backspace(&mut self) {
        let mut value = self.site.draft.field(self.form_focus).to_string();
        if value.pop().is_some() {
            self.site.apply(Action::SetField(self.form_focus, value));
        }
    }

    /// Validate the draft and, if it passes, send exactly one checkout
    /// request in the background
    pub fn submit_registration(&mut self) {
        if self.site.submitting {
            return;
        }

        let request = match self.site.checkout_request() {
            Ok(request) => request,
            Err(CheckoutError::Invalid(e)) => {
                self.form_focus = e.field();
                self.site.apply(Action::SubmitRejected(e));
                return;
            }
            Err(e) => {
                debug!(error = %e, "Submit ignored");
                return;
            }
        };

        self.site.apply(Action::SubmitStarted);

        let api = Arc::clone(&self.api);
        let navigator = Arc::clone(&self.navigator);
        let tx = self.bg_tx.clone();
        tokio::spawn(async move {
            let result = match initiate_checkout(api.as_ref(), navigator.as_ref(), &request).await {
                Ok(opened) => BackgroundResult::CheckoutOpened(opened),
                // Already logged by initiate_checkout
                Err(_) => BackgroundResult::CheckoutFailed,
            };
            Self::send_result(&tx, result).await;
        });
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn show_section(&mut self, section: Section) {
        self.site.apply(Action::ShowSection(section));
    }

    pub fn select_next_package(&mut self) {
        let len = self.site.catalog.len();
        if len > 0 {
            self.package_selection = (self.package_selection + 1).min(len - 1);
        }
    }

    pub fn select_prev_package(&mut self) {
        self.package_selection = self.package_selection.saturating_sub(1);
    }

    pub fn can_add_url_char(&self, c: char) -> bool {
        self.url_input.chars().count() < MAX_URL_LENGTH && !c.is_control()
    }

    pub fn quit(&mut self) {
        self.stop_polling();
        self.state = AppState::Quitting;
    }
}

// ============================================================================
// Tests
// ============================================================================
