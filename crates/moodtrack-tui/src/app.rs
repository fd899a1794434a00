//! Application state management for moodtrack.
//!
//! This module contains the core `App` struct that holds all UI state, the
//! loaded dashboard and list pages, and coordinates the background tasks
//! that talk to the API.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Timelike};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use moodtrack_core::auth::CredentialStore;
use moodtrack_core::dashboard::UnitSection;
use moodtrack_core::models::{
    CollaboratorSummary, Emotion, OrgUnitKind, Page, PageRequest, SubmitEmotion, UnitOverview,
};
use moodtrack_core::notify::Notification;
use moodtrack_core::period::{local_now, Eligibility};
use moodtrack_core::{
    ApiClient, ApiError, Config, Dashboard, FileSessionStore, LoginRedirect, Notifier,
    SessionStore, ToastQueue,
};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for username input.
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for the optional comment sent with a check-in.
const MAX_COMMENT_LENGTH: usize = 200;

pub const ENV_USERNAME: &str = "MOODTRACK_USERNAME";
pub const ENV_PASSWORD: &str = "MOODTRACK_PASSWORD";

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Today,
    History,
    Team,
    Units,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Today => "Today",
            Tab::History => "History",
            Tab::Team => "Team",
            Tab::Units => "Units",
        }
    }

    /// Tabs shown for a dashboard, in display order.
    ///
    /// Everyone gets Today and History; managers add their team, directors
    /// add the unit roll-ups as well.
    pub fn for_dashboard(dashboard: Option<&Dashboard>) -> Vec<Tab> {
        match dashboard {
            Some(Dashboard::Manager(_)) => vec![Tab::Today, Tab::History, Tab::Team],
            Some(Dashboard::Director(_)) => {
                vec![Tab::Today, Tab::History, Tab::Team, Tab::Units]
            }
            Some(Dashboard::Employee(_)) | None => vec![Tab::Today, Tab::History],
        }
    }

    /// Next tab among `tabs` (wrapping around)
    pub fn next_in(&self, tabs: &[Tab]) -> Tab {
        match tabs.iter().position(|t| t == self) {
            Some(i) => tabs[(i + 1) % tabs.len()],
            None => tabs.first().copied().unwrap_or(Tab::Today),
        }
    }

    /// Previous tab among `tabs` (wrapping around)
    pub fn prev_in(&self, tabs: &[Tab]) -> Tab {
        match tabs.iter().position(|t| t == self) {
            Some(i) => tabs[(i + tabs.len() - 1) % tabs.len()],
            None => tabs.first().copied().unwrap_or(Tab::Today),
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    EditingComment,
    ShowingHelp,
    LoggingIn,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Username,
    Password,
    Button,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent back from spawned API tasks.
///
/// API failures have already been reported to the user by the client by the
/// time `Failed` arrives; it only carries text for the log. Loaded data is
/// tagged with the session generation it was requested under.
enum TaskResult {
    Dashboard(u64, Box<Dashboard>),
    History(u64, PageRequest, Page<Emotion>),
    Team(u64, PageRequest, Page<CollaboratorSummary>),
    Submitted(Emotion),
    ReportSaved(PathBuf),
    ReportFailed(String),
    Failed(String),
}

/// API client wired to the on-disk session and the TUI's notification sinks
pub struct Services {
    pub api: ApiClient,
    pub toasts: ToastQueue,
    pub redirect: LoginRedirect,
}

impl Services {
    pub fn open(config: &Config) -> Result<Self> {
        let cache_dir = config.cache_dir()?;
        let session = FileSessionStore::open(&cache_dir)?;
        let toasts = ToastQueue::default();
        let redirect = LoginRedirect::new();
        let api = ApiClient::new(
            config,
            Arc::new(session),
            Arc::new(toasts.clone()),
            Arc::new(redirect.clone()),
        )?;
        Ok(Self {
            api,
            toasts,
            redirect,
        })
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    pub api: ApiClient,
    pub toasts: ToastQueue,
    redirect: LoginRedirect,

    // UI State
    pub state: AppState,
    pub current_tab: Tab,

    // Login form state
    pub login_username: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Loaded data
    pub dashboard: Option<Dashboard>,
    pub loading: bool,

    // Today tab
    pub emotion_selection: usize,
    pub comment: String,

    // History tab
    pub history: Page<Emotion>,
    pub history_request: PageRequest,
    pub history_selection: usize,

    // Team tab
    pub team: Page<CollaboratorSummary>,
    pub team_request: PageRequest,
    pub team_selection: usize,

    // Units tab
    pub section_index: usize,
    pub unit_selection: usize,

    pub status_message: Option<String>,

    /// Bumped whenever the session's data is thrown away
    generation: u64,

    // Background task channel
    task_rx: mpsc::Receiver<TaskResult>,
    task_tx: mpsc::Sender<TaskResult>,
}

impl App {
    /// Create the application from the saved config and session
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                let mut config = Config::default();
                config.apply_env();
                config
            }
        };
        debug!(base_url = %config.effective_base_url(), "Config loaded");

        let services = Services::open(&config)?;
        let mut app = Self::with_services(config, services);

        // Prefill a remembered password for the last user
        if app.login_password.is_empty() && !app.login_username.is_empty() {
            if let Ok(password) = CredentialStore::get_password(&app.login_username) {
                app.login_password = password;
            }
        }

        Ok(app)
    }

    pub fn with_services(config: Config, services: Services) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login_username = std::env::var(ENV_USERNAME)
            .ok()
            .or_else(|| config.last_username.clone())
            .unwrap_or_default();
        let login_password = std::env::var(ENV_PASSWORD).unwrap_or_default();

        let page_size = config.page_size;

        Self {
            config,
            api: services.api,
            toasts: services.toasts,
            redirect: services.redirect,

            state: AppState::Normal,
            current_tab: Tab::Today,

            login_username,
            login_password,
            login_focus: LoginFocus::Username,
            login_error: None,

            dashboard: None,
            loading: false,

            emotion_selection: 0,
            comment: String::new(),

            history: Page::default(),
            history_request: PageRequest::first(page_size),
            history_selection: 0,

            team: Page::default(),
            team_request: PageRequest::first(page_size),
            team_selection: 0,

            section_index: 0,
            unit_selection: 0,

            status_message: None,

            generation: 0,

            task_rx: rx,
            task_tx: tx,
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.api.session().is_authenticated()
    }

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) -> Result<()> {
        let username = self.login_username.trim().to_string();
        let password = self.login_password.clone();

        if username.is_empty() || password.is_empty() {
            self.login_error = Some("Username and password required".to_string());
            return Err(anyhow::anyhow!("Username and password required"));
        }

        self.login_error = None;

        match self.api.login(&username, &password).await {
            Ok(user) => {
                if let Err(e) = CredentialStore::store(&username, &password) {
                    warn!(error = %e, "Failed to store credentials");
                }

                self.config.last_username = Some(username);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.login_password.clear();
                self.state = AppState::Normal;
                info!(user_id = user.id, role = user.role.label(), "Login successful");

                self.spawn_dashboard_load(Some(user));
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.login_error = Some(login_error_message(&e));
                Err(e)
            }
        }
    }

    /// Start the login process (show login overlay)
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_focus = if self.login_username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
    }

    /// Forget the session and the remembered password, then show the login form
    pub fn logout(&mut self) {
        if let Err(e) = self.api.logout() {
            warn!(error = %e, "Failed to clear session");
        }
        if let Some(ref username) = self.config.last_username {
            if let Err(e) = CredentialStore::delete(username) {
                warn!(error = %e, "Failed to delete stored credentials");
            }
        }
        self.login_password.clear();
        self.reset_data();
        self.toasts.notify(Notification::info("Logged out"));
        self.start_login();
    }

    /// Show the login form if the client gave up on the session
    pub fn check_login_redirect(&mut self) {
        if self.redirect.take() {
            info!("Session expired, returning to login");
            self.reset_data();
            self.start_login();
            self.login_error = Some("Your session has expired. Please log in again.".to_string());
        }
    }

    fn reset_data(&mut self) {
        let page_size = self.config.page_size;
        self.generation += 1;
        self.dashboard = None;
        self.loading = false;
        self.current_tab = Tab::Today;
        self.emotion_selection = 0;
        self.comment.clear();
        self.history = Page::default();
        self.history_request = PageRequest::first(page_size);
        self.history_selection = 0;
        self.team = Page::default();
        self.team_request = PageRequest::first(page_size);
        self.team_selection = 0;
        self.section_index = 0;
        self.unit_selection = 0;
        self.status_message = None;
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn tabs(&self) -> Vec<Tab> {
        Tab::for_dashboard(self.dashboard.as_ref())
    }

    pub fn select_tab(&mut self, tab: Tab) {
        if self.tabs().contains(&tab) {
            self.current_tab = tab;
        }
    }

    pub fn next_tab(&mut self) {
        self.current_tab = self.current_tab.next_in(&self.tabs());
    }

    pub fn prev_tab(&mut self) {
        self.current_tab = self.current_tab.prev_in(&self.tabs());
    }

    /// Unit roll-ups visible to this user
    pub fn unit_sections(&self) -> Vec<&UnitSection> {
        self.dashboard
            .as_ref()
            .map(|d| d.unit_sections())
            .unwrap_or_default()
    }

    pub fn current_section(&self) -> Option<&UnitSection> {
        self.unit_sections().get(self.section_index).copied()
    }

    pub fn cycle_section(&mut self) {
        let count = self.unit_sections().len();
        if count > 0 {
            self.section_index = (self.section_index + 1) % count;
            self.unit_selection = 0;
        }
    }

    pub fn selected_unit(&self) -> Option<(OrgUnitKind, &UnitOverview)> {
        let section = self.current_section()?;
        section
            .units
            .get(self.unit_selection)
            .map(|unit| (section.kind, unit))
    }

    /// Eligibility of the check-in form right now
    pub fn eligibility(&self) -> Option<Eligibility> {
        let hour = local_now(self.config.utc_offset_hours).hour();
        self.dashboard.as_ref().map(|d| d.personal().eligibility(hour))
    }

    // =========================================================================
    // Background loading
    // =========================================================================

    /// Reload the dashboard and the first page of each list
    pub fn refresh(&mut self) {
        self.spawn_dashboard_load(None);
    }

    fn spawn_dashboard_load(&mut self, user: Option<moodtrack_core::models::Collaborator>) {
        self.loading = true;
        self.status_message = Some("Loading dashboard...".to_string());

        let generation = self.generation;
        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = match fetch_dashboard(&api, user).await {
                Ok(dashboard) => TaskResult::Dashboard(generation, Box::new(dashboard)),
                Err(e) => TaskResult::Failed(format!("dashboard: {}", e)),
            };
            send_result(&tx, result).await;
        });
    }

    pub fn fetch_history(&mut self, request: PageRequest) {
        self.history_request = request;

        let generation = self.generation;
        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = match api.emotion_history(request).await {
                Ok(page) => TaskResult::History(generation, request, page),
                Err(e) => TaskResult::Failed(format!("history: {}", e)),
            };
            send_result(&tx, result).await;
        });
    }

    pub fn fetch_team(&mut self, request: PageRequest) {
        let Some(kind) = self.dashboard.as_ref().and_then(|d| d.collaborator_scope()) else {
            return;
        };
        self.team_request = request;

        let generation = self.generation;
        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = match api.unit_collaborators(kind, request).await {
                Ok(page) => TaskResult::Team(generation, request, page),
                Err(e) => TaskResult::Failed(format!("team: {}", e)),
            };
            send_result(&tx, result).await;
        });
    }

    /// Move the list on the current tab one page forward or back
    pub fn change_page(&mut self, forward: bool) {
        match self.current_tab {
            Tab::History => {
                if let Some(request) = step_page(self.history_request, &self.history, forward) {
                    self.fetch_history(request);
                }
            }
            Tab::Team => {
                if let Some(request) = step_page(self.team_request, &self.team, forward) {
                    self.fetch_team(request);
                }
            }
            Tab::Today | Tab::Units => {}
        }
    }

    /// Submit the selected emotion for the current half-day
    pub fn submit_selected_emotion(&mut self) {
        let Some(eligibility) = self.eligibility() else {
            return;
        };
        if !eligibility.is_open() {
            self.toasts.error(&eligibility.message());
            return;
        }

        let Some(emotion_type) = self
            .dashboard
            .as_ref()
            .and_then(|d| d.personal().emotion_types.get(self.emotion_selection))
        else {
            return;
        };

        let comment = self.comment.trim();
        let submission = SubmitEmotion {
            emotion_type: emotion_type.id,
            comment: (!comment.is_empty()).then(|| comment.to_string()),
        };
        self.status_message = Some("Submitting...".to_string());

        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = match api.submit_emotion(&submission).await {
                Ok(emotion) => TaskResult::Submitted(emotion),
                Err(e) => TaskResult::Failed(format!("submit: {}", e)),
            };
            send_result(&tx, result).await;
        });
    }

    /// Download the selected unit's report into the download directory
    pub fn download_selected_report(&mut self) {
        let Some((kind, unit_id)) = self.selected_unit().map(|(kind, unit)| (kind, unit.id)) else {
            return;
        };

        let dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        let path = report_path(&dir, kind, unit_id, Local::now().date_naive());
        self.status_message = Some("Downloading report...".to_string());

        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = match save_report(&api, kind, unit_id, &path).await {
                Ok(()) => TaskResult::ReportSaved(path),
                Err(e) if e.downcast_ref::<ApiError>().is_some() => {
                    TaskResult::Failed(format!("report: {}", e))
                }
                Err(e) => TaskResult::ReportFailed(format!("{:#}", e)),
            };
            send_result(&tx, result).await;
        });
    }

    // =========================================================================
    // Task results
    // =========================================================================

    /// Apply everything the background tasks have finished since the last frame
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.task_rx.try_recv() {
            results.push(result);
        }

        for result in results {
            self.process_task_result(result);
        }
    }

    fn process_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Dashboard(generation, _) if generation != self.generation => {
                debug!(generation, "Dropping dashboard from an ended session");
            }
            TaskResult::Dashboard(_, dashboard) => {
                let dashboard = *dashboard;
                info!(role = dashboard.role().label(), "Dashboard loaded");
                self.dashboard = Some(dashboard);
                self.loading = false;
                self.status_message = None;

                if !self.tabs().contains(&self.current_tab) {
                    self.current_tab = Tab::Today;
                }
                self.clamp_selections();

                let page_size = self.config.page_size;
                self.fetch_history(PageRequest::first(page_size));
                self.fetch_team(PageRequest::first(page_size));
            }
            TaskResult::History(generation, request, page) => {
                if generation != self.generation || request != self.history_request {
                    debug!(page = request.page, "Dropping stale history page");
                    return;
                }
                self.history = page;
                self.history_selection = 0;
            }
            TaskResult::Team(generation, request, page) => {
                if generation != self.generation || request != self.team_request {
                    debug!(page = request.page, "Dropping stale team page");
                    return;
                }
                self.team = page;
                self.team_selection = 0;
            }
            TaskResult::Submitted(emotion) => {
                let half = emotion
                    .half_day()
                    .map(|h| h.label())
                    .unwrap_or("today's");
                if let Some(dashboard) = self.dashboard.as_mut() {
                    dashboard.personal_mut().record_submission(emotion);
                }
                self.comment.clear();
                self.status_message = None;
                self.toasts
                    .success(&format!("Your {} check-in was recorded", half));
                self.fetch_history(self.history_request);
            }
            TaskResult::ReportSaved(path) => {
                self.status_message = None;
                self.toasts
                    .success(&format!("Report saved to {}", path.display()));
            }
            TaskResult::ReportFailed(message) => {
                error!(error = %message, "Failed to save report");
                self.status_message = None;
                self.toasts.error(&format!("Could not save report: {}", message));
            }
            TaskResult::Failed(message) => {
                warn!(error = %message, "Background task failed");
                self.loading = false;
                self.status_message = None;
            }
        }
    }

    fn clamp_selections(&mut self) {
        let type_count = self
            .dashboard
            .as_ref()
            .map(|d| d.personal().emotion_types.len())
            .unwrap_or(0);
        self.emotion_selection = self.emotion_selection.min(type_count.saturating_sub(1));

        let section_count = self.unit_sections().len();
        if self.section_index >= section_count {
            self.section_index = 0;
        }
        self.unit_selection = 0;
    }
}

async fn send_result(tx: &mpsc::Sender<TaskResult>, result: TaskResult) {
    if tx.send(result).await.is_err() {
        debug!("App closed before background task finished");
    }
}

async fn fetch_dashboard(
    api: &ApiClient,
    user: Option<moodtrack_core::models::Collaborator>,
) -> Result<Dashboard> {
    let user = match user {
        Some(user) => user,
        None => api.current_user().await?,
    };
    Dashboard::load(api, user).await
}

/// Fetch a unit report and write it to `path`
pub async fn save_report(
    api: &ApiClient,
    kind: OrgUnitKind,
    unit_id: i64,
    path: &Path,
) -> Result<()> {
    let bytes = api.download_report(kind, unit_id).await?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), size = bytes.len(), "Report saved");
    Ok(())
}

/// Default file name for a downloaded report
pub fn report_path(dir: &Path, kind: OrgUnitKind, unit_id: i64, date: NaiveDate) -> PathBuf {
    dir.join(format!(
        "moodtrack-{}-{}-{}.pdf",
        kind.label().to_lowercase(),
        unit_id,
        date.format("%Y%m%d")
    ))
}

/// The page to fetch next, or `None` at either end of the list
pub fn step_page<T>(current: PageRequest, page: &Page<T>, forward: bool) -> Option<PageRequest> {
    if forward {
        let total = page.total_pages(current.page_size);
        (u64::from(current.page) < total).then(|| current.next())
    } else {
        (current.page > 1).then(|| current.previous())
    }
}

/// Inline text for a failed login
pub fn login_error_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ApiError>() {
        Some(ApiError::Unauthorized(_)) | Some(ApiError::Validation(_)) => {
            "Invalid username or password".to_string()
        }
        Some(api_err) => api_err.user_message(),
        None => format!("Login failed: {}", err),
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a username character should be accepted
pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

pub fn can_add_comment_char(current_len: usize, c: char) -> bool {
    current_len < MAX_COMMENT_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use moodtrack_core::dashboard::{ManagerDashboard, PersonalDashboard};
    use moodtrack_core::models::{Collaborator, EmotionOverview, Role};
    use moodtrack_core::{MemorySessionStore, Navigator};

    fn test_app() -> App {
        let config = Config::default();
        let toasts = ToastQueue::default();
        let redirect = LoginRedirect::new();
        let api = ApiClient::new(
            &config,
            Arc::new(MemorySessionStore::new()),
            Arc::new(toasts.clone()),
            Arc::new(redirect.clone()),
        )
        .expect("client");
        App::with_services(
            config,
            Services {
                api,
                toasts,
                redirect,
            },
        )
    }

    fn personal(role: Role) -> PersonalDashboard {
        PersonalDashboard {
            user: Collaborator {
                id: 1,
                username: "hery".into(),
                first_name: "Hery".into(),
                last_name: "Rabe".into(),
                email: None,
                role,
                team: None,
                company: None,
                cluster: None,
                manager: None,
            },
            overview: EmotionOverview::default(),
            today: Vec::new(),
            emotion_types: Vec::new(),
        }
    }

    fn page_of(count: u64) -> Page<Emotion> {
        Page {
            count,
            ..Page::default()
        }
    }

    // -------------------------------------------------------------------------
    // Tab Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_tabs_follow_dashboard_variant() {
        assert_eq!(Tab::for_dashboard(None), vec![Tab::Today, Tab::History]);

        let employee = Dashboard::Employee(personal(Role::Employee));
        assert_eq!(Tab::for_dashboard(Some(&employee)), vec![Tab::Today, Tab::History]);

        let manager = Dashboard::Manager(ManagerDashboard {
            personal: personal(Role::Manager),
            service: UnitSection::empty(OrgUnitKind::Service),
        });
        assert_eq!(
            Tab::for_dashboard(Some(&manager)),
            vec![Tab::Today, Tab::History, Tab::Team]
        );
    }

    #[test]
    fn test_tab_cycling_wraps() {
        let tabs = [Tab::Today, Tab::History, Tab::Team];
        assert_eq!(Tab::Today.next_in(&tabs), Tab::History);
        assert_eq!(Tab::Team.next_in(&tabs), Tab::Today);
        assert_eq!(Tab::Today.prev_in(&tabs), Tab::Team);
        // A tab that is not offered falls back to the first one
        assert_eq!(Tab::Units.next_in(&tabs), Tab::Today);
    }

    // -------------------------------------------------------------------------
    // Paging Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_step_page_bounds() {
        let page = page_of(23);
        let first = PageRequest::new(1, 10);
        assert_eq!(step_page(first, &page, false), None);
        assert_eq!(step_page(first, &page, true), Some(PageRequest::new(2, 10)));

        let last = PageRequest::new(3, 10);
        assert_eq!(step_page(last, &page, true), None);
        assert_eq!(step_page(last, &page, false), Some(PageRequest::new(2, 10)));

        assert_eq!(step_page(first, &page_of(0), true), None);
    }

    #[tokio::test]
    async fn test_stale_page_is_dropped() {
        let mut app = test_app();
        app.history_request = PageRequest::new(3, 10);

        let stale = Page {
            count: 42,
            ..Page::default()
        };
        app.process_task_result(TaskResult::History(0, PageRequest::new(2, 10), stale));
        assert_eq!(app.history.count, 0);

        let current = Page {
            count: 30,
            ..Page::default()
        };
        app.process_task_result(TaskResult::History(0, PageRequest::new(3, 10), current));
        assert_eq!(app.history.count, 30);
    }

    #[tokio::test]
    async fn test_dashboard_from_ended_session_is_dropped() {
        let mut app = test_app();
        let in_flight = app.generation;

        app.logout();
        assert_eq!(app.state, AppState::LoggingIn);

        let late = Dashboard::Employee(personal(Role::Employee));
        app.process_task_result(TaskResult::Dashboard(in_flight, Box::new(late)));
        assert!(app.dashboard.is_none());
        assert!(!app.loading);

        let late_page = Page {
            count: 12,
            ..Page::default()
        };
        let first = app.history_request;
        app.process_task_result(TaskResult::History(in_flight, first, late_page));
        assert_eq!(app.history.count, 0);
    }

    #[tokio::test]
    async fn test_dashboard_for_current_session_is_applied() {
        let mut app = test_app();
        let current = Dashboard::Employee(personal(Role::Employee));
        app.process_task_result(TaskResult::Dashboard(app.generation, Box::new(current)));
        assert!(app.dashboard.is_some());
    }

    // -------------------------------------------------------------------------
    // Session Tests
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_login_redirect_resets_to_login() {
        let mut app = test_app();
        app.dashboard = Some(Dashboard::Employee(personal(Role::Employee)));
        app.current_tab = Tab::History;

        app.check_login_redirect();
        assert_eq!(app.state, AppState::Normal);

        app.redirect.redirect_to_login();
        app.check_login_redirect();
        assert_eq!(app.state, AppState::LoggingIn);
        assert!(app.dashboard.is_none());
        assert_eq!(app.current_tab, Tab::Today);
        assert!(app.login_error.is_some());
    }

    #[test]
    fn test_login_error_message() {
        let err = anyhow::Error::new(ApiError::Unauthorized("No active account".into()));
        assert_eq!(login_error_message(&err), "Invalid username or password");

        let err = anyhow::Error::new(ApiError::ServerError(String::new()));
        assert_eq!(
            login_error_message(&err),
            "Something went wrong. Please try again."
        );
    }

    #[test]
    fn test_report_path() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 10).expect("valid date");
        let path = report_path(Path::new("/tmp/dl"), OrgUnitKind::Department, 7, date);
        assert_eq!(path, PathBuf::from("/tmp/dl/moodtrack-department-7-20250710.pdf"));
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_username_char() {
        assert!(can_add_username_char(0, 'a'));
        assert!(can_add_username_char(49, 'z'));
        assert!(!can_add_username_char(50, 'a'));
        assert!(!can_add_username_char(0, '\n'));
        assert!(!can_add_username_char(0, '\t'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(127, '!'));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\x00'));
    }

    #[test]
    fn test_can_add_comment_char() {
        assert!(can_add_comment_char(0, 'é'));
        assert!(!can_add_comment_char(200, 'a'));
        assert!(!can_add_comment_char(10, '\r'));
    }
}
