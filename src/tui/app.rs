use std::io;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::backend::{Backend, BackendError, RestBackend};
use crate::io::config_io::{default_config_path, load_config, require_backend};
use crate::io::session_store::SessionStore;
use crate::model::{Config, Notification, SessionEvent, StatusFilter, Task};
use crate::ops::auth_ops::{self, PasswordStrength};
use crate::ops::session_gate::{self, Route, Screen};
use crate::ops::task_store::{TaskStore, outcome_notification};

use super::form::{EditorState, LoginForm, SignupForm};
use super::input;
use super::render;
use super::theme::Theme;

/// Main application state
pub struct App {
    backend: Box<dyn Backend>,
    session_events: Receiver<SessionEvent>,
    pub screen: Screen,
    pub login: LoginForm,
    pub signup: SignupForm,
    /// Present while the task screen is showing
    pub store: Option<TaskStore>,
    /// Email of the signed-in user, for the header
    pub user_email: Option<String>,
    pub filter: StatusFilter,
    /// Index into the filtered list
    pub cursor: usize,
    /// Open task editor modal
    pub editor: Option<EditorState>,
    pub notification: Option<Notification>,
    pub notification_ttl: Duration,
    pub theme: Theme,
    pub should_quit: bool,
}

impl App {
    /// Build the app and run the session gate for the initial screen
    pub fn new(mut backend: Box<dyn Backend>, config: &Config) -> Self {
        let session_events = backend.subscribe();
        let mut app = App {
            backend,
            session_events,
            screen: Screen::Login,
            login: LoginForm::default(),
            signup: SignupForm::default(),
            store: None,
            user_email: None,
            filter: StatusFilter::All,
            cursor: 0,
            editor: None,
            notification: None,
            notification_ttl: Duration::from_secs(config.ui.notification_secs),
            theme: Theme::from_config(&config.ui),
            should_quit: false,
        };
        let route = session_gate::check(app.backend.as_mut(), app.screen);
        app.apply_route(route);
        app
    }

    fn apply_route(&mut self, route: Route) {
        match route {
            Route::Stay => {}
            Route::ToLogin => {
                self.screen = Screen::Login;
                self.store = None;
                self.user_email = None;
                self.editor = None;
                self.cursor = 0;
                self.filter = StatusFilter::All;
            }
            Route::ToTasks { user_id } => {
                self.screen = Screen::Tasks;
                self.login = LoginForm::default();
                self.signup = SignupForm::default();
                self.user_email = self.backend.get_session().and_then(|s| s.email);
                let mut store = TaskStore::new(user_id);
                let loaded = store.load(self.backend.as_mut());
                self.store = Some(store);
                self.report_load(loaded);
                self.cursor = 0;
            }
        }
    }

    fn report_load(&mut self, loaded: Result<usize, BackendError>) {
        if let Err(e) = loaded {
            tracing::warn!(error = %e, "failed to load tasks");
            self.notify(Notification::failure("Error", e.to_string()));
        }
    }

    /// Re-run the gate for every session change announced since the last call
    pub fn sync_session(&mut self) {
        while let Ok(event) = self.session_events.try_recv() {
            let route = session_gate::route(event.session(), self.screen);
            self.apply_route(route);
        }
    }

    /// Show a screen and re-check the session, as when following a link
    pub fn navigate(&mut self, screen: Screen) {
        self.screen = screen;
        let route = session_gate::check(self.backend.as_mut(), screen);
        self.apply_route(route);
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }

    /// Drop an expired notification
    pub fn tick(&mut self, now: Instant) {
        if let Some(n) = &self.notification
            && n.is_expired(now, self.notification_ttl)
        {
            self.notification = None;
        }
    }

    pub fn submit_login(&mut self) {
        let email = self.login.email.value.trim().to_string();
        let password = self.login.password.value.clone();
        let result = auth_ops::login(self.backend.as_mut(), &email, &password);
        self.notify(auth_ops::login_notification(&result));
        self.sync_session();
    }

    pub fn submit_signup(&mut self) {
        let full_name = self.signup.full_name.value.trim().to_string();
        let email = self.signup.email.value.trim().to_string();
        let password = self.signup.password.value.clone();
        let result = auth_ops::signup(self.backend.as_mut(), &full_name, &email, &password);
        self.notify(auth_ops::signup_notification(&result));
        if matches!(result, Ok(None)) {
            self.screen = Screen::Login;
        }
        self.sync_session();
    }

    pub fn logout(&mut self) {
        let notification = auth_ops::logout(self.backend.as_mut());
        self.notify(notification);
        self.sync_session();
        // a backend that never announces sign-out still leaves no session behind
        let route = session_gate::check(self.backend.as_mut(), self.screen);
        self.apply_route(route);
    }

    /// Password strength for the signup form's hint
    pub fn signup_strength(&self) -> Option<PasswordStrength> {
        PasswordStrength::classify(&self.signup.password.value)
    }

    /// Tasks under the active filter, in display order
    pub fn visible_tasks(&self) -> Vec<&Task> {
        match &self.store {
            Some(store) => store.filtered(self.filter),
            None => Vec::new(),
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.visible_tasks().get(self.cursor).copied()
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
        self.clamp_cursor();
    }

    pub fn cycle_filter(&mut self, forward: bool) {
        let all = StatusFilter::ALL;
        let idx = all.iter().position(|f| *f == self.filter).unwrap_or(0);
        let next = if forward {
            (idx + 1) % all.len()
        } else {
            (idx + all.len() - 1) % all.len()
        };
        self.set_filter(all[next]);
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.visible_tasks().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
    }

    fn clamp_cursor(&mut self) {
        let len = self.visible_tasks().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn open_create(&mut self) {
        self.editor = Some(EditorState::for_create(Local::now().date_naive()));
    }

    pub fn open_edit(&mut self) {
        if let Some(task) = self.selected_task() {
            self.editor = Some(EditorState::for_edit(task));
        }
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    /// Submit the editor. The modal stays open when a required field is
    /// missing or the backend rejects the change.
    pub fn submit_editor(&mut self) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let Ok(draft) = editor.submit() else {
            return;
        };
        let editing = editor.editing.clone();
        let creating = editing.is_none();
        let Some(store) = self.store.as_mut() else {
            return;
        };

        let notification = match editing {
            None => {
                let result = store.create(self.backend.as_mut(), draft);
                outcome_notification(&result, "Task created", "Your new task has been added")
            }
            Some(id) => {
                let result = store.update(self.backend.as_mut(), &id, draft);
                outcome_notification(
                    &result,
                    "Task updated",
                    "Your task has been updated successfully",
                )
            }
        };
        if !notification.is_failure() {
            self.editor = None;
            if creating {
                self.cursor = 0;
            }
            self.clamp_cursor();
        }
        self.notify(notification);
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id.clone()) else {
            return;
        };
        let Some(store) = self.store.as_mut() else {
            return;
        };
        let result = store.delete(self.backend.as_mut(), &id);
        let notification = outcome_notification(&result, "Task deleted", "Task has been removed");
        self.clamp_cursor();
        self.notify(notification);
    }

    /// Fetch the list again
    pub fn reload(&mut self) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        let loaded = store.load(self.backend.as_mut());
        self.report_load(loaded);
        self.clamp_cursor();
    }
}

/// Run the TUI application
pub fn run(config_path: Option<std::path::PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let path = config_path.unwrap_or_else(default_config_path);
    let config = load_config(&path)?;
    require_backend(&config)?;
    let backend = RestBackend::new(&config.backend, Some(SessionStore::default_location()));

    let mut app = App::new(Box::new(backend), &config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;
    terminal.clear()?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.sync_session();
        app.tick(Instant::now());
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
