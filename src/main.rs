use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use consulting_evaluator::auth::{self, Session};
use consulting_evaluator::config::{self, Config};
use consulting_evaluator::costing::RateTable;
use consulting_evaluator::db::{self, MemoryStore, Store};
use consulting_evaluator::error::EvaluatorError;
use consulting_evaluator::export::{ExportFormat, ExportRow, Exporter};
use consulting_evaluator::form::{self, FormIntent, ProjectInput};
use consulting_evaluator::models::{ConsultantRate, Project};
use consulting_evaluator::ui::{
    components::Message,
    consultants::{self, render_consultants, ConsultantAction, ConsultantsState},
    login::{self, render_login, LoginAction, LoginState},
    project_wizard::{self, render_project_wizard, ProjectWizardAction, ProjectWizardState},
    projects::{self, render_projects, ProjectAction, ProjectsState},
    rate_wizard::{self, render_rate_wizard, RateWizardAction, RateWizardState},
    Navigation, Page,
};
use consulting_evaluator::workspace::{EvaluatedProject, Workspace};

#[derive(Parser)]
#[command(name = "consulting_evaluator", version, about = "Estimate consulting project profitability")]
struct Cli {
    /// Use a throwaway in-memory store instead of PostgreSQL
    #[arg(long)]
    in_memory: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Export every saved project without starting the UI
    Export {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,

        #[arg(long, value_enum, default_value_t = FormatArg::Both)]
        format: FormatArg,

        /// Defaults to EXPORT_DIR
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Spreadsheet,
    Document,
    Both,
}

impl FormatArg {
    fn formats(self) -> &'static [ExportFormat] {
        match self {
            FormatArg::Spreadsheet => &[ExportFormat::Spreadsheet],
            FormatArg::Document => &[ExportFormat::Document],
            FormatArg::Both => &[ExportFormat::Spreadsheet, ExportFormat::Document],
        }
    }
}

// Represents the current screen in the app. Every page after login carries the session.
enum AppScreen {
    Login,
    Authenticated(Session, Page),
}

// Main application state
struct AppState {
    store: Box<dyn Store>,
    config: Config,
    exporter: Exporter,
    screen: AppScreen,
    login_state: LoginState,
    project_wizard_state: Option<ProjectWizardState>,
    projects_state: Option<ProjectsState>,
    consultants_state: Option<ConsultantsState>,
    rate_wizard_state: Option<RateWizardState>,
}

impl AppState {
    fn new(store: Box<dyn Store>, config: Config, exporter: Exporter) -> Self {
        Self {
            store,
            config,
            exporter,
            screen: AppScreen::Login,
            login_state: LoginState::new(),
            project_wizard_state: None,
            projects_state: None,
            consultants_state: None,
            rate_wizard_state: None,
        }
    }

    fn logout(&mut self) {
        if let AppScreen::Authenticated(session, _) = &self.screen {
            info!(username = session.username(), "logged out");
        }
        self.screen = AppScreen::Login;
        self.login_state = LoginState::new();
        self.project_wizard_state = None;
        self.projects_state = None;
        self.consultants_state = None;
        self.rate_wizard_state = None;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::init()?;
    init_logging(&config.log_file)?;
    info!(in_memory = cli.in_memory, "starting consulting evaluator");

    if config.credentials().is_none() {
        warn!("APP_USERNAME / APP_PASSWORD are not set; every login will be refused");
    }

    let store = open_store(&config, cli.in_memory).await?;

    if let Some(Command::Export {
        username,
        password,
        format,
        output_dir,
    }) = cli.command
    {
        let output_dir = output_dir.unwrap_or_else(|| config.export_dir.clone());
        return run_export(&config, store.as_ref(), &username, &password, format, &output_dir).await;
    }

    println!("Initializing consulting evaluator...");
    let exporter = Exporter::new(&config.export_dir)?;

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app_state = AppState::new(store, config, exporter);

    let result = run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(%err, "application error");
        println!("Error: {}", err);
    }

    println!("Thanks for using Consulting Project Evaluator!");

    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

async fn open_store(config: &Config, in_memory: bool) -> Result<Box<dyn Store>> {
    if in_memory {
        warn!("using the in-memory store; nothing will be persisted");
        let store = MemoryStore::new();
        store.seed_default_rates().await?;
        return Ok(Box::new(store));
    }

    let db = db::init(config).await?;
    info!("database connection established");
    Ok(Box::new(db))
}

async fn run_export(
    config: &Config,
    store: &dyn Store,
    username: &str,
    password: &str,
    format: FormatArg,
    output_dir: &Path,
) -> Result<()> {
    let session = auth::authenticate(config, username, password)?;
    let workspace = Workspace::new(store, &session);

    let rows: Vec<ExportRow> = workspace
        .evaluated_projects()
        .await?
        .iter()
        .map(EvaluatedProject::export_row)
        .collect();

    let exporter = Exporter::new(output_dir)?;
    for format in format.formats() {
        let path = exporter.export(&rows, "all_projects", *format)?;
        println!("Wrote {} project(s) to {}", rows.len(), path.display());
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        // Render current screen
        terminal.draw(|f| match &app_state.screen {
            AppScreen::Login => render_login(f, &mut app_state.login_state),
            AppScreen::Authenticated(session, page) => {
                let user = session.username();
                match page {
                    Page::NewProject | Page::EditProject => {
                        if let Some(state) = &mut app_state.project_wizard_state {
                            render_project_wizard(f, state, user);
                        }
                    }
                    Page::SavedProjects => {
                        if let Some(state) = &mut app_state.projects_state {
                            render_projects(f, state, user);
                        }
                    }
                    Page::Consultants => {
                        if let Some(state) = &mut app_state.consultants_state {
                            render_consultants(f, state, user);
                        }
                    }
                    Page::RateEditor => {
                        if let Some(state) = &mut app_state.rate_wizard_state {
                            render_rate_wizard(f, state, user);
                        }
                    }
                }
            }
        })?;

        let current = match &app_state.screen {
            AppScreen::Login => None,
            AppScreen::Authenticated(session, page) => Some((session.clone(), *page)),
        };

        // Handle input for current screen
        let should_quit = match current {
            None => handle_login_screen(app_state).await?,
            Some((session, page)) => match page {
                Page::NewProject | Page::EditProject => {
                    handle_project_wizard_screen(app_state, &session).await?
                }
                Page::SavedProjects => handle_projects_screen(app_state, &session).await?,
                Page::Consultants => handle_consultants_screen(app_state, &session).await?,
                Page::RateEditor => handle_rate_wizard_screen(app_state, &session).await?,
            },
        };

        if should_quit {
            break;
        }
    }

    Ok(())
}

/// Load the data a page needs and make it current. Pages opened with data
/// already in hand (editors) only switch the screen.
async fn open_page(app_state: &mut AppState, session: &Session, page: Page) -> Result<(), EvaluatorError> {
    let workspace = Workspace::new(app_state.store.as_ref(), session);

    match page {
        Page::NewProject => {
            let rates = workspace.list_rates().await?;
            app_state.project_wizard_state = Some(ProjectWizardState::new(&rates));
        }
        Page::SavedProjects => {
            let projects = workspace.evaluated_projects().await?;
            app_state.projects_state = Some(ProjectsState::new(projects));
        }
        Page::Consultants => {
            let rates = workspace.list_rates().await?;
            app_state.consultants_state = Some(ConsultantsState::new(rates));
        }
        Page::EditProject | Page::RateEditor => {}
    }

    app_state.screen = AppScreen::Authenticated(session.clone(), page);
    Ok(())
}

/// Open `page`, or leave the current page in place with the error shown.
async fn switch_page(app_state: &mut AppState, session: &Session, page: Page) {
    if let Err(err) = open_page(app_state, session, page).await {
        error!(%err, ?page, "could not open page");
        set_message(app_state, Message::error(err));
    }
}

fn set_message(app_state: &mut AppState, message: Message) {
    let page = match &app_state.screen {
        AppScreen::Login => {
            app_state.login_state.set_message(message);
            return;
        }
        AppScreen::Authenticated(_, page) => *page,
    };

    match page {
        Page::NewProject | Page::EditProject => {
            if let Some(state) = &mut app_state.project_wizard_state {
                state.set_message(message);
            }
        }
        Page::SavedProjects => {
            if let Some(state) = &mut app_state.projects_state {
                state.set_message(message);
            }
        }
        Page::Consultants => {
            if let Some(state) = &mut app_state.consultants_state {
                state.set_message(message);
            }
        }
        Page::RateEditor => {
            if let Some(state) = &mut app_state.rate_wizard_state {
                state.set_message(message);
            }
        }
    }
}

async fn navigate(app_state: &mut AppState, session: &Session, navigation: Navigation) -> Result<bool> {
    match navigation {
        Navigation::Quit => return Ok(true),
        Navigation::Logout => app_state.logout(),
        Navigation::Open(page) => switch_page(app_state, session, page).await,
    }

    Ok(false)
}

async fn handle_login_screen(app_state: &mut AppState) -> Result<bool> {
    match login::handle_input(&mut app_state.login_state)? {
        Some(LoginAction::Quit) => return Ok(true),
        Some(LoginAction::Submit { username, password }) => {
            match auth::authenticate(&app_state.config, &username, &password) {
                Ok(session) => {
                    app_state.login_state = LoginState::new();
                    switch_page(app_state, &session, Page::NewProject).await;
                }
                Err(err) => {
                    app_state.login_state.reset_password();
                    app_state.login_state.set_message(Message::error(err));
                }
            }
        }
        None => {}
    }

    Ok(false)
}

async fn save_project(
    store: &dyn Store,
    session: &Session,
    input: &ProjectInput,
    rates: &RateTable,
) -> Result<i32, EvaluatorError> {
    let outcome = form::submit(input, rates, FormIntent::Save)?;
    match outcome.mutation {
        Some(mutation) => Workspace::new(store, session).apply(&mutation).await,
        None => Ok(input.id),
    }
}

async fn handle_project_wizard_screen(app_state: &mut AppState, session: &Session) -> Result<bool> {
    let Some(state) = &mut app_state.project_wizard_state else {
        return Ok(false);
    };

    match project_wizard::handle_input(state)? {
        Some(ProjectWizardAction::Navigate(navigation)) => {
            return navigate(app_state, session, navigation).await;
        }
        Some(ProjectWizardAction::Cancel) => {
            switch_page(app_state, session, Page::SavedProjects).await;
        }
        Some(ProjectWizardAction::Save(input)) => {
            let result = save_project(app_state.store.as_ref(), session, &input, state.rates()).await;
            match result {
                Ok(id) if input.id == 0 => {
                    state.set_message(Message::info(format!("Project saved! (ID: {})", id)));
                }
                Ok(_) => {
                    switch_page(app_state, session, Page::SavedProjects).await;
                    set_message(app_state, Message::info("Updated!"));
                }
                Err(err) => state.set_message(Message::error(err)),
            }
        }
        None => {}
    }

    Ok(false)
}

async fn load_project_for_edit(
    store: &dyn Store,
    session: &Session,
    id: i32,
) -> Result<(Project, Vec<ConsultantRate>), EvaluatorError> {
    let workspace = Workspace::new(store, session);
    let project = workspace.get_project(id).await?;
    let rates = workspace.list_rates().await?;
    Ok((project, rates))
}

async fn handle_projects_screen(app_state: &mut AppState, session: &Session) -> Result<bool> {
    let Some(state) = &mut app_state.projects_state else {
        return Ok(false);
    };

    match projects::handle_input(state)? {
        Some(ProjectAction::Navigate(navigation)) => {
            return navigate(app_state, session, navigation).await;
        }
        Some(ProjectAction::EditProject(id)) => {
            match load_project_for_edit(app_state.store.as_ref(), session, id).await {
                Ok((project, rates)) => {
                    app_state.project_wizard_state = Some(ProjectWizardState::from_existing(&project, &rates));
                    app_state.screen = AppScreen::Authenticated(session.clone(), Page::EditProject);
                }
                Err(err) => state.set_message(Message::error(err)),
            }
        }
        Some(ProjectAction::DeleteProject(id)) => {
            let result = Workspace::new(app_state.store.as_ref(), session)
                .delete_project(id)
                .await;
            match result {
                Ok(()) => {
                    switch_page(app_state, session, Page::SavedProjects).await;
                    set_message(app_state, Message::info("Deleted!"));
                }
                Err(err) => state.set_message(Message::error(err)),
            }
        }
        Some(ProjectAction::ExportSelected(id, format)) => {
            let rows: Vec<ExportRow> = state
                .projects()
                .iter()
                .filter(|evaluated| evaluated.project.id == id)
                .map(EvaluatedProject::export_row)
                .collect();
            let stem = rows.first().map(|row| row.name.clone()).unwrap_or_default();

            let message = match app_state.exporter.export(&rows, &stem, format) {
                Ok(path) => Message::info(format!("Exported to {}", path.display())),
                Err(err) => Message::error(err),
            };
            state.set_message(message);
        }
        Some(ProjectAction::ExportAll(format)) => {
            let rows: Vec<ExportRow> = state.projects().iter().map(EvaluatedProject::export_row).collect();

            let message = match app_state.exporter.export(&rows, "all_projects", format) {
                Ok(path) => Message::info(format!("Exported all projects to {}", path.display())),
                Err(err) => Message::error(err),
            };
            state.set_message(message);
        }
        None => {}
    }

    Ok(false)
}

async fn handle_consultants_screen(app_state: &mut AppState, session: &Session) -> Result<bool> {
    let Some(state) = &mut app_state.consultants_state else {
        return Ok(false);
    };

    match consultants::handle_input(state)? {
        Some(ConsultantAction::Navigate(navigation)) => {
            return navigate(app_state, session, navigation).await;
        }
        Some(ConsultantAction::NewRate) => {
            app_state.rate_wizard_state = Some(RateWizardState::new());
            switch_page(app_state, session, Page::RateEditor).await;
        }
        Some(ConsultantAction::EditRate(rate)) => {
            app_state.rate_wizard_state = Some(RateWizardState::from_existing(&rate));
            switch_page(app_state, session, Page::RateEditor).await;
        }
        Some(ConsultantAction::DeleteRate(role)) => {
            let result = Workspace::new(app_state.store.as_ref(), session)
                .delete_rate(&role)
                .await;
            match result {
                Ok(()) => {
                    switch_page(app_state, session, Page::Consultants).await;
                    set_message(app_state, Message::info("Deleted!"));
                }
                Err(err) => state.set_message(Message::error(err)),
            }
        }
        None => {}
    }

    Ok(false)
}

async fn handle_rate_wizard_screen(app_state: &mut AppState, session: &Session) -> Result<bool> {
    let Some(state) = &mut app_state.rate_wizard_state else {
        return Ok(false);
    };

    match rate_wizard::handle_input(state)? {
        Some(RateWizardAction::Cancel) => {
            switch_page(app_state, session, Page::Consultants).await;
        }
        Some(RateWizardAction::Save(rate)) => {
            let result = Workspace::new(app_state.store.as_ref(), session)
                .upsert_rate(&rate)
                .await;
            match result {
                Ok(()) => {
                    switch_page(app_state, session, Page::Consultants).await;
                    set_message(app_state, Message::info("Saved!"));
                }
                Err(err) => state.set_message(Message::error(err)),
            }
        }
        None => {}
    }

    Ok(false)
}
