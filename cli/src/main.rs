//! Dhriti.AI Console - command-line dashboard
//!
//! Every view of the platform's web dashboard is a subcommand here, and
//! navigation runs through the same role-based guard the web app used:
//! asking for a view you cannot see lands you where your role belongs.
//!
//! ```sh
//! # Sign in against the configured backend
//! dhriti login --email you@company.com
//!
//! # Admin views
//! dhriti dashboard
//! dhriti users list experts
//! dhriti projects create --name "Imaging" --default-time 12
//!
//! # Worker home
//! dhriti tasks
//!
//! # Navigate like the web router (redirects included)
//! dhriti open /dashboard
//! ```

mod render;

use std::io::{self, Write as _};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::error;

use dhriti_console::api::dto::{AssignmentRequest, ProjectCreate};
use dhriti_console::api::{DhritiApi, HttpApi};
use dhriti_console::guard::{self, Route};
use dhriti_console::session::{FileTokenStore, SessionStore};
use dhriti_console::table::{RowActions, TableView};
use dhriti_console::views::users::UserForm;
use dhriti_console::views::{
    DashboardController, LoginFlow, ProjectsController, TasksController, UsersController,
};
use dhriti_console::{default_config_path, AppConfig, Error, Role};

use render::print_table;

/// Dhriti.AI Console - role-aware client for the task-annotation platform.
#[derive(Parser, Debug)]
#[command(
    name = "dhriti",
    version,
    about = "Dhriti.AI Console — dashboard for the task-annotation platform",
    long_about = "Client for the Dhriti.AI task-annotation platform.\n\n\
                  Default config: ~/.config/dhriti-console/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "DHRITI_CONFIG")]
    config: Option<PathBuf>,

    /// Override the backend base URL.
    #[arg(long)]
    api_url: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the session token.
    Login {
        #[arg(long)]
        email: String,
        /// Prompted for when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// Clear the stored session.
    Logout,
    /// Show who the stored session belongs to.
    Whoami,
    /// Navigate to a path the way the web router would.
    Open {
        path: String,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Platform metrics overview (admin).
    Dashboard,
    /// Project management (admin).
    Projects {
        #[command(subcommand)]
        command: Option<ProjectsCommand>,
    },
    /// User management (admin).
    Users {
        #[command(subcommand)]
        command: Option<UsersCommand>,
    },
    /// Your assigned projects and recent reviews.
    Tasks {
        #[command(flatten)]
        view: ViewArgs,
    },
}

#[derive(Args, Debug, Default, Clone)]
struct ViewArgs {
    /// Filter rows by a search query.
    #[arg(short, long)]
    query: Option<String>,

    /// Page to show.
    #[arg(short, long)]
    page: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum ProjectsCommand {
    /// List projects.
    List {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Create a project.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "Active")]
        status: String,
        /// Default average task time in minutes.
        #[arg(long)]
        default_time: Option<i64>,
    },
    /// Assign a project to a user.
    Assign {
        #[arg(long)]
        project_id: i64,
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        avg_time: Option<i64>,
        #[arg(long)]
        completed: Option<i64>,
        #[arg(long)]
        pending: Option<i64>,
    },
}

#[derive(Subcommand, Debug)]
enum UsersCommand {
    /// List users on a role tab.
    List {
        #[arg(value_enum, default_value_t = Tab::Admins)]
        tab: Tab,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Add a user to a role tab.
    Create {
        #[arg(value_enum)]
        tab: Tab,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long, default_value = "Active")]
        status: String,
        /// Prompted for when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// Edit a user. Omitted fields keep their current value.
    Update {
        #[arg(value_enum)]
        tab: Tab,
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        status: Option<String>,
        /// Leave out to keep the current password.
        #[arg(long)]
        password: Option<String>,
    },
    /// Delete a user (asks for confirmation).
    Delete {
        #[arg(value_enum)]
        tab: Tab,
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

/// Role sub-tabs of the users view.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Tab {
    Admins,
    Experts,
    Vendors,
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Admins => "admins",
            Self::Experts => "experts",
            Self::Vendors => "vendors",
        };
        f.write_str(label)
    }
}

impl Tab {
    fn role(self) -> Role {
        match self {
            Self::Admins => Role::Admin,
            Self::Experts => Role::Expert,
            Self::Vendors => Role::Vendor,
        }
    }

    fn path(self) -> &'static str {
        match self {
            Self::Admins => "/users/admins",
            Self::Experts => "/users/experts",
            Self::Vendors => "/users/vendors",
        }
    }
}

fn init_tracing(config: &AppConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with_writer(io::stderr)
        .init();
}

struct App {
    config: AppConfig,
    api: Arc<dyn DhritiApi>,
    session: Arc<SessionStore>,
}

impl App {
    fn new(config: AppConfig) -> Result<Self, Error> {
        let api: Arc<dyn DhritiApi> = Arc::new(HttpApi::from_config(&config.api)?);
        let session = Arc::new(SessionStore::new(Box::new(FileTokenStore::new(
            config.session.file_path(),
        ))));
        Ok(Self {
            config,
            api,
            session,
        })
    }

    fn rows_per_page(&self) -> usize {
        self.config.ui.rows_per_page
    }

    /// Resolve a path through the guard. Prints a note when the session
    /// lands somewhere other than what it asked for.
    fn navigate(&self, path: &str) -> (Route, Option<String>) {
        let requested = Route::match_path(path);
        let (terminal, return_to) = guard::resolve(&self.session.snapshot(), path);
        if terminal != requested && !matches!(requested, Route::Home) {
            println!("-> {}", terminal.path());
        }
        (terminal, return_to)
    }

    async fn open(&self, path: &str, view: &ViewArgs) -> Result<(), Error> {
        let (route, return_to) = self.navigate(path);
        match route {
            Route::Login => {
                self.print_login_hint(return_to);
                Ok(())
            }
            Route::Dashboard => self.show_dashboard().await,
            Route::Users => self.show_users(Tab::Admins, view).await,
            Route::Projects | Route::ProjectNew => self.show_projects(view).await,
            Route::Tasks => self.show_tasks(view).await,
            // resolve() only terminates on renderable routes.
            Route::Home => unreachable!("home is a pure dispatcher"),
        }
    }

    fn print_login_hint(&self, return_to: Option<String>) {
        println!("You are not signed in.");
        println!("Sign in with: dhriti login --email you@company.com");
        if let Some(path) = return_to {
            println!("Then come back with: dhriti open {path}");
        }
    }

    /// Guard gate for mutating subcommands: only proceed when the session
    /// actually renders the view the action belongs to.
    fn can_act_on(&self, path: &str) -> bool {
        let (route, return_to) = self.navigate(path);
        if route == Route::match_path(path) {
            return true;
        }
        if route == Route::Login {
            self.print_login_hint(return_to);
        } else {
            println!("Your role cannot manage {path}.");
        }
        false
    }

    async fn login(&self, email: &str, password: Option<String>) -> Result<(), Error> {
        let password = match password {
            Some(password) => password,
            None => prompt("Password: ")?,
        };
        let flow = LoginFlow::new(self.api.clone(), self.session.clone());
        let landing = flow.sign_in(email, &password).await?;
        println!("Signed in as {email}.");
        println!("Your home view: dhriti open {}", landing.path());
        Ok(())
    }

    fn logout(&self) -> Result<(), Error> {
        LoginFlow::new(self.api.clone(), self.session.clone()).sign_out()?;
        println!("Signed out.");
        Ok(())
    }

    async fn whoami(&self) -> Result<(), Error> {
        let token = self.session.token().ok_or(Error::AuthRequired)?;
        let who = self.api.whoami(&token).await?;
        println!("Email : {}", who.email);
        let role = self
            .session
            .role()
            .map(|r| r.to_string())
            .or(who.role)
            .unwrap_or_else(|| "unknown".to_string());
        println!("Role  : {role}");
        Ok(())
    }

    async fn show_dashboard(&self) -> Result<(), Error> {
        let controller = DashboardController::new(self.api.clone(), self.session.clone());
        controller.refresh().await?;
        println!("Dashboard — overview of your platform metrics");
        println!();
        print_table(&controller.table().render_page());
        Ok(())
    }

    async fn show_projects(&self, view: &ViewArgs) -> Result<(), Error> {
        let controller = ProjectsController::new(self.api.clone(), self.session.clone());
        controller.refresh().await?;
        let mut table = controller.table(self.rows_per_page());
        apply_view(&mut table, view);
        println!("Projects");
        println!();
        print_table(&table.render_page());
        Ok(())
    }

    async fn show_users(&self, tab: Tab, view: &ViewArgs) -> Result<(), Error> {
        let controller =
            UsersController::new(self.api.clone(), self.session.clone(), tab.role());
        controller.refresh().await?;
        let mut table = controller.table(self.rows_per_page());
        apply_view(&mut table, view);
        println!("Users — {}", tab.role().plural_label());
        println!();
        print_table(&table.render_page());
        Ok(())
    }

    async fn show_tasks(&self, view: &ViewArgs) -> Result<(), Error> {
        let controller = TasksController::new(self.api.clone(), self.session.clone());
        controller.refresh().await?;

        let overview = controller.overview();
        println!("Welcome back — let's get some tasks done.");
        println!();
        println!("Assigned projects : {}", overview.assigned_projects);
        println!("Tasks completed   : {}", overview.tasks_completed);
        println!("Tasks pending     : {}", overview.tasks_pending);
        println!("Average rating    : {}", overview.avg_rating_label());
        println!();

        let mut table = controller.table(self.rows_per_page());
        apply_view(&mut table, view);
        print_table(&table.render_page());

        let reviews = controller.recent_reviews();
        if !reviews.is_empty() {
            println!();
            println!("Recent reviews");
            for review in reviews.iter().take(5) {
                println!(
                    "  {} — ★ {:.1}  {}",
                    review.project_name,
                    review.rating,
                    review.comment.as_deref().unwrap_or("")
                );
            }
        }
        Ok(())
    }

    async fn create_project(
        &self,
        name: String,
        status: String,
        default_time: Option<i64>,
    ) -> Result<(), Error> {
        if !self.can_act_on("/projects/new") {
            return Ok(());
        }
        let controller = ProjectsController::new(self.api.clone(), self.session.clone());
        let created = controller
            .create(&ProjectCreate {
                name,
                status,
                default_avg_task_time_minutes: default_time,
            })
            .await?;
        println!("Created project #{} {}", created.id, created.name);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn assign_project(
        &self,
        project_id: i64,
        user_id: i64,
        status: Option<String>,
        avg_time: Option<i64>,
        completed: Option<i64>,
        pending: Option<i64>,
    ) -> Result<(), Error> {
        if !self.can_act_on("/projects") {
            return Ok(());
        }
        let controller = ProjectsController::new(self.api.clone(), self.session.clone());
        let assignment = controller
            .assign(&AssignmentRequest {
                user_id,
                project_id,
                status,
                avg_task_time_minutes: avg_time,
                completed_tasks: completed,
                pending_tasks: pending,
            })
            .await?;
        println!(
            "Assigned project {} to user {} (assignment #{})",
            assignment.project_id, assignment.user_id, assignment.assignment_id
        );
        Ok(())
    }

    async fn create_user(
        &self,
        tab: Tab,
        name: String,
        email: String,
        phone: Option<String>,
        status: String,
        password: Option<String>,
    ) -> Result<(), Error> {
        if !self.can_act_on(tab.path()) {
            return Ok(());
        }
        let password = match password {
            Some(password) => password,
            None => prompt("Password: ")?,
        };
        let controller =
            UsersController::new(self.api.clone(), self.session.clone(), tab.role());
        let created = controller
            .create(&UserForm {
                name,
                email,
                phone,
                status,
                password,
            })
            .await?;
        println!("Created {} #{} {}", created.role, created.id, created.email);
        Ok(())
    }

    async fn update_user(
        &self,
        tab: Tab,
        id: i64,
        name: Option<String>,
        phone: Option<String>,
        status: Option<String>,
        password: Option<String>,
    ) -> Result<(), Error> {
        if !self.can_act_on(tab.path()) {
            return Ok(());
        }
        let controller =
            UsersController::new(self.api.clone(), self.session.clone(), tab.role());
        controller.refresh().await?;
        let Some(current) = controller.find(id) else {
            return Err(Error::Validation(format!(
                "No {} with id {id}.",
                tab.role()
            )));
        };

        let form = UserForm {
            name: name.or(current.name).unwrap_or_default(),
            email: current.email,
            phone: phone.or(current.phone),
            status: status
                .or(current.status)
                .unwrap_or_else(|| "Active".to_string()),
            password: password.unwrap_or_default(),
        };
        let updated = controller.update(id, &form).await?;
        println!("Updated {} #{}", updated.role, updated.id);
        Ok(())
    }

    async fn delete_user(&self, tab: Tab, id: i64, yes: bool) -> Result<(), Error> {
        if !self.can_act_on(tab.path()) {
            return Ok(());
        }
        let controller =
            UsersController::new(self.api.clone(), self.session.clone(), tab.role());
        controller.refresh().await?;
        if controller.find(id).is_none() {
            return Err(Error::Validation(format!(
                "No {} with id {id}.",
                tab.role()
            )));
        }

        // The actions column carries the delete capability; the row only
        // reaches the callback after the confirmation step.
        let target: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
        let sink = target.clone();
        let actions = RowActions {
            edit: None,
            delete: Some(Box::new(move |row| {
                let label = row
                    .get("email")
                    .and_then(Value::as_str)
                    .unwrap_or_else(|| row.id())
                    .to_string();
                *sink.lock().unwrap() = Some(label);
            })),
        };
        let mut table = controller.table(self.rows_per_page()).with_actions(actions);

        let mut confirm = |row: &dhriti_console::table::Row| {
            if yes {
                return true;
            }
            let email = row
                .get("email")
                .and_then(Value::as_str)
                .unwrap_or("this user");
            confirm_prompt(&format!("Delete {email}?"))
        };

        if !table.delete(&id.to_string(), &mut confirm) {
            println!("Delete cancelled.");
            return Ok(());
        }

        controller.delete(id).await?;
        let label = target
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| id.to_string());
        println!("Deleted {label}");
        Ok(())
    }
}

fn apply_view(table: &mut TableView, view: &ViewArgs) {
    if let Some(query) = &view.query {
        table.set_query(query.clone());
    }
    if let Some(page) = view.page {
        table.goto(page);
    }
}

fn prompt(label: &str) -> Result<String, Error> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn confirm_prompt(question: &str) -> bool {
    print!("{question} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim(), "y" | "Y" | "yes" | "Yes")
}

async fn run(cli: Cli, config: AppConfig, config_path: &std::path::Path) -> Result<(), Error> {
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file  : {}", config_path.display());
        println!("   API URL      : {}", config.api.base_url);
        println!("   Session file : {}", config.session.file_path().display());
        println!("   Rows per page: {}", config.ui.rows_per_page);
        println!("   Log level    : {}", config.logging.level);
        return Ok(());
    }

    let app = App::new(config)?;

    match cli.command {
        None => app.open("/", &ViewArgs::default()).await,
        Some(Command::Login { email, password }) => app.login(&email, password).await,
        Some(Command::Logout) => app.logout(),
        Some(Command::Whoami) => app.whoami().await,
        Some(Command::Open { path, view }) => app.open(&path, &view).await,
        Some(Command::Dashboard) => app.open("/dashboard", &ViewArgs::default()).await,
        Some(Command::Tasks { view }) => app.open("/tasks", &view).await,
        Some(Command::Projects { command }) => {
            let command = command.unwrap_or(ProjectsCommand::List {
                view: ViewArgs::default(),
            });
            match command {
                ProjectsCommand::List { view } => app.open("/projects", &view).await,
                ProjectsCommand::Create {
                    name,
                    status,
                    default_time,
                } => app.create_project(name, status, default_time).await,
                ProjectsCommand::Assign {
                    project_id,
                    user_id,
                    status,
                    avg_time,
                    completed,
                    pending,
                } => {
                    app.assign_project(project_id, user_id, status, avg_time, completed, pending)
                        .await
                }
            }
        }
        Some(Command::Users { command }) => match command {
            None => app.open("/users", &ViewArgs::default()).await,
            Some(UsersCommand::List { tab, view }) => {
                let (route, return_to) = app.navigate(tab.path());
                match route {
                    Route::Users => app.show_users(tab, &view).await,
                    Route::Login => {
                        app.print_login_hint(return_to);
                        Ok(())
                    }
                    _ => app.open(route.path(), &view).await,
                }
            }
            Some(UsersCommand::Create {
                tab,
                name,
                email,
                phone,
                status,
                password,
            }) => {
                app.create_user(tab, name, email, phone, status, password)
                    .await
            }
            Some(UsersCommand::Update {
                tab,
                id,
                name,
                phone,
                status,
                password,
            }) => app.update_user(tab, id, name, phone, status, password).await,
            Some(UsersCommand::Delete { tab, id, yes }) => app.delete_user(tab, id, yes).await,
        },
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = match AppConfig::load(&config_path) {
        Ok(config) => config,
        Err(_) if !config_path.exists() => AppConfig::default(),
        Err(e) => {
            eprintln!("Failed to load config from {}: {e}", config_path.display());
            eprintln!("Using default configuration.");
            AppConfig::default()
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(url) = cli.api_url.clone() {
        config.api.base_url = url;
    }
    if let Some(level) = cli.log_level.clone() {
        config.logging.level = level;
    }

    init_tracing(&config);

    if let Err(e) = run(cli, config, &config_path).await {
        error!("{e}");
        if e.is_auth() {
            eprintln!("Sign in with: dhriti login --email you@company.com");
        }
        std::process::exit(1);
    }
}
