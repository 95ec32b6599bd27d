use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use jrats::config::{self, ClientConfig, ConfigError};
use jrats::hooks::ApiWithDelay;
use jrats::net::types::{AdvanceAction, ApplicantSignup, NewJob, RecruiterSignup, ResumeUpload};
use jrats::net::{ApiClient, ApiError, JratsApi};
use jrats::pages::{
    AllJobsPage, ApplicantDashboard, InterviewSchedulerPage, LoginPage, RecruiterDashboard, SignupForm, SignupPage,
    interview_scheduler,
};
use jrats::routes::{self, Page};
use jrats::state::{RestoreOutcome, SessionStore};
use jrats::util::storage::FileTokenStorage;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("{0}")]
    Page(String),
    #[error("{path} is not available in this session (redirected to {target})")]
    Redirected { path: String, target: String },
    #[error("session restore did not finish")]
    Pending,
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "jrats", about = "JRATS job-recruitment client")]
struct Cli {
    #[arg(long, env = "JRATS_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "JRATS_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    /// Minimum time page loads take, in milliseconds.
    #[arg(long, env = "JRATS_MIN_LATENCY_MS")]
    min_latency_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session.
    Login {
        email: String,
        #[arg(long, env = "JRATS_PASSWORD")]
        password: String,
    },
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Show which page a path renders for the current session.
    Route { path: String },
    /// Show the signed-in user's dashboard.
    Dashboard,
    Jobs(JobsCommand),
    Applications(ApplicationsCommand),
    Signup(SignupCommand),
    /// Book an interview slot from an invitation link token.
    Schedule {
        token: String,
        /// RFC 3339 time, e.g. 2026-11-02T14:30:00Z.
        #[arg(long)]
        at: String,
    },
}

#[derive(Args, Debug)]
struct JobsCommand {
    #[command(subcommand)]
    command: JobsSubcommand,
}

#[derive(Subcommand, Debug)]
enum JobsSubcommand {
    List,
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        location: String,
    },
}

#[derive(Args, Debug)]
struct ApplicationsCommand {
    #[command(subcommand)]
    command: ApplicationsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ApplicationsSubcommand {
    List,
    Show { id: i64 },
    Apply { job_id: i64 },
    Invite { id: i64 },
    Reject { id: i64 },
}

#[derive(Args, Debug)]
struct SignupCommand {
    #[command(subcommand)]
    command: SignupSubcommand,
}

#[derive(Args, Debug)]
struct AccountArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    #[arg(long, env = "JRATS_PASSWORD")]
    password: String,
}

#[derive(Subcommand, Debug)]
enum SignupSubcommand {
    Applicant {
        #[command(flatten)]
        account: AccountArgs,
        #[arg(long, default_value = "")]
        skills: String,
        #[arg(long)]
        resume: Option<PathBuf>,
    },
    Recruiter {
        #[command(flatten)]
        account: AccountArgs,
        #[arg(long)]
        company_name: String,
    },
}

struct CliContext {
    api: Arc<dyn JratsApi>,
    session: Arc<SessionStore>,
    min_latency: Duration,
}

impl CliContext {
    fn hook(&self) -> ApiWithDelay {
        ApiWithDelay::new(self.min_latency)
    }

    /// Resolve `path` for the current session and require it to render
    /// `expected` without redirects.
    fn enter(&self, path: &str, expected: &Page) -> Result<(), CliError> {
        let dest = routes::follow(path, &self.session.snapshot()).ok_or(CliError::Pending)?;
        if &dest.page == expected {
            Ok(())
        } else {
            Err(CliError::Redirected { path: path.to_owned(), target: dest.path })
        }
    }

    /// The page `/` lands on for the current session.
    fn home(&self) -> Result<Page, CliError> {
        routes::follow("/", &self.session.snapshot()).map(|dest| dest.page).ok_or(CliError::Pending)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_url = config::parse_api_url(&url)?;
    }
    if let Some(path) = cli.token_file {
        config.token_file = path;
    }
    if let Some(ms) = cli.min_latency_ms {
        config.min_latency = Duration::from_millis(ms);
    }

    let storage = Arc::new(FileTokenStorage::new(config.token_file.clone()));
    let api: Arc<dyn JratsApi> = Arc::new(ApiClient::new(&config.api_url, storage.clone())?);
    let session = Arc::new(SessionStore::new(Arc::clone(&api), storage));
    match session.restore().await {
        RestoreOutcome::Expired => eprintln!("stored session expired; sign in again"),
        RestoreOutcome::Offline(e) => eprintln!("could not reach the server to restore the session: {e}"),
        RestoreOutcome::NoSession | RestoreOutcome::Restored(_) => {}
    }

    let ctx = CliContext { api, session, min_latency: config.min_latency };

    match cli.command {
        Command::Login { email, password } => run_login(&ctx, &email, &password).await,
        Command::Logout => {
            ctx.session.logout();
            println!("signed out");
            Ok(())
        }
        Command::Whoami => match ctx.session.user() {
            Some(user) => print_json(&user),
            None => Err(CliError::Page("not signed in".to_owned())),
        },
        Command::Route { path } => {
            let dest = routes::follow(&path, &ctx.session.snapshot()).ok_or(CliError::Pending)?;
            print_json(&json!({ "path": dest.path, "page": format!("{:?}", dest.page) }))
        }
        Command::Dashboard => run_dashboard(&ctx).await,
        Command::Jobs(jobs) => run_jobs(&ctx, jobs).await,
        Command::Applications(applications) => run_applications(&ctx, applications).await,
        Command::Signup(signup) => run_signup(&ctx, signup).await,
        Command::Schedule { token, at } => run_schedule(&ctx, token, &at).await,
    }
}

async fn run_login(ctx: &CliContext, email: &str, password: &str) -> Result<(), CliError> {
    ctx.enter("/login", &Page::Login)?;
    let page = LoginPage::new(Arc::clone(&ctx.session), ctx.hook());
    match page.submit(email, password).await {
        Ok(landing) => print_json(&json!({ "user": ctx.session.user(), "landing": landing })),
        Err(e) => Err(page_failure(page.error(), e)),
    }
}

async fn run_dashboard(ctx: &CliContext) -> Result<(), CliError> {
    match ctx.home()? {
        Page::RecruiterDashboard => {
            let page = recruiter_page(ctx).await?;
            print_json(&page.view().applications)
        }
        Page::ApplicantDashboard => {
            let page = applicant_page(ctx).await?;
            print_json(&page.view())
        }
        _ => Err(CliError::Page("not signed in".to_owned())),
    }
}

async fn run_jobs(ctx: &CliContext, jobs: JobsCommand) -> Result<(), CliError> {
    match jobs.command {
        JobsSubcommand::List => {
            ctx.enter("/jobs", &Page::AllJobs)?;
            let page = AllJobsPage::new(Arc::clone(&ctx.api), Arc::clone(&ctx.session), ctx.hook());
            page.load().await?;
            print_json(&page.view().jobs)
        }
        JobsSubcommand::Create { title, description, location } => {
            ctx.enter("/recruiter/dashboard", &Page::RecruiterDashboard)?;
            let page = RecruiterDashboard::new(Arc::clone(&ctx.api), Arc::clone(&ctx.session), ctx.hook());
            match page.create_job(&NewJob { title, description, location }).await {
                Ok(job) => print_json(&job),
                Err(e) => Err(page_failure(page.view().notice, e)),
            }
        }
    }
}

async fn run_applications(ctx: &CliContext, applications: ApplicationsCommand) -> Result<(), CliError> {
    match applications.command {
        ApplicationsSubcommand::List => run_dashboard(ctx).await,
        ApplicationsSubcommand::Show { id } => {
            ctx.enter("/recruiter/dashboard", &Page::RecruiterDashboard)?;
            let page = RecruiterDashboard::new(Arc::clone(&ctx.api), Arc::clone(&ctx.session), ctx.hook());
            match page.open_detail(id).await {
                Ok(detail) => print_json(&detail),
                Err(e) => Err(page_failure(page.view().notice, e)),
            }
        }
        ApplicationsSubcommand::Apply { job_id } => {
            let page = applicant_page(ctx).await?;
            match page.apply(job_id).await {
                Ok(application) => print_json(&application),
                Err(e) => Err(page_failure(page.notice(), e)),
            }
        }
        ApplicationsSubcommand::Invite { id } => advance(ctx, id, AdvanceAction::Invite).await,
        ApplicationsSubcommand::Reject { id } => advance(ctx, id, AdvanceAction::Reject).await,
    }
}

async fn advance(ctx: &CliContext, id: i64, action: AdvanceAction) -> Result<(), CliError> {
    let page = recruiter_page(ctx).await?;
    match page.advance(id, action).await {
        Ok(()) => print_json(&page.view().applications),
        Err(e) => Err(page_failure(page.view().notice, e)),
    }
}

async fn run_signup(ctx: &CliContext, signup: SignupCommand) -> Result<(), CliError> {
    ctx.enter("/signup", &Page::Signup)?;
    let form = match signup.command {
        SignupSubcommand::Applicant { account, skills, resume } => {
            let resume = match resume {
                Some(path) => Some(read_resume(&path).await?),
                None => None,
            };
            SignupForm::Applicant(ApplicantSignup {
                username: account.username,
                email: account.email,
                password: account.password,
                skills,
                resume,
            })
        }
        SignupSubcommand::Recruiter { account, company_name } => SignupForm::Recruiter(RecruiterSignup {
            username: account.username,
            email: account.email,
            password: account.password,
            company_name,
        }),
    };

    let page = SignupPage::new(Arc::clone(&ctx.api), ctx.hook());
    match page.submit(form).await {
        Ok(next) => {
            println!("account created; sign in to continue ({next})");
            Ok(())
        }
        Err(e) => {
            let errors = page.errors();
            for (field, messages) in &errors.fields {
                eprintln!("  {field}: {}", messages.join(" "));
            }
            Err(page_failure(errors.message, e))
        }
    }
}

async fn run_schedule(ctx: &CliContext, token: String, at: &str) -> Result<(), CliError> {
    let path = format!("/interview/schedule/{token}");
    ctx.enter(&path, &Page::InterviewScheduler { token: token.clone() })?;
    let at = interview_scheduler::parse_slot(at)?;
    let page = InterviewSchedulerPage::new(Arc::clone(&ctx.api), ctx.hook(), token);
    match page.submit(at).await {
        Ok(message) => {
            println!("{message}");
            Ok(())
        }
        Err(e) => Err(page_failure(page.view().error, e)),
    }
}

async fn recruiter_page(ctx: &CliContext) -> Result<RecruiterDashboard, CliError> {
    ctx.enter("/recruiter/dashboard", &Page::RecruiterDashboard)?;
    let page = RecruiterDashboard::new(Arc::clone(&ctx.api), Arc::clone(&ctx.session), ctx.hook());
    page.load().await?;
    Ok(page)
}

async fn applicant_page(ctx: &CliContext) -> Result<ApplicantDashboard, CliError> {
    ctx.enter("/applicant/dashboard", &Page::ApplicantDashboard)?;
    let page = ApplicantDashboard::new(Arc::clone(&ctx.api), Arc::clone(&ctx.session), ctx.hook());
    page.load().await?;
    Ok(page)
}

async fn read_resume(path: &Path) -> Result<ResumeUpload, CliError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| CliError::ReadFile { path: path.to_owned(), source })?;
    let file_name = path.file_name().map_or_else(|| "resume".to_owned(), |name| name.to_string_lossy().into_owned());
    Ok(ResumeUpload { file_name, bytes })
}

fn page_failure(notice: Option<String>, err: ApiError) -> CliError {
    tracing::debug!(kind = ?err.kind, error = %err, "page action failed");
    notice.map_or(CliError::Api(err), CliError::Page)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
