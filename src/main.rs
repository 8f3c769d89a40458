mod app;
mod event;
mod ui;

use anyhow::{bail, Context, Result};
use app::App;
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use event::Action;
use pagepurge::campaign::{
    CampaignError, CampaignEvent, CampaignReport, CampaignRequest, CampaignRunner,
    ChannelObserver,
};
use pagepurge::config::Config;
use pagepurge::graph::auth::{REQUIRED_PERMISSIONS, TOKEN_ENV_VAR};
use pagepurge::graph::{format_graph_error, pages, AccessToken, GraphClient};
use pagepurge::resource::{DeletionOutcome, ResourceKind};
use ratatui::prelude::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Bulk-delete posts, photos or videos from a Facebook page
#[derive(Parser, Debug)]
#[command(name = "pagepurge", version = pagepurge::VERSION, about, long_about = None)]
struct Args {
    /// Log level for debugging (written to the log file, never the terminal)
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the pages this token can manage
    Pages(AuthArgs),
    /// Delete every item of one kind from a page
    Purge(PurgeArgs),
}

#[derive(clap::Args, Debug)]
struct AuthArgs {
    /// User access token with page management permissions
    #[arg(long, env = TOKEN_ENV_VAR, hide_env_values = true)]
    access_token: String,
}

#[derive(clap::Args, Debug)]
struct PurgeArgs {
    #[command(flatten)]
    auth: AuthArgs,

    /// Page to clean (defaults to the last page used)
    #[arg(long)]
    page_id: Option<String>,

    /// What to delete
    #[arg(short, long, value_enum)]
    kind: ResourceKind,

    /// The access token already is a page token; skip the page lookup
    #[arg(long)]
    page_token: bool,

    /// Pause between deletions in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Items requested per listing page (1-100)
    #[arg(long)]
    limit: Option<u32>,

    /// Do not ask for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Print progress lines instead of the terminal UI
    #[arg(long)]
    plain: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("pagepurge {} started with log level: {:?}", pagepurge::VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("pagepurge").join("pagepurge.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".pagepurge").join("pagepurge.log");
    }
    PathBuf::from("pagepurge.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let config = Config::load();
    let client = GraphClient::new(
        &config.effective_base_url(),
        &config.effective_api_version(),
        config.effective_timeout(),
    )
    .map_err(|e| anyhow::anyhow!(format_graph_error(&e)))?;

    match args.command {
        Command::Pages(auth) => list_pages(&client, &auth).await,
        Command::Purge(purge) => run_purge(config, client, purge).await,
    }
}

async fn list_pages(client: &GraphClient, auth: &AuthArgs) -> Result<()> {
    let token = AccessToken::parse(&auth.access_token).map_err(|e| anyhow::anyhow!(format_graph_error(&e)))?;
    let pages = pages::list_pages(client, &token)
        .await
        .map_err(|e| anyhow::anyhow!(format_graph_error(&e)))?;

    if pages.is_empty() {
        println!(
            "No managed pages found for this token (it needs {}).",
            REQUIRED_PERMISSIONS.join(", ")
        );
        return Ok(());
    }

    println!("{:<20} {:<40} CATEGORY", "PAGE ID", "NAME");
    for page in pages {
        println!(
            "{:<20} {:<40} {}",
            page.id,
            page.name,
            page.category.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

async fn run_purge(mut config: Config, client: GraphClient, args: PurgeArgs) -> Result<()> {
    let user_token =
        AccessToken::parse(&args.auth.access_token).map_err(|e| anyhow::anyhow!(format_graph_error(&e)))?;

    let Some(page_id) = config.effective_page_id(args.page_id.as_deref()) else {
        bail!("No page selected. Pass --page-id (run `pagepurge pages` to list your pages)");
    };

    let (token, page_name) = if args.page_token {
        (user_token, page_id.clone())
    } else {
        let owned = pages::list_pages(&client, &user_token)
            .await
            .map_err(|e| anyhow::anyhow!(format_graph_error(&e)))?;
        let page = pages::resolve_page(&owned, &page_id)
            .map_err(|e| anyhow::anyhow!(format_graph_error(&e)))?;
        (page.campaign_token(&user_token), page.name.clone())
    };

    tracing::info!(
        "Targeting page {} ({}) with token {}",
        page_id,
        page_name,
        token.hint()
    );

    if let Err(e) = config.set_last_page(&page_id) {
        tracing::warn!("Could not remember page {}: {}", page_id, e);
    }

    let settings = config.engine_settings(args.delay_ms, args.limit);
    let runner = Arc::new(CampaignRunner::new(client, settings));
    let request = CampaignRequest::new(args.kind, page_id, token);

    let outcome = if args.plain {
        if !args.yes && !confirm_on_stdin(args.kind, &page_name)? {
            println!("Cancelled, nothing was deleted.");
            return Ok(());
        }
        run_plain(runner, request).await
    } else {
        match run_tui(runner, request, page_name, args.yes).await? {
            Some(outcome) => outcome,
            None => {
                println!("Cancelled, nothing was deleted.");
                return Ok(());
            },
        }
    };

    report_outcome(outcome)
}

fn report_outcome(outcome: Result<CampaignReport, CampaignError>) -> Result<()> {
    match outcome {
        Ok(report) => {
            println!("{}", report.summary_line());
            Ok(())
        },
        Err(CampaignError::Failed { source, report }) => {
            println!("{}", report.summary_line());
            bail!("{}", format_graph_error(&source))
        },
        Err(CampaignError::Validation(source)) => bail!("{}", format_graph_error(&source)),
        Err(err) => Err(err.into()),
    }
}

fn confirm_on_stdin(kind: ResourceKind, page_name: &str) -> Result<bool> {
    print!(
        "This permanently deletes ALL {} of '{}' and cannot be undone. Type 'yes' to continue: ",
        kind.edge(),
        page_name
    );
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}

async fn run_plain(
    runner: Arc<CampaignRunner<GraphClient>>,
    request: CampaignRequest,
) -> Result<CampaignReport, CampaignError> {
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("Stopping after the current item...");
                cancel.cancel();
            }
        });
    }

    let mut observer = |event: &CampaignEvent| match event {
        CampaignEvent::Started { target, page_id, .. } => {
            println!("Deleting {} from page {} (Ctrl-C to stop)", target.edge(), page_id)
        },
        CampaignEvent::PageLoaded { page_number, items, .. } => {
            println!("-- page {}: {} items", page_number, items)
        },
        CampaignEvent::ItemFinished {
            item_id,
            outcome,
            progress,
        } => {
            let mark = match outcome {
                DeletionOutcome::Success => "✓".to_string(),
                other => format!("✗ {}", other.reason().unwrap_or_default()),
            };
            println!(
                "[{}/{}] {} {} (ok {}, failed {})",
                progress.processed, progress.total, item_id, mark, progress.succeeded, progress.failed
            )
        },
        CampaignEvent::Finished { .. } => {},
    };

    runner.run(request, &cancel, &mut observer).await
}

/// Run the campaign behind the progress screen
///
/// Returns `None` when the user declined the confirmation.
async fn run_tui(
    runner: Arc<CampaignRunner<GraphClient>>,
    request: CampaignRequest,
    page_name: String,
    confirmed: bool,
) -> Result<Option<Result<CampaignReport, CampaignError>>> {
    enable_raw_mode()?;
    let mut terminal = restore_on_error(enter_terminal(), restore_terminal)?;

    let cancel = CancellationToken::new();
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let mut app = App::new(request.target, &request.page_id, &page_name, cancel.clone(), rx, confirmed);

    let result = drive_tui(&mut terminal, &mut app, runner, request, tx).await;
    cleanup_terminal(&mut terminal)?;
    result
}

fn enter_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

/// Run `restore` if terminal setup failed, passing the result through
fn restore_on_error<T>(result: Result<T>, restore: impl FnOnce()) -> Result<T> {
    if result.is_err() {
        restore();
    }
    result
}

/// Best-effort restore when the terminal could not be set up
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

async fn drive_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: Arc<CampaignRunner<GraphClient>>,
    request: CampaignRequest,
    tx: tokio::sync::mpsc::UnboundedSender<CampaignEvent>,
) -> Result<Option<Result<CampaignReport, CampaignError>>>
where
    B::Error: Send + Sync + 'static,
{
    let mut request = Some(request);
    let mut campaign: Option<JoinHandle<Result<CampaignReport, CampaignError>>> = None;
    let mut outcome = None;

    if app.is_confirmed() {
        campaign = spawn_campaign(&runner, &mut request, &app.cancel, &tx);
    }

    loop {
        app.drain_events();

        if campaign.as_ref().is_some_and(|h| h.is_finished()) {
            if let Some(handle) = campaign.take() {
                let joined = handle.await.context("Campaign task panicked")?;
                app.finish(&joined);
                outcome = Some(joined);
            }
        }

        terminal.draw(|f| ui::render(f, app))?;

        match event::handle_events(app)? {
            Action::Start => {
                campaign = spawn_campaign(&runner, &mut request, &app.cancel, &tx);
            },
            Action::Quit => break,
            Action::None => {},
        }
    }

    // Quitting mid-campaign: let the in-flight item finish first
    if let Some(handle) = campaign.take() {
        app.cancel.cancel();
        let joined = handle.await.context("Campaign task panicked")?;
        outcome = Some(joined);
    }

    Ok(outcome)
}

fn spawn_campaign(
    runner: &Arc<CampaignRunner<GraphClient>>,
    request: &mut Option<CampaignRequest>,
    cancel: &CancellationToken,
    tx: &tokio::sync::mpsc::UnboundedSender<CampaignEvent>,
) -> Option<JoinHandle<Result<CampaignReport, CampaignError>>> {
    let request = request.take()?;
    let runner = Arc::clone(runner);
    let cancel = cancel.clone();
    let mut observer = ChannelObserver::new(tx.clone());

    Some(tokio::spawn(async move {
        runner.run(request, &cancel, &mut observer).await
    }))
}

fn cleanup_terminal<B: Backend + std::io::Write>(terminal: &mut Terminal<B>) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_setup_restores_terminal() {
        let mut restored = false;
        let result: Result<()> = restore_on_error(Err(anyhow::anyhow!("no tty")), || restored = true);
        assert!(result.is_err());
        assert!(restored);
    }

    #[test]
    fn test_successful_setup_keeps_terminal() {
        let mut restored = false;
        let result = restore_on_error(Ok(7), || restored = true);
        assert_eq!(result.unwrap(), 7);
        assert!(!restored);
    }
}
