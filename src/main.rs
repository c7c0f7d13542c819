use std::{io, path::PathBuf, sync::Arc, time::Duration};
use anyhow::Context;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::runtime::Runtime;
use tracing::{error, info, warn};
use todotab::app::App;
use todotab::cli;
use todotab::config::{get_user_config_path, save_setting, seed_user_config, Settings};
use todotab::git::parse_git_log;
use todotab::host::{FsHost, Host};
use todotab::input::handle_key;
use todotab::logging::init_logging;
use todotab::theme::Theme;
use todotab::ui::render;

#[derive(Parser, Debug)]
#[command(name = "todotab", version, about = "Phased to-do lists and git log in the terminal")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// JSON to-do file to open in the UI
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print per-phase and total progress
    Progress { file: PathBuf },
    /// Flip the done flag of one task (0-based indices) and save the file
    Toggle { file: PathBuf, phase: usize, task: usize },
    /// Write the document as indented JSON
    Export {
        file: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the git log as a table
    Log {
        #[arg(long)]
        repo: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Store a setting in the user config file
    Set { key: String, value: String },
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let settings = Settings::new().context("Could not load settings")?;
    let data_dir = settings.data_dir();
    // Logging is optional; a read-only data dir must not stop the app.
    let _ = init_logging(&data_dir, &settings.log_level);

    // Seed the user config from the defaults on first run
    if let Some(path) = get_user_config_path() {
        match seed_user_config(&path) {
            Ok(true) => info!(path = %path.display(), "created user config"),
            Ok(false) => {}
            Err(e) => warn!(path = %path.display(), error = %e, "could not create user config"),
        }
    }

    match args.command {
        Some(command) => run_command(command, &settings),
        None => run_tui(args.file, &settings),
    }
}

fn run_command(command: Commands, settings: &Settings) -> anyhow::Result<()> {
    let host = FsHost::new(settings.data_dir(), settings.repo_path(), settings.git_log_limit);
    match command {
        Commands::Progress { file } => {
            let doc = cli::read_document(&host, &file)?;
            print!("{}", cli::progress_report(&doc));
        }
        Commands::Toggle { file, phase, task } => {
            let done = cli::toggle_in_file(&host, &file, phase, task)?;
            println!("phase {} task {} is now {}", phase, task, if done { "done" } else { "open" });
        }
        Commands::Export { file, output } => {
            let text = cli::export_text(&host, &file)?;
            match output {
                Some(out) => {
                    host.write_text_file(&out, &text)?;
                    println!("Exported to {}", out.display());
                }
                None => println!("{}", text),
            }
        }
        Commands::Log { repo, json } => {
            let host = match repo {
                Some(repo) => FsHost::new(settings.data_dir(), repo, settings.git_log_limit),
                None => host,
            };
            let commits = parse_git_log(&host.git_log()?);
            if json {
                println!("{}", serde_json::to_string_pretty(&commits)?);
            } else {
                print!("{}", cli::commit_table(&commits));
            }
        }
        Commands::Set { key, value } => {
            save_setting(&key, cli::parse_setting_value(&value))?;
            println!("Saved {} = {}", key, value);
        }
    }
    Ok(())
}

fn run_tui(file: Option<PathBuf>, settings: &Settings) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let host: Arc<dyn Host> = Arc::new(FsHost::new(
        settings.data_dir(),
        settings.repo_path(),
        settings.git_log_limit,
    ));
    let mut app = App::new(rt.handle(), host, &settings.autosave_file, settings.export_path())?;
    app.startup(file.as_deref(), settings.restore_autosave);
    info!(autosave = %app.autosave_path().display(), "starting ui");

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    if let Err(e) = &result {
        error!(error = %e, "ui loop failed");
    }
    rt.block_on(app.shutdown());
    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> anyhow::Result<()> {
    let theme = Theme::default();
    loop {
        app.poll_saves();
        terminal.draw(|f| render(f, app, &theme))?;

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if !handle_key(key, app)? {
                    break;
                }
            }
        }
    }
    Ok(())
}
