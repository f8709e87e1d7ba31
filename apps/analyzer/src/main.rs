use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use client_core::{
    config::load_settings_from,
    report::{default_report_name, save_report},
    AnalysisSession, Begin, ClientSettings, FileInput, HttpAnalysisTransport, UploadController,
};
use renderer::{
    preview_panel, project, submit_control,
    terminal::{render_preview_panel, render_submit_control, render_view, TerminalStyle},
    PreviewSource, ResultView,
};
use shared::domain::{AnalysisResult, SessionStatus};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    task::JoinHandle,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod frontend;

use commands::{parse_command, ReplCommand, HELP};
use frontend::{analyze_once, finish, spawn_status_printer};

#[derive(Parser, Debug)]
#[command(name = "analyzer", about = "Submit spark plug images for analysis")]
struct Cli {
    /// Settings file layered under environment overrides.
    #[arg(long, env = "ANALYZER_SETTINGS", default_value = client_core::config::SETTINGS_FILE)]
    settings: PathBuf,
    /// Base address of the analysis service.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Print views as JSON instead of text.
    #[arg(long)]
    json: bool,
    #[arg(long)]
    no_color: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a single image and print the report.
    Analyze {
        image: PathBuf,
        /// Save the report into the output directory.
        #[arg(long)]
        save: bool,
        #[arg(long)]
        report_name: Option<String>,
    },
    /// Check that the analysis service is reachable.
    Health,
    /// Select, submit and inspect results from a line prompt.
    Interactive,
}

#[derive(Debug, Clone, Copy)]
struct Output {
    json: bool,
    style: TerminalStyle,
}

impl Output {
    fn print_view(&self, view: &ResultView) {
        if self.json {
            match serde_json::to_string_pretty(view) {
                Ok(json) => println!("{json}"),
                Err(err) => eprintln!("failed to encode view: {err}"),
            }
        } else {
            print!("{}", render_view(view, self.style));
        }
    }
}

impl Cli {
    fn log_ansi(&self) -> bool {
        !self.no_color
    }

    fn resolve_settings(&self) -> ClientSettings {
        let mut settings = load_settings_from(&self.settings, |key| std::env::var(key).ok());
        if let Some(v) = &self.api_url {
            settings.api_url = v.clone();
        }
        if let Some(v) = self.timeout_secs {
            settings.request_timeout_secs = v;
        }
        if let Some(v) = &self.output_dir {
            settings.output_dir = v.clone();
        }
        settings
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(cli.log_ansi())
        .init();

    let settings = cli.resolve_settings();
    let output = Output {
        json: cli.json,
        style: if cli.no_color {
            TerminalStyle::plain()
        } else {
            TerminalStyle::colored()
        },
    };
    info!(api_url = %settings.api_url, "analyzer starting");

    match cli.command {
        Command::Analyze {
            image,
            save,
            report_name,
        } => run_analyze(&settings, &image, save, report_name, output).await,
        Command::Health => run_health(&settings).await,
        Command::Interactive => {
            run_interactive(&settings, output).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_analyze(
    settings: &ClientSettings,
    image: &Path,
    save: bool,
    report_name: Option<String>,
    output: Output,
) -> Result<ExitCode> {
    let session = AnalysisSession::new(Arc::new(HttpAnalysisTransport::new(settings)?));
    let mut uploads = UploadController::default();
    uploads.select_file(Some(FileInput::read_from(image).await?));

    let status = analyze_once(&session, uploads.current_file(), |view| output.print_view(&view)).await;

    match &status {
        SessionStatus::Resolved(result) => {
            if save {
                save_result(settings, result, report_name)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        _ => Ok(ExitCode::FAILURE),
    }
}

async fn run_health(settings: &ClientSettings) -> Result<ExitCode> {
    let transport = HttpAnalysisTransport::new(settings)?;
    match transport.check_health().await {
        Ok(status) => {
            println!("{}: {status}", transport.base_url());
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            println!("{}: unavailable ({err})", transport.base_url());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn save_result(
    settings: &ClientSettings,
    result: &AnalysisResult,
    report_name: Option<String>,
) -> Result<()> {
    let name = report_name.unwrap_or_else(|| default_report_name(Utc::now()));
    let path = save_report(result, &settings.output_dir, &name)?;
    println!("Report saved to {}", path.display());
    Ok(())
}

fn print_selection(uploads: &UploadController) {
    let uri = uploads.current_file().map(|file| file.preview_uri());
    let source = uploads
        .current_file()
        .zip(uri.as_deref())
        .map(|(file, uri)| PreviewSource {
            file_name: file.name(),
            uri,
        });
    println!("Preview: {}", render_preview_panel(&preview_panel(source)));
}

async fn run_interactive(settings: &ClientSettings, output: Output) -> Result<()> {
    let session = AnalysisSession::new(Arc::new(HttpAnalysisTransport::new(settings)?));
    let mut uploads = UploadController::default();

    let printer = spawn_status_printer(session.subscribe(), move |view| output.print_view(&view));
    let mut in_flight: Option<JoinHandle<SessionStatus>> = None;

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                warn!("failed to read command: {err}");
                break;
            }
        };
        match parse_command(&line) {
            ReplCommand::Select(path) => {
                let input = match path {
                    Some(path) => match FileInput::read_from(&path).await {
                        Ok(input) => Some(input),
                        Err(err) => {
                            println!("{err:#}");
                            continue;
                        }
                    },
                    None => None,
                };
                uploads.select_file(input);
                print_selection(&uploads);
            }
            ReplCommand::Clear => {
                uploads.clear_selection();
                print_selection(&uploads);
            }
            ReplCommand::Submit => match session.begin(uploads.current_file()) {
                Begin::Started(pending) => {
                    in_flight = Some(tokio::spawn(pending.run()));
                }
                Begin::Ignored => println!("An analysis is already in progress"),
                Begin::Rejected(_) => {}
            },
            ReplCommand::Status => {
                let status = session.status();
                print_selection(&uploads);
                println!(
                    "Submit: {}",
                    render_submit_control(&submit_control(
                        &status,
                        uploads.current_file().is_some()
                    ))
                );
                output.print_view(&project(&status));
            }
            ReplCommand::Save(name) => match session.status().result() {
                Some(result) => {
                    if let Err(err) = save_result(settings, result, name) {
                        println!("{err:#}");
                    }
                }
                None => println!("No analysis results yet"),
            },
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Quit => break,
            ReplCommand::Empty => {}
            ReplCommand::Unknown(word) => println!("unknown command '{word}'; try 'help'"),
        }
    }

    finish(session, in_flight, printer).await;
    Ok(())
}
