use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use yt_metadata_fetcher::app::{
    AppConfig, error_report, reset_settings, run_fetch_video_info, set_setting, show_settings,
};
use yt_metadata_fetcher::fetcher::StepStatus;
use yt_metadata_fetcher::settings::DEFAULT_SETTINGS_FILE;
use yt_metadata_fetcher::youtube_client::DEFAULT_API_BASE_URL;

#[derive(Debug, Parser)]
#[command(name = "ytmeta")]
#[command(about = "Fetch YouTube video info into a markdown note's frontmatter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch Video Info for the note at NOTE
    Fetch(FetchArgs),
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    Show(SettingsArgs),
    Set(SetArgs),
    Reset(SettingsArgs),
}

#[derive(Debug, Args)]
struct SettingsArgs {
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,
}

#[derive(Debug, Args)]
struct FetchArgs {
    note: PathBuf,
    #[command(flatten)]
    settings: SettingsArgs,
    #[arg(long, default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,
    #[arg(long, default_value_t = 15)]
    timeout_sec: u64,
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Args)]
struct SetArgs {
    key: String,
    value: String,
    #[command(flatten)]
    settings: SettingsArgs,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Fetch(args) => {
            let cfg = to_config(&args);
            run_fetch_video_info(&args.note, &cfg).map(|outcome| {
                if outcome.report.renamed == StepStatus::Applied {
                    println!("Note path: {}", outcome.note_path.display());
                }
                if outcome.report.has_failures() {
                    eprintln!("Warning: some updates failed; see the log for details.");
                }
            })
        }
        Commands::Config(ConfigCommands::Show(args)) => {
            show_settings(&args.settings).map(|json| println!("{json}"))
        }
        Commands::Config(ConfigCommands::Set(args)) => {
            set_setting(&args.settings.settings, &args.key, &args.value)
                .map(|_| println!("Saved {} to {}", args.key, args.settings.settings.display()))
        }
        Commands::Config(ConfigCommands::Reset(args)) => reset_settings(&args.settings)
            .map(|_| println!("Settings reset: {}", args.settings.display())),
    };

    if let Err(err) = result {
        if let Some(report) = error_report(&err) {
            eprintln!("{report}");
        }
        std::process::exit(1);
    }
}

fn to_config(args: &FetchArgs) -> AppConfig {
    AppConfig {
        settings_path: args.settings.settings.clone(),
        api_base_url: args.api_base_url.clone(),
        timeout_sec: args.timeout_sec,
        verbose: args.verbose,
    }
}
