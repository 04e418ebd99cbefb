use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;

use crate::fetcher::{FetchAbort, FetchReport, VideoInfoFetcher};
use crate::host::Notifier;
use crate::logging::AppLogger;
use crate::notes::vault::{ConsoleNotifier, VaultNote};
use crate::settings::PluginSettings;
use crate::youtube_client::YoutubeClient;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub settings_path: PathBuf,
    pub api_base_url: String,
    pub timeout_sec: u64,
    /// Echo log lines to stdout as well as the log file.
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRunResult {
    pub note_path: PathBuf,
    pub report: FetchReport,
}

/// Run "Fetch Video Info" against the note at `note_path`, printing notices to stdout.
pub fn run_fetch_video_info(note_path: &Path, config: &AppConfig) -> Result<FetchRunResult> {
    let logger = AppLogger::new(config.verbose)?;
    let mut notifier = ConsoleNotifier::new(logger.clone());
    run_fetch_with_notifier(note_path, config, &logger, &mut notifier)
}

pub fn run_fetch_with_notifier(
    note_path: &Path,
    config: &AppConfig,
    logger: &AppLogger,
    notifier: &mut dyn Notifier,
) -> Result<FetchRunResult> {
    logger.info("fetch video info started");
    logger.info(&format!("configured timeout_sec={}", config.timeout_sec));

    let settings = PluginSettings::load(&config.settings_path)?;
    logger.info(&format!(
        "settings loaded from {}",
        config.settings_path.display()
    ));

    let client = YoutubeClient::new(
        config.api_base_url.clone(),
        Duration::from_secs(config.timeout_sec.max(1)),
    )?;
    let mut note = VaultNote::open(note_path);

    let report = VideoInfoFetcher::new(&client, &settings, logger).run(&mut note, notifier)?;
    if report.has_failures() {
        logger.warn("fetch finished with failed steps");
    } else {
        logger.info("fetch finished");
    }

    Ok(FetchRunResult {
        note_path: note.path().to_path_buf(),
        report,
    })
}

/// Text to print on stderr for a failed command.
///
/// Fetch aborts were already posted as notices, so they yield `None`.
pub fn error_report(err: &anyhow::Error) -> Option<String> {
    if err.downcast_ref::<FetchAbort>().is_some() {
        return None;
    }
    Some(format!("{err:#}"))
}

pub fn show_settings(settings_path: &Path) -> Result<String> {
    PluginSettings::load(settings_path)?.redacted_json()
}

pub fn set_setting(settings_path: &Path, key: &str, value: &str) -> Result<PluginSettings> {
    let mut settings = PluginSettings::load(settings_path)?;
    settings.set_option(key, value)?;
    settings.save(settings_path)?;
    Ok(settings)
}

pub fn reset_settings(settings_path: &Path) -> Result<PluginSettings> {
    let settings = PluginSettings::default();
    settings.save(settings_path)?;
    Ok(settings)
}
