//! The "Fetch Video Info" flow: read the link from the active note, look the
//! video up, then apply rename / frontmatter / content edits.
//!
//! Preconditions and the lookup itself abort the whole run. The three edit
//! steps are independent: a failure in one is reported and the next still runs.

use std::fmt::{Display, Formatter};

use serde_yaml::{Mapping, Value};

use crate::format::{format_duration, format_publish_date};
use crate::host::{MetadataProvider, NoteHost, Notifier};
use crate::logging::AppLogger;
use crate::notes::filename::sanitize_filename;
use crate::notes::frontmatter::{insert_after_frontmatter, value_as_text};
use crate::settings::PluginSettings;
use crate::video::VideoMetadata;
use crate::video::id::extract_video_id;

pub const NOTE_EXTENSION: &str = "md";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchAbort {
    NoActiveNote,
    MissingFrontmatter,
    MissingLink { property: String },
    InvalidLink { link: String },
    MissingApiKey,
    FetchFailed,
    NoData,
}

impl FetchAbort {
    pub fn user_message(&self) -> String {
        match self {
            Self::NoActiveNote => "No active file found!".to_string(),
            Self::MissingFrontmatter => "No frontmatter found in this file!".to_string(),
            Self::MissingLink { property } => {
                format!("No \"{property}\" (link) property found in frontmatter!")
            }
            Self::InvalidLink { .. } => {
                "Invalid YouTube link or could not extract video ID.".to_string()
            }
            Self::MissingApiKey => "YouTube API Key not set in plugin settings!".to_string(),
            Self::FetchFailed => "Failed to fetch YouTube data. See log for details.".to_string(),
            Self::NoData => "No video data found for this link.".to_string(),
        }
    }
}

impl Display for FetchAbort {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for FetchAbort {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Applied,
    Skipped,
    Failed(String),
}

impl StepStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    pub video: VideoMetadata,
    pub renamed: StepStatus,
    pub frontmatter: StepStatus,
    pub content: StepStatus,
}

impl FetchReport {
    pub fn has_failures(&self) -> bool {
        self.renamed.is_failed() || self.frontmatter.is_failed() || self.content.is_failed()
    }
}

pub fn description_section(description: &str) -> String {
    format!("## Video Description\n\n{description}\n\n---\n\n")
}

pub struct VideoInfoFetcher<'a> {
    provider: &'a dyn MetadataProvider,
    settings: &'a PluginSettings,
    logger: &'a AppLogger,
}

impl<'a> VideoInfoFetcher<'a> {
    pub fn new(
        provider: &'a dyn MetadataProvider,
        settings: &'a PluginSettings,
        logger: &'a AppLogger,
    ) -> Self {
        Self {
            provider,
            settings,
            logger,
        }
    }

    pub fn run(
        &self,
        host: &mut dyn NoteHost,
        notifier: &mut dyn Notifier,
    ) -> Result<FetchReport, FetchAbort> {
        let video = self.lookup(&*host, notifier)?;

        notifier.notify(&format!(
            "Data fetched! Title: {}, Author: {}, Date: {}",
            video.title, video.channel_title, video.published_at
        ));

        let renamed = self.rename_step(host, notifier, &video);
        let frontmatter = self.frontmatter_step(host, notifier, &video);
        let content = self.content_step(host, notifier, &video);

        Ok(FetchReport {
            video,
            renamed,
            frontmatter,
            content,
        })
    }

    fn lookup(
        &self,
        host: &dyn NoteHost,
        notifier: &mut dyn Notifier,
    ) -> Result<VideoMetadata, FetchAbort> {
        let Some(note) = host.active_note() else {
            return Err(self.abort(notifier, FetchAbort::NoActiveNote));
        };
        self.logger
            .info(&format!("fetch started for {}", note.path.display()));

        let frontmatter = match host.frontmatter() {
            Ok(Some(frontmatter)) => frontmatter,
            Ok(None) => return Err(self.abort(notifier, FetchAbort::MissingFrontmatter)),
            Err(err) => {
                self.logger.error(&format!("reading frontmatter failed: {err:#}"));
                return Err(self.abort(notifier, FetchAbort::MissingFrontmatter));
            }
        };

        let property = &self.settings.link_property_name;
        let link = frontmatter
            .get(property.as_str())
            .and_then(value_as_text)
            .map(|link| link.trim().to_string())
            .filter(|link| !link.is_empty());
        let Some(link) = link else {
            let reason = FetchAbort::MissingLink {
                property: property.clone(),
            };
            return Err(self.abort(notifier, reason));
        };

        notifier.notify(&format!("Link found: {link} - Now fetching data..."));

        let Some(video_id) = extract_video_id(&link) else {
            return Err(self.abort(notifier, FetchAbort::InvalidLink { link }));
        };

        let api_key = self.settings.youtube_api_key.trim();
        if api_key.is_empty() {
            return Err(self.abort(notifier, FetchAbort::MissingApiKey));
        }

        self.logger.info(&format!("requesting video id={video_id}"));
        match self.provider.fetch_video(&video_id, api_key) {
            Ok(Some(video)) => Ok(video),
            Ok(None) => Err(self.abort(notifier, FetchAbort::NoData)),
            Err(err) => {
                self.logger
                    .error(&format!("fetching video id={video_id} failed: {err:#}"));
                Err(self.abort(notifier, FetchAbort::FetchFailed))
            }
        }
    }

    fn rename_step(
        &self,
        host: &mut dyn NoteHost,
        notifier: &mut dyn Notifier,
        video: &VideoMetadata,
    ) -> StepStatus {
        if !self.settings.enable_rename_note {
            return StepStatus::Skipped;
        }

        let stem = sanitize_filename(&video.title);
        let result = if stem.is_empty() {
            Err(anyhow::anyhow!("video title is empty after sanitizing"))
        } else {
            host.rename_note(&format!("{stem}.{NOTE_EXTENSION}"))
        };

        match result {
            Ok(()) => {
                self.logger.info(&format!("note renamed to {stem}"));
                notifier.notify(&format!("Note renamed to: {stem}"));
                StepStatus::Applied
            }
            Err(err) => {
                self.logger.error(&format!("renaming note failed: {err:#}"));
                notifier.notify("Error renaming note. See log for details.");
                StepStatus::Failed(format!("{err:#}"))
            }
        }
    }

    fn frontmatter_step(
        &self,
        host: &mut dyn NoteHost,
        notifier: &mut dyn Notifier,
        video: &VideoMetadata,
    ) -> StepStatus {
        let settings = self.settings;
        if !settings.any_frontmatter_update_enabled() {
            notifier.notify(
                "Frontmatter update skipped as all frontmatter update options are disabled.",
            );
            return StepStatus::Skipped;
        }

        let mut writes: Vec<(&str, String)> = Vec::new();
        if settings.enable_update_author {
            writes.push((settings.author_property_name.as_str(), video.channel_title.clone()));
        }
        if settings.enable_update_date {
            let date = format_publish_date(&video.published_at, settings.date_format());
            writes.push((settings.date_property_name.as_str(), date));
        }
        if settings.enable_update_description {
            writes.push((settings.description_property_name.as_str(), video.description.clone()));
        }
        if settings.enable_update_duration {
            let duration = format_duration(&video.duration_iso);
            writes.push((settings.duration_property_name.as_str(), duration));
        }

        let result = host.process_frontmatter(&mut |fm: &mut Mapping| {
            for (name, value) in &writes {
                fm.insert(Value::from(*name), Value::from(value.as_str()));
            }
        });

        match result {
            Ok(()) => {
                let names: Vec<&str> = writes.iter().map(|(name, _)| *name).collect();
                self.logger
                    .info(&format!("frontmatter updated: {}", names.join(", ")));
                notifier.notify("Frontmatter updated based on enabled settings.");
                StepStatus::Applied
            }
            Err(err) => {
                self.logger
                    .error(&format!("updating frontmatter failed: {err:#}"));
                notifier.notify("Error updating frontmatter. See log for details.");
                StepStatus::Failed(format!("{err:#}"))
            }
        }
    }

    fn content_step(
        &self,
        host: &mut dyn NoteHost,
        notifier: &mut dyn Notifier,
        video: &VideoMetadata,
    ) -> StepStatus {
        if !self.settings.enable_add_description_to_note_content {
            return StepStatus::Skipped;
        }

        let section = description_section(&video.description);
        let result = host
            .read_content()
            .and_then(|current| host.replace_content(&insert_after_frontmatter(&current, &section)));

        match result {
            Ok(()) => {
                self.logger.info("video description added to note content");
                notifier.notify("Video description added after frontmatter.");
                StepStatus::Applied
            }
            Err(err) => {
                self.logger
                    .error(&format!("adding description to note content failed: {err:#}"));
                notifier.notify("Error adding description to note content. See log for details.");
                StepStatus::Failed(format!("{err:#}"))
            }
        }
    }

    fn abort(&self, notifier: &mut dyn Notifier, reason: FetchAbort) -> FetchAbort {
        self.logger.warn(&format!("fetch aborted: {reason:?}"));
        notifier.notify(&reason.user_message());
        reason
    }
}
