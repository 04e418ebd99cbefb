use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};

use crate::format::DateFormat;

pub const DEFAULT_SETTINGS_FILE: &str = "ytmeta-settings.json";

/// User-facing options of the fetcher, persisted as a flat JSON object.
///
/// Keys missing from the persisted file take their default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginSettings {
    pub youtube_api_key: String,
    pub date_format: String,

    pub author_property_name: String,
    pub date_property_name: String,
    pub description_property_name: String,
    pub duration_property_name: String,
    pub link_property_name: String,

    pub enable_rename_note: bool,
    pub enable_update_author: bool,
    pub enable_update_date: bool,
    pub enable_update_description: bool,
    pub enable_update_duration: bool,
    pub enable_add_description_to_note_content: bool,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            youtube_api_key: String::new(),
            date_format: DateFormat::default().selector().to_string(),
            author_property_name: "Author".to_string(),
            date_property_name: "Date".to_string(),
            description_property_name: "description".to_string(),
            duration_property_name: "duration".to_string(),
            link_property_name: "链接".to_string(),
            enable_rename_note: true,
            enable_update_author: true,
            enable_update_date: true,
            enable_update_description: false,
            enable_update_duration: false,
            enable_add_description_to_note_content: false,
        }
    }
}

/// Option names accepted by [`PluginSettings::set_option`], as stored on disk.
pub const OPTION_KEYS: [&str; 13] = [
    "youtubeApiKey",
    "dateFormat",
    "authorPropertyName",
    "datePropertyName",
    "descriptionPropertyName",
    "durationPropertyName",
    "linkPropertyName",
    "enableRenameNote",
    "enableUpdateAuthor",
    "enableUpdateDate",
    "enableUpdateDescription",
    "enableUpdateDuration",
    "enableAddDescriptionToNoteContent",
];

impl PluginSettings {
    /// Load settings, starting from defaults and overlaying what the file provides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create settings dir: {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)
            .with_context(|| format!("failed to write settings file: {}", path.display()))
    }

    pub fn date_format(&self) -> DateFormat {
        DateFormat::from_selector_lenient(&self.date_format)
    }

    pub fn any_frontmatter_update_enabled(&self) -> bool {
        self.enable_update_author
            || self.enable_update_date
            || self.enable_update_description
            || self.enable_update_duration
    }

    /// Set one option by its persisted name, validating the value.
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "youtubeApiKey" => self.youtube_api_key = value.trim().to_string(),
            "dateFormat" => {
                let format: DateFormat = value.parse()?;
                self.date_format = format.selector().to_string();
            }
            "authorPropertyName" => self.author_property_name = property_name(key, value)?,
            "datePropertyName" => self.date_property_name = property_name(key, value)?,
            "descriptionPropertyName" => {
                self.description_property_name = property_name(key, value)?
            }
            "durationPropertyName" => self.duration_property_name = property_name(key, value)?,
            "linkPropertyName" => self.link_property_name = property_name(key, value)?,
            "enableRenameNote" => self.enable_rename_note = parse_toggle(key, value)?,
            "enableUpdateAuthor" => self.enable_update_author = parse_toggle(key, value)?,
            "enableUpdateDate" => self.enable_update_date = parse_toggle(key, value)?,
            "enableUpdateDescription" => {
                self.enable_update_description = parse_toggle(key, value)?
            }
            "enableUpdateDuration" => self.enable_update_duration = parse_toggle(key, value)?,
            "enableAddDescriptionToNoteContent" => {
                self.enable_add_description_to_note_content = parse_toggle(key, value)?
            }
            _ => bail!(
                "Unknown setting `{key}` (expected one of: {})",
                OPTION_KEYS.join(", ")
            ),
        }
        Ok(())
    }

    /// JSON view for display, with the API key masked.
    pub fn redacted_json(&self) -> Result<String> {
        let mut shown = self.clone();
        if !shown.youtube_api_key.is_empty() {
            shown.youtube_api_key = "********".to_string();
        }
        Ok(serde_json::to_string_pretty(&shown)?)
    }
}

fn property_name(key: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("{key} must not be empty");
    }
    Ok(trimmed.to_string())
}

fn parse_toggle(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => Err(anyhow!("{key} expects true/false, got: {other}")),
    }
}
