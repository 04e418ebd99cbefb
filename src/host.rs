//! Capabilities the fetch flow needs from whatever holds the notes.

use std::path::PathBuf;

use anyhow::Result;
use serde_yaml::Mapping;

use crate::video::VideoMetadata;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNote {
    pub path: PathBuf,
}

impl ActiveNote {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

pub trait NoteHost {
    /// The note the command acts on, if any.
    fn active_note(&self) -> Option<ActiveNote>;

    /// Frontmatter of the active note; `Ok(None)` when it has none.
    fn frontmatter(&self) -> Result<Option<Mapping>>;

    /// Rename the active note to `file_name` (stem plus extension).
    fn rename_note(&mut self, file_name: &str) -> Result<()>;

    /// Apply `edit` to the active note's frontmatter as one write.
    fn process_frontmatter(&mut self, edit: &mut dyn FnMut(&mut Mapping)) -> Result<()>;

    fn read_content(&self) -> Result<String>;

    fn replace_content(&mut self, content: &str) -> Result<()>;
}

pub trait Notifier {
    fn notify(&mut self, message: &str);
}

pub trait MetadataProvider {
    /// Look up one video. `Ok(None)` means the lookup succeeded but returned no items.
    fn fetch_video(&self, video_id: &str, api_key: &str) -> Result<Option<VideoMetadata>>;
}
