use std::cell::RefCell;
use std::path::PathBuf;

use anyhow::{Result, bail};
use serde_yaml::Mapping;

use yt_metadata_fetcher::host::{ActiveNote, MetadataProvider, NoteHost, Notifier};
use yt_metadata_fetcher::notes::frontmatter::{parse_frontmatter, update_frontmatter};
use yt_metadata_fetcher::video::VideoMetadata;

/// In-memory note with switchable failures for each mutation.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    pub note: Option<(PathBuf, String)>,
    pub fail_rename: bool,
    pub fail_frontmatter: bool,
    pub fail_content: bool,
    pub rename_calls: Vec<String>,
    pub frontmatter_writes: usize,
}

impl MemoryHost {
    pub fn with_note(name: &str, content: &str) -> Self {
        Self {
            note: Some((PathBuf::from("vault").join(name), content.to_string())),
            ..Self::default()
        }
    }

    pub fn content(&self) -> &str {
        self.note.as_ref().map(|(_, text)| text.as_str()).unwrap_or("")
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.note.as_ref().map(|(path, _)| path)
    }

    fn note_mut(&mut self) -> Result<&mut (PathBuf, String)> {
        match self.note.as_mut() {
            Some(note) => Ok(note),
            None => bail!("no active note"),
        }
    }
}

impl NoteHost for MemoryHost {
    fn active_note(&self) -> Option<ActiveNote> {
        self.path().map(|path| ActiveNote { path: path.clone() })
    }

    fn frontmatter(&self) -> Result<Option<Mapping>> {
        parse_frontmatter(self.content())
    }

    fn rename_note(&mut self, file_name: &str) -> Result<()> {
        self.rename_calls.push(file_name.to_string());
        if self.fail_rename {
            bail!("a note named {file_name} already exists");
        }
        let note = self.note_mut()?;
        note.0.set_file_name(file_name);
        Ok(())
    }

    fn process_frontmatter(&mut self, edit: &mut dyn FnMut(&mut Mapping)) -> Result<()> {
        if self.fail_frontmatter {
            bail!("frontmatter is locked");
        }
        self.frontmatter_writes += 1;
        let note = self.note_mut()?;
        note.1 = update_frontmatter(&note.1, edit)?;
        Ok(())
    }

    fn read_content(&self) -> Result<String> {
        Ok(self.content().to_string())
    }

    fn replace_content(&mut self, content: &str) -> Result<()> {
        if self.fail_content {
            bail!("editor is read-only");
        }
        self.note_mut()?.1 = content.to_string();
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub notices: Vec<String>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

/// Provider returning a canned answer and remembering what it was asked.
pub struct StubProvider {
    pub answer: Result<Option<VideoMetadata>, String>,
    pub requests: RefCell<Vec<(String, String)>>,
}

impl StubProvider {
    pub fn returning(video: VideoMetadata) -> Self {
        Self {
            answer: Ok(Some(video)),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self {
            answer: Ok(None),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl MetadataProvider for StubProvider {
    fn fetch_video(&self, video_id: &str, api_key: &str) -> Result<Option<VideoMetadata>> {
        self.requests
            .borrow_mut()
            .push((video_id.to_string(), api_key.to_string()));
        match &self.answer {
            Ok(video) => Ok(video.clone()),
            Err(message) => bail!("{message}"),
        }
    }
}

pub fn sample_video(title: &str) -> VideoMetadata {
    VideoMetadata {
        title: title.to_string(),
        channel_title: "Setup Channel".to_string(),
        published_at: "2023-05-17T10:00:00Z".to_string(),
        description: "Line one\nLine two".to_string(),
        duration_iso: "PT1H2M3S".to_string(),
    }
}
