use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_yaml::Mapping;

use crate::host::{ActiveNote, NoteHost, Notifier};
use crate::logging::AppLogger;
use crate::notes::frontmatter::{parse_frontmatter, update_frontmatter};

/// A markdown note on disk acting as the active note.
#[derive(Debug, Clone)]
pub struct VaultNote {
    path: PathBuf,
}

impl VaultNote {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Current location; changes after a successful rename.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn existing_path(&self) -> Result<&Path> {
        if !self.path.is_file() {
            bail!("note file does not exist: {}", self.path.display());
        }
        Ok(&self.path)
    }
}

impl NoteHost for VaultNote {
    fn active_note(&self) -> Option<ActiveNote> {
        self.path.is_file().then(|| ActiveNote {
            path: self.path.clone(),
        })
    }

    fn frontmatter(&self) -> Result<Option<Mapping>> {
        let content = self.read_content()?;
        parse_frontmatter(&content)
            .with_context(|| format!("failed to parse frontmatter of {}", self.path.display()))
    }

    fn rename_note(&mut self, file_name: &str) -> Result<()> {
        let current = self.existing_path()?;
        if file_name.trim().is_empty() || Path::new(file_name).components().count() != 1 {
            bail!("invalid note file name: {file_name:?}");
        }

        let target = match current.parent() {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        };
        if target == current {
            return Ok(());
        }
        if target.exists() {
            bail!("a note named {} already exists", target.display());
        }

        std::fs::rename(current, &target).with_context(|| {
            format!(
                "failed to rename {} to {}",
                current.display(),
                target.display()
            )
        })?;
        self.path = target;
        Ok(())
    }

    fn process_frontmatter(&mut self, edit: &mut dyn FnMut(&mut Mapping)) -> Result<()> {
        let content = self.read_content()?;
        let updated = update_frontmatter(&content, edit)
            .with_context(|| format!("failed to update frontmatter of {}", self.path.display()))?;
        self.replace_content(&updated)
    }

    fn read_content(&self) -> Result<String> {
        let path = self.existing_path()?;
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read note file: {}", path.display()))
    }

    fn replace_content(&mut self, content: &str) -> Result<()> {
        let path = self.existing_path()?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write note file: {}", path.display()))
    }
}

/// Prints notices for the user and keeps a copy in the run log.
///
/// With a stdout-echoing logger the log line is the only printed copy.
#[derive(Debug, Clone)]
pub struct ConsoleNotifier {
    logger: AppLogger,
}

impl ConsoleNotifier {
    pub fn new(logger: AppLogger) -> Self {
        Self { logger }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, message: &str) {
        if !self.logger.echoes_stdout() {
            println!("{message}");
        }
        self.logger.info(&format!("notice: {message}"));
    }
}
