use crate::constants::PREFERENCES_FILE_NAME;
use crate::preferences::{PreferenceKey, Preferences};
use crate::types::{TextAlignment, TextDirection};
use anyhow::{Context, Result};
use chrono::Utc;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Where the preference record is read from and written to
pub trait PreferenceBackend {
    /// Returns `None` when nothing has been stored yet.
    fn read(&self) -> Result<Option<String>>;

    fn write(&mut self, contents: &str) -> Result<()>;
}

pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: PathBuf) -> Self {
        JsonFileBackend { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceBackend for JsonFileBackend {
    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).context("Failed to read preferences file")?;
        Ok(Some(content))
    }

    fn write(&mut self, contents: &str) -> Result<()> {
        // Write through a sibling file so a crash mid-write leaves the old record intact
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, contents).context("Failed to write preferences file")?;
        fs::rename(&tmp_path, &self.path).context("Failed to replace preferences file")?;
        Ok(())
    }
}

/// Keeps the record in memory only; nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryBackend {
    contents: Option<String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        MemoryBackend::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        MemoryBackend {
            contents: Some(contents.into()),
        }
    }
}

impl PreferenceBackend for MemoryBackend {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.contents.clone())
    }

    fn write(&mut self, contents: &str) -> Result<()> {
        self.contents = Some(contents.to_string());
        Ok(())
    }
}

pub struct PersistenceManager {
    config_dir: PathBuf,
}

impl PersistenceManager {
    pub fn new(config_dir_override: Option<PathBuf>) -> Result<Self> {
        let config_dir = match config_dir_override {
            Some(dir) => dir,
            None => ProjectDirs::from("", "", "teleprompt")
                .context("Failed to determine config directory")?
                .config_dir()
                .to_path_buf(),
        };

        // Create config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        }

        Ok(PersistenceManager { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.config_dir.join(PREFERENCES_FILE_NAME)
    }

    pub fn file_backend(&self) -> JsonFileBackend {
        JsonFileBackend::new(self.preferences_path())
    }

    /// Backend for a run. Ephemeral runs start from a snapshot of the stored
    /// record and never write the file.
    pub fn backend(&self, ephemeral: bool) -> Box<dyn PreferenceBackend> {
        let file_backend = self.file_backend();
        if !ephemeral {
            return Box::new(file_backend);
        }

        let seeded = match file_backend.read() {
            Ok(Some(content)) => MemoryBackend::with_contents(content),
            Ok(None) => MemoryBackend::new(),
            Err(e) => {
                tracing::warn!("Failed to read stored preferences: {:#}", e);
                MemoryBackend::new()
            }
        };
        Box::new(seeded)
    }
}

/// Single owner of the live preferences.
///
/// Every mutation goes through a method here, which clamps the record and
/// writes it back to the backend before returning. Write failures are
/// logged and the in-memory value is kept.
pub struct PreferenceStore {
    prefs: Preferences,
    backend: Box<dyn PreferenceBackend>,
}

impl PreferenceStore {
    /// Load the record once. Read or parse failures yield defaults.
    pub fn load(backend: Box<dyn PreferenceBackend>) -> Self {
        let prefs = match backend.read() {
            Ok(Some(content)) => Preferences::from_json(&content),
            Ok(None) => {
                tracing::debug!("No stored preferences, using defaults");
                Preferences::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read preferences: {:#}. Using defaults.", e);
                Preferences::default()
            }
        };

        PreferenceStore { prefs, backend }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// Set one field from raw text, see [`Preferences::apply_input`]
    pub fn set(&mut self, key: PreferenceKey, raw: &str) {
        if self.prefs.apply_input(key, raw) {
            tracing::debug!(
                "Preference {} set to {:?}",
                key.field_name(),
                self.prefs.display_value(key)
            );
        }
        self.persist();
    }

    pub fn set_script(&mut self, script: String) {
        self.update(|prefs| prefs.script = script);
    }

    pub fn set_scroll_amount(&mut self, amount: u32) {
        self.update(|prefs| prefs.scroll_amount = amount);
    }

    pub fn set_scroll_step(&mut self, step: u32) {
        self.update(|prefs| prefs.scroll_step = step);
    }

    pub fn set_scroll_speed(&mut self, speed: u32) {
        self.update(|prefs| prefs.scroll_speed = speed);
    }

    pub fn set_font_size(&mut self, size: u32) {
        self.update(|prefs| prefs.font_size = size);
    }

    pub fn set_horizontal_padding(&mut self, padding: u32) {
        self.update(|prefs| prefs.horizontal_padding = padding);
    }

    pub fn set_text_alignment(&mut self, alignment: TextAlignment) {
        self.update(|prefs| prefs.text_alignment = alignment);
    }

    pub fn set_direction(&mut self, direction: TextDirection) {
        self.update(|prefs| prefs.direction = direction);
    }

    fn update(&mut self, apply: impl FnOnce(&mut Preferences)) {
        apply(&mut self.prefs);
        self.prefs.clamp();
        self.persist();
    }

    /// Write the current record; returns whether the write succeeded
    pub fn persist(&mut self) -> bool {
        self.prefs.saved_at = Some(Utc::now());
        let result = self
            .prefs
            .to_json()
            .context("Failed to serialize preferences")
            .and_then(|content| self.backend.write(&content));

        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to save preferences: {:#}", e);
                false
            }
        }
    }
}
