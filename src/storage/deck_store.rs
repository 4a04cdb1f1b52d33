//! DeckStore: deck persistence with optional git auto-commit and sync.

use std::path::{Path, PathBuf};

use log::{info, warn};

use super::json::JsonFileStorage;
use super::traits::Storage;
use crate::domain::Deck;
use crate::error::{KarteiError, Result};
use crate::git::GitClient;
use crate::id::matches_id;

const DECKS: &str = "decks";

pub const DEFAULT_COMMIT_MESSAGE: &str = "Update deck";

/// Decks stored as `{root}/decks/{id}.json`.
pub struct DeckStore {
    storage: JsonFileStorage,
    git: Option<Box<dyn GitClient>>,
    auto_commit: bool,
    commit_message: String,
}

impl std::fmt::Debug for DeckStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeckStore")
            .field("root", &self.storage.base_path())
            .field("git", &self.git.is_some())
            .field("auto_commit", &self.auto_commit)
            .finish_non_exhaustive()
    }
}

impl DeckStore {
    /// Open or create a store rooted at the data directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            storage: JsonFileStorage::new(root)?,
            git: None,
            auto_commit: false,
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
        })
    }

    /// Attach a version control backend.
    ///
    /// With `auto_commit`, every successful write is staged and committed
    /// while the data directory is a repository.
    pub fn with_git(mut self, git: Box<dyn GitClient>, auto_commit: bool) -> Self {
        self.git = Some(git);
        self.auto_commit = auto_commit;
        self
    }

    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = message.into();
        self
    }

    pub fn root(&self) -> &Path {
        self.storage.base_path()
    }

    pub fn history_dir(&self) -> PathBuf {
        self.root().join("history")
    }

    pub fn get(&self, id: &str) -> Result<Option<Deck>> {
        self.storage.get(DECKS, id)
    }

    /// All readable decks, sorted by name.
    pub fn all(&self) -> Result<Vec<Deck>> {
        let mut decks: Vec<Deck> = self.storage.list(DECKS)?;
        decks.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(decks)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.storage.exists(DECKS, id)
    }

    pub fn add(&self, deck: &Deck) -> Result<()> {
        if self.exists(&deck.id) {
            return Err(KarteiError::DeckExists(deck.id.clone()));
        }
        self.storage.create(DECKS, deck)?;
        info!("Added deck {} ({})", deck.name, deck.id);
        self.commit_changes();
        Ok(())
    }

    pub fn update(&self, deck: &Deck) -> Result<()> {
        if !self.exists(&deck.id) {
            return Err(KarteiError::DeckNotFound(deck.id.clone()));
        }
        self.storage.update(DECKS, deck)?;
        self.commit_changes();
        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        if !self.exists(id) {
            return Err(KarteiError::DeckNotFound(id.to_string()));
        }
        self.storage.delete(DECKS, id)?;
        info!("Deleted deck {}", id);
        self.commit_changes();
        Ok(())
    }

    /// Resolve a deck by exact id, unique id prefix, or case-insensitive name.
    pub fn find(&self, key: &str) -> Result<Deck> {
        if let Some(deck) = self.get(key).ok().flatten() {
            return Ok(deck);
        }

        let decks = self.all()?;
        let mut candidates: Vec<&Deck> = decks.iter().filter(|d| matches_id(&d.id, key)).collect();
        if candidates.is_empty() {
            candidates = decks.iter().filter(|d| d.name.eq_ignore_ascii_case(key)).collect();
        }

        match candidates.as_slice() {
            [deck] => Ok((*deck).clone()),
            [] => Err(KarteiError::DeckNotFound(key.to_string())),
            _ => Err(KarteiError::DeckNotFound(format!("{} is ambiguous", key))),
        }
    }

    /// Pull then push. Returns `false` when the data directory is not a repository.
    pub fn sync(&self) -> Result<bool> {
        let Some(git) = self.git.as_ref().filter(|g| g.is_initialized()) else {
            return Ok(false);
        };
        git.pull()?;
        git.push()?;
        info!("Synced {}", self.root().display());
        Ok(true)
    }

    /// Stage and commit after a write. Failures are logged, never returned:
    /// the write itself already succeeded.
    fn commit_changes(&self) {
        if !self.auto_commit {
            return;
        }
        let Some(git) = self.git.as_ref().filter(|g| g.is_initialized()) else {
            return;
        };

        if let Err(e) = git.add_all() {
            warn!("Unable to add files to git: {}", e);
            return;
        }
        if let Err(e) = git.commit(&self.commit_message) {
            warn!("Unable to commit changes to git: {}", e);
        }
    }
}
