//! Application state management

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rapat_core::{AppConfig, Database, Roster, SelectionSession, PARTICIPANTS_KEY};
use tracing::{debug, info};

use crate::error::{AppError, Result};

/// Main application state
pub struct AppState {
    pub db: Database,
    pub config: AppConfig,
    data_dir: PathBuf,
}

impl AppState {
    /// Open state from the platform directories, with an optional config
    /// file override
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let dirs = Self::project_dirs()?;
        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| dirs.config_dir().join("config.toml"));
        Self::open(dirs.data_dir(), &config_path)
    }

    /// Open state rooted at explicit paths
    pub fn open(data_dir: &Path, config_path: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;

        let config = AppConfig::load(config_path)?.with_env_overrides();
        let db = Database::open(data_dir.join("rapat.db"))?;
        info!(data_dir = %data_dir.display(), "Application state ready");

        Ok(Self {
            db,
            config,
            data_dir: data_dir.to_path_buf(),
        })
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "onyx", "rapat").ok_or(AppError::NoProjectDirs("data"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn load_roster(&self) -> Result<Roster> {
        Ok(Roster::load(&self.db, PARTICIPANTS_KEY)?)
    }

    pub fn save_roster(&self, roster: &Roster) -> Result<()> {
        roster.save(&self.db, PARTICIPANTS_KEY)?;
        debug!(participants = roster.len(), "Roster saved");
        Ok(())
    }

    /// Random source: explicit seed, then configured seed, then entropy
    pub fn rng(&self, seed: Option<u64>) -> StdRng {
        match seed.or(self.config.wheel.seed) {
            Some(seed) => {
                debug!(seed, "Using seeded random source");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        }
    }

    /// A selection session over the stored roster
    pub fn session(&self, seed: Option<u64>) -> Result<SelectionSession> {
        let session = SelectionSession::new(self.load_roster()?, self.rng(seed))
            .with_timing(self.config.wheel.timing());
        Ok(session)
    }
}
