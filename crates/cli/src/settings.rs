// Where the database lives and which account is active.

use std::path::PathBuf;

use supplyplan_store::SqliteStore;

use crate::exit_codes::EXIT_USAGE;
use crate::CliError;

const APP_DIR: &str = "supplyplan";
const DB_FILE: &str = "supplyplan.db";

pub struct Context {
    db: Option<PathBuf>,
    pub account: String,
}

impl Context {
    pub fn new(db: Option<PathBuf>, account: String) -> Self {
        Self { db, account }
    }

    /// `--db` / `SPLAN_DB`, else `<data dir>/supplyplan/supplyplan.db`.
    pub fn db_path(&self) -> Result<PathBuf, CliError> {
        if let Some(ref path) = self.db {
            return Ok(path.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR).join(DB_FILE))
            .ok_or_else(|| {
                CliError::new(EXIT_USAGE, "cannot determine a data directory")
                    .with_hint("pass --db <path> or set SPLAN_DB")
            })
    }

    pub fn open_store(&self) -> Result<SqliteStore, CliError> {
        let path = self.db_path()?;
        tracing::debug!(path = %path.display(), account = %self.account, "opening store");
        SqliteStore::open(&path).map_err(CliError::store)
    }
}
