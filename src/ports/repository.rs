//! Repository port for value-table and trajectory persistence.

use std::path::Path;

use crate::{
    Result,
    q_learning::{TrajectoryLog, ValueTable},
};

/// Port for persisting and loading learned state.
///
/// Implementations report a missing source as [`crate::Error::Io`] with
/// [`std::io::ErrorKind::NotFound`] and undecodable content as
/// [`crate::Error::PersistenceCorruption`]. Tolerant loading on top of this
/// lives in [`ValueTable::load_or_default`] and
/// [`TrajectoryLog::load_or_default`].
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use qttt::{adapters::JsonRepository, ports::Repository, q_learning::ValueTable};
///
/// let repo = JsonRepository::new();
/// repo.save_table(&ValueTable::new(), Path::new("q_table.json"))?;
/// let table = repo.load_table(Path::new("q_table.json"))?;
/// # Ok::<(), qttt::Error>(())
/// ```
pub trait Repository: Send + Sync {
    /// Save a value table, replacing whatever is stored at `path`.
    fn save_table(&self, table: &ValueTable, path: &Path) -> Result<()>;

    /// Load a value table.
    ///
    /// # Errors
    ///
    /// Returns an error if the source does not exist, cannot be read or does
    /// not decode to a value table.
    fn load_table(&self, path: &Path) -> Result<ValueTable>;

    /// Save a trajectory log, replacing whatever is stored at `path`.
    fn save_trajectories(&self, log: &TrajectoryLog, path: &Path) -> Result<()>;

    /// Load a trajectory log.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Repository::load_table`].
    fn load_trajectories(&self, path: &Path) -> Result<TrajectoryLog>;
}
