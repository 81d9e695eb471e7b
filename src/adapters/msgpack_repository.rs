//! MessagePack implementation of the repository port.
//!
//! Compact binary storage via rmp_serde, for large value tables and long
//! trajectory logs.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use serde::{Serialize, de::DeserializeOwned};

use super::{corrupt, create_parent_dir, read_bytes};
use crate::{
    Result,
    error::Error,
    ports::Repository,
    q_learning::{TrajectoryLog, ValueTable},
};

/// MessagePack-based repository.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use qttt::{adapters::MsgPackRepository, ports::Repository, q_learning::ValueTable};
///
/// let repo = MsgPackRepository;
/// repo.save_table(&ValueTable::new(), Path::new("trained.msgpack"))?;
/// let loaded = repo.load_table(Path::new("trained.msgpack"))?;
/// # Ok::<(), qttt::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }

    fn write<T: Serialize>(&self, value: &T, path: &Path, what: &str) -> Result<()> {
        create_parent_dir(path)?;
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, value).map_err(|e| {
            Error::SerializationContext {
                operation: format!("serialize {what} to MessagePack"),
                message: e.to_string(),
            }
        })?;

        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush file {path:?}"),
            source,
        })
    }

    fn read<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let bytes = read_bytes(path)?;
        rmp_serde::from_slice(&bytes).map_err(|e| corrupt(path, e))
    }
}

impl Repository for MsgPackRepository {
    fn save_table(&self, table: &ValueTable, path: &Path) -> Result<()> {
        self.write(table, path, "value table")
    }

    fn load_table(&self, path: &Path) -> Result<ValueTable> {
        self.read(path)
    }

    fn save_trajectories(&self, log: &TrajectoryLog, path: &Path) -> Result<()> {
        self.write(log, path, "trajectory log")
    }

    fn load_trajectories(&self, path: &Path) -> Result<TrajectoryLog> {
        self.read(path)
    }
}
