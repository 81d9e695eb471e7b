//! JSON implementation of the repository port.
//!
//! Human-readable storage via serde_json. Floats are written with enough
//! digits to read back bit-exactly.

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

/// JSON-file repository.
///
/// A value table is stored as a nested object keyed by state, then by
/// `"row,col"`:
///
/// ```json
/// { "X...O....": { "0,1": 0.12, "2,2": 0.4 } }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRepository;

impl JsonRepository {
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
        serde_json::to_writer_pretty(&mut writer, value).map_err(|e| {
            Error::SerializationContext {
                operation: format!("serialize {what} to JSON"),
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
        serde_json::from_slice(&bytes).map_err(|e| corrupt(path, e))
    }
}

impl Repository for JsonRepository {
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
