//! Adapters implementing domain ports.
//!
//! Storage backends for the [`crate::ports::Repository`] port. Adapters depend
//! on the port, never the other way around.

use std::{fmt::Display, fs, path::Path};

use crate::{Result, error::Error, ports::Repository};

pub mod in_memory_repository;
pub mod json_repository;
pub mod msgpack_repository;

pub use in_memory_repository::InMemoryRepository;
pub use json_repository::JsonRepository;
pub use msgpack_repository::MsgPackRepository;

/// Pick a file-backed repository from the path's extension.
///
/// `.msgpack` and `.mp` select MessagePack; everything else is JSON.
pub fn repository_for(path: &Path) -> Box<dyn Repository> {
    let is_msgpack = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("msgpack") || ext.eq_ignore_ascii_case("mp"));
    if is_msgpack {
        Box::new(MsgPackRepository::new())
    } else {
        Box::new(JsonRepository::new())
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| Error::Io {
        operation: format!("read file {path:?}"),
        source,
    })
}

fn create_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                operation: format!("create directory {parent:?}"),
                source,
            })
        }
        _ => Ok(()),
    }
}

fn corrupt(path: &Path, err: impl Display) -> Error {
    Error::PersistenceCorruption {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{q_learning::ValueTable, types::{Action, StateKey}};

    #[test]
    fn test_repository_for_picks_format_by_extension() {
        let dir = TempDir::new().unwrap();
        let mut table = ValueTable::new();
        table.update(&StateKey::parse(".........").unwrap(), Action::new(1, 1), 0.25);

        for name in ["table.json", "table.msgpack", "table.MP", "table"] {
            let path = dir.path().join(name);
            repository_for(&path).save_table(&table, &path).unwrap();
            assert_eq!(repository_for(&path).load_table(&path).unwrap(), table);
        }

        let bytes = fs::read(dir.path().join("table.json")).unwrap();
        assert_eq!(bytes.first(), Some(&b'{'));
        let bytes = fs::read(dir.path().join("table.msgpack")).unwrap();
        assert_ne!(bytes.first(), Some(&b'{'));
    }

    #[test]
    fn test_save_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("q.json");
        JsonRepository::new()
            .save_table(&ValueTable::new(), &path)
            .unwrap();
        assert!(path.exists());
    }
}
