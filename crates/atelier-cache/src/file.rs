//! Directory-backed key-value store.

use crate::{CacheError, KvStore};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// One file per key under a root directory.
///
/// Keys are base64url-encoded into file names so any key is a valid,
/// collision-free file name. Writes go to a temporary file that is renamed
/// into place, so a reader never observes a half-written value.
#[derive(Debug, Clone)]
pub struct FileKv {
    root: PathBuf,
}

impl FileKv {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| CacheError::OpenError(format!("{}: {}", root.display(), e)))?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.kv", URL_SAFE_NO_PAD.encode(key.as_bytes())))
    }
}

impl KvStore for FileKv {
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_bytes(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("kv.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        tracing::trace!(key, bytes = value.len(), "kv entry written");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        FileKv::open(dir.path())
            .unwrap()
            .set_bytes("atelier:cart", b"[]")
            .unwrap();

        let reopened = FileKv::open(dir.path()).unwrap();
        assert_eq!(
            reopened.get_bytes("atelier:cart").unwrap(),
            Some(b"[]".to_vec())
        );
    }

    #[test]
    fn test_delete_missing_key_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKv::open(dir.path()).unwrap();
        kv.delete("ghost").unwrap();
        assert_eq!(kv.get_bytes("ghost").unwrap(), None);
    }

    #[test]
    fn test_keys_with_separators_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKv::open(dir.path()).unwrap();
        kv.set_bytes("a:b", b"1").unwrap();
        kv.set_bytes("a_b", b"2").unwrap();
        assert_eq!(kv.get_bytes("a:b").unwrap(), Some(b"1".to_vec()));
        assert_eq!(kv.get_bytes("a_b").unwrap(), Some(b"2".to_vec()));
    }
}
