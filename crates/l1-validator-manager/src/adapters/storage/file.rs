use crate::domain::errors::StorageError;
use crate::ports::outbound::{BatchOperation, KeyValueStore};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// File-backed key-value store.
///
/// Keeps the whole map in memory and rewrites the file on every write
/// through a temp file and rename, so a crash leaves either the old or the
/// new image on disk. Suitable for development and light production.
pub struct FileBackedKVStore {
    data: HashMap<Vec<u8>, Vec<u8>>,
    path: PathBuf,
}

fn io_error(e: std::io::Error) -> StorageError {
    StorageError::Io {
        message: e.to_string(),
    }
}

impl FileBackedKVStore {
    /// Open the store at `path`, loading any existing image.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        let data = match std::fs::read(&path) {
            Ok(bytes) => {
                let data = Self::decode_image(&bytes)?;
                info!(
                    "[l1-vm] 💾 Loaded {} keys from {} ({} bytes)",
                    data.len(),
                    path.display(),
                    bytes.len()
                );
                data
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("[l1-vm] 📁 No existing registry file at {}", path.display());
                HashMap::new()
            }
            Err(e) => return Err(io_error(e)),
        };

        Ok(Self { data, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Format: repeated [key_len:u32 LE][key][value_len:u32 LE][value]
    fn decode_image(bytes: &[u8]) -> Result<HashMap<Vec<u8>, Vec<u8>>, StorageError> {
        fn take<'b>(bytes: &'b [u8], cursor: &mut usize, len: usize) -> Result<&'b [u8], StorageError> {
            let end = cursor
                .checked_add(len)
                .filter(|end| *end <= bytes.len())
                .ok_or_else(|| StorageError::Corrupted {
                    key: "<file>".to_string(),
                    message: format!("truncated record at offset {}", cursor),
                })?;
            let slice = &bytes[*cursor..end];
            *cursor = end;
            Ok(slice)
        }

        fn take_len(bytes: &[u8], cursor: &mut usize) -> Result<usize, StorageError> {
            let raw = take(bytes, cursor, 4)?;
            let mut buf = [0u8; 4];
            buf.copy_from_slice(raw);
            Ok(u32::from_le_bytes(buf) as usize)
        }

        let mut data = HashMap::new();
        let mut cursor = 0;
        while cursor < bytes.len() {
            let key_len = take_len(bytes, &mut cursor)?;
            let key = take(bytes, &mut cursor, key_len)?.to_vec();
            let value_len = take_len(bytes, &mut cursor)?;
            let value = take(bytes, &mut cursor, value_len)?.to_vec();
            data.insert(key, value);
        }
        Ok(data)
    }

    fn encode_image(data: &HashMap<Vec<u8>, Vec<u8>>) -> Vec<u8> {
        let mut entries: Vec<_> = data.iter().collect();
        entries.sort();

        let mut bytes = Vec::new();
        for (key, value) in entries {
            bytes.extend_from_slice(&(key.len() as u32).to_le_bytes());
            bytes.extend_from_slice(key);
            bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
            bytes.extend_from_slice(value);
        }
        bytes
    }

    fn save(path: &Path, data: &HashMap<Vec<u8>, Vec<u8>>) -> Result<(), StorageError> {
        use std::io::Write;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let temp_path = path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(io_error)?;
        file.write_all(&Self::encode_image(data)).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;
        std::fs::rename(&temp_path, path).map_err(io_error)?;
        Ok(())
    }

    /// Apply `ops` to a copy and persist it; memory changes only if the file write succeeds.
    fn apply(&mut self, ops: Vec<BatchOperation>) -> Result<(), StorageError> {
        let mut next = self.data.clone();
        for op in ops {
            match op {
                BatchOperation::Put { key, value } => {
                    next.insert(key, value);
                }
                BatchOperation::Delete { key } => {
                    next.remove(&key);
                }
            }
        }
        Self::save(&self.path, &next)?;
        self.data = next;
        Ok(())
    }
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.apply(vec![BatchOperation::put(key, value)])
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError> {
        self.apply(vec![BatchOperation::delete(key)])
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), StorageError> {
        self.apply(operations)
    }

    fn exists(&self, key: &[u8]) -> Result<bool, StorageError> {
        Ok(self.data.contains_key(key))
    }
}
