//! JSON String-Id Repository
//!
//! Persists recorded strings as `{ "0x<hex64>": "<string>" }`.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{write_pretty, METADATA_DIR};
use crate::domain::entities::StringIdRepository;
use crate::domain::ports::{FileSource, StoreError, StoreRepository, StoreResult};
use crate::domain::value_objects::StringId64;

/// String ids stored at `.builder/string_id_repository`
pub struct JsonStringIdRepository {
    fs: Arc<dyn FileSource>,
    path: String,
}

impl JsonStringIdRepository {
    pub fn new(fs: Arc<dyn FileSource>) -> Self {
        Self {
            fs,
            path: format!("{METADATA_DIR}/string_id_repository"),
        }
    }
}

impl StoreRepository for JsonStringIdRepository {
    type Store = StringIdRepository;

    fn load(&self) -> StoreResult<StringIdRepository> {
        let content = self.fs.read(&self.path)?;
        let entries: BTreeMap<String, String> = serde_json::from_slice(&content)?;

        let mut repository = StringIdRepository::new();
        for (key, value) in entries {
            let id = StringId64::parse_hex(&key)
                .ok_or_else(|| StoreError::InvalidFormat(format!("invalid string id '{key}'")))?;
            repository.insert(id, value);
        }
        Ok(repository)
    }

    fn save(&self, repository: &StringIdRepository) -> StoreResult<()> {
        let entries: BTreeMap<String, &str> = repository
            .entries()
            .map(|(id, value)| (StringId64::from_raw(id).to_string(), value))
            .collect();
        write_pretty(self.fs.as_ref(), &self.path, &entries)
    }
}
