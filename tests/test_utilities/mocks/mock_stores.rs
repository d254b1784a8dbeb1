use async_trait::async_trait;
use registry_gate::ports::outbound::CreateOutcome;
use registry_gate::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory MetadataStore; clones share the same records
#[derive(Default, Clone)]
pub struct InMemoryMetadataStore {
    records: Arc<Mutex<HashMap<String, PackageRecord>>>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(self, record: PackageRecord) -> Self {
        self.records
            .lock()
            .unwrap()
            .insert(record.id().to_string(), record);
        self
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn get(&self, id: &str) -> Result<Option<PackageRecord>> {
        Ok(self.records.lock().unwrap().get(id).cloned())
    }

    async fn create(&self, record: &PackageRecord) -> Result<CreateOutcome> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(record.id()) {
            return Ok(CreateOutcome::Conflict);
        }
        records.insert(record.id().to_string(), record.clone());
        Ok(CreateOutcome::Created)
    }
}

/// In-memory BlobStore; clones share the same objects
#[derive(Default, Clone)]
pub struct InMemoryBlobStore {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.blobs.lock().unwrap().contains_key(key))
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.object(key))
    }

    async fn put(&self, key: &str, bytes: &[u8], _content_type: &str) -> Result<()> {
        self.blobs
            .lock()
            .unwrap()
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
