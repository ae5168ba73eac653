use std::{collections::BTreeMap, sync::Arc};

use aide_de_camp::core::new_xid;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::RwLock;
use tracing::instrument;

use crate::{
    error::{StoreError, StoreResult},
    store::JobStore,
    types::{ETag, JobEntity, JobRow},
};

type RowKey = (String, String);

/// In-process [`JobStore`]. Clones share the same table.
#[derive(Clone)]
pub struct MemoryJobStore {
    rows: Arc<RwLock<BTreeMap<RowKey, Vec<u8>>>>,
    bincode_config: bincode::config::Configuration,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(BTreeMap::new())),
            bincode_config: bincode::config::standard(),
        }
    }

    /// Encodes `entity` as a freshly written row.
    fn stamp(&self, entity: &JobEntity) -> StoreResult<(Vec<u8>, ETag)> {
        let etag = ETag::new(new_xid().to_string());
        let row = JobRow {
            partition_key: entity.partition_key.clone(),
            row_key: entity.row_key.clone(),
            timestamp_micros: Utc::now().timestamp_micros(),
            etag: etag.as_str().to_string(),
            content: entity.content.clone(),
            json_content: entity.json_content.clone(),
        };
        let encoded = bincode::encode_to_vec(&row, self.bincode_config)?;

        tracing::Span::current().record("row_size", encoded.len());

        Ok((encoded, etag))
    }

    fn decode(&self, encoded: &[u8]) -> StoreResult<JobRow> {
        let (row, _) = bincode::decode_from_slice(encoded, self.bincode_config)?;
        Ok(row)
    }

    fn load(&self, encoded: &[u8]) -> StoreResult<JobEntity> {
        let row = self.decode(encoded)?;
        let timestamp = Utc
            .timestamp_micros(row.timestamp_micros)
            .single()
            .ok_or(StoreError::InvalidTimestamp(row.timestamp_micros))?;

        Ok(JobEntity {
            content: row.content,
            json_content: row.json_content,
            partition_key: row.partition_key,
            row_key: row.row_key,
            timestamp: Some(timestamp),
            etag: ETag::new(row.etag),
        })
    }

    fn check_etag(&self, encoded: &[u8], if_match: &ETag) -> StoreResult<()> {
        if if_match.is_any() {
            return Ok(());
        }
        let stored = ETag::new(self.decode(encoded)?.etag);
        if if_match.matches(&stored) {
            Ok(())
        } else {
            Err(StoreError::PreconditionFailed {
                expected: if_match.clone(),
                actual: stored,
            })
        }
    }
}

impl Default for MemoryJobStore {
    fn default() -> Self {
        Self::new()
    }
}

fn key_of(entity: &JobEntity) -> RowKey {
    (entity.partition_key.clone(), entity.row_key.clone())
}

#[async_trait]
impl JobStore for MemoryJobStore {
    #[instrument(skip_all, err, fields(partition_key = %entity.partition_key, row_key = %entity.row_key, row_size))]
    async fn add_entity(&self, entity: &JobEntity) -> StoreResult<ETag> {
        let mut rows = self.rows.write().await;
        let key = key_of(entity);

        if rows.contains_key(&key) {
            return Err(StoreError::EntityAlreadyExists {
                partition_key: key.0,
                row_key: key.1,
            });
        }

        let (encoded, etag) = self.stamp(entity)?;
        rows.insert(key, encoded);

        Ok(etag)
    }

    #[instrument(skip_all, err, fields(partition_key = %entity.partition_key, row_key = %entity.row_key, row_size))]
    async fn upsert_entity(&self, entity: &JobEntity) -> StoreResult<ETag> {
        let mut rows = self.rows.write().await;

        let (encoded, etag) = self.stamp(entity)?;
        rows.insert(key_of(entity), encoded);

        Ok(etag)
    }

    #[instrument(skip_all, err, fields(partition_key = %entity.partition_key, row_key = %entity.row_key, row_size))]
    async fn update_entity(&self, entity: &JobEntity, if_match: &ETag) -> StoreResult<ETag> {
        let mut rows = self.rows.write().await;
        let key = key_of(entity);

        let existing = rows
            .get(&key)
            .ok_or_else(|| StoreError::not_found(&key.0, &key.1))?;
        self.check_etag(existing, if_match)?;

        let (encoded, etag) = self.stamp(entity)?;
        rows.insert(key, encoded);

        Ok(etag)
    }

    #[instrument(skip(self), err)]
    async fn get_entity(&self, partition_key: &str, row_key: &str) -> StoreResult<JobEntity> {
        let rows = self.rows.read().await;

        let encoded = rows
            .get(&(partition_key.to_string(), row_key.to_string()))
            .ok_or_else(|| StoreError::not_found(partition_key, row_key))?;

        self.load(encoded)
    }

    #[instrument(skip(self), err)]
    async fn delete_entity(
        &self,
        partition_key: &str,
        row_key: &str,
        if_match: &ETag,
    ) -> StoreResult<()> {
        let mut rows = self.rows.write().await;
        let key = (partition_key.to_string(), row_key.to_string());

        let existing = rows
            .get(&key)
            .ok_or_else(|| StoreError::not_found(partition_key, row_key))?;
        self.check_etag(existing, if_match)?;

        rows.remove(&key);
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn query_partition(&self, partition_key: &str) -> StoreResult<Vec<JobEntity>> {
        let rows = self.rows.read().await;

        rows.range((partition_key.to_string(), String::new())..)
            .take_while(|((pk, _), _)| pk == partition_key)
            .map(|(_, encoded)| self.load(encoded))
            .collect()
    }
}
