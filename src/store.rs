use async_trait::async_trait;

use crate::{
    error::StoreResult,
    types::{ETag, JobEntity},
};

/// Key-partitioned table holding [`JobEntity`] rows.
///
/// Writes stamp a fresh timestamp and [`ETag`] on the stored row and return
/// the new tag. Conditional writes take the tag the caller last observed,
/// or [`ETag::any`] to skip the check.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn add_entity(&self, entity: &JobEntity) -> StoreResult<ETag>;

    async fn upsert_entity(&self, entity: &JobEntity) -> StoreResult<ETag>;

    async fn update_entity(&self, entity: &JobEntity, if_match: &ETag) -> StoreResult<ETag>;

    async fn get_entity(&self, partition_key: &str, row_key: &str) -> StoreResult<JobEntity>;

    async fn delete_entity(
        &self,
        partition_key: &str,
        row_key: &str,
        if_match: &ETag,
    ) -> StoreResult<()>;

    /// All rows of one partition, ordered by row key.
    async fn query_partition(&self, partition_key: &str) -> StoreResult<Vec<JobEntity>>;
}
