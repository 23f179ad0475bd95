#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use ironlog_domain::StorageError;

pub mod cache;
pub mod exercise;
#[allow(clippy::module_name_repetitions)]
pub mod local_storage;
pub mod memory;
pub mod rest;

/// String-keyed store holding serialized values.
///
/// Single operations are atomic. `multi_set` and `multi_delete` apply their entries in order and
/// stop at the first failure.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn multi_set(&self, entries: &[(&str, &str)]) -> Result<(), StorageError>;
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
    async fn multi_delete(&self, keys: &[&str]) -> Result<(), StorageError>;
}
