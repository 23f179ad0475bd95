use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::{CacheError, Exercise, FetchError, SnapshotError};

/// Device-local copy of the exercise dataset.
#[allow(async_fn_in_trait)]
pub trait ExerciseCacheRepository {
    async fn read_version(&self) -> Result<Option<String>, CacheError>;
    async fn read_exercises(&self) -> Result<Option<Vec<Exercise>>, CacheError>;
    async fn read_info(&self) -> Result<Option<CacheInfo>, CacheError>;
    async fn write_exercises(&self, exercises: &[Exercise], version: &str)
    -> Result<(), CacheError>;
    async fn clear(&self) -> Result<(), CacheError>;
}

/// Authoritative, versioned exercise dataset.
#[allow(async_fn_in_trait)]
pub trait ExerciseSourceRepository {
    async fn read_version(&self) -> Result<DatasetVersion, FetchError>;
    async fn read_snapshot(&self) -> Result<Snapshot, FetchError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetVersion {
    pub version: String,
    pub total_count: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub version: String,
    pub exercises: Vec<Exercise>,
    pub timestamp: DateTime<Utc>,
}

impl Snapshot {
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut ids = HashSet::with_capacity(self.exercises.len());
        for exercise in &self.exercises {
            if !ids.insert(&exercise.id) {
                return Err(SnapshotError::DuplicateID(exercise.id.to_string()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheInfo {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub exercise_count: usize,
}
