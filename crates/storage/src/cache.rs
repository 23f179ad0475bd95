//! Exercise cache
//!
//! The whole dataset is stored as one JSON document. The version is additionally stored under a
//! separate key so that it can be checked without parsing the dataset.

use chrono::{DateTime, Utc};
use ironlog_domain::{self as domain, CacheError};
use strum::AsRefStr;

use crate::{KeyValueStore, exercise::Exercise};

#[derive(AsRefStr)]
enum Key {
    #[strum(serialize = "exercise database")]
    Database,
    #[strum(serialize = "exercise database version")]
    Version,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct Database {
    version: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    timestamp: DateTime<Utc>,
    exercises: Vec<Exercise>,
}

/// Header of [`Database`], skipping over the exercise records.
#[derive(serde::Deserialize)]
struct DatabaseInfo {
    version: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    timestamp: DateTime<Utc>,
    exercises: Vec<serde::de::IgnoredAny>,
}

#[derive(Debug, Clone)]
pub struct ExerciseCache<S> {
    store: S,
}

impl<S> ExerciseCache<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> domain::ExerciseCacheRepository for ExerciseCache<S> {
    async fn read_version(&self) -> Result<Option<String>, CacheError> {
        Ok(self.store.get(Key::Version.as_ref()).await?)
    }

    async fn read_exercises(&self) -> Result<Option<Vec<domain::Exercise>>, CacheError> {
        let Some(value) = self.store.get(Key::Database.as_ref()).await? else {
            return Ok(None);
        };
        let database: Database = parse(&value)?;
        Ok(Some(
            database
                .exercises
                .into_iter()
                .map(domain::Exercise::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| CacheError::Parse(err.to_string()))?,
        ))
    }

    async fn read_info(&self) -> Result<Option<domain::CacheInfo>, CacheError> {
        let Some(value) = self.store.get(Key::Database.as_ref()).await? else {
            return Ok(None);
        };
        let info: DatabaseInfo = parse(&value)?;
        Ok(Some(domain::CacheInfo {
            version: info.version,
            timestamp: info.timestamp,
            exercise_count: info.exercises.len(),
        }))
    }

    async fn write_exercises(
        &self,
        exercises: &[domain::Exercise],
        version: &str,
    ) -> Result<(), CacheError> {
        let database = Database {
            version: version.to_string(),
            timestamp: Utc::now(),
            exercises: exercises.iter().map(Exercise::from).collect(),
        };
        let value =
            serde_json::to_string(&database).map_err(|err| CacheError::Parse(err.to_string()))?;
        // The dataset goes first, an interrupted write leaves an outdated version behind.
        self.store
            .multi_set(&[
                (Key::Database.as_ref(), value.as_str()),
                (Key::Version.as_ref(), version),
            ])
            .await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.store
            .multi_delete(&[Key::Database.as_ref(), Key::Version.as_ref()])
            .await?;
        Ok(())
    }
}

fn parse<T: serde::de::DeserializeOwned>(value: &str) -> Result<T, CacheError> {
    serde_json::from_str(value).map_err(|err| CacheError::Parse(err.to_string()))
}
