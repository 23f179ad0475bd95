#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod dataset;
mod debounce;
mod error;
mod exercise;
mod filter;
mod name;
mod search;
mod sync;

pub use dataset::{
    CacheInfo, DatasetVersion, ExerciseCacheRepository, ExerciseSourceRepository, Snapshot,
};
pub use debounce::{Debounce, SEARCH_DEBOUNCE_MILLIS};
pub use error::{CacheError, FetchError, SnapshotError, StorageError};
pub use exercise::{
    Category, Equipment, Exercise, ExerciseID, ExerciseIDError, Force, Level, Mechanic, Muscle,
    Property,
};
pub use filter::{ExerciseFilter, apply_filters};
pub use name::{Name, NameError};
pub use search::{SearchHit, rank, search, tokenize};
pub use sync::{ExerciseDatabase, ListenerID, SyncOutcome, SyncPhase, SyncState};
