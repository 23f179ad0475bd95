//! Exercise database synchronization
//!
//! The device-local cache is shown first and reconciled against the remote dataset afterwards.
//! Every sync fetches a complete snapshot and replaces the cached copy. At most one sync is in
//! flight per [`ExerciseDatabase`].

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use chrono::{DateTime, Utc};
use futures_util::future::join;
use log::{debug, error, info, warn};

use crate::{
    CacheError, DatasetVersion, Exercise, ExerciseCacheRepository, ExerciseFilter,
    ExerciseSourceRepository, FetchError, Snapshot, search,
};

macro_rules! log_on_error {
    ($func: expr, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                FetchError::NoConnection => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    #[default]
    Uninitialized,
    LoadingLocal,
    /// Cached data is shown, the remote version has not been confirmed yet.
    ReadyStale,
    Syncing,
    ReadyFresh,
    /// Nothing to show: no cached data and the remote fetch failed.
    Error,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncState {
    pub phase: SyncPhase,
    pub is_initialized: bool,
    pub is_syncing: bool,
    pub exercises: Rc<[Exercise]>,
    pub version: Option<String>,
    pub last_sync: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Synced {
        version: String,
        exercise_count: usize,
    },
    UpToDate,
    AlreadySyncing,
    /// Local data is still loading; the loading call reconciles once it is shown.
    Deferred,
    /// The database was cleared while cached exercises or the snapshot were in flight.
    Discarded,
}

enum Local {
    Loading,
    Ready,
    Missing,
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerID(usize);

type Listener = Box<dyn Fn(&SyncState)>;

pub struct ExerciseDatabase<C, S> {
    cache: C,
    source: S,
    state: RefCell<SyncState>,
    listeners: RefCell<Vec<(ListenerID, Listener)>>,
    next_listener_id: Cell<usize>,
    epoch: Cell<u64>,
}

impl<C, S> ExerciseDatabase<C, S> {
    pub fn new(cache: C, source: S) -> Self {
        Self {
            cache,
            source,
            state: RefCell::new(SyncState::default()),
            listeners: RefCell::new(Vec::new()),
            next_listener_id: Cell::new(0),
            epoch: Cell::new(0),
        }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    #[must_use]
    pub fn state(&self) -> SyncState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn exercises(&self) -> Rc<[Exercise]> {
        Rc::clone(&self.state.borrow().exercises)
    }

    /// Registers a callback invoked with every published state.
    ///
    /// Callbacks must not subscribe or unsubscribe.
    pub fn subscribe(&self, listener: impl Fn(&SyncState) + 'static) -> ListenerID {
        let id = ListenerID(self.next_listener_id.get());
        self.next_listener_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerID) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let len = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != len
    }

    /// Filters the current exercises and ranks the remaining ones by `query`.
    #[must_use]
    pub fn find(&self, filter: &ExerciseFilter, query: &str, limit: usize) -> Vec<Exercise> {
        let exercises = self.exercises();
        let candidates = filter.exercises(exercises.iter());
        search(candidates, query, limit)
            .into_iter()
            .cloned()
            .collect()
    }

    fn update(&self, modify: impl FnOnce(&mut SyncState)) {
        let state = {
            let mut state = self.state.borrow_mut();
            modify(&mut state);
            state.clone()
        };
        debug!(
            "exercise database {:?} ({} exercises, version {})",
            state.phase,
            state.exercises.len(),
            state.version.as_deref().unwrap_or("none")
        );
        for (_, listener) in self.listeners.borrow().iter() {
            listener(&state);
        }
    }
}

impl<C, S> ExerciseDatabase<C, S>
where
    C: ExerciseCacheRepository,
    S: ExerciseSourceRepository,
{
    /// Shows cached exercises if there are any and reconciles them with the remote dataset.
    ///
    /// Does nothing if the database is already initialized, loading or syncing.
    pub async fn initialize(&self) {
        {
            let state = self.state.borrow();
            if state.is_initialized || state.is_syncing || state.phase == SyncPhase::LoadingLocal
            {
                debug!("exercise database already initialized");
                return;
            }
        }

        match self.load_local().await {
            Some(true) => {
                if self.check_remote().await.is_err() {
                    debug!("keeping cached exercises");
                }
            }
            Some(false) => {
                if self.sync().await.is_err() {
                    debug!("no exercises available");
                }
            }
            None => {}
        }
    }

    /// Probes the remote version and syncs if it differs from the local one.
    ///
    /// Cached exercises are loaded and shown first if that has not happened yet.
    pub async fn reconcile(&self) -> Result<SyncOutcome, FetchError> {
        match self.prepare_local().await {
            Local::Ready => self.check_remote().await,
            Local::Missing => self.sync().await,
            Local::Loading => Ok(SyncOutcome::Deferred),
            Local::Cleared => Ok(SyncOutcome::Discarded),
        }
    }

    /// Syncs if `remote` differs from the local version and no sync is in flight.
    pub async fn observe_remote_version(
        &self,
        remote: &DatasetVersion,
    ) -> Result<SyncOutcome, FetchError> {
        match self.prepare_local().await {
            Local::Ready => self.compare(remote).await,
            Local::Missing => self.sync().await,
            Local::Loading => Ok(SyncOutcome::Deferred),
            Local::Cleared => Ok(SyncOutcome::Discarded),
        }
    }

    /// Fetches and stores a new snapshot regardless of the local version.
    pub async fn force_sync(&self) -> Result<SyncOutcome, FetchError> {
        match self.prepare_local().await {
            Local::Ready | Local::Missing => {}
            Local::Loading => return Ok(SyncOutcome::Deferred),
            Local::Cleared => return Ok(SyncOutcome::Discarded),
        }
        if self.state.borrow().is_syncing {
            debug!("sync of exercise database already in progress");
            return Ok(SyncOutcome::AlreadySyncing);
        }
        self.sync().await
    }

    /// Removes the cached exercises and resets the state.
    ///
    /// A snapshot in flight is discarded when it arrives.
    pub async fn clear_database(&self) -> Result<(), CacheError> {
        self.epoch.set(self.epoch.get() + 1);
        self.update(|state| *state = SyncState::default());
        let result = self.cache.clear().await;
        if let Err(ref err) = result {
            warn!("failed to clear exercise cache: {err}");
        }
        result
    }

    /// Loads cached exercises unless they are loading, shown or about to be replaced by a sync.
    async fn prepare_local(&self) -> Local {
        let needs_local = {
            let state = self.state.borrow();
            if state.phase == SyncPhase::LoadingLocal {
                return Local::Loading;
            }
            !state.is_initialized && !state.is_syncing
        };
        if !needs_local {
            return Local::Ready;
        }
        match self.load_local().await {
            Some(true) => Local::Ready,
            Some(false) => Local::Missing,
            None => Local::Cleared,
        }
    }

    /// Publishes the cached exercises.
    ///
    /// Returns whether there were any, or `None` if the database was cleared while reading.
    async fn load_local(&self) -> Option<bool> {
        let epoch = self.epoch.get();
        self.update(|state| {
            state.phase = SyncPhase::LoadingLocal;
            state.error = None;
        });

        let (info, exercises) = join(self.cache.read_info(), self.cache.read_exercises()).await;
        let info = info.unwrap_or_else(|err| {
            warn!("failed to read exercise cache info: {err}");
            None
        });
        let exercises = exercises.unwrap_or_else(|err| {
            warn!("failed to read exercises from cache: {err}");
            None
        });

        if self.epoch.get() != epoch {
            debug!("exercise database cleared while loading cached exercises");
            return None;
        }

        match exercises {
            Some(exercises) if !exercises.is_empty() => {
                debug!("loaded {} exercises from cache", exercises.len());
                self.update(|state| {
                    state.phase = SyncPhase::ReadyStale;
                    state.is_initialized = true;
                    state.exercises = exercises.into();
                    state.version = info.as_ref().map(|info| info.version.clone());
                    state.last_sync = info.map(|info| info.timestamp);
                });
                Some(true)
            }
            _ => Some(false),
        }
    }

    async fn check_remote(&self) -> Result<SyncOutcome, FetchError> {
        let remote = log_on_error!(self.source.read_version(), "read", "exercise dataset version")?;
        self.compare(&remote).await
    }

    async fn compare(&self, remote: &DatasetVersion) -> Result<SyncOutcome, FetchError> {
        let (phase, is_syncing, local_version) = {
            let state = self.state.borrow();
            (state.phase, state.is_syncing, state.version.clone())
        };

        if local_version.as_deref() == Some(remote.version.as_str()) {
            debug!("exercise database is up to date (version {})", remote.version);
            if phase == SyncPhase::ReadyStale {
                self.update(|state| state.phase = SyncPhase::ReadyFresh);
            }
            return Ok(SyncOutcome::UpToDate);
        }

        if is_syncing {
            debug!("sync of exercise database already in progress");
            return Ok(SyncOutcome::AlreadySyncing);
        }

        info!(
            "exercise dataset version changed ({} -> {})",
            local_version.as_deref().unwrap_or("none"),
            remote.version
        );
        self.sync().await
    }

    async fn sync(&self) -> Result<SyncOutcome, FetchError> {
        let epoch = self.epoch.get();
        self.update(|state| {
            state.phase = SyncPhase::Syncing;
            state.is_syncing = true;
        });

        let result = self.fetch_snapshot().await;

        if self.epoch.get() != epoch {
            debug!("discarding exercise snapshot requested before clearing the database");
            return result.map(|_| SyncOutcome::Discarded);
        }

        match result {
            Ok(snapshot) => {
                if let Err(err) = self
                    .cache
                    .write_exercises(&snapshot.exercises, &snapshot.version)
                    .await
                {
                    warn!("failed to write exercises into cache: {err}");
                }

                if self.epoch.get() != epoch {
                    debug!("discarding exercise snapshot requested before clearing the database");
                    return Ok(SyncOutcome::Discarded);
                }

                let version = snapshot.version;
                let exercise_count = snapshot.exercises.len();
                info!("synchronized {exercise_count} exercises (version {version})");
                self.update(|state| {
                    state.phase = SyncPhase::ReadyFresh;
                    state.is_initialized = true;
                    state.is_syncing = false;
                    state.exercises = snapshot.exercises.into();
                    state.version = Some(version.clone());
                    state.last_sync = Some(Utc::now());
                    state.error = None;
                });
                Ok(SyncOutcome::Synced {
                    version,
                    exercise_count,
                })
            }
            Err(err) => {
                if self.state.borrow().exercises.is_empty() {
                    let message = format!("Failed to load exercise database: {err}");
                    self.update(|state| {
                        state.phase = SyncPhase::Error;
                        state.is_initialized = false;
                        state.is_syncing = false;
                        state.error = Some(message);
                    });
                } else {
                    self.update(|state| {
                        state.phase = SyncPhase::ReadyStale;
                        state.is_syncing = false;
                    });
                }
                Err(err)
            }
        }
    }

    async fn fetch_snapshot(&self) -> Result<Snapshot, FetchError> {
        let snapshot = log_on_error!(self.source.read_snapshot(), "fetch", "exercise snapshot")?;
        if let Err(err) = snapshot.validate() {
            error!("received invalid exercise snapshot: {err}");
            return Err(err.into());
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tokio::task::yield_now;

    use crate::{CacheInfo, Category, ExerciseID, Level, Muscle, Name, StorageError};

    use super::*;

    fn timestamp() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    fn exercise(id: &str, category: Category, muscle: Muscle) -> Exercise {
        Exercise {
            id: ExerciseID::new(id).unwrap(),
            name: Name::new(&id.replace('_', " ")).unwrap(),
            level: Level::Beginner,
            category,
            mechanic: None,
            equipment: None,
            force: None,
            primary_muscles: vec![muscle],
            secondary_muscles: None,
            instructions: vec![],
            images: vec![],
        }
    }

    fn exercises(count: usize) -> Vec<Exercise> {
        (0..count)
            .map(|i| exercise(&format!("Exercise_{i}"), Category::Strength, Muscle::Chest))
            .collect()
    }

    #[derive(Default)]
    struct MockCache {
        entry: RefCell<Option<(Vec<Exercise>, String)>>,
        fail_reads: bool,
        fail_writes: bool,
        corrupt: bool,
    }

    impl MockCache {
        fn with(exercises: Vec<Exercise>, version: &str) -> Self {
            Self {
                entry: RefCell::new(Some((exercises, version.to_string()))),
                ..Self::default()
            }
        }

        fn check(&self) -> Result<(), CacheError> {
            if self.fail_reads {
                return Err(CacheError::Storage(StorageError::Unavailable));
            }
            if self.corrupt {
                return Err(CacheError::Parse("EOF while parsing".into()));
            }
            Ok(())
        }
    }

    impl ExerciseCacheRepository for MockCache {
        async fn read_version(&self) -> Result<Option<String>, CacheError> {
            self.check()?;
            Ok(self.entry.borrow().as_ref().map(|(_, v)| v.clone()))
        }

        async fn read_exercises(&self) -> Result<Option<Vec<Exercise>>, CacheError> {
            yield_now().await;
            self.check()?;
            Ok(self.entry.borrow().as_ref().map(|(e, _)| e.clone()))
        }

        async fn read_info(&self) -> Result<Option<CacheInfo>, CacheError> {
            self.check()?;
            Ok(self.entry.borrow().as_ref().map(|(e, v)| CacheInfo {
                version: v.clone(),
                timestamp: timestamp(),
                exercise_count: e.len(),
            }))
        }

        async fn write_exercises(
            &self,
            exercises: &[Exercise],
            version: &str,
        ) -> Result<(), CacheError> {
            if self.fail_writes {
                return Err(CacheError::Storage(StorageError::Unavailable));
            }
            *self.entry.borrow_mut() = Some((exercises.to_vec(), version.to_string()));
            Ok(())
        }

        async fn clear(&self) -> Result<(), CacheError> {
            *self.entry.borrow_mut() = None;
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockSource {
        remote: RefCell<Option<(Vec<Exercise>, String)>>,
        snapshot_requests: Cell<usize>,
    }

    impl MockSource {
        fn with(exercises: Vec<Exercise>, version: &str) -> Self {
            Self {
                remote: RefCell::new(Some((exercises, version.to_string()))),
                ..Self::default()
            }
        }
    }

    impl ExerciseSourceRepository for MockSource {
        async fn read_version(&self) -> Result<DatasetVersion, FetchError> {
            self.remote
                .borrow()
                .as_ref()
                .map(|(e, v)| DatasetVersion {
                    version: v.clone(),
                    total_count: e.len(),
                    timestamp: timestamp(),
                })
                .ok_or(FetchError::NoConnection)
        }

        async fn read_snapshot(&self) -> Result<Snapshot, FetchError> {
            self.snapshot_requests.set(self.snapshot_requests.get() + 1);
            yield_now().await;
            self.remote
                .borrow()
                .as_ref()
                .map(|(e, v)| Snapshot {
                    version: v.clone(),
                    exercises: e.clone(),
                    timestamp: timestamp(),
                })
                .ok_or(FetchError::NoConnection)
        }
    }

    type Transition = (SyncPhase, usize, Option<String>, bool);

    fn record<C, S>(db: &ExerciseDatabase<C, S>) -> Rc<RefCell<Vec<Transition>>> {
        let transitions = Rc::new(RefCell::new(vec![]));
        let recorded = Rc::clone(&transitions);
        db.subscribe(move |state| {
            recorded.borrow_mut().push((
                state.phase,
                state.exercises.len(),
                state.version.clone(),
                state.is_syncing,
            ));
        });
        transitions
    }

    #[tokio::test]
    async fn test_initialize_shows_cache_before_sync() {
        let db = ExerciseDatabase::new(
            MockCache::with(exercises(50), "v1.0.50"),
            MockSource::with(exercises(52), "v1.0.52"),
        );
        let transitions = record(&db);

        db.initialize().await;

        assert_eq!(
            *transitions.borrow(),
            vec![
                (SyncPhase::LoadingLocal, 0, None, false),
                (SyncPhase::ReadyStale, 50, Some("v1.0.50".to_string()), false),
                (SyncPhase::Syncing, 50, Some("v1.0.50".to_string()), true),
                (SyncPhase::ReadyFresh, 52, Some("v1.0.52".to_string()), false),
            ]
        );

        let state = db.state();
        assert!(state.is_initialized);
        assert!(!state.is_syncing);
        assert_eq!(state.exercises.len(), 52);
        assert_eq!(state.version.as_deref(), Some("v1.0.52"));
        assert!(state.last_sync.is_some());
        assert_eq!(state.error, None);
        assert_eq!(
            db.cache.read_version().await.unwrap().as_deref(),
            Some("v1.0.52")
        );
    }

    #[tokio::test]
    async fn test_initialize_without_cache_fetches_snapshot() {
        let db = ExerciseDatabase::new(
            MockCache::default(),
            MockSource::with(exercises(3), "v1.0.3"),
        );
        let transitions = record(&db);

        db.initialize().await;

        assert_eq!(
            *transitions.borrow(),
            vec![
                (SyncPhase::LoadingLocal, 0, None, false),
                (SyncPhase::Syncing, 0, None, true),
                (SyncPhase::ReadyFresh, 3, Some("v1.0.3".to_string()), false),
            ]
        );
        assert_eq!(db.source.snapshot_requests.get(), 1);
        assert_eq!(db.cache.read_exercises().await.unwrap(), Some(exercises(3)));
    }

    #[tokio::test]
    async fn test_initialize_up_to_date() {
        let db = ExerciseDatabase::new(
            MockCache::with(exercises(2), "v1.0.2"),
            MockSource::with(exercises(2), "v1.0.2"),
        );

        db.initialize().await;

        let state = db.state();
        assert_eq!(state.phase, SyncPhase::ReadyFresh);
        assert_eq!(state.last_sync, Some(timestamp()));
        assert_eq!(db.source.snapshot_requests.get(), 0);
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let db = ExerciseDatabase::new(
            MockCache::default(),
            MockSource::with(exercises(2), "v1.0.2"),
        );

        db.initialize().await;
        let transitions = record(&db);
        db.initialize().await;

        assert!(transitions.borrow().is_empty());
        assert_eq!(db.source.snapshot_requests.get(), 1);
    }

    #[tokio::test]
    async fn test_initialize_offline_without_cache() {
        let db = ExerciseDatabase::new(MockCache::default(), MockSource::default());

        db.initialize().await;

        let state = db.state();
        assert_eq!(state.phase, SyncPhase::Error);
        assert!(!state.is_initialized);
        assert!(!state.is_syncing);
        assert!(state.exercises.is_empty());
        assert_eq!(
            state.error.as_deref(),
            Some("Failed to load exercise database: no connection")
        );

        *db.source.remote.borrow_mut() = Some((exercises(4), "v1.0.4".to_string()));
        db.initialize().await;

        let state = db.state();
        assert_eq!(state.phase, SyncPhase::ReadyFresh);
        assert_eq!(state.exercises.len(), 4);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_initialize_offline_with_cache() {
        let db = ExerciseDatabase::new(
            MockCache::with(exercises(5), "v1.0.5"),
            MockSource::default(),
        );

        db.initialize().await;

        let state = db.state();
        assert_eq!(state.phase, SyncPhase::ReadyStale);
        assert!(state.is_initialized);
        assert_eq!(state.exercises.len(), 5);
        assert_eq!(state.error, None);
        assert_eq!(db.source.snapshot_requests.get(), 0);
    }

    #[tokio::test]
    async fn test_initialize_remote_failure_keeps_cache() {
        let db = ExerciseDatabase::new(
            MockCache::with(exercises(5), "v1.0.5"),
            MockSource::with(exercises(6), "v1.0.6"),
        );

        db.initialize().await;
        *db.source.remote.borrow_mut() = None;

        assert!(matches!(
            db.force_sync().await,
            Err(FetchError::NoConnection)
        ));

        let state = db.state();
        assert_eq!(state.phase, SyncPhase::ReadyStale);
        assert_eq!(state.exercises.len(), 6);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_initialize_unreadable_cache_falls_back_to_remote() {
        for cache in [
            MockCache {
                fail_reads: true,
                ..MockCache::with(exercises(5), "v1.0.5")
            },
            MockCache {
                corrupt: true,
                ..MockCache::with(exercises(5), "v1.0.5")
            },
        ] {
            let db = ExerciseDatabase::new(cache, MockSource::with(exercises(7), "v1.0.7"));

            db.initialize().await;

            let state = db.state();
            assert_eq!(state.phase, SyncPhase::ReadyFresh);
            assert_eq!(state.exercises.len(), 7);
            assert_eq!(state.error, None);
        }
    }

    #[tokio::test]
    async fn test_sync_publishes_despite_cache_write_failure() {
        let db = ExerciseDatabase::new(
            MockCache {
                fail_writes: true,
                ..MockCache::default()
            },
            MockSource::with(exercises(3), "v1.0.3"),
        );

        db.initialize().await;

        let state = db.state();
        assert_eq!(state.phase, SyncPhase::ReadyFresh);
        assert_eq!(state.exercises.len(), 3);
        assert_eq!(db.cache.entry.borrow().as_ref(), None);
    }

    #[tokio::test]
    async fn test_sync_rejects_duplicate_ids() {
        let mut duplicated = exercises(2);
        duplicated.push(duplicated[0].clone());
        let db = ExerciseDatabase::new(MockCache::default(), MockSource::with(duplicated, "v2"));

        db.initialize().await;

        let state = db.state();
        assert_eq!(state.phase, SyncPhase::Error);
        assert_eq!(
            state.error.as_deref(),
            Some(
                "Failed to load exercise database: malformed response: duplicate exercise ID Exercise_0"
            )
        );
        assert_eq!(db.cache.entry.borrow().as_ref(), None);
    }

    #[tokio::test]
    async fn test_force_sync() {
        let db = ExerciseDatabase::new(
            MockCache::with(exercises(2), "v1.0.2"),
            MockSource::with(exercises(2), "v1.0.2"),
        );

        db.initialize().await;

        assert_eq!(
            db.force_sync().await.unwrap(),
            SyncOutcome::Synced {
                version: "v1.0.2".to_string(),
                exercise_count: 2
            }
        );
        assert_eq!(db.source.snapshot_requests.get(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_syncs_are_suppressed() {
        let db = ExerciseDatabase::new(
            MockCache::with(exercises(2), "v1.0.2"),
            MockSource::with(exercises(2), "v1.0.2"),
        );
        db.initialize().await;

        let remote = DatasetVersion {
            version: "v1.0.3".to_string(),
            total_count: 3,
            timestamp: timestamp(),
        };
        let (first, second) = join(db.force_sync(), db.observe_remote_version(&remote)).await;

        assert!(matches!(first, Ok(SyncOutcome::Synced { .. })));
        assert_eq!(second.unwrap(), SyncOutcome::AlreadySyncing);
        assert_eq!(db.source.snapshot_requests.get(), 1);
        assert!(!db.state().is_syncing);
    }

    #[tokio::test]
    async fn test_observe_remote_version() {
        let db = ExerciseDatabase::new(
            MockCache::with(exercises(2), "v1.0.2"),
            MockSource::with(exercises(2), "v1.0.2"),
        );
        db.initialize().await;

        let mut remote = DatasetVersion {
            version: "v1.0.2".to_string(),
            total_count: 2,
            timestamp: timestamp(),
        };

        assert_eq!(
            db.observe_remote_version(&remote).await.unwrap(),
            SyncOutcome::UpToDate
        );

        *db.source.remote.borrow_mut() = Some((exercises(3), "v1.0.3".to_string()));
        remote.version = "v1.0.3".to_string();

        assert_eq!(
            db.observe_remote_version(&remote).await.unwrap(),
            SyncOutcome::Synced {
                version: "v1.0.3".to_string(),
                exercise_count: 3
            }
        );
        assert_eq!(
            db.reconcile().await.unwrap(),
            SyncOutcome::UpToDate
        );
    }

    #[tokio::test]
    async fn test_reconcile_waits_for_local_data() {
        let db = ExerciseDatabase::new(
            MockCache::with(exercises(2), "v1.0.2"),
            MockSource::with(exercises(3), "v1.0.3"),
        );
        let transitions = record(&db);

        let ((), reconciled) = join(db.initialize(), db.reconcile()).await;

        assert_eq!(reconciled.unwrap(), SyncOutcome::Deferred);
        assert_eq!(transitions.borrow()[1].0, SyncPhase::ReadyStale);
        assert_eq!(db.state().exercises.len(), 3);
        assert_eq!(db.source.snapshot_requests.get(), 1);
    }

    #[tokio::test]
    async fn test_reconcile_before_initialize_shows_cache_first() {
        let db = ExerciseDatabase::new(
            MockCache::with(exercises(50), "v1.0.50"),
            MockSource::with(exercises(52), "v1.0.52"),
        );
        let transitions = record(&db);

        let (reconciled, ()) = join(db.reconcile(), db.initialize()).await;

        assert_eq!(
            reconciled.unwrap(),
            SyncOutcome::Synced {
                version: "v1.0.52".to_string(),
                exercise_count: 52
            }
        );
        assert_eq!(
            *transitions.borrow(),
            vec![
                (SyncPhase::LoadingLocal, 0, None, false),
                (SyncPhase::ReadyStale, 50, Some("v1.0.50".to_string()), false),
                (SyncPhase::Syncing, 50, Some("v1.0.50".to_string()), true),
                (SyncPhase::ReadyFresh, 52, Some("v1.0.52".to_string()), false),
            ]
        );
        assert_eq!(db.source.snapshot_requests.get(), 1);
    }

    #[tokio::test]
    async fn test_force_sync_before_initialize_shows_cache_first() {
        let db = ExerciseDatabase::new(
            MockCache::with(exercises(2), "v1.0.2"),
            MockSource::with(exercises(2), "v1.0.2"),
        );
        let transitions = record(&db);

        assert_eq!(
            db.force_sync().await.unwrap(),
            SyncOutcome::Synced {
                version: "v1.0.2".to_string(),
                exercise_count: 2
            }
        );
        assert_eq!(
            transitions.borrow()[..2],
            [
                (SyncPhase::LoadingLocal, 0, None, false),
                (SyncPhase::ReadyStale, 2, Some("v1.0.2".to_string()), false),
            ]
        );
        assert!(db.state().is_initialized);
    }

    #[tokio::test]
    async fn test_observe_remote_version_without_cache_fetches_snapshot() {
        let db = ExerciseDatabase::new(
            MockCache::default(),
            MockSource::with(exercises(3), "v1.0.3"),
        );
        let transitions = record(&db);
        let remote = DatasetVersion {
            version: "v1.0.3".to_string(),
            total_count: 3,
            timestamp: timestamp(),
        };

        assert_eq!(
            db.observe_remote_version(&remote).await.unwrap(),
            SyncOutcome::Synced {
                version: "v1.0.3".to_string(),
                exercise_count: 3
            }
        );
        assert_eq!(transitions.borrow()[0].0, SyncPhase::LoadingLocal);
        assert_eq!(db.state().phase, SyncPhase::ReadyFresh);
    }

    #[tokio::test]
    async fn test_reconcile_after_failed_initialization_retries() {
        let db = ExerciseDatabase::new(MockCache::default(), MockSource::default());
        db.initialize().await;

        assert_eq!(db.state().phase, SyncPhase::Error);

        *db.source.remote.borrow_mut() = Some((exercises(4), "v1.0.4".to_string()));

        assert!(matches!(
            db.reconcile().await,
            Ok(SyncOutcome::Synced { .. })
        ));
        assert_eq!(db.state().exercises.len(), 4);
        assert_eq!(db.state().error, None);
    }

    #[tokio::test]
    async fn test_clear_database_while_loading_cache() {
        let db = ExerciseDatabase::new(
            MockCache::with(exercises(2), "v1.0.2"),
            MockSource::with(exercises(3), "v1.0.3"),
        );

        let (reconciled, cleared) = join(db.reconcile(), db.clear_database()).await;

        assert_eq!(reconciled.unwrap(), SyncOutcome::Discarded);
        assert!(cleared.is_ok());
        assert_eq!(db.state(), SyncState::default());
        assert_eq!(db.source.snapshot_requests.get(), 0);
    }

    #[tokio::test]
    async fn test_clear_database() {
        let db = ExerciseDatabase::new(
            MockCache::default(),
            MockSource::with(exercises(3), "v1.0.3"),
        );
        db.initialize().await;

        db.clear_database().await.unwrap();

        assert_eq!(db.state(), SyncState::default());
        assert_eq!(db.cache.read_version().await.unwrap(), None);
        assert_eq!(db.cache.read_exercises().await.unwrap(), None);

        db.initialize().await;

        assert_eq!(db.state().phase, SyncPhase::ReadyFresh);
        assert_eq!(db.source.snapshot_requests.get(), 2);
    }

    #[tokio::test]
    async fn test_clear_database_discards_snapshot_in_flight() {
        let db = ExerciseDatabase::new(
            MockCache::with(exercises(2), "v1.0.2"),
            MockSource::with(exercises(2), "v1.0.2"),
        );
        db.initialize().await;

        let (synced, cleared) = join(db.force_sync(), db.clear_database()).await;

        assert_eq!(synced.unwrap(), SyncOutcome::Discarded);
        assert!(cleared.is_ok());
        assert_eq!(db.state(), SyncState::default());
        assert_eq!(db.cache.entry.borrow().as_ref(), None);
    }

    #[tokio::test]
    async fn test_unsubscribe() {
        let db = ExerciseDatabase::new(
            MockCache::default(),
            MockSource::with(exercises(1), "v1"),
        );
        let transitions = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&transitions);
        let id = db.subscribe(move |_| *counter.borrow_mut() += 1);

        assert!(db.unsubscribe(id));
        assert!(!db.unsubscribe(id));

        db.initialize().await;

        assert_eq!(*transitions.borrow(), 0);
    }

    #[tokio::test]
    async fn test_find() {
        let remote = vec![
            exercise("Bicycling", Category::Cardio, Muscle::Quadriceps),
            exercise("Barbell_Squat", Category::Strength, Muscle::Quadriceps),
            exercise("Stair_Climber", Category::Cardio, Muscle::Quadriceps),
            exercise("Jumping_Rope", Category::Cardio, Muscle::Calves),
        ];
        let db = ExerciseDatabase::new(MockCache::default(), MockSource::with(remote, "v1"));
        db.initialize().await;

        let filter = ExerciseFilter {
            category: Some(Category::Cardio),
            primary_muscles: [Muscle::Quadriceps].into(),
            ..ExerciseFilter::default()
        };

        assert_eq!(
            db.find(&filter, "", 10)
                .iter()
                .map(|e| e.id.to_string())
                .collect::<Vec<_>>(),
            ["Bicycling", "Stair_Climber"]
        );
        assert_eq!(
            db.find(&filter, "stair", 10)
                .iter()
                .map(|e| e.id.to_string())
                .collect::<Vec<_>>(),
            ["Stair_Climber"]
        );
        assert!(db.find(&ExerciseFilter::default(), "squat", 0).is_empty());
    }
}
