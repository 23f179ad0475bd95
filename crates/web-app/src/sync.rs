use std::time::Duration;

use futures_util::{Stream, StreamExt};
use gloo_timers::future::IntervalStream;
use ironlog_domain::{ExerciseCacheRepository, ExerciseDatabase, ExerciseSourceRepository};
use log::debug;

/// Reconciles the exercise database with the remote dataset in a fixed interval.
///
/// Never returns.
pub async fn poll_remote_version<C, S>(database: &ExerciseDatabase<C, S>, interval: Duration)
where
    C: ExerciseCacheRepository,
    S: ExerciseSourceRepository,
{
    let millis = u32::try_from(interval.as_millis()).unwrap_or(u32::MAX);
    reconcile_on(database, IntervalStream::new(millis)).await;
}

/// Reconciles the exercise database once for every item of `ticks`.
pub async fn reconcile_on<C, S>(database: &ExerciseDatabase<C, S>, ticks: impl Stream<Item = ()>)
where
    C: ExerciseCacheRepository,
    S: ExerciseSourceRepository,
{
    let mut ticks = std::pin::pin!(ticks);
    while ticks.next().await.is_some() {
        match database.reconcile().await {
            Ok(outcome) => debug!("reconciled exercise database: {outcome:?}"),
            Err(err) => debug!("failed to reconcile exercise database: {err}"),
        }
    }
}
