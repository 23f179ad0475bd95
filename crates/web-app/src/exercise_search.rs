//! View model of the exercise catalog search
//!
//! Filter changes apply immediately. Query changes are held back until the input has been idle for
//! the configured debounce delay.

use chrono::{DateTime, Duration, Utc};
use ironlog_domain::{Debounce, Exercise, ExerciseDatabase, ExerciseFilter};

use crate::Settings;

#[derive(Debug, Clone)]
pub struct ExerciseSearch {
    pub filter: ExerciseFilter,
    query: String,
    settled_query: String,
    debounce: Debounce<String>,
    limit: usize,
}

impl ExerciseSearch {
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            filter: ExerciseFilter::default(),
            query: String::new(),
            settled_query: String::new(),
            debounce: Debounce::new(settings.search_debounce()),
            limit: settings.search_result_limit,
        }
    }

    /// Current input, including changes that have not settled yet.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Query the results are computed with.
    #[must_use]
    pub fn settled_query(&self) -> &str {
        &self.settled_query
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn set_query(&mut self, query: &str, now: DateTime<Utc>) {
        self.query = query.to_string();
        self.debounce.update(self.query.clone(), now);
    }

    /// Applies a settled query change. Returns true if the results need to be recomputed.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        match self.debounce.poll(now) {
            Some(query) if query != self.settled_query => {
                self.settled_query = query;
                true
            }
            _ => false,
        }
    }

    /// Applies the current input without waiting for the debounce delay.
    pub fn submit(&mut self) -> bool {
        self.debounce = Debounce::new(self.debounce.delay());
        if self.query == self.settled_query {
            return false;
        }
        self.settled_query.clone_from(&self.query);
        true
    }

    /// Time until a pending query change settles.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.debounce.remaining(now)
    }

    pub fn reset(&mut self) {
        self.filter = ExerciseFilter::default();
        self.query.clear();
        self.settled_query.clear();
        self.debounce = Debounce::new(self.debounce.delay());
    }

    #[must_use]
    pub fn results<C, S>(&self, database: &ExerciseDatabase<C, S>) -> Vec<Exercise> {
        database.find(&self.filter, &self.settled_query, self.limit)
    }
}
