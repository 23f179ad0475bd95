use std::collections::VecDeque;

use gloo_storage::Storage as GlooStorage;
use ironlog_domain::StorageError;
use ironlog_web_app::{Settings, SettingsRepository, log};

use crate::KeyValueStore;

/// Browser `localStorage`.
#[derive(Clone, Copy)]
pub struct LocalStorage;

const KEY_SETTINGS: &str = "settings";
const KEY_LOG: &str = "log";

impl KeyValueStore for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        storage()?.get_item(key).map_err(js_error)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        storage()?.set_item(key, value).map_err(js_error)
    }

    async fn multi_set(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        let storage = storage()?;
        for (key, value) in entries {
            storage.set_item(key, value).map_err(js_error)?;
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        storage()?.remove_item(key).map_err(js_error)
    }

    async fn multi_delete(&self, keys: &[&str]) -> Result<(), StorageError> {
        let storage = storage()?;
        for key in keys {
            storage.remove_item(key).map_err(js_error)?;
        }
        Ok(())
    }
}

impl SettingsRepository for LocalStorage {
    async fn read_settings(&self) -> Result<Settings, String> {
        match gloo_storage::LocalStorage::get(KEY_SETTINGS) {
            Ok(settings) => Ok(settings),
            Err(err) => match err {
                gloo_storage::errors::StorageError::KeyNotFound(_) => Ok(Settings::default()),
                err => Err(err),
            },
        }
        .map_err(|err| err.to_string())
    }

    async fn write_settings(&self, settings: Settings) -> Result<(), String> {
        gloo_storage::LocalStorage::set(KEY_SETTINGS, settings).map_err(|err| err.to_string())
    }
}

impl log::Repository for LocalStorage {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        match gloo_storage::LocalStorage::get(KEY_LOG) {
            Ok(entries) => Ok(entries),
            Err(err) => match err {
                gloo_storage::errors::StorageError::KeyNotFound(_) => Ok(VecDeque::new()),
                err => Err(err),
            },
        }
        .map_err(|err| log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self.read_entries()?;
        entries.push_front(entry);
        entries.truncate(log::MAX_ENTRIES);
        gloo_storage::LocalStorage::set(KEY_LOG, entries)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }
}

fn storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .ok_or(StorageError::Unavailable)
}

#[allow(clippy::needless_pass_by_value)]
fn js_error(err: impl std::fmt::Debug) -> StorageError {
    StorageError::Other(format!("{err:?}").into())
}
