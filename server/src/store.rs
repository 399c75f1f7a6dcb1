//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Durable JSON tables
//!
//! A table is a string-keyed map held in memory and mirrored to a single
//! pretty-printed JSON file. Every mutation rewrites the whole file; there is
//! no append log and no write coalescing.
//!
//! Mutations follow one discipline: apply in memory, write the file, and
//! restore the touched key if the write fails. A failed write therefore never
//! leaves memory ahead of disk.

use crate::error::{BotError, BotResult, StoreError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

/// String-keyed table persisted as one JSON object
#[derive(Debug)]
pub struct JsonTable<V> {
    path: PathBuf,
    entries: BTreeMap<String, V>,
}

impl<V> JsonTable<V>
where
    V: Serialize + DeserializeOwned + Clone,
{
    /// Load a table from `path`, treating a missing file as an empty table
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Table file {} not found, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };
        tracing::debug!("Loaded {} entries from {}", entries.len(), path.display());
        Ok(Self { path, entries })
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &V)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mutate the slot for `key` and persist the whole table
    ///
    /// The closure sees `Some(value)` for an existing entry and `None`
    /// otherwise; leaving `None` in the slot removes the entry. If the file
    /// cannot be rewritten the entry is restored and
    /// [`BotError::PersistenceFailure`] is returned.
    pub fn update<R>(&mut self, key: &str, mutate: impl FnOnce(&mut Option<V>) -> R) -> BotResult<R> {
        let previous = self.entries.get(key).cloned();
        let mut slot = previous.clone();
        let result = mutate(&mut slot);
        self.put(key, slot);

        if let Err(source) = self.save() {
            tracing::error!("Failed to persist {}: {}", self.path.display(), source);
            self.put(key, previous);
            return Err(BotError::PersistenceFailure {
                path: self.path.clone(),
                source,
            });
        }

        Ok(result)
    }

    fn put(&mut self, key: &str, value: Option<V>) {
        match value {
            Some(value) => {
                self.entries.insert(key.to_string(), value);
            }
            None => {
                self.entries.remove(key);
            }
        }
    }

    /// Rewrite the table file through a sibling temporary file
    fn save(&self) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&self.entries)?;
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        std::fs::write(&staging, bytes)?;
        if let Err(e) = std::fs::rename(&staging, &self.path) {
            let _ = std::fs::remove_file(&staging);
            return Err(e.into());
        }
        Ok(())
    }
}
