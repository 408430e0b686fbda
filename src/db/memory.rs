use std::collections::HashMap;

use tokio::sync::RwLock;

use super::{ClosetStore, PreferenceStore};
use crate::{
    error::AppResult,
    models::{Closet, PreferenceRecord, PreferenceUpdate},
};

/// Closet store held in process memory
#[derive(Debug, Default)]
pub struct InMemoryClosetStore {
    closets: RwLock<HashMap<String, Closet>>,
}

impl InMemoryClosetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ClosetStore for InMemoryClosetStore {
    async fn get(&self, user_id: &str) -> AppResult<Closet> {
        Ok(self
            .closets
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn set(&self, user_id: &str, items: Closet) -> AppResult<()> {
        self.closets.write().await.insert(user_id.to_string(), items);
        Ok(())
    }

    async fn add_item(&self, user_id: &str, item: &str) -> AppResult<()> {
        self.closets
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .push(item.to_string());
        Ok(())
    }

    async fn remove_item(&self, user_id: &str, item: &str) -> AppResult<bool> {
        let mut closets = self.closets.write().await;
        let Some(items) = closets.get_mut(user_id) else {
            return Ok(false);
        };

        match items.iter().position(|existing| existing == item) {
            Some(index) => {
                items.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Preference store held in process memory
#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    records: RwLock<HashMap<String, PreferenceRecord>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn get(&self, user_id: &str) -> AppResult<PreferenceRecord> {
        Ok(self
            .records
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn set(&self, user_id: &str, update: PreferenceUpdate) -> AppResult<PreferenceRecord> {
        let mut records = self.records.write().await;
        let record = records.entry(user_id.to_string()).or_default();
        record.merge(update);
        Ok(record.clone())
    }
}
