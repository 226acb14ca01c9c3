use crate::errors::AppError;
use crate::models::{UserRecord, UserUpdate, Users};
use crate::storage::{load_users, persist_users};
use std::path::PathBuf;
use tracing::{debug, info};

/// All known users, written through to `data_path` on every mutation.
#[derive(Debug)]
pub struct Registry {
    data_path: PathBuf,
    users: Users,
}

impl Registry {
    pub async fn load(data_path: PathBuf) -> Self {
        let users = load_users(&data_path).await;
        info!(path = %data_path.display(), users = users.len(), "registry loaded");
        Self { data_path, users }
    }

    /// The stored record, or a zero record when `name` is unknown.
    pub fn get(&self, name: &str) -> UserRecord {
        self.users.get(name).cloned().unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.users.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn users(&self) -> &Users {
        &self.users
    }

    pub async fn upsert(&mut self, name: &str, update: UserUpdate) -> Result<UserRecord, AppError> {
        let updated = {
            let entry = self.users.entry(name.to_string()).or_default();
            if let Some(count) = update.count {
                entry.count = count;
            }
            if let Some(click_times) = update.click_times {
                entry.click_times = click_times;
            }
            entry.clone()
        };

        persist_users(&self.data_path, &self.users).await?;
        debug!(user = name, count = updated.count, "registry persisted");

        Ok(updated)
    }
}
