//! In-memory secret store for demo mode and tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::info;

use crate::{SecretError, SecretStore, StoredSecret};
use warden_core::ResourceTag;

/// Secret store backed by a process-local map.
///
/// Uses the same locator scheme as the AWS store so demo output is
/// indistinguishable from a live run.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: Mutex<HashMap<String, StoredSecret>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a stored secret by name.
    pub async fn get(&self, name: &str) -> Option<StoredSecret> {
        self.secrets.lock().await.get(name).cloned()
    }

    pub async fn len(&self) -> usize {
        self.secrets.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.secrets.lock().await.is_empty()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn put_secret(
        &self,
        name: &str,
        value: &str,
        tags: &[ResourceTag],
    ) -> Result<String, SecretError> {
        let mut secrets = self.secrets.lock().await;
        match secrets.get_mut(name) {
            Some(existing) => {
                existing.value = value.to_string();
                existing.versions += 1;
                existing.updated_at = Utc::now();
                info!(secret = %name, versions = existing.versions, "updated existing secret");
            }
            None => {
                secrets.insert(
                    name.to_string(),
                    StoredSecret {
                        name: name.to_string(),
                        value: value.to_string(),
                        tags: tags.to_vec(),
                        versions: 1,
                        updated_at: Utc::now(),
                    },
                );
                info!(secret = %name, "stored new secret");
            }
        }
        Ok(format!("secretsmanager:{name}"))
    }

    fn provider_type(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_returns_locator() {
        let store = MemorySecretStore::new();
        let locator = store
            .put_secret("iam-credentials/Engineering/jdoe", "{}", &[])
            .await
            .unwrap();
        assert_eq!(locator, "secretsmanager:iam-credentials/Engineering/jdoe");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_put_twice_updates_in_place() {
        let store = MemorySecretStore::new();
        let tags = vec![ResourceTag::new("Department", "Engineering")];

        store
            .put_secret("iam-credentials/Engineering/jdoe", "first", &tags)
            .await
            .unwrap();
        store
            .put_secret("iam-credentials/Engineering/jdoe", "second", &[])
            .await
            .unwrap();

        assert_eq!(store.len().await, 1);
        let stored = store.get("iam-credentials/Engineering/jdoe").await.unwrap();
        assert_eq!(stored.value, "second");
        assert_eq!(stored.versions, 2);
        // Tags stay from the original creation.
        assert_eq!(stored.tags, tags);
    }
}
