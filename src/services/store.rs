use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::{
    Gym, GymFields, GymRepository, GymSettings, GymSettingsFields, GymSettingsRepository,
    ProfileRepository, SettingsLookup,
};
use crate::error::{AppError, AppResult};

/// Persistence operations the settings form depends on, all keyed by the
/// tenant (gym) id except the initial user lookup.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Gym the user belongs to. `NotFound` when the user has none.
    async fn fetch_tenant_id(&self, user_id: &str) -> AppResult<String>;

    /// `NotFound` when the gym does not exist.
    async fn fetch_gym(&self, gym_id: &str) -> AppResult<Gym>;

    /// `Absent` is a normal outcome for a gym that never saved settings.
    async fn fetch_settings(&self, gym_id: &str) -> AppResult<SettingsLookup>;

    async fn persist_gym(&self, gym_id: &str, fields: &GymFields) -> AppResult<Gym>;

    /// Insert when `existing` is `Absent`, update that row otherwise.
    async fn persist_settings(
        &self,
        gym_id: &str,
        existing: &SettingsLookup,
        fields: &GymSettingsFields,
    ) -> AppResult<GymSettings>;
}

/// `SettingsStore` backed by the application database.
#[derive(Clone)]
pub struct SqliteSettingsStore {
    pool: SqlitePool,
}

impl SqliteSettingsStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
    async fn fetch_tenant_id(&self, user_id: &str) -> AppResult<String> {
        ProfileRepository::find_gym_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No gym linked to user {}", user_id)))
    }

    async fn fetch_gym(&self, gym_id: &str) -> AppResult<Gym> {
        GymRepository::find_by_id(&self.pool, gym_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Gym {} not found", gym_id)))
    }

    async fn fetch_settings(&self, gym_id: &str) -> AppResult<SettingsLookup> {
        GymSettingsRepository::find_by_gym_id(&self.pool, gym_id).await
    }

    async fn persist_gym(&self, gym_id: &str, fields: &GymFields) -> AppResult<Gym> {
        GymRepository::update(&self.pool, gym_id, fields).await
    }

    async fn persist_settings(
        &self,
        gym_id: &str,
        existing: &SettingsLookup,
        fields: &GymSettingsFields,
    ) -> AppResult<GymSettings> {
        GymSettingsRepository::persist(&self.pool, gym_id, existing, fields).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support;

    #[tokio::test]
    async fn tenant_lookup_fails_without_gym_link() {
        let pool = test_support::memory_pool().await;
        test_support::create_profile(&pool, "drifter", None).await;
        let store = SqliteSettingsStore::new(pool);

        let err = store.fetch_tenant_id("drifter").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = store.fetch_tenant_id("nobody").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn resolves_tenant_and_gym() {
        let pool = test_support::memory_pool().await;
        let gym = test_support::create_gym(&pool, "Iron Temple").await;
        test_support::create_profile(&pool, "coach", Some(gym.id.as_str())).await;
        let store = SqliteSettingsStore::new(pool);

        let gym_id = store.fetch_tenant_id("coach").await.unwrap();
        assert_eq!(gym_id, gym.id);
        assert_eq!(store.fetch_gym(&gym_id).await.unwrap().name, "Iron Temple");
        assert!(matches!(
            store.fetch_gym("missing").await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(store.fetch_settings(&gym_id).await.unwrap().is_absent());
    }

    #[tokio::test]
    async fn persist_gym_overwrites_contact_fields() {
        let pool = test_support::memory_pool().await;
        let gym = test_support::create_gym(&pool, "Old Name").await;
        let store = SqliteSettingsStore::new(pool);

        let fields = GymFields {
            name: "New Name".to_string(),
            email: Some("hi@gym.test".to_string()),
            phone: Some("555-0100".to_string()),
            address: None,
        };
        let updated = store.persist_gym(&gym.id, &fields).await.unwrap();
        assert_eq!(GymFields::from(&updated), fields);
    }
}
