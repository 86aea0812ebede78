//! User use cases.
//!
//! Validation, id assignment and timestamping happen here; persistence is
//! delegated to whatever `UserRepository` the service was built with.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{NewUser, User, UserChanges};
use crate::repositories::UserRepository;
use crate::utils::time;

/// Driving port for user operations.
#[async_trait]
pub trait UserUseCases: Send + Sync {
    async fn create_user(&self, input: NewUser) -> AppResult<User>;
    async fn get_user(&self, id: &str) -> AppResult<User>;
    async fn list_users(&self) -> AppResult<Vec<User>>;
    async fn update_user(&self, id: &str, changes: UserChanges) -> AppResult<User>;
    async fn delete_user(&self, id: &str) -> AppResult<()>;
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    async fn load(&self, id: &str) -> AppResult<User> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| AppError::from_repository(format!("failed to load user {}", id), e))?
            .ok_or_else(|| AppError::not_found("user", id))
    }
}

#[async_trait]
impl UserUseCases for UserService {
    async fn create_user(&self, input: NewUser) -> AppResult<User> {
        let user = User::new(Uuid::new_v4().to_string(), input, time::now())?;

        self.repo
            .create(&user)
            .await
            .map_err(|e| AppError::from_repository(format!("failed to save user {}", user.id), e))?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    async fn get_user(&self, id: &str) -> AppResult<User> {
        self.load(id).await
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repo
            .find_all()
            .await
            .map_err(|e| AppError::from_repository("failed to list users", e))
    }

    async fn update_user(&self, id: &str, changes: UserChanges) -> AppResult<User> {
        let mut user = self.load(id).await?;
        user.apply(changes, time::now())?;

        self.repo
            .update(&user)
            .await
            .map_err(|e| AppError::from_repository(format!("failed to update user {}", id), e))?;

        tracing::info!(user_id = %id, "User updated");
        Ok(user)
    }

    async fn delete_user(&self, id: &str) -> AppResult<()> {
        self.repo
            .delete(id)
            .await
            .map_err(|e| AppError::from_repository(format!("failed to delete user {}", id), e))?;

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RepositoryError;
    use crate::repositories::RepositoryResult;
    use crate::repositories::memory::MemoryUserRepository;

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryUserRepository::default()))
    }

    fn input(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            name: "Ada Lovelace".to_string(),
        }
    }

    /// Repository that fails every call with a persistence error.
    struct BrokenRepository;

    #[async_trait]
    impl UserRepository for BrokenRepository {
        async fn create(&self, _: &User) -> RepositoryResult<()> {
            Err(broken())
        }
        async fn find_by_id(&self, _: &str) -> RepositoryResult<Option<User>> {
            Err(broken())
        }
        async fn find_all(&self) -> RepositoryResult<Vec<User>> {
            Err(broken())
        }
        async fn update(&self, _: &User) -> RepositoryResult<()> {
            Err(broken())
        }
        async fn delete(&self, _: &str) -> RepositoryResult<()> {
            Err(broken())
        }
    }

    fn broken() -> RepositoryError {
        RepositoryError::Persistence {
            operation: "query".to_string(),
            source: anyhow::anyhow!("disk on fire"),
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_equal_timestamps() {
        let svc = service();
        let user = svc.create_user(input("ada@example.com")).await.unwrap();
        assert!(Uuid::parse_str(&user.id).is_ok());
        assert_eq!(user.created_at, user.updated_at);
        assert_eq!(svc.get_user(&user.id).await.unwrap(), user);
    }

    #[tokio::test]
    async fn create_rejects_invalid_input_before_storage() {
        let svc = UserService::new(Arc::new(BrokenRepository));
        let err = svc.create_user(input("nope")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let svc = service();
        assert!(matches!(
            svc.get_user("missing").await,
            Err(AppError::NotFound { .. })
        ));
        assert!(matches!(
            svc.update_user("missing", UserChanges::default()).await,
            Err(AppError::NotFound { .. })
        ));
        assert!(matches!(
            svc.delete_user("missing").await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn empty_update_keeps_fields_and_advances_updated_at() {
        let svc = service();
        let user = svc.create_user(input("ada@example.com")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;

        let updated = svc.update_user(&user.id, UserChanges::default()).await.unwrap();
        assert_eq!(updated.email, user.email);
        assert_eq!(updated.name, user.name);
        assert_eq!(updated.created_at, user.created_at);
        assert!(updated.updated_at > user.updated_at);
    }

    #[tokio::test]
    async fn update_rejects_present_empty_name() {
        let svc = service();
        let user = svc.create_user(input("ada@example.com")).await.unwrap();
        let changes = UserChanges {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(
            svc.update_user(&user.id, changes).await,
            Err(AppError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let svc = service();
        let user = svc.create_user(input("ada@example.com")).await.unwrap();
        svc.delete_user(&user.id).await.unwrap();
        assert!(matches!(
            svc.get_user(&user.id).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn concurrent_same_email_yields_one_conflict() {
        let svc = Arc::new(service());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let svc = svc.clone();
                tokio::spawn(async move { svc.create_user(input("same@example.com")).await })
            })
            .collect();

        let mut created = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AppError::Conflict { .. }) => conflicts += 1,
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(conflicts, 7);
    }

    #[tokio::test]
    async fn concurrent_distinct_emails_never_collide() {
        let svc = Arc::new(service());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let svc = svc.clone();
                tokio::spawn(async move { svc.create_user(input(&format!("u{}@example.com", i))).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(svc.list_users().await.unwrap().len(), 16);
    }

    #[tokio::test]
    async fn storage_failures_become_internal_with_context() {
        let svc = UserService::new(Arc::new(BrokenRepository));
        match svc.get_user("abc").await {
            Err(AppError::Internal { context, .. }) => assert!(context.contains("abc")),
            other => panic!("Expected Internal, got {:?}", other),
        }
        assert!(matches!(
            svc.list_users().await,
            Err(AppError::Internal { .. })
        ));
    }
}
