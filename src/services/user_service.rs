use std::sync::Arc;

use crate::config::Config;
use crate::dto::user_dto::{LoginPayload, RegisterPayload, UpdateUserPayload};
use crate::error::{Error, Result};
use crate::models::user::{NewUser, User, UserChanges, UserRole};
use crate::services::storage::Storage;
use crate::utils::crypto::{hash_password, verify_password};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Registration, login and account maintenance on top of `Storage`.
#[derive(Clone)]
pub struct UserService {
    storage: Arc<dyn Storage>,
    config: Arc<Config>,
}

impl UserService {
    pub fn new(storage: Arc<dyn Storage>, config: Arc<Config>) -> Self {
        Self { storage, config }
    }

    fn resolve_role(&self, email: &str, requested: Option<UserRole>) -> UserRole {
        if self.config.is_admin_email(email) {
            return UserRole::Admin;
        }
        match requested {
            Some(UserRole::Admin) | None => UserRole::default(),
            Some(role) => role,
        }
    }

    pub async fn register(&self, payload: RegisterPayload) -> Result<User> {
        if self
            .storage
            .get_user_by_username(&payload.username)
            .await?
            .is_some()
        {
            return Err(Error::BadRequest("Username already exists".to_string()));
        }
        if self.storage.get_user_by_email(&payload.email).await?.is_some() {
            return Err(Error::BadRequest("Email already exists".to_string()));
        }

        let role = self.resolve_role(&payload.email, payload.role);
        let new_user = NewUser {
            username: payload.username,
            password_hash: hash_password(&payload.password)?,
            email: payload.email,
            role,
            first_name: payload.first_name,
            last_name: payload.last_name,
            profile_image_url: payload.profile_image_url,
        };

        let user = self
            .storage
            .register_user(new_user, role == UserRole::Candidate)
            .await?;
        tracing::info!(user_id = user.id, role = ?user.role, "user registered");
        Ok(user)
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<User> {
        let (Some(username), Some(password)) = (payload.username, payload.password) else {
            return Err(Error::BadRequest(
                "Username and password are required".to_string(),
            ));
        };
        if username.is_empty() || password.is_empty() {
            return Err(Error::BadRequest(
                "Username and password are required".to_string(),
            ));
        }

        let Some(user) = self.storage.get_user_by_username(&username).await? else {
            return Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };
        if !verify_password(&password, &user.password)? {
            tracing::warn!(user_id = user.id, "login rejected");
            return Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
        Ok(user)
    }

    /// Applies a patch, re-hashing a new password before it is stored.
    pub async fn update(&self, id: i32, payload: UpdateUserPayload) -> Result<User> {
        if self.storage.get_user(id).await?.is_none() {
            return Err(Error::NotFound("User not found".to_string()));
        }
        let password_hash = match payload.password {
            Some(plain) => Some(hash_password(&plain)?),
            None => None,
        };
        let changes = UserChanges {
            username: payload.username,
            password_hash,
            email: payload.email,
            role: payload.role,
            first_name: payload.first_name,
            last_name: payload.last_name,
            profile_image_url: payload.profile_image_url,
        };
        self.storage
            .update_user(id, changes)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        if !self.storage.delete_user(id).await? {
            return Err(Error::NotFound("User not found".to_string()));
        }
        tracing::info!(user_id = id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory_storage::MemoryStorage;

    fn service(admins: &[&str]) -> (UserService, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let config = Config {
            admin_emails: admins.iter().map(|s| s.to_string()).collect(),
            ..Config::default()
        };
        (
            UserService::new(storage.clone(), Arc::new(config)),
            storage,
        )
    }

    fn register_payload(username: &str, email: &str) -> RegisterPayload {
        RegisterPayload {
            username: username.to_string(),
            password: "s3cret".to_string(),
            email: email.to_string(),
            role: None,
            first_name: Some("Sam".into()),
            last_name: None,
            profile_image_url: None,
        }
    }

    #[tokio::test]
    async fn register_hashes_password_and_creates_profile() {
        let (svc, storage) = service(&[]);
        let user = svc
            .register(register_payload("sam", "sam@example.com"))
            .await
            .unwrap();
        assert_ne!(user.password, "s3cret");
        assert_eq!(user.role, UserRole::Candidate);
        assert!(storage
            .get_candidate_by_user_id(user.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn allow_listed_email_registers_as_admin_without_profile() {
        let (svc, storage) = service(&["boss@example.com"]);
        let user = svc
            .register(register_payload("boss", "Boss@example.com"))
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Admin);
        assert!(storage
            .get_candidate_by_user_id(user.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn requested_admin_role_needs_the_allow_list() {
        let (svc, _) = service(&[]);
        let mut payload = register_payload("mallory", "mallory@example.com");
        payload.role = Some(UserRole::Admin);
        let user = svc.register(payload).await.unwrap();
        assert_eq!(user.role, UserRole::Candidate);

        let mut payload = register_payload("rex", "rex@example.com");
        payload.role = Some(UserRole::Recruiter);
        let user = svc.register(payload).await.unwrap();
        assert_eq!(user.role, UserRole::Recruiter);
    }

    #[tokio::test]
    async fn duplicate_username_is_reported_before_email() {
        let (svc, _) = service(&[]);
        svc.register(register_payload("sam", "sam@example.com"))
            .await
            .unwrap();
        match svc
            .register(register_payload("sam", "sam@example.com"))
            .await
        {
            Err(Error::BadRequest(msg)) => assert_eq!(msg, "Username already exists"),
            other => panic!("unexpected {:?}", other.map(|u| u.id)),
        }
        match svc
            .register(register_payload("other", "sam@example.com"))
            .await
        {
            Err(Error::BadRequest(msg)) => assert_eq!(msg, "Email already exists"),
            other => panic!("unexpected {:?}", other.map(|u| u.id)),
        }
    }

    #[tokio::test]
    async fn login_checks_presence_then_credentials() {
        let (svc, _) = service(&[]);
        svc.register(register_payload("sam", "sam@example.com"))
            .await
            .unwrap();

        let missing = svc
            .login(LoginPayload {
                username: Some("sam".into()),
                password: None,
            })
            .await;
        assert!(matches!(missing, Err(Error::BadRequest(_))));

        let wrong = svc
            .login(LoginPayload {
                username: Some("sam".into()),
                password: Some("nope".into()),
            })
            .await;
        assert!(matches!(wrong, Err(Error::Unauthorized(_))));

        let ok = svc
            .login(LoginPayload {
                username: Some("sam".into()),
                password: Some("s3cret".into()),
            })
            .await
            .unwrap();
        assert_eq!(ok.username, "sam");
    }

    #[tokio::test]
    async fn update_rehashes_new_password() {
        let (svc, _) = service(&[]);
        let user = svc
            .register(register_payload("sam", "sam@example.com"))
            .await
            .unwrap();
        svc.update(
            user.id,
            UpdateUserPayload {
                password: Some("changed".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let relogin = svc
            .login(LoginPayload {
                username: Some("sam".into()),
                password: Some("changed".into()),
            })
            .await;
        assert!(relogin.is_ok());
    }

    #[tokio::test]
    async fn missing_user_update_and_delete_are_not_found() {
        let (svc, _) = service(&[]);
        assert!(matches!(
            svc.update(9, UpdateUserPayload::default()).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(svc.delete(9).await, Err(Error::NotFound(_))));
    }
}
