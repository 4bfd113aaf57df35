use std::sync::Arc;

use chrono::Utc;

use crate::application::dto::auth_dto::{
    AdminRegisterDto, AdminRegisteredDto, ChangePasswordDto, LoginDto, TokenResponseDto,
    normalize_email,
};
use crate::application::errors::ApplicationError;
use crate::application::services::audit_service::AuditService;
use crate::domain::models::audit::{
    ACTION_ADMIN_SEED, ACTION_LOGIN, ACTION_PASSWORD_CHANGE, ACTION_REGISTER,
};
use crate::domain::models::user::{Role, User};
use crate::domain::repositories::user_repository::UserRepository;
use crate::infrastructure::security::password::PasswordHasher;
use crate::infrastructure::security::token::TokenService;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Which account states a bearer token is accepted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Active account with no pending password change.
    Active,
    /// Active account; a pending password change is allowed.
    AllowPasswordReset,
    /// Any existing account, active or not.
    AllowInactive,
}

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    token_service: Arc<TokenService>,
    password_hasher: PasswordHasher,
    audit_service: Arc<AuditService>,
    admin_register_key: String,
}

impl AuthService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        token_service: Arc<TokenService>,
        password_hasher: PasswordHasher,
        audit_service: Arc<AuditService>,
        admin_register_key: String,
    ) -> Self {
        Self {
            user_repository,
            token_service,
            password_hasher,
            audit_service,
            admin_register_key,
        }
    }

    pub fn register(&self) -> Result<(), ApplicationError> {
        Err(ApplicationError::Forbidden(
            "Self-registration is disabled. Contact an admin.".to_string(),
        ))
    }

    pub async fn login(&self, dto: LoginDto) -> Result<TokenResponseDto, ApplicationError> {
        tracing::info!("Login attempt for {}", dto.email);

        let invalid = || ApplicationError::Unauthenticated("Invalid credentials".to_string());
        let user = self
            .user_repository
            .find_by_email(&dto.email)
            .await?
            .ok_or_else(invalid)?;

        if !self
            .password_hasher
            .verify(&dto.password, &user.password_hash)
            .await?
        {
            return Err(invalid());
        }
        if !user.active {
            return Err(ApplicationError::Forbidden(
                "User is inactive".to_string(),
            ));
        }
        if user.temp_password_expired(Utc::now()) {
            return Err(ApplicationError::Forbidden(
                "Temporary password expired".to_string(),
            ));
        }

        let response = self.token_response(&user)?;
        self.audit_service
            .log(Some(&user.id), ACTION_LOGIN, "User logged in")
            .await;
        Ok(response)
    }

    pub async fn register_admin(
        &self,
        dto: AdminRegisterDto,
    ) -> Result<AdminRegisteredDto, ApplicationError> {
        tracing::info!("Admin registration for {}", dto.email);

        if self.admin_register_key.is_empty() || dto.admin_key != self.admin_register_key {
            return Err(ApplicationError::Forbidden(
                "Invalid admin key".to_string(),
            ));
        }

        let email = normalize_email(&dto.email)?;
        if self.user_repository.find_by_email(&email).await?.is_some() {
            return Err(ApplicationError::BadInput(
                "User already exists".to_string(),
            ));
        }

        let user = User::new(email, self.password_hasher.hash(&dto.password).await?, Role::Admin);
        self.user_repository.save(&user).await?;
        self.audit_service
            .log(Some(&user.id), ACTION_REGISTER, "Registered as admin")
            .await;

        Ok(AdminRegisteredDto {
            message: "Admin registered successfully".to_string(),
            email: user.email,
            role: user.role.to_string(),
        })
    }

    pub async fn change_password(
        &self,
        user: &User,
        dto: ChangePasswordDto,
    ) -> Result<TokenResponseDto, ApplicationError> {
        tracing::info!("Changing password for {}", user.email);

        let mut user = self.user_repository.find_by_id(&user.id).await?;

        if !self
            .password_hasher
            .verify(&dto.current_password, &user.password_hash)
            .await?
        {
            return Err(ApplicationError::BadInput(
                "Current password is incorrect".to_string(),
            ));
        }
        if dto.new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ApplicationError::BadInput(
                "New password is too short".to_string(),
            ));
        }
        if self
            .password_hasher
            .verify(&dto.new_password, &user.password_hash)
            .await?
        {
            return Err(ApplicationError::BadInput(
                "New password must be different".to_string(),
            ));
        }

        user.password_hash = self.password_hasher.hash(&dto.new_password).await?;
        user.clear_password_change();
        self.user_repository.update(&user).await?;
        self.audit_service
            .log(Some(&user.id), ACTION_PASSWORD_CHANGE, "Password updated")
            .await;

        self.token_response(&user)
    }

    /// Resolves a bearer token to its account, enforcing `policy`.
    pub async fn authenticate(
        &self,
        token: &str,
        policy: AccessPolicy,
    ) -> Result<User, ApplicationError> {
        let claims = self.token_service.decode(token)?;
        let user = self.user_repository.find_by_email(&claims.sub).await?;

        let inactive = || ApplicationError::Forbidden("User is inactive".to_string());
        match policy {
            AccessPolicy::AllowInactive => {
                user.ok_or_else(|| ApplicationError::Unauthenticated("Invalid token".to_string()))
            }
            AccessPolicy::AllowPasswordReset => match user {
                Some(user) if user.active => Ok(user),
                _ => Err(inactive()),
            },
            AccessPolicy::Active => match user {
                Some(user) if !user.active => Err(inactive()),
                Some(user) if user.must_change_password => Err(
                    ApplicationError::Forbidden("Password reset required".to_string()),
                ),
                Some(user) => Ok(user),
                None => Err(inactive()),
            },
        }
    }

    /// Creates the configured admin account when no admin exists yet.
    pub async fn ensure_admin_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(), ApplicationError> {
        let users = self.user_repository.find_all().await?;
        if users.iter().any(|user| user.role == Role::Admin) {
            return Ok(());
        }

        tracing::info!("No admin account found, seeding {}", email);
        let user = User::new(
            email.trim().to_string(),
            self.password_hasher.hash(password).await?,
            Role::Admin,
        );
        self.user_repository.save(&user).await?;
        self.audit_service
            .log(
                Some(&user.id),
                ACTION_ADMIN_SEED,
                format!("Seeded admin {}", user.email),
            )
            .await;
        Ok(())
    }

    fn token_response(&self, user: &User) -> Result<TokenResponseDto, ApplicationError> {
        Ok(TokenResponseDto {
            access_token: self.token_service.issue(user)?,
            token_type: "bearer".to_string(),
            role: user.role.to_string(),
            must_change_password: user.must_change_password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{
        MockAuditLogRepository, MockUserRepository, audit_service, fast_hasher,
        user_with_password,
    };
    use chrono::Duration;

    struct Fixture {
        service: AuthService,
        users: Arc<MockUserRepository>,
        audit: Arc<MockAuditLogRepository>,
        tokens: Arc<TokenService>,
    }

    fn fixture(users: Vec<User>, admin_key: &str) -> Fixture {
        let users = Arc::new(MockUserRepository::with_users(users));
        let audit = Arc::new(MockAuditLogRepository::default());
        let tokens = Arc::new(TokenService::new("test-secret", 120));
        let service = AuthService::new(
            users.clone(),
            tokens.clone(),
            fast_hasher(),
            audit_service(&audit),
            admin_key.to_string(),
        );
        Fixture {
            service,
            users,
            audit,
            tokens,
        }
    }

    fn login(email: &str, password: &str) -> LoginDto {
        LoginDto {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn login_issues_token_and_audits() {
        let user = user_with_password("ana@example.com", "secret123", Role::Student);
        let f = fixture(vec![user], "");

        let response = f.service.login(login("ana@example.com", "secret123")).await.unwrap();
        assert_eq!(response.token_type, "bearer");
        assert_eq!(response.role, "student");
        assert!(!response.must_change_password);
        assert_eq!(f.tokens.decode(&response.access_token).unwrap().sub, "ana@example.com");
        assert_eq!(f.audit.actions(), vec![ACTION_LOGIN.to_string()]);
    }

    #[tokio::test]
    async fn login_rejections_follow_account_state() {
        let mut inactive = user_with_password("off@example.com", "secret123", Role::Student);
        inactive.active = false;
        let mut expired = user_with_password("temp@example.com", "secret123", Role::Student);
        expired.require_password_change(Utc::now() - Duration::minutes(30));
        let f = fixture(vec![inactive, expired], "");

        let error = f.service.login(login("nobody@example.com", "x")).await.unwrap_err();
        assert!(matches!(error, ApplicationError::Unauthenticated(_)));
        assert_eq!(error.detail(), "Invalid credentials");

        let error = f.service.login(login("off@example.com", "wrong")).await.unwrap_err();
        assert_eq!(error.detail(), "Invalid credentials");

        let error = f.service.login(login("off@example.com", "secret123")).await.unwrap_err();
        assert_eq!(error.detail(), "User is inactive");

        let error = f.service.login(login("temp@example.com", "secret123")).await.unwrap_err();
        assert_eq!(error.detail(), "Temporary password expired");
    }

    #[tokio::test]
    async fn self_registration_is_disabled() {
        let f = fixture(vec![], "");
        let error = f.service.register().unwrap_err();
        assert!(matches!(error, ApplicationError::Forbidden(_)));
    }

    #[tokio::test]
    async fn register_admin_requires_configured_key() {
        let f = fixture(vec![], "");
        let dto = AdminRegisterDto {
            email: "root@example.com".to_string(),
            password: "secret123".to_string(),
            admin_key: "".to_string(),
        };
        assert_eq!(
            f.service.register_admin(dto).await.unwrap_err().detail(),
            "Invalid admin key"
        );

        let f = fixture(vec![], "k3y");
        let dto = AdminRegisterDto {
            email: "root@example.com".to_string(),
            password: "secret123".to_string(),
            admin_key: "k3y".to_string(),
        };
        let created = f.service.register_admin(dto.clone()).await.unwrap();
        assert_eq!(created.role, "admin");
        assert_eq!(
            f.service.register_admin(dto).await.unwrap_err().detail(),
            "User already exists"
        );
    }

    #[tokio::test]
    async fn change_password_validates_and_clears_reset_flag() {
        let mut user = user_with_password("ana@example.com", "temporary1", Role::Student);
        user.require_password_change(Utc::now());
        let f = fixture(vec![user.clone()], "");

        let change = |current: &str, new: &str| ChangePasswordDto {
            current_password: current.to_string(),
            new_password: new.to_string(),
        };

        let error = f.service.change_password(&user, change("nope", "brand-new-pass")).await.unwrap_err();
        assert_eq!(error.detail(), "Current password is incorrect");

        let error = f.service.change_password(&user, change("temporary1", "short")).await.unwrap_err();
        assert_eq!(error.detail(), "New password is too short");

        let error = f.service.change_password(&user, change("temporary1", "temporary1")).await.unwrap_err();
        assert_eq!(error.detail(), "New password must be different");

        let response = f
            .service
            .change_password(&user, change("temporary1", "brand-new-pass"))
            .await
            .unwrap();
        assert!(!response.must_change_password);

        let stored = f.users.find_by_id(&user.id).await.unwrap();
        assert!(!stored.must_change_password);
        assert!(stored.temp_password_expires_at.is_none());
        assert!(fast_hasher()
            .verify("brand-new-pass", &stored.password_hash)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn authenticate_applies_policies() {
        let mut pending = user_with_password("reset@example.com", "secret123", Role::Student);
        pending.require_password_change(Utc::now());
        let mut inactive = user_with_password("off@example.com", "secret123", Role::Student);
        inactive.active = false;
        let f = fixture(vec![pending.clone(), inactive.clone()], "");

        let pending_token = f.tokens.issue(&pending).unwrap();
        let error = f.service.authenticate(&pending_token, AccessPolicy::Active).await.unwrap_err();
        assert_eq!(error.detail(), "Password reset required");
        assert!(
            f.service
                .authenticate(&pending_token, AccessPolicy::AllowPasswordReset)
                .await
                .is_ok()
        );

        let inactive_token = f.tokens.issue(&inactive).unwrap();
        let error = f
            .service
            .authenticate(&inactive_token, AccessPolicy::AllowPasswordReset)
            .await
            .unwrap_err();
        assert_eq!(error.detail(), "User is inactive");
        assert!(
            f.service
                .authenticate(&inactive_token, AccessPolicy::AllowInactive)
                .await
                .is_ok()
        );

        let ghost = User::new("ghost@example.com".to_string(), "h".to_string(), Role::Student);
        let ghost_token = f.tokens.issue(&ghost).unwrap();
        let error = f
            .service
            .authenticate(&ghost_token, AccessPolicy::AllowInactive)
            .await
            .unwrap_err();
        assert!(matches!(error, ApplicationError::Unauthenticated(_)));

        let error = f.service.authenticate("garbage", AccessPolicy::Active).await.unwrap_err();
        assert_eq!(error.detail(), "Invalid token");
    }

    #[tokio::test]
    async fn ensure_admin_user_seeds_once() {
        let f = fixture(vec![], "");
        f.service.ensure_admin_user("admin@example.com", "admin123").await.unwrap();
        f.service.ensure_admin_user("other@example.com", "admin123").await.unwrap();

        let users = f.users.find_all().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, Role::Admin);
        assert_eq!(f.audit.actions(), vec![ACTION_ADMIN_SEED.to_string()]);
    }
}
