use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use models::user::Role;
use rand::rngs::OsRng;
use tracing::{info, debug, warn, instrument};
use uuid::Uuid;

use super::domain::{AuthSession, AuthUser, ChangePasswordInput, Claims, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

const MIN_PASSWORD_LEN: usize = 8;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub password_algorithm: String,
}

impl AuthConfig {
    pub fn from_app(cfg: &configs::AuthConfig) -> Self {
        Self {
            jwt_secret: cfg.jwt_secret.clone(),
            token_ttl_hours: cfg.token_ttl_hours,
            password_algorithm: "argon2".into(),
        }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    pub fn token_ttl_hours(&self) -> i64 { self.cfg.token_ttl_hours }

    /// Register a new user with a hashed password and open a session.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 24, password_algorithm: "argon2".into() });
    /// let input = RegisterInput {
    ///     username: "febrian".into(), password: "Secret123".into(), role: "owner".into(),
    ///     fullname: "Febrian".into(), email: "f@example.com".into(), gender: "male".into(),
    ///     phone_number: "0812".into(), address: "Makassar".into(),
    /// };
    /// let session = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(session.user.username, "febrian");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username, role = %input.role))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, AuthError> {
        if input.password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        let role = Role::parse(&input.role)?;
        let profile = input.profile();
        models::user::validate_username(&input.username)?;
        profile.validate()?;

        if let Some(existing) = self.repo.find_user_by_username(&input.username).await? {
            debug!("user exists: {}", existing.username);
            return Err(AuthError::Conflict);
        }

        let hash = hash_password(&input.password)?;
        let user = self.repo.create_user(&input.username, role, &profile).await?;
        let _cred = self.repo.upsert_password(user.id, hash, self.cfg.password_algorithm.clone()).await?;
        info!(user_id = %user.id, username = %user.username, role = %user.role, "user_registered");

        let token = self.issue_token(&user)?;
        Ok(AuthSession { user, token })
    }

    /// Authenticate a user and issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 24, password_algorithm: "argon2".into() });
    /// let _ = tokio_test::block_on(svc.register(RegisterInput {
    ///     username: "sari".into(), password: "Passw0rd".into(), role: "tenant".into(),
    ///     fullname: "Sari".into(), email: "s@e.com".into(), gender: "female".into(),
    ///     phone_number: "0813".into(), address: "Gowa".into(),
    /// }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { username: "sari".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.username, "sari");
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_username(&input.username)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        self.check_password(user.id, &input.password).await?;
        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    /// Verify the current password, then store a hash of the new one.
    #[instrument(skip(self, input))]
    pub async fn change_password(&self, user_id: Uuid, input: ChangePasswordInput) -> Result<(), AuthError> {
        if input.new_password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation("new_password too short (>=8)".into()));
        }
        self.repo.find_user_by_id(user_id).await?.ok_or(AuthError::NotFound)?;
        self.check_password(user_id, &input.password).await.map_err(|e| match e {
            AuthError::Unauthorized => AuthError::Validation("wrong password".into()),
            other => other,
        })?;
        let hash = hash_password(&input.new_password)?;
        self.repo.upsert_password(user_id, hash, self.cfg.password_algorithm.clone()).await?;
        info!(user_id = %user_id, "password_changed");
        Ok(())
    }

    /// Sign an HS256 session token for `user`.
    pub fn issue_token(&self, user: &AuthUser) -> Result<String, AuthError> {
        if self.cfg.jwt_secret.is_empty() {
            return Err(AuthError::TokenError("jwt secret not configured".into()));
        }
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user.username.clone(),
            uid: user.id,
            role: user.role,
            iat: now.timestamp() as usize,
            exp: (now + chrono::Duration::hours(self.cfg.token_ttl_hours)).timestamp() as usize,
        };
        encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Decode and validate a session token, rejecting expired ones.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| {
            warn!(error = %e, "token rejected");
            AuthError::InvalidToken
        })?;
        Ok(data.claims)
    }

    async fn check_password(&self, user_id: Uuid, password: &str) -> Result<(), AuthError> {
        let cred = self.repo
            .get_credentials(user_id)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }
        Ok(())
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc() -> AuthService<MockAuthRepository> {
        AuthService::new(
            Arc::new(MockAuthRepository::default()),
            AuthConfig { jwt_secret: "unit-secret".into(), token_ttl_hours: 24, password_algorithm: "argon2".into() },
        )
    }

    fn register_input(username: &str, role: &str) -> RegisterInput {
        RegisterInput {
            username: username.into(),
            password: "Passw0rd!".into(),
            role: role.into(),
            fullname: "Andi".into(),
            email: "andi@example.com".into(),
            gender: "male".into(),
            phone_number: "0812".into(),
            address: "Makassar".into(),
        }
    }

    #[tokio::test]
    async fn register_then_duplicate_conflicts() {
        let s = svc();
        s.register(register_input("andi", "owner")).await.unwrap();
        let err = s.register(register_input("andi", "tenant")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
        assert_eq!(err.code(), 1002);
    }

    #[tokio::test]
    async fn register_rejects_bad_role_and_short_password() {
        let s = svc();
        assert!(matches!(s.register(register_input("andi", "admin")).await, Err(AuthError::Validation(_))));
        let mut short = register_input("budi", "tenant");
        short.password = "short".into();
        assert!(matches!(s.register(short).await, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn login_wrong_password_is_unauthorized() {
        let s = svc();
        s.register(register_input("andi", "tenant")).await.unwrap();
        let err = s.login(LoginInput { username: "andi".into(), password: "nope-nope".into() }).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
        let err = s.login(LoginInput { username: "ghost".into(), password: "Passw0rd!".into() }).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn token_round_trips_claims() {
        let s = svc();
        let session = s.register(register_input("andi", "owner")).await.unwrap();
        let claims = s.verify_token(&session.token).unwrap();
        assert_eq!(claims.sub, "andi");
        assert_eq!(claims.uid, session.user.id);
        assert_eq!(claims.role, Role::Owner);
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_rejected() {
        let s = svc();
        let session = s.register(register_input("andi", "owner")).await.unwrap();
        let other = AuthService::new(
            Arc::new(MockAuthRepository::default()),
            AuthConfig { jwt_secret: "different".into(), token_ttl_hours: 24, password_algorithm: "argon2".into() },
        );
        assert!(matches!(other.verify_token(&session.token), Err(AuthError::InvalidToken)));
        assert!(matches!(s.verify_token("garbage"), Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let s = AuthService::new(
            Arc::new(MockAuthRepository::default()),
            AuthConfig { jwt_secret: "unit-secret".into(), token_ttl_hours: -2, password_algorithm: "argon2".into() },
        );
        let user = AuthUser { id: Uuid::new_v4(), username: "old".into(), role: Role::Tenant, avatar: String::new() };
        let token = s.issue_token(&user).unwrap();
        assert!(matches!(s.verify_token(&token), Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn change_password_requires_current_one() {
        let s = svc();
        let session = s.register(register_input("andi", "tenant")).await.unwrap();
        let wrong = ChangePasswordInput { password: "not-it-at-all".into(), new_password: "NewPassw0rd".into() };
        assert!(matches!(s.change_password(session.user.id, wrong).await, Err(AuthError::Validation(_))));

        let ok = ChangePasswordInput { password: "Passw0rd!".into(), new_password: "NewPassw0rd".into() };
        s.change_password(session.user.id, ok).await.unwrap();
        assert!(s.login(LoginInput { username: "andi".into(), password: "NewPassw0rd".into() }).await.is_ok());
        assert!(s.login(LoginInput { username: "andi".into(), password: "Passw0rd!".into() }).await.is_err());
    }
}
