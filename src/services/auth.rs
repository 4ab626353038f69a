use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::models::balances::{DEFAULT_CURRENCY, INITIAL_BALANCE};
use crate::models::users::{LoginRequest, LoginResponse, RegisterRequest, UserProfile};
use crate::repositories::balances::BalanceRepository;
use crate::repositories::users::UserRepository;
use crate::settings;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

pub fn issue_session_token(
    user_id: &str,
    email: &str,
    secret: &str,
    ttl_days: i64,
) -> Result<String, ServiceError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::days(ttl_days)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| ServiceError::Internal(format!("Could not sign session token: {e}")))
}

/// Bad signature, expiry, and malformed tokens all collapse into the same
/// unauthorized reason.
pub fn verify_session_token(token: &str, secret: &str) -> Result<Claims, ServiceError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ServiceError::Unauthorized("Invalid user token".to_string()))
}

fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::Internal(format!("Could not hash password: {e}")))
}

fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    balances: Arc<dyn BalanceRepository>,
    auth: settings::Auth,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        balances: Arc<dyn BalanceRepository>,
        auth: settings::Auth,
    ) -> Self {
        AuthService {
            users,
            balances,
            auth,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<UserProfile, ServiceError> {
        if request.name.trim().is_empty()
            || request.email.trim().is_empty()
            || request.password.is_empty()
        {
            return Err(ServiceError::Validation(
                "All fields are required".to_string(),
            ));
        }

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(ServiceError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&request.password)?;
        let user = self
            .users
            .insert_user(&request.name, &request.email, &password_hash)
            .await?;
        let balance = self
            .balances
            .create(&user.id, INITIAL_BALANCE, DEFAULT_CURRENCY)
            .await?;

        Ok(UserProfile::from_user(&user, balance.amount))
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ServiceError> {
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(ServiceError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        // Unknown email and wrong password must be indistinguishable to the
        // caller.
        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Invalid credentials".to_string()))?;

        if !verify_password(&request.password, &user.password_hash) {
            return Err(ServiceError::Unauthorized("Invalid credentials".to_string()));
        }

        let balance = self
            .balances
            .find_by_user(&user.id)
            .await?
            .map(|balance| balance.amount)
            .unwrap_or(0);

        let token = issue_session_token(
            &user.id,
            &user.email,
            &self.auth.session_secret,
            self.auth.session_ttl_days,
        )?;

        Ok(LoginResponse {
            token,
            user: UserProfile::from_user(&user, balance),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::memory::MemoryRepository;

    fn test_auth_settings() -> settings::Auth {
        settings::Auth {
            fixed_token: "fixed-token".to_string(),
            session_secret: "test-session-secret".to_string(),
            session_ttl_days: 7,
        }
    }

    fn service() -> (AuthService, MemoryRepository) {
        let repo = MemoryRepository::new();
        let service = AuthService::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            test_auth_settings(),
        );
        (service, repo)
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ana".to_string(),
            email: email.to_string(),
            password: "pw123".to_string(),
        }
    }

    #[test]
    fn password_hash_verifies_and_rejects() {
        let hash = hash_password("pw123").unwrap();
        assert_ne!(hash, "pw123");
        assert!(verify_password("pw123", &hash));
        assert!(!verify_password("pw124", &hash));
        assert!(!verify_password("pw123", "not-a-phc-hash"));
    }

    #[test]
    fn session_token_round_trips() {
        let token = issue_session_token("user-1", "ana@x.com", "secret", 7).unwrap();
        let claims = verify_session_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "ana@x.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn session_token_rejects_wrong_secret_and_expiry() {
        let token = issue_session_token("user-1", "ana@x.com", "secret", 7).unwrap();
        assert!(verify_session_token(&token, "other-secret").is_err());

        let expired = issue_session_token("user-1", "ana@x.com", "secret", -1).unwrap();
        assert!(verify_session_token(&expired, "secret").is_err());

        assert!(verify_session_token("garbage", "secret").is_err());
    }

    #[tokio::test]
    async fn register_seeds_initial_balance() {
        let (service, repo) = service();

        let profile = service.register(register_request("ana@x.com")).await.unwrap();
        assert_eq!(profile.balance, INITIAL_BALANCE);

        let balance = BalanceRepository::find_by_user(&repo, &profile.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(balance.amount, INITIAL_BALANCE);
        assert_eq!(balance.currency, DEFAULT_CURRENCY);
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let (service, _repo) = service();

        service.register(register_request("ana@x.com")).await.unwrap();

        let mut second = register_request("ana@x.com");
        second.password = "another-password".to_string();
        let error = service.register(second).await.unwrap_err();
        assert!(matches!(error, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_rejects_missing_fields() {
        let (service, _repo) = service();

        let mut request = register_request("ana@x.com");
        request.name = String::new();
        let error = service.register(request).await.unwrap_err();
        assert!(matches!(error, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn login_succeeds_with_valid_credentials() {
        let (service, _repo) = service();
        let profile = service.register(register_request("ana@x.com")).await.unwrap();

        let response = service
            .login(LoginRequest {
                email: "ana@x.com".to_string(),
                password: "pw123".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.user.id, profile.id);
        assert_eq!(response.user.balance, INITIAL_BALANCE);

        let claims = verify_session_token(&response.token, "test-session-secret").unwrap();
        assert_eq!(claims.sub, profile.id);
        assert_eq!(claims.email, "ana@x.com");
    }

    #[tokio::test]
    async fn login_failures_share_one_message() {
        let (service, _repo) = service();
        service.register(register_request("ana@x.com")).await.unwrap();

        let unknown_email = service
            .login(LoginRequest {
                email: "bob@x.com".to_string(),
                password: "pw123".to_string(),
            })
            .await
            .unwrap_err();
        let wrong_password = service
            .login(LoginRequest {
                email: "ana@x.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(unknown_email.to_string(), wrong_password.to_string());
        assert!(matches!(unknown_email, ServiceError::Unauthorized(_)));
        assert!(matches!(wrong_password, ServiceError::Unauthorized(_)));
    }
}
