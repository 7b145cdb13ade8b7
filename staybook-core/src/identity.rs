use serde::Deserialize;
use staybook_shared::pii::Masked;
use staybook_shared::{Identity, IdentityRef, IdentitySummary};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::password::{hash_password, hash_password_async, verify_password_async};
use crate::repository::IdentityRepository;
use crate::session::SessionAuthenticator;
use crate::{CoreError, CoreResult};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: Masked<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: Masked<String>,
}

/// Registration, login and session resolution over an identity store.
pub struct AccountService {
    identities: Arc<dyn IdentityRepository>,
    sessions: Arc<SessionAuthenticator>,
    // Verified against when the email is unknown so both login failures cost
    // one Argon2 run.
    dummy_hash: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AccountService {
    pub fn new(
        identities: Arc<dyn IdentityRepository>,
        sessions: Arc<SessionAuthenticator>,
    ) -> CoreResult<Self> {
        let dummy_hash = hash_password(&Uuid::new_v4().to_string())?;
        Ok(Self {
            identities,
            sessions,
            dummy_hash,
        })
    }

    pub async fn register(&self, req: RegisterRequest) -> CoreResult<IdentitySummary> {
        let name = req.name.trim().to_string();
        let email = normalize_email(&req.email);
        let password = req.password.into_inner();

        if name.is_empty() {
            return Err(CoreError::ValidationError("name is required".to_string()));
        }
        if !email.contains('@') {
            return Err(CoreError::ValidationError("a valid email is required".to_string()));
        }
        if password.is_empty() {
            return Err(CoreError::ValidationError("password is required".to_string()));
        }

        let identity = Identity {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash: hash_password_async(password).await?,
        };
        self.identities.insert(&identity).await?;

        info!("Registered identity {} ({})", identity.id, Masked(&identity.email));
        Ok(identity.summary())
    }

    /// Returns the summary and a fresh session token. Unknown email and wrong
    /// password stay distinct here; the HTTP layer decides how to present them.
    pub async fn login(&self, req: LoginRequest) -> CoreResult<(IdentitySummary, String)> {
        let email = normalize_email(&req.email);
        let password = req.password.into_inner();

        let identity = match self.identities.find_by_email(&email).await? {
            Some(identity) => identity,
            None => {
                verify_password_async(self.dummy_hash.clone(), password).await?;
                debug!("Login for unknown email {}", Masked(&email));
                return Err(CoreError::NotFound("User".to_string()));
            }
        };

        if !verify_password_async(identity.password_hash.clone(), password).await? {
            debug!("Login with wrong password for {}", identity.id);
            return Err(CoreError::BadCredential);
        }

        let token = self.sessions.issue(&identity)?;
        info!("Identity {} logged in", identity.id);
        Ok((identity.summary(), token))
    }

    /// Verify a credential and confirm the identity it names still exists.
    /// A token for a vanished identity is as good as a forged one.
    async fn load(&self, credential: &str) -> CoreResult<Identity> {
        let reference = self.sessions.verify(credential)?;
        match self.identities.find_by_id(reference.id).await? {
            Some(identity) => Ok(identity),
            None => {
                debug!("Session names unknown identity {}", reference.id);
                Err(CoreError::InvalidCredential)
            }
        }
    }

    pub async fn resolve(&self, credential: &str) -> CoreResult<IdentityRef> {
        Ok(self.load(credential).await?.reference())
    }

    /// Gate for protected endpoints. No cookie, or the empty cookie left by
    /// logout, is `Unauthenticated`; anything else must verify.
    pub async fn authenticate(&self, credential: Option<&str>) -> CoreResult<IdentityRef> {
        match credential {
            None | Some("") => Err(CoreError::Unauthenticated),
            Some(token) => self.resolve(token).await,
        }
    }

    /// Profile lookup never fails on a missing credential.
    pub async fn profile(&self, credential: Option<&str>) -> CoreResult<Option<IdentitySummary>> {
        let token = match credential {
            None | Some("") => return Ok(None),
            Some(token) => token,
        };

        Ok(Some(self.load(token).await?.summary()))
    }

    pub fn logout(&self) -> String {
        self.sessions.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryIdentityRepository;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sessions() -> Arc<SessionAuthenticator> {
        Arc::new(SessionAuthenticator::new("test_secret_key", None).unwrap())
    }

    fn service() -> AccountService {
        AccountService::new(Arc::new(MemoryIdentityRepository::new()), sessions()).unwrap()
    }

    fn register_req(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Alice".to_string(),
            email: email.to_string(),
            password: Masked("s3cret".to_string()),
        }
    }

    fn login_req(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: Masked(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_registration() {
        let accounts = service();
        accounts.register(register_req("a@x.com")).await.unwrap();

        let dup = accounts.register(register_req("a@x.com")).await;
        assert!(matches!(dup, Err(CoreError::DuplicateEmail)));

        let dup_case = accounts.register(register_req(" A@X.com ")).await;
        assert!(matches!(dup_case, Err(CoreError::DuplicateEmail)));

        let other = accounts.register(register_req("b@x.com")).await.unwrap();
        assert_eq!(other.email, "b@x.com");
        let json = serde_json::to_value(&other).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
    }

    #[tokio::test]
    async fn test_registration_validation() {
        let accounts = service();
        let mut req = register_req("not-an-email");
        assert!(matches!(accounts.register(req).await, Err(CoreError::ValidationError(_))));

        req = register_req("a@x.com");
        req.password = Masked(String::new());
        assert!(matches!(accounts.register(req).await, Err(CoreError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_login_classifies_failures() {
        let accounts = service();
        accounts.register(register_req("a@x.com")).await.unwrap();

        assert!(matches!(
            accounts.login(login_req("nobody@x.com", "s3cret")).await,
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(
            accounts.login(login_req("a@x.com", "wrong")).await,
            Err(CoreError::BadCredential)
        ));
    }

    #[tokio::test]
    async fn test_login_token_resolves_to_identity() {
        let accounts = service();
        let registered = accounts.register(register_req("a@x.com")).await.unwrap();

        let (summary, token) = accounts.login(login_req("a@x.com", "s3cret")).await.unwrap();
        assert_eq!(summary, registered);

        let me = accounts.authenticate(Some(token.as_str())).await.unwrap();
        assert_eq!(me.id, registered.id);
        assert_eq!(me.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_authenticate_without_credential() {
        let accounts = service();
        assert!(matches!(accounts.authenticate(None).await, Err(CoreError::Unauthenticated)));
        assert!(matches!(
            accounts.authenticate(Some(accounts.logout().as_str())).await,
            Err(CoreError::Unauthenticated)
        ));
        assert!(matches!(
            accounts.authenticate(Some("forged")).await,
            Err(CoreError::InvalidCredential)
        ));
    }

    #[tokio::test]
    async fn test_token_for_unknown_identity_is_rejected() {
        let sessions = sessions();
        let accounts =
            AccountService::new(Arc::new(MemoryIdentityRepository::new()), sessions.clone())
                .unwrap();
        let ghost = Identity {
            id: Uuid::new_v4(),
            name: "Ghost".to_string(),
            email: "ghost@x.com".to_string(),
            password_hash: String::new(),
        };
        let token = sessions.issue(&ghost).unwrap();

        assert!(matches!(accounts.resolve(&token).await, Err(CoreError::InvalidCredential)));
    }

    #[tokio::test]
    async fn test_login_leaves_runtime_responsive() {
        let accounts = service();
        accounts.register(register_req("a@x.com")).await.unwrap();

        // Single-threaded runtime: the ticker only runs if login yields while
        // Argon2 works.
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        let ticker = tokio::spawn(async move {
            loop {
                counter.fetch_add(1, Ordering::Relaxed);
                tokio::task::yield_now().await;
            }
        });

        accounts.login(login_req("a@x.com", "s3cret")).await.unwrap();
        let _ = accounts.login(login_req("nobody@x.com", "s3cret")).await;
        ticker.abort();

        assert!(ticks.load(Ordering::Relaxed) > 0);
    }

    #[tokio::test]
    async fn test_profile() {
        let accounts = service();
        accounts.register(register_req("a@x.com")).await.unwrap();
        let (_, token) = accounts.login(login_req("a@x.com", "s3cret")).await.unwrap();

        assert!(accounts.profile(None).await.unwrap().is_none());
        assert!(accounts.profile(Some("")).await.unwrap().is_none());
        assert_eq!(accounts.profile(Some(token.as_str())).await.unwrap().unwrap().name, "Alice");
        assert!(accounts.profile(Some("garbage")).await.is_err());
    }
}
