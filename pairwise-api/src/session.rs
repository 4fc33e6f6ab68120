//! Session/auth state machine
//!
//! Authentication progresses through three stages:
//! Unauthenticated → (credentials ok) → CredentialsVerified →
//! (access code ok) → Authenticated → (logout) → Unauthenticated.
//!
//! Failed transitions leave the stage untouched. The stage variable is
//! ephemeral per login attempt; token expiry is enforced statelessly by
//! the signer and simply forces a fresh login.

use pairwise_common::token::{TokenError, TokenSigner};
use pairwise_common::{Error, Result};
use std::time::Duration;
use tracing::info;

/// Discrete point in the authentication progression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    Unauthenticated,
    CredentialsVerified,
    Authenticated,
}

/// Configured demo identity; stands in for an external identity provider
#[derive(Debug, Clone)]
pub struct Identity {
    pub username: String,
    pub one_time_password: String,
    pub access_code: String,
}

/// Server-side session state: stage progression plus token issuance
pub struct SessionManager {
    identity: Identity,
    token_ttl: Duration,
    signer: TokenSigner,
    stage: AuthStage,
}

impl SessionManager {
    pub fn new(identity: Identity, token_ttl: Duration) -> Self {
        Self {
            identity,
            token_ttl,
            signer: TokenSigner::new(),
            stage: AuthStage::Unauthenticated,
        }
    }

    pub fn stage(&self) -> AuthStage {
        self.stage
    }

    /// Check the submitted credentials against the configured identity.
    /// Success advances to CredentialsVerified; no token is minted yet.
    pub fn verify_credentials(&mut self, username: &str, one_time_password: &str) -> Result<()> {
        if username != self.identity.username
            || one_time_password != self.identity.one_time_password
        {
            return Err(Error::InvalidCredentials);
        }

        self.stage = AuthStage::CredentialsVerified;
        info!(username, "credentials verified");
        Ok(())
    }

    /// Check the one-time access code. Valid once credentials have been
    /// verified (re-verification while Authenticated re-mints a token).
    /// Success mints a bearer token and promotes to Authenticated; a wrong
    /// code leaves the stage where it was.
    pub fn verify_access_code(&mut self, access_code: &str) -> Result<String> {
        if self.stage == AuthStage::Unauthenticated {
            return Err(Error::InvalidWorkflowState(
                "access code verification requires verified credentials".to_string(),
            ));
        }

        if access_code != self.identity.access_code {
            return Err(Error::InvalidAccessCode);
        }

        let token = self.signer.mint(&self.identity.username, self.token_ttl);
        self.stage = AuthStage::Authenticated;
        info!("access code verified, session authenticated");
        Ok(token)
    }

    /// Guard for privileged operations: verify the bearer token and
    /// return the subject it was minted for.
    pub fn authenticate(&self, bearer: Option<&str>) -> Result<String> {
        let token = bearer.ok_or_else(|| Error::Unauthorized("missing bearer token".to_string()))?;

        let claims = self.signer.verify(token).map_err(|e| match e {
            TokenError::Expired => Error::Unauthorized("token expired".to_string()),
            TokenError::Malformed | TokenError::BadSignature => {
                Error::Unauthorized("invalid token".to_string())
            }
        })?;

        Ok(claims.subject)
    }

    /// Drop back to Unauthenticated and rotate the signing secret so
    /// every outstanding token is invalidated. Idempotent.
    pub fn logout(&mut self) {
        self.signer.rotate();
        self.stage = AuthStage::Unauthenticated;
        info!("session ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        SessionManager::new(
            Identity {
                username: "validUser".to_string(),
                one_time_password: "123456".to_string(),
                access_code: "098765".to_string(),
            },
            Duration::from_secs(3600),
        )
    }

    #[test]
    fn test_bad_credentials_keep_stage() {
        let mut session = manager();

        let err = session.verify_credentials("validUser", "wrong").unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
        assert_eq!(session.stage(), AuthStage::Unauthenticated);
    }

    #[test]
    fn test_good_credentials_advance_stage() {
        let mut session = manager();

        session.verify_credentials("validUser", "123456").unwrap();
        assert_eq!(session.stage(), AuthStage::CredentialsVerified);
    }

    #[test]
    fn test_access_code_before_credentials_rejected() {
        let mut session = manager();

        let err = session.verify_access_code("098765").unwrap_err();
        assert!(matches!(err, Error::InvalidWorkflowState(_)));
        assert_eq!(session.stage(), AuthStage::Unauthenticated);
    }

    #[test]
    fn test_wrong_access_code_keeps_credentials_verified() {
        let mut session = manager();
        session.verify_credentials("validUser", "123456").unwrap();

        let err = session.verify_access_code("000000").unwrap_err();
        assert!(matches!(err, Error::InvalidAccessCode));
        // Stage stays CredentialsVerified, not reset to Unauthenticated
        assert_eq!(session.stage(), AuthStage::CredentialsVerified);
    }

    #[test]
    fn test_full_progression_mints_usable_token() {
        let mut session = manager();
        session.verify_credentials("validUser", "123456").unwrap();
        let token = session.verify_access_code("098765").unwrap();

        assert_eq!(session.stage(), AuthStage::Authenticated);
        let subject = session.authenticate(Some(&token)).unwrap();
        assert_eq!(subject, "validUser");
    }

    #[test]
    fn test_reverification_remints_token() {
        let mut session = manager();
        session.verify_credentials("validUser", "123456").unwrap();
        session.verify_access_code("098765").unwrap();

        let token = session.verify_access_code("098765").unwrap();
        assert_eq!(session.stage(), AuthStage::Authenticated);
        assert!(session.authenticate(Some(&token)).is_ok());
    }

    #[test]
    fn test_authenticate_rejects_missing_and_garbage() {
        let session = manager();

        assert!(matches!(
            session.authenticate(None).unwrap_err(),
            Error::Unauthorized(_)
        ));
        assert!(matches!(
            session.authenticate(Some("not-a-token")).unwrap_err(),
            Error::Unauthorized(_)
        ));
    }

    #[test]
    fn test_logout_invalidates_token_and_is_idempotent() {
        let mut session = manager();
        session.verify_credentials("validUser", "123456").unwrap();
        let token = session.verify_access_code("098765").unwrap();

        session.logout();
        assert_eq!(session.stage(), AuthStage::Unauthenticated);
        assert!(session.authenticate(Some(&token)).is_err());

        // Second logout is a no-op success
        session.logout();
        assert_eq!(session.stage(), AuthStage::Unauthenticated);
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut session = SessionManager::new(
            Identity {
                username: "validUser".to_string(),
                one_time_password: "123456".to_string(),
                access_code: "098765".to_string(),
            },
            Duration::from_secs(0),
        );
        session.verify_credentials("validUser", "123456").unwrap();
        let token = session.verify_access_code("098765").unwrap();

        std::thread::sleep(Duration::from_millis(5));
        let err = session.authenticate(Some(&token)).unwrap_err();
        assert!(matches!(err, Error::Unauthorized(msg) if msg.contains("expired")));
    }
}
