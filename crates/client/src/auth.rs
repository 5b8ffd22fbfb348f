//! Code for authenticating against the platform's identity provider.
//!
//! The gateway accepts bearer tokens issued by an OpenID Connect provider (Keycloak).
//! We use the password grant, and the refresh token when we have one.
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Client;

/// Information used to login
pub type Credentials = (String, Password);

/// Role which unlocks course management
pub const ADMIN_ROLE: &str = "admin";

#[derive(Error, Debug)]
pub enum Error {
    #[error("we didn't login for some reason. check your credentials?")]
    LoginFailed,

    #[error("the identity provider refused the request: {}", .0)]
    Rejected(String),

    #[error("error communicating with the identity provider: {}", .0)]
    IDPReqError(#[from] reqwest::Error),

    #[error("the access token was malformed")]
    MalformedToken,
}

#[derive(Deserialize)]
struct TokenResp {
    access_token: String,
    refresh_token: Option<String>,
}

#[derive(Deserialize)]
struct TokenErrorResp {
    error: String,
    error_description: Option<String>,
}

#[derive(Deserialize)]
struct Claims {
    realm_access: Option<RealmAccess>,
}

#[derive(Deserialize)]
struct RealmAccess {
    #[serde(default)]
    roles: Vec<String>,
}

impl Client {
    /// Log in from scratch, even if we already have tokens
    pub fn login(&self) -> Result<(), Error> {
        *self.auth_lock() = AuthState::default();
        self.authenticate()
    }

    pub(crate) fn authenticate(&self) -> Result<(), Error> {
        let refresh = self.auth_lock().refresh_token.clone();
        if let Some(refresh) = refresh {
            match self.token_request(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.endpoints.client_id.as_str()),
                ("refresh_token", refresh.as_str()),
            ]) {
                Ok(()) => return Ok(()),
                Err(e) => debug!("refreshing token failed, logging in again: {}", e),
            }
        }

        self.token_request(&[
            ("grant_type", "password"),
            ("client_id", self.endpoints.client_id.as_str()),
            ("scope", "openid"),
            ("username", self.creds.0.as_str()),
            ("password", self.creds.1.as_ref()),
        ])
    }

    fn token_request(&self, form: &[(&str, &str)]) -> Result<(), Error> {
        let resp = self
            .http
            .post(self.oidc_url("token"))
            .form(form)
            .send()?;

        if resp.status().is_client_error() {
            let err = resp.json::<TokenErrorResp>()?;
            return Err(match err.error.as_str() {
                "invalid_grant" => Error::LoginFailed,
                _ => Error::Rejected(err.error_description.unwrap_or(err.error)),
            });
        }

        let tokens = resp.error_for_status()?.json::<TokenResp>()?;
        *self.auth_lock() = AuthState {
            access_token: Some(tokens.access_token),
            refresh_token: tokens.refresh_token,
        };

        Ok(())
    }

    /// End our session with the identity provider, and forget our tokens
    pub fn logout(&self) -> Result<(), Error> {
        let state = std::mem::take(&mut *self.auth_lock());
        if let Some(refresh) = state.refresh_token {
            self.http
                .post(self.oidc_url("logout"))
                .form(&[
                    ("client_id", self.endpoints.client_id.as_str()),
                    ("refresh_token", refresh.as_str()),
                ])
                .send()?
                .error_for_status()?;
        }

        Ok(())
    }

    fn oidc_url(&self, endpoint: &str) -> String {
        format!(
            "{}/protocol/openid-connect/{}",
            self.endpoints.issuer.trim_end_matches('/'),
            endpoint
        )
    }

    /// The realm roles granted to the logged in user
    pub fn roles(&self) -> Result<Vec<String>, Error> {
        if !self.auth_lock().is_authenticated() {
            self.authenticate()?;
        }

        let state = self.auth_lock();
        let token = state.access_token().ok_or(Error::MalformedToken)?;
        token_roles(token)
    }

    /// If the logged in user may manage courses
    pub fn is_admin(&self) -> bool {
        match self.roles() {
            Ok(roles) => roles.iter().any(|r| r == ADMIN_ROLE),
            Err(e) => {
                debug!("couldn't read roles: {}", e);
                false
            }
        }
    }

    /// Serialise the auth state, for persistence
    pub fn auth_state(&self) -> AuthState {
        self.auth_lock().clone()
    }
}

/// Read the realm roles out of a JWT, without verifying it. The gateway does the verifying.
fn token_roles(token: &str) -> Result<Vec<String>, Error> {
    let payload = token.split('.').nth(1).ok_or(Error::MalformedToken)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| Error::MalformedToken)?;
    let claims: Claims = serde_json::from_slice(&bytes).map_err(|_| Error::MalformedToken)?;

    Ok(claims.realm_access.map(|r| r.roles).unwrap_or_default())
}

/// Contains cached tokens
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct AuthState {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub(crate) fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthState (***)")
    }
}

/// A password, wrapped so we don't print it by accident
#[derive(Clone, Serialize, Deserialize)]
pub struct Password(String);
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Password (******)")
    }
}

impl From<String> for Password {
    fn from(value: String) -> Self {
        Password(value)
    }
}

impl From<Password> for String {
    fn from(val: Password) -> Self {
        val.0
    }
}

impl AsRef<str> for Password {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(claims: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256"}"#),
            URL_SAFE_NO_PAD.encode(claims)
        )
    }

    #[test]
    fn reads_realm_roles() {
        let token = jwt(r#"{"sub":"u1","realm_access":{"roles":["student","admin"]}}"#);
        assert_eq!(token_roles(&token).unwrap(), vec!["student", "admin"]);
    }

    #[test]
    fn missing_realm_access_means_no_roles() {
        let token = jwt(r#"{"sub":"u1"}"#);
        assert!(token_roles(&token).unwrap().is_empty());
    }

    #[test]
    fn garbage_token_is_malformed() {
        assert!(matches!(token_roles("nope"), Err(Error::MalformedToken)));
        assert!(matches!(
            token_roles("a.!!!.c"),
            Err(Error::MalformedToken)
        ));
    }

    #[test]
    fn secrets_are_not_printed() {
        let p = Password::from("hunter2".to_string());
        assert!(!format!("{:?}", p).contains("hunter2"));
    }
}
