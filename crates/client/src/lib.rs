mod auth;
pub mod course;
pub mod lesson;
pub mod module;
pub mod review;
mod wire;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use auth::{AuthState, Credentials, Error as AuthError, Password};
use log::debug;
use reqwest::{
    blocking::{Client as HttpClient, RequestBuilder, Response},
    Method, StatusCode,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
pub use wire::{CourseId, LessonId, ModuleId, ReviewId, UserId};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Where the platform lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Base URL of the REST gateway, which serves `/cursos`, `/modulos` and `/reviews`
    pub gateway: String,

    /// The OpenID Connect issuer, eg `https://sso.example.org/realms/aula`
    pub issuer: String,

    /// The public client we authenticate as
    pub client_id: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            gateway: "http://localhost:8080".to_string(),
            issuer: "http://localhost:8180/realms/aula".to_string(),
            client_id: "aula-tui".to_string(),
        }
    }
}

/// A client, for using the course platform's API
pub struct Client {
    pub creds: Credentials,
    endpoints: Endpoints,
    http: HttpClient,
    auth: Arc<Mutex<AuthState>>,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("error authenticating: {}", .0)]
    AuthError(#[from] AuthError),

    #[error("http error: {}", .0)]
    HTTPError(#[from] reqwest::Error),

    #[error("{} returned {}", .url, .status)]
    Status {
        status: StatusCode,
        url: String,
        body: String,
    },

    #[error("serde error: {}", .0)]
    SerdeError(#[from] serde_json::Error),

    #[error("invalid review: {}", .0)]
    InvalidReview(#[from] review::ReviewError),
}

impl Error {
    /// If the server refused us because our token is missing or stale
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Status { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }
}

impl Client {
    pub fn new(endpoints: Endpoints, creds: Credentials) -> Self {
        Self::with_auth_state(endpoints, creds, AuthState::default())
    }

    pub fn with_auth_state(endpoints: Endpoints, creds: Credentials, state: AuthState) -> Self {
        Client {
            creds,
            endpoints,
            http: HttpClient::new(),
            auth: Arc::new(Mutex::new(state)),
        }
    }

    /// Make a new client which shares tokens with this one, so a refresh in one is seen by both
    pub fn clone_sharing_state(&self) -> Self {
        Client {
            creds: self.creds.clone(),
            endpoints: self.endpoints.clone(),
            http: self.http.clone(),
            auth: self.auth.clone(),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub(crate) fn auth_lock(&self) -> MutexGuard<'_, AuthState> {
        self.auth.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.endpoints.gateway.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Wrapper for attempting a request, and re-trying if it fails for authentication reasons
    pub fn with_reattempt_auth<T, F>(&self, mut f: F) -> Result<T, Error>
    where
        F: FnMut() -> Result<T, Error>,
    {
        match f() {
            Err(e) if e.is_unauthorized() => {
                debug!("token rejected, re-authenticating");
                self.authenticate()?;
                f()
            }
            x => x,
        }
    }

    /// Send a request built by `build`, with our bearer token attached.
    /// Any non-success status is turned into [`Error::Status`].
    fn execute<F>(&self, build: F) -> Result<Response>
    where
        F: Fn(&HttpClient) -> RequestBuilder,
    {
        if !self.auth_lock().is_authenticated() {
            self.authenticate()?;
        }

        self.with_reattempt_auth(|| {
            let token = self.auth_lock().access_token().unwrap_or_default().to_string();
            let resp = build(&self.http).bearer_auth(token).send()?;

            let status = resp.status();
            if status.is_client_error() || status.is_server_error() {
                let url = resp.url().to_string();
                let body = resp.text().unwrap_or_default();
                debug!("{} returned {}: {}", url, status, body);
                return Err(Error::Status { status, url, body });
            }

            Ok(resp)
        })
    }

    pub(crate) fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_with_query(path, &[])
    }

    pub(crate) fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.url(path);
        let resp = self.execute(|http| http.get(&url).query(query))?;
        read_json(resp)
    }

    /// Send `body` as JSON and parse the JSON response
    pub(crate) fn send<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let resp = self.execute(|http| http.request(method.clone(), &url).json(body))?;
        read_json(resp)
    }

    /// Send a request whose response body we don't care about.
    /// `POST`, `PUT` and `PATCH` get an empty JSON object as their body.
    pub(crate) fn send_unit(&self, method: Method, path: &str) -> Result<()> {
        let url = self.url(path);
        let with_body = matches!(method, Method::POST | Method::PUT | Method::PATCH);
        self.execute(|http| {
            let req = http.request(method.clone(), &url);
            if with_body {
                req.json(&serde_json::json!({}))
            } else {
                req
            }
        })?;

        Ok(())
    }

    /// Call the gateway's health endpoint. This doesn't need authentication.
    pub fn health(&self) -> Result<HealthResp, Error> {
        Ok(self
            .http
            .get(self.url("actuator/health"))
            .send()?
            .error_for_status()?
            .json()?)
    }
}

fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let s = resp.text()?;
    if log::log_enabled!(log::Level::Debug) {
        debug!("response: {}", s);
    }

    Ok(serde_json::from_str(&s)?)
}

/// Response given by the health endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct HealthResp {
    pub status: String,
}
