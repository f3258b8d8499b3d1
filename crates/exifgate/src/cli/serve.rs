//! The `exifgate serve` command: the lookup endpoint over HTTP.
//!
//! `GET {route}?url=...` runs a lookup and answers with the `{success, data}`
//! envelope. Lookup failures are still HTTP 200; only the credential gate
//! answers 401, before any fetch happens.

use axum::{
    extract::{FromRequestParts, Query, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use clap::Args;
use exifgate_core::auth::AuthRejection;
use exifgate_core::{Config, CredentialGate, ExifLookup, FileSecretStore, LookupResponse};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (defaults to `server.bind` from the config)
    #[arg(long)]
    pub bind: Option<String>,
}

/// Shared state of the HTTP endpoint.
#[derive(Clone)]
pub struct AppState {
    pub lookup: ExifLookup,
    /// `None` when authentication is disabled
    pub gate: Option<CredentialGate>,
    /// Header set by a trusted front end for already-authenticated callers
    pub session_header: Option<String>,
}

impl AppState {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let lookup = ExifLookup::from_config(config)?;
        let gate = config.auth.enabled.then(|| {
            let store = FileSecretStore::new(config.secrets_dir());
            CredentialGate::new(Arc::new(store), config.auth.secret_name.clone())
        });
        Ok(Self {
            lookup,
            gate,
            session_header: config.auth.session_header.clone(),
        })
    }
}

/// Proof that the request passed the credential gate.
pub struct Authorized;

/// A gate rejection rendered as a 401 envelope.
pub struct Unauthorized(AuthRejection);

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::UNAUTHORIZED);
        (status, Json(LookupResponse::error(self.0.message()))).into_response()
    }
}

impl FromRequestParts<AppState> for Authorized {
    type Rejection = Unauthorized;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(gate) = &state.gate else {
            return Ok(Authorized);
        };

        let session_active = state
            .session_header
            .as_deref()
            .and_then(|name| parts.headers.get(name))
            .is_some_and(|value| !value.is_empty());
        let authorization = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        // The secret store may touch the filesystem
        let gate = gate.clone();
        let decision = tokio::task::spawn_blocking(move || {
            gate.check(session_active, authorization.as_deref())
        })
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Credential check task failed: {e}");
            Err(AuthRejection)
        });

        decision.map(|()| Authorized).map_err(|rejection| {
            tracing::debug!("Rejected unauthenticated lookup request");
            Unauthorized(rejection)
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    #[serde(default)]
    pub url: String,
}

async fn lookup_handler(
    _auth: Authorized,
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Json<LookupResponse> {
    Json(state.lookup.respond(&query.url).await)
}

/// Build the router serving `route`.
pub fn router(state: AppState, route: &str) -> Router {
    Router::new()
        .route(route, get(lookup_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs, config: Config) -> anyhow::Result<()> {
    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());
    let state = AppState::from_config(&config)?;
    if state.gate.is_none() {
        tracing::warn!("Authentication is disabled; the endpoint is open to anyone");
    }
    let app = router(state, &config.server.route);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!("Serving GET {}?url=... on {}", config.server.route, bind);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use exifgate_core::auth::{
        current_code, load_or_create_secret, time_step, unix_now, MemorySecretStore,
    };
    use exifgate_core::pipeline::ResourceFetcher;
    use exifgate_core::FetchError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    const ROUTE: &str = "/exif";
    const SECRET_NAME: &str = "totp_secret";
    const SESSION_HEADER: &str = "x-session-user";

    /// Answers every fetch with a 404 and counts calls.
    #[derive(Default)]
    struct MissingFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ResourceFetcher for MissingFetcher {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(FetchError::Status(404))
        }
    }

    struct Harness {
        app: Router,
        fetcher: Arc<MissingFetcher>,
        store: Arc<MemorySecretStore>,
    }

    fn harness(auth_enabled: bool) -> Harness {
        let fetcher = Arc::new(MissingFetcher::default());
        let store = Arc::new(MemorySecretStore::new());
        let state = AppState {
            lookup: ExifLookup::new(fetcher.clone()),
            gate: auth_enabled.then(|| CredentialGate::new(store.clone(), SECRET_NAME)),
            session_header: Some(SESSION_HEADER.to_string()),
        };
        Harness {
            app: router(state, ROUTE),
            fetcher,
            store,
        }
    }

    fn valid_code(store: &MemorySecretStore) -> String {
        let secret = load_or_create_secret(store, SECRET_NAME).unwrap();
        current_code(secret.as_bytes(), time_step(unix_now()))
    }

    fn get(uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    const PHOTO_URI: &str = "/exif?url=https%3A%2F%2Fimages.example.com%2Fphoto.jpg";

    #[tokio::test]
    async fn test_missing_credentials_are_rejected_before_lookup() {
        let h = harness(true);
        let (status, body) = send(h.app, get(PHOTO_URI, &[])).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["data"], "Authentication required.");
        assert_eq!(h.fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_wrong_code_is_rejected() {
        let h = harness(true);
        let (status, _) = send(h.app, get(PHOTO_URI, &[("authorization", "TOTP 12345x")])).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_code_runs_lookup() {
        let h = harness(true);
        let header = format!("TOTP {}", valid_code(&h.store));
        let (status, body) = send(h.app, get(PHOTO_URI, &[("authorization", &header)])).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["data"], "Remote image returned HTTP 404.");
        assert_eq!(h.fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_file_backed_gate_accepts_valid_code() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileSecretStore::new(dir.path()));
        let fetcher = Arc::new(MissingFetcher::default());
        let state = AppState {
            lookup: ExifLookup::new(fetcher.clone()),
            gate: Some(CredentialGate::new(store.clone(), SECRET_NAME)),
            session_header: None,
        };
        let secret = load_or_create_secret(store.as_ref(), SECRET_NAME).unwrap();
        let header = format!(
            "TOTP {}",
            current_code(secret.as_bytes(), time_step(unix_now()))
        );

        let app = router(state, ROUTE);
        let (status, _) = send(app, get(PHOTO_URI, &[("authorization", &header)])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_session_header_bypasses_totp() {
        let h = harness(true);
        let (status, _) = send(h.app, get(PHOTO_URI, &[(SESSION_HEADER, "alice")])).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(h.fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_auth_disabled_serves_everyone() {
        let h = harness(false);
        let (status, body) = send(h.app, get("/exif", &[])).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "No image URL provided.");
        assert_eq!(h.fetcher.calls.load(Ordering::SeqCst), 0);
    }
}
