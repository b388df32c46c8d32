//! Programmable in-memory transport for tests and embedding.

use crate::auth::domain::{AccessToken, ApiRequest, ApiResponse, HttpMethod};
use crate::auth::ports::{HttpTransport, TransportResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Responder invoked for a matched route.
type Responder =
    dyn Fn(&ApiRequest, Option<&AccessToken>) -> TransportResult<ApiResponse> + Send + Sync;

/// One observed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Request method.
    pub method: HttpMethod,
    /// Request path.
    pub path: String,
    /// Bearer token attached to the call, if any.
    pub bearer: Option<String>,
}

struct Route {
    method: HttpMethod,
    path: String,
    responder: Arc<Responder>,
}

/// Transport that serves registered responders and records every call.
///
/// Unmatched requests answer 404 with an empty body.
#[derive(Clone, Default)]
pub struct InMemoryTransport {
    routes: Arc<RwLock<Vec<Route>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl InMemoryTransport {
    /// Creates a transport with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a responder for an exact method/path pair. Later
    /// registrations for the same pair replace earlier ones.
    pub fn on(
        &self,
        method: HttpMethod,
        path: impl Into<String>,
        responder: impl Fn(&ApiRequest, Option<&AccessToken>) -> TransportResult<ApiResponse>
        + Send
        + Sync
        + 'static,
    ) {
        let path_value = path.into();
        let mut routes = self.routes.write().unwrap_or_else(PoisonError::into_inner);
        routes.retain(|route| !(route.method == method && route.path == path_value));
        routes.push(Route {
            method,
            path: path_value,
            responder: Arc::new(responder),
        });
    }

    /// Returns every observed call in arrival order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns how many calls hit the given path.
    #[must_use]
    pub fn calls_to(&self, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|call| call.path == path)
            .count()
    }
}

#[async_trait]
impl HttpTransport for InMemoryTransport {
    async fn execute(
        &self,
        request: &ApiRequest,
        bearer: Option<&AccessToken>,
    ) -> TransportResult<ApiResponse> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                method: request.method(),
                path: request.path().to_owned(),
                bearer: bearer.map(|token| token.as_str().to_owned()),
            });
        let responder = {
            let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
            routes
                .iter()
                .find(|route| route.method == request.method() && route.path == request.path())
                .map(|route| Arc::clone(&route.responder))
        };
        responder.map_or_else(
            || Ok(ApiResponse::new(404, Value::Null)),
            |respond| respond(request, bearer),
        )
    }
}
