//! Request dispatch.

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info, info_span, warn};

use layer_auth::{AuthError, AuthGuard, Subject};
use layer_model::{GroupFields, SectionFields};
use layer_store::{Direction, HierarchyStore, Rearranged};

use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};
use crate::form::LayerForm;
use crate::request::{Request, Response, Route};

/// Optional body of a rearrange request.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RearrangeBody {
    /// Group revision the caller last saw. Omit to move unconditionally.
    revision: Option<u64>,
}

/// Answers layer hierarchy requests against a shared store.
#[derive(Debug, Clone)]
pub struct LayerService {
    store: Arc<HierarchyStore>,
    guard: AuthGuard,
}

impl LayerService {
    pub fn new(store: Arc<HierarchyStore>, guard: AuthGuard) -> Self {
        Self { store, guard }
    }

    /// Open the configured snapshot (or start empty) and build the guard.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let guard = config.build_guard()?;
        let store = HierarchyStore::open(&config.snapshot_path())?;
        Ok(Self::new(Arc::new(store), guard))
    }

    pub fn store(&self) -> &Arc<HierarchyStore> {
        &self.store
    }

    pub fn guard(&self) -> &AuthGuard {
        &self.guard
    }

    /// Handle one request. Never fails; errors become JSON error responses.
    pub fn handle(&self, request: &Request) -> Response {
        let span = info_span!("request", method = %request.method, path = %request.path);
        let _entered = span.enter();

        match self.dispatch(request) {
            Ok(response) => {
                debug!(status = response.status, "request handled");
                response
            }
            Err(err) => {
                let status = err.status();
                if status >= 500 {
                    tracing::error!(status, error = %err, "request failed");
                } else {
                    warn!(status, error = %err, "request rejected");
                }
                Response::error(status, err.user_message())
            }
        }
    }

    fn dispatch(&self, request: &Request) -> Result<Response> {
        let route = Route::parse(request.method, &request.path)?;
        let subject = if route.requires_auth() {
            Some(self.authenticate(request)?)
        } else {
            None
        };

        match route {
            Route::ListSections => {
                let sections = self.store.list_sections()?;
                Ok(Response::ok(json!({ "layerSections": sections })))
            }
            Route::GetSection(id) => {
                let section = self.store.get_section(id)?;
                Ok(Response::ok(json!({ "layerSection": section })))
            }
            Route::CreateSection => {
                let fields: SectionFields = parse_body(request)?;
                let section = self.store.create_section(fields)?;
                Ok(Response::created(json!({ "layerSection": section })))
            }
            Route::ReplaceSection(id) => {
                let fields: SectionFields = parse_body(request)?;
                let layer = self.store.replace_section(id, fields)?;
                Ok(Response::ok(json!({ "layer": layer })))
            }
            Route::DeleteSection(id) => {
                self.store.delete_section(id)?;
                Ok(deleted())
            }

            Route::GetGroup(id) => {
                let group = self.store.get_group(id)?;
                Ok(Response::ok(json!({ "layerGroup": group })))
            }
            Route::CreateGroup => {
                let fields: GroupFields = parse_body(request)?;
                let group = self.store.create_group(fields)?;
                Ok(Response::created(json!({ "layerGroup": group })))
            }
            Route::ReplaceGroup(id) => {
                let fields: GroupFields = parse_body(request)?;
                let layer = self.store.replace_group(id, fields)?;
                Ok(Response::ok(json!({ "layer": layer })))
            }
            Route::DeleteGroup(id) => {
                self.store.delete_group(id)?;
                Ok(deleted())
            }

            Route::GetData(id) => {
                let data = self.store.get_data(id)?;
                Ok(Response::ok(json!({ "layerData": data })))
            }
            Route::CreateData => {
                let form: LayerForm = parse_body(request)?;
                let group = form.group()?;
                let data = self.store.create_data(group, form.into_fields()?)?;
                Ok(Response::created(json!({ "layerData": data })))
            }
            Route::ReplaceData(id) => {
                let form: LayerForm = parse_body(request)?;
                let layer = self.store.replace_data(id, form.into_fields()?)?;
                Ok(Response::ok(json!({ "layer": layer })))
            }
            Route::DeleteData(id) => {
                self.store.delete_data(id)?;
                Ok(deleted())
            }
            Route::Rearrange(direction, id) => {
                let body: RearrangeBody = match &request.body {
                    Some(value) if !value.is_null() => parse_value(value.clone())?,
                    _ => RearrangeBody::default(),
                };
                let outcome = match (body.revision, direction) {
                    (Some(revision), direction) => self.store.rearrange(id, direction, revision)?,
                    (None, Direction::Up) => self.store.move_up(id)?,
                    (None, Direction::Down) => self.store.move_down(id)?,
                };
                Ok(Response::ok(rearranged(&outcome)))
            }

            Route::Logout => {
                let Some(subject) = subject else {
                    return Err(AuthError::MissingToken.into());
                };
                self.guard.revoke(&subject);
                info!(subject = %subject, "logged out");
                Ok(Response::ok(json!({ "message": "logged out" })))
            }
        }
    }

    fn authenticate(&self, request: &Request) -> Result<Subject> {
        let subject = self.guard.check(request.authorization.as_deref())?;
        debug!(subject = %subject, "authorized");
        Ok(subject)
    }
}

fn deleted() -> Response {
    Response::ok(json!({ "message": "deleted" }))
}

fn rearranged(outcome: &Rearranged) -> Value {
    json!({
        "moved": outcome.moved(),
        "order": outcome.order(),
        "revision": outcome.revision(),
    })
}

fn parse_body<T: DeserializeOwned>(request: &Request) -> Result<T> {
    let body = request
        .body
        .clone()
        .ok_or_else(|| ServiceError::BadRequest(format!("{} needs a JSON body", request.method)))?;
    parse_value(body)
}

fn parse_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ServiceError::BadRequest(e.to_string()))
}
