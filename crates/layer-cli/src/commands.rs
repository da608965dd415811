//! Subcommand implementations.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use serde_json::{Value, json};
use tracing::{debug, info, info_span};

use layer_auth::Claims;
use layer_model::SectionTree;
use layer_service::{LayerForm, LayerService, Method, Request, Response, ServiceConfig};
use layer_store::HierarchyStore;
use layer_style::{compile_form, resolve_source};

/// Load the config from `path`, or from the platform default when absent.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig> {
    let config = match path {
        Some(path) => ServiceConfig::load_from(path)
            .map(|config| config.with_env_overrides(|key| std::env::var(key).ok())),
        None => ServiceConfig::load(),
    };
    config.context("loading configuration")
}

/// Compile an editor form file into `{paint, layout, source}`.
pub fn run_compile(form_path: &Path) -> Result<Value> {
    let text = fs::read_to_string(form_path)
        .with_context(|| format!("reading {}", form_path.display()))?;
    let form: LayerForm = serde_json::from_str(&text)
        .with_context(|| format!("parsing layer form {}", form_path.display()))?;

    let compiled = compile_form(form.visual_type, &form.style)
        .with_context(|| format!("compiling {} layer", form.visual_type))?;
    let source = resolve_source(&form.source_type, &form.source_url);
    info!(visual_type = %form.visual_type, "compiled layer form");

    Ok(json!({
        "type": form.visual_type,
        "paint": compiled.paint,
        "layout": compiled.layout,
        "source": source,
    }))
}

/// Mint a token for `subject`.
pub fn run_token_issue(
    config: &ServiceConfig,
    subject: &str,
    ttl_secs: Option<u64>,
) -> Result<String> {
    if subject.trim().is_empty() {
        bail!("subject must not be empty");
    }
    let key = config.token_key().context("building token key")?;
    let ttl = match ttl_secs {
        Some(secs) => i64::try_from(secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .context("token lifetime is too large")?,
        None => config.token_ttl(),
    };
    let token = key.issue(subject, ttl).context("signing token")?;
    info!(subject, ttl_secs = ttl.num_seconds(), "issued token");
    Ok(token)
}

/// Verify a token's signature and expiry.
pub fn run_token_verify(config: &ServiceConfig, token: &str) -> Result<Claims> {
    let key = config.token_key().context("building token key")?;
    key.verify(token.trim(), Utc::now())
        .context("token rejected")
}

/// Read every section from a snapshot file.
pub fn run_tree(snapshot: &Path) -> Result<Vec<SectionTree>> {
    let store = HierarchyStore::open(snapshot)
        .with_context(|| format!("opening snapshot {}", snapshot.display()))?;
    store.list_sections().context("reading sections")
}

/// A request as given on the command line.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: String,
    pub path: String,
    pub body: Option<PathBuf>,
    pub token: Option<String>,
    pub snapshot: PathBuf,
}

/// Run one request against the snapshot, saving it after a successful mutation.
pub fn run_request(config: &ServiceConfig, spec: &RequestSpec) -> Result<Response> {
    let span = info_span!("request", method = %spec.method, path = %spec.path);
    let _entered = span.enter();

    let method: Method = spec
        .method
        .parse()
        .with_context(|| format!("unsupported method '{}'", spec.method))?;
    let body = spec
        .body
        .as_deref()
        .map(|path| {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading body {}", path.display()))?;
            serde_json::from_str::<Value>(&text)
                .with_context(|| format!("parsing body {}", path.display()))
        })
        .transpose()?;

    let store = HierarchyStore::open(&spec.snapshot)
        .with_context(|| format!("opening snapshot {}", spec.snapshot.display()))?;
    let guard = config.build_guard().context("building auth guard")?;
    let service = LayerService::new(Arc::new(store), guard);

    let mut request = Request::new(method, spec.path.clone());
    request.body = body;
    request.authorization = spec.token.clone();

    let response = service.handle(&request);
    if response.is_success() && request.is_mutation() {
        service
            .store()
            .save_snapshot(&spec.snapshot)
            .with_context(|| format!("saving snapshot {}", spec.snapshot.display()))?;
    } else {
        debug!(status = response.status, "snapshot left unchanged");
    }
    Ok(response)
}
