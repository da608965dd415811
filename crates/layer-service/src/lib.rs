//! Request handling for the layer hierarchy.
//!
//! [`LayerService::handle`] takes a framework-free [`Request`] and returns a
//! JSON [`Response`]. Reads are public; mutations pass through the
//! [`layer_auth::AuthGuard`] before touching the store. Layer submissions
//! are compiled into paint and layout maps on the way in.

pub mod config;
pub mod error;
pub mod form;
pub mod request;
pub mod service;

pub use config::{AuthConfig, SECRET_ENV, ServiceConfig, StoreConfig};
pub use error::{Result, ServiceError};
pub use form::LayerForm;
pub use request::{Method, Request, Response, Route};
pub use service::LayerService;
