//! Framework-free request, response and route types.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use layer_model::{DataId, GroupId, SectionId};
use layer_store::Direction;

use crate::error::{Result, ServiceError};

/// Optional prefix accepted in front of every route.
const API_PREFIX: &str = "api";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ServiceError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            _ => Err(ServiceError::MethodNotAllowed {
                method: value.to_string(),
                path: String::new(),
            }),
        }
    }
}

/// An incoming request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    /// Raw `authorization` header value.
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            authorization: None,
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Put, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Whether a successful response to this request changed stored state.
    pub fn is_mutation(&self) -> bool {
        self.method != Method::Get
    }

    #[must_use]
    pub fn with_authorization(mut self, header: impl Into<String>) -> Self {
        self.authorization = Some(header.into());
        self
    }
}

/// A JSON response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn created(body: Value) -> Self {
        Self { status: 201, body }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: serde_json::json!({ "error": message.into() }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Every endpoint the service answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ListSections,
    GetSection(SectionId),
    CreateSection,
    ReplaceSection(SectionId),
    DeleteSection(SectionId),
    GetGroup(GroupId),
    CreateGroup,
    ReplaceGroup(GroupId),
    DeleteGroup(GroupId),
    GetData(DataId),
    CreateData,
    ReplaceData(DataId),
    DeleteData(DataId),
    Rearrange(Direction, DataId),
    Logout,
}

impl Route {
    /// Match a method and path. A leading `/api` and any query string are ignored.
    pub fn parse(method: Method, path: &str) -> Result<Self> {
        let path_only = path.split(['?', '#']).next().unwrap_or_default();
        let mut segments: Vec<&str> = path_only.split('/').filter(|s| !s.is_empty()).collect();
        if segments.first() == Some(&API_PREFIX) {
            segments.remove(0);
        }

        let no_route = || ServiceError::NoRoute {
            method: method.to_string(),
            path: path.to_string(),
        };
        let not_allowed = || ServiceError::MethodNotAllowed {
            method: method.to_string(),
            path: path.to_string(),
        };

        let route = match (segments.as_slice(), method) {
            (["LayerSection"], Method::Get) => Self::ListSections,
            (["LayerSection"], Method::Post) => Self::CreateSection,
            (["LayerSection", id], method) => {
                let id = id.parse()?;
                match method {
                    Method::Get => Self::GetSection(id),
                    Method::Put => Self::ReplaceSection(id),
                    Method::Delete => Self::DeleteSection(id),
                    Method::Post => return Err(not_allowed()),
                }
            }
            (["LayerGroup"], Method::Post) => Self::CreateGroup,
            (["LayerData"], Method::Post) => Self::CreateData,
            (["LayerData", "Rearrange", direction, id], Method::Put) => {
                Self::Rearrange(direction.parse()?, id.parse()?)
            }
            (["LayerData", "Rearrange", _, _], _) => return Err(not_allowed()),
            (["LayerGroup", id], method) => {
                let id = id.parse()?;
                match method {
                    Method::Get => Self::GetGroup(id),
                    Method::Put => Self::ReplaceGroup(id),
                    Method::Delete => Self::DeleteGroup(id),
                    Method::Post => return Err(not_allowed()),
                }
            }
            (["LayerData", id], method) => {
                let id = id.parse()?;
                match method {
                    Method::Get => Self::GetData(id),
                    Method::Put => Self::ReplaceData(id),
                    Method::Delete => Self::DeleteData(id),
                    Method::Post => return Err(not_allowed()),
                }
            }
            (["auth", "logout"], Method::Post) => Self::Logout,
            (["LayerSection" | "LayerGroup" | "LayerData"] | ["auth", "logout"], _) => {
                return Err(not_allowed());
            }
            _ => return Err(no_route()),
        };
        Ok(route)
    }

    /// Reads are public; every mutation needs a valid token.
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Self::ListSections | Self::GetSection(_) | Self::GetGroup(_) | Self::GetData(_)
        )
    }
}
