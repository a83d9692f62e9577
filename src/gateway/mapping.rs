//! Declarative endpoint mappings and form parameter resolution

use std::collections::HashMap;

use axum::routing::MethodFilter;
use serde_json::{Map, Value};

use crate::error::AppError;

/// Netatmo product family; decides which OAuth scope a route needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiGroup {
    Common,
    Weather,
    Energy,
    Security,
    AirCare,
    Enterprise,
}

impl ApiGroup {
    pub const ALL: [ApiGroup; 6] = [
        ApiGroup::Common,
        ApiGroup::Weather,
        ApiGroup::Energy,
        ApiGroup::Security,
        ApiGroup::AirCare,
        ApiGroup::Enterprise,
    ];

    pub fn scope(self) -> &'static str {
        match self {
            ApiGroup::Common | ApiGroup::Enterprise => "",
            ApiGroup::Weather => "read_station",
            ApiGroup::Energy => "read_thermostat write_thermostat",
            ApiGroup::Security => {
                "read_camera acces_camera read_presence access_presence read_smokedetector write_camera"
            }
            ApiGroup::AirCare => "read_homecoach",
        }
    }

    /// Space-separated union of every group's scope, first occurrence wins
    pub fn combined_scope() -> String {
        let mut scopes: Vec<&str> = Vec::new();
        for group in Self::ALL {
            for scope in group.scope().split_whitespace() {
                if !scopes.contains(&scope) {
                    scopes.push(scope);
                }
            }
        }
        scopes.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn filter(self) -> MethodFilter {
        match self {
            HttpMethod::Get => MethodFilter::GET,
            HttpMethod::Post => MethodFilter::POST,
            HttpMethod::Put => MethodFilter::PUT,
            HttpMethod::Delete => MethodFilter::DELETE,
        }
    }

    /// Parameters for non-GET routes arrive as a JSON body
    pub fn has_body(self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

/// Where a local parameter is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    Path,
    Query,
    Body,
}

/// How a value is encoded into the vendor form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Text,
    Integer,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamDefault {
    Text(&'static str),
    Integer(i64),
    Bool(bool),
}

impl ParamDefault {
    fn encode(self) -> String {
        match self {
            ParamDefault::Text(s) => s.to_string(),
            ParamDefault::Integer(n) => n.to_string(),
            ParamDefault::Bool(b) => b.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub local: &'static str,
    pub source: ParamSource,
    pub vendor: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    /// An encoded `0` is dropped like a missing value
    pub omit_zero: bool,
    pub default: Option<ParamDefault>,
}

impl ParamSpec {
    const fn new(source: ParamSource, local: &'static str, vendor: &'static str) -> Self {
        Self {
            local,
            source,
            vendor,
            kind: ParamKind::Text,
            required: false,
            omit_zero: false,
            default: None,
        }
    }

    pub const fn query(name: &'static str) -> Self {
        Self::new(ParamSource::Query, name, name)
    }

    pub const fn body(name: &'static str) -> Self {
        Self::new(ParamSource::Body, name, name)
    }

    /// Path segments are always required
    pub const fn path(local: &'static str, vendor: &'static str) -> Self {
        Self::new(ParamSource::Path, local, vendor).required()
    }

    pub const fn renamed(self, vendor: &'static str) -> Self {
        Self { vendor, ..self }
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    pub const fn integer(self) -> Self {
        Self {
            kind: ParamKind::Integer,
            ..self
        }
    }

    pub const fn omit_zero(self) -> Self {
        Self {
            omit_zero: true,
            ..self
        }
    }

    pub const fn json(self) -> Self {
        Self {
            kind: ParamKind::Json,
            ..self
        }
    }

    pub const fn or_text(self, value: &'static str) -> Self {
        Self {
            default: Some(ParamDefault::Text(value)),
            ..self
        }
    }

    pub const fn or_int(self, value: i64) -> Self {
        Self {
            default: Some(ParamDefault::Integer(value)),
            ..self
        }
    }

    pub const fn or_bool(self, value: bool) -> Self {
        Self {
            default: Some(ParamDefault::Bool(value)),
            ..self
        }
    }

    fn raw_value(&self, input: &RequestInput) -> Option<Value> {
        match self.source {
            ParamSource::Path => input.path.get(self.local).cloned().map(Value::String),
            ParamSource::Query => input.query.get(self.local).cloned().map(Value::String),
            ParamSource::Body => input.body.as_ref().and_then(|b| b.get(self.local)).cloned(),
        }
    }

    /// Resolve this parameter to its form value; `None` means omit the field.
    pub fn resolve(&self, input: &RequestInput) -> Result<Option<String>, AppError> {
        let value = self.raw_value(input).filter(|v| !is_absent(v));

        match value {
            Some(v) => {
                let encoded = self.encode(&v)?;
                if self.omit_zero && encoded == "0" {
                    self.fallback()
                } else {
                    Ok(Some(encoded))
                }
            }
            None => self.fallback(),
        }
    }

    fn fallback(&self) -> Result<Option<String>, AppError> {
        match self.default {
            Some(default) => Ok(Some(default.encode())),
            None if self.required => Err(AppError::BadRequest(format!(
                "missing parameter {}",
                self.local
            ))),
            None => Ok(None),
        }
    }

    fn encode(&self, value: &Value) -> Result<String, AppError> {
        match self.kind {
            ParamKind::Text => Ok(encode_text(value)),
            ParamKind::Integer => encode_integer(value).ok_or_else(|| {
                AppError::BadRequest(format!("parameter {} must be an integer", self.local))
            }),
            ParamKind::Json => Ok(match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
        }
    }
}

fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty() || s == "null",
        _ => false,
    }
}

fn encode_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Numbers and numeric strings, truncated toward zero
fn encode_integer(value: &Value) -> Option<String> {
    let number = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    }?;
    Some(number.to_string())
}

/// Everything a local request carries that a mapping may read
#[derive(Debug, Clone, Default)]
pub struct RequestInput {
    pub path: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub body: Option<Map<String, Value>>,
}

impl RequestInput {
    /// Parse a JSON request body; empty bodies are treated as no body.
    pub fn with_body(mut self, raw: &[u8]) -> Result<Self, AppError> {
        if raw.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(self);
        }

        match serde_json::from_slice::<Value>(raw) {
            Ok(Value::Object(map)) => {
                self.body = Some(map);
                Ok(self)
            }
            Ok(_) => Err(AppError::BadRequest(
                "request body must be a JSON object".to_string(),
            )),
            Err(e) => Err(AppError::BadRequest(format!("invalid JSON body: {}", e))),
        }
    }
}

/// One local route and how it maps onto a vendor endpoint
#[derive(Debug)]
pub struct EndpointMapping {
    pub name: &'static str,
    pub path: &'static str,
    pub method: HttpMethod,
    pub group: ApiGroup,
    pub vendor: &'static str,
    pub params: &'static [ParamSpec],
}

impl EndpointMapping {
    /// Vendor form fields in table order, excluding the access token
    pub fn build_form(&self, input: &RequestInput) -> Result<Vec<(String, String)>, AppError> {
        let mut form = Vec::with_capacity(self.params.len());
        for param in self.params {
            if let Some(value) = param.resolve(input)? {
                form.push((param.vendor.to_string(), value));
            }
        }
        Ok(form)
    }
}
