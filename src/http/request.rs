use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde_json::Value;

use super::config::ClientConfig;
use super::envelope::ErrorEnvelope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// Whether the call's data travels in the query string rather than the body.
    ///
    /// Only GET does; DELETE sends its data as a body like POST and PUT.
    pub fn sends_data_as_query(&self) -> bool {
        matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            _ => anyhow::bail!(
                "Unsupported method: {}. Expected GET, POST, PUT, or DELETE.",
                s
            ),
        }
    }
}

/// Per-call overrides merged over the client's defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestConfig {
    pub headers: BTreeMap<String, String>,
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A fully merged request, ready for the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Absolute URL after resolving the call path against the base address.
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub headers: BTreeMap<String, String>,
    pub timeout: Duration,
}

impl RequestDescriptor {
    /// Merges defaults and overrides and places `data` by verb.
    ///
    /// Header names are matched case-insensitively, so an override replaces
    /// the default it shadows instead of sending both.
    pub fn build(
        defaults: &ClientConfig,
        method: Method,
        path: &str,
        data: Option<Value>,
        overrides: Option<&RequestConfig>,
    ) -> Result<Self, ErrorEnvelope> {
        let mut headers = defaults.default_headers.clone();
        let mut timeout = defaults.timeout;

        if let Some(overrides) = overrides {
            for (name, value) in &overrides.headers {
                headers.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
                headers.insert(name.clone(), value.clone());
            }
            if let Some(t) = overrides.timeout {
                timeout = t;
            }
        }

        let (query, body) = if method.sends_data_as_query() {
            let query = match data {
                Some(data) => query_pairs(&data)?,
                None => Vec::new(),
            };
            (query, None)
        } else {
            (Vec::new(), data)
        };

        Ok(Self {
            method,
            url: defaults.resolve_url(path),
            query,
            body,
            headers,
            timeout,
        })
    }
}

/// Flattens a JSON object into query pairs.
///
/// Nulls are skipped and arrays repeat their key.
pub fn query_pairs(data: &Value) -> Result<Vec<(String, String)>, ErrorEnvelope> {
    let map = match data {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map,
        other => {
            return Err(ErrorEnvelope::invalid_request(format!(
                "Query parameters must be an object, got {}",
                other
            )));
        }
    };

    let mut pairs = Vec::new();
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items.iter().filter(|i| !i.is_null()) {
                    pairs.push((key.clone(), scalar_text(item)));
                }
            }
            other => pairs.push((key.clone(), scalar_text(other))),
        }
    }
    Ok(pairs)
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
