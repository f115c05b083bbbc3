//! Classification of the `--source` and `--target` arguments.
//!
//! An argument that starts with an HTTP scheme is a remote console API and
//! must come with the credential for its side; anything else is treated as
//! a local snapshot directory. Classification happens before any network
//! or disk access so misconfiguration fails the run up front.

use std::fmt;
use std::path::PathBuf;

use mimeo_common::{Error, Result};

/// Which end of the copy an endpoint belongs to. Decides the environment
/// variable its API key is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl Side {
    pub fn key_var(&self) -> &'static str {
        match self {
            Side::Source => "SOURCE_API_KEY",
            Side::Target => "TARGET_API_KEY",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => f.write_str("source"),
            Side::Target => f.write_str("target"),
        }
    }
}

/// A resolved endpoint: either a console API or a snapshot directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Api { base_url: String, api_key: String },
    Dir(PathBuf),
}

impl Endpoint {
    pub fn is_remote(raw: &str) -> bool {
        raw.starts_with("http://") || raw.starts_with("https://")
    }

    /// Classify `raw` and attach the side's credential. A remote endpoint
    /// without a non-empty key is a configuration error.
    pub fn resolve(raw: &str, api_key: Option<&str>, side: Side) -> Result<Self> {
        if Self::is_remote(raw) {
            let key = api_key.map(str::trim).unwrap_or("");
            if key.is_empty() {
                return Err(Error::Config(format!(
                    "{} must be set when the {} is an API URL",
                    side.key_var(),
                    side
                )));
            }
            Ok(Endpoint::Api {
                base_url: raw.trim_end_matches('/').to_string(),
                api_key: key.to_string(),
            })
        } else {
            Ok(Endpoint::Dir(PathBuf::from(raw)))
        }
    }
}
