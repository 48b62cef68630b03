//! Application settings bound from the process environment and an optional `.env` file.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;

use once_cell::sync::OnceCell;

use crate::error::{ConfigurationError, FieldError};

pub const DEFAULT_ENV_FILE: &str = ".env";

const DEFAULT_API_PREFIX: &str = "/api/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    String,
    Bool,
    OptionalString,
    OptionalList,
}

#[derive(Debug, Clone, Copy)]
enum FieldDefault {
    Required,
    Value(&'static str),
    Absent,
}

/// One entry of the settings schema. Keys are matched case-sensitively.
#[derive(Debug, Clone, Copy)]
struct FieldSpec {
    key: &'static str,
    kind: FieldKind,
    default: FieldDefault,
}

const SCHEMA: &[FieldSpec] = &[
    FieldSpec {
        key: "API_PREFIX",
        kind: FieldKind::String,
        default: FieldDefault::Value(DEFAULT_API_PREFIX),
    },
    FieldSpec {
        key: "DEBUG",
        kind: FieldKind::Bool,
        default: FieldDefault::Value("false"),
    },
    FieldSpec {
        key: "OPENAI_API_KEY",
        kind: FieldKind::String,
        default: FieldDefault::Required,
    },
    FieldSpec {
        key: "OPENAI_MODEL",
        kind: FieldKind::String,
        default: FieldDefault::Value(DEFAULT_OPENAI_MODEL),
    },
    FieldSpec {
        key: "DATABASE_URL",
        kind: FieldKind::OptionalString,
        default: FieldDefault::Absent,
    },
    FieldSpec {
        key: "CORS_ALLOW_ORIGINS",
        kind: FieldKind::OptionalList,
        default: FieldDefault::Absent,
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum BoundValue {
    String(String),
    Bool(bool),
    OptionalString(Option<String>),
    OptionalList(Option<Vec<String>>),
}

// Struct to hold our application settings
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_prefix: String,
    pub debug: bool,
    pub openai_api_key: String,
    pub openai_model: String,
    pub database_url: Option<String>,
    /// Origins allowed by the CORS layer. `None` keeps the permissive default.
    pub cors_allow_origins: Option<Vec<String>>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_prefix", &self.api_prefix)
            .field("debug", &self.debug)
            .field("openai_api_key", &"<redacted>")
            .field("openai_model", &self.openai_model)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("cors_allow_origins", &self.cors_allow_origins)
            .finish()
    }
}

impl Settings {
    /// Load settings from the process environment, falling back to `./.env`.
    pub fn load() -> Result<Self, ConfigurationError> {
        Self::from_sources(std::env::vars_os(), Some(Path::new(DEFAULT_ENV_FILE)))
    }

    /// Bind settings from an explicit set of variables and an optional env file.
    ///
    /// Variables in `vars` take precedence over entries in `env_file`. A
    /// missing env file is ignored; a malformed one is an error. Every field
    /// is checked before failing, so the error lists all offending keys.
    pub fn from_sources<I, K, V>(vars: I, env_file: Option<&Path>) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        let mut source: HashMap<OsString, OsString> = HashMap::new();

        if let Some(path) = env_file {
            for (key, value) in read_env_file(path)? {
                source.insert(key.into(), value.into());
            }
        }

        for (key, value) in vars {
            source.insert(key.into(), value.into());
        }

        let mut bound = HashMap::with_capacity(SCHEMA.len());
        let mut errors = Vec::new();

        for spec in SCHEMA {
            match bind_field(spec, source.get(&OsString::from(spec.key))) {
                Ok(value) => {
                    bound.insert(spec.key, value);
                }
                Err(err) => errors.push(err),
            }
        }

        if !errors.is_empty() {
            return Err(ConfigurationError::Invalid(errors));
        }

        Ok(Self {
            api_prefix: take(&mut bound, "API_PREFIX").into_string(),
            debug: take(&mut bound, "DEBUG").into_bool(),
            openai_api_key: take(&mut bound, "OPENAI_API_KEY").into_string(),
            openai_model: take(&mut bound, "OPENAI_MODEL").into_string(),
            database_url: take(&mut bound, "DATABASE_URL").into_optional_string(),
            cors_allow_origins: take(&mut bound, "CORS_ALLOW_ORIGINS").into_optional_list(),
        })
    }
}

static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Get the process-wide settings, loading them on first use.
///
/// Concurrent first callers block until one of them finishes loading. A
/// failed load is not cached; the next call reads the environment again.
pub fn get_settings() -> Result<&'static Settings, ConfigurationError> {
    SETTINGS.get_or_try_init(|| {
        let settings = Settings::load()?;
        tracing::debug!(?settings, "settings loaded");
        Ok(settings)
    })
}

fn read_env_file(path: &Path) -> Result<Vec<(String, String)>, ConfigurationError> {
    let to_error = |source: dotenvy::Error| ConfigurationError::EnvFile {
        path: path.to_path_buf(),
        source,
    };

    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(err) if err.not_found() => return Ok(Vec::new()),
        Err(err) => return Err(to_error(err)),
    };

    iter.collect::<Result<Vec<_>, _>>().map_err(to_error)
}

fn bind_field(spec: &FieldSpec, raw: Option<&OsString>) -> Result<BoundValue, FieldError> {
    let raw = match raw {
        Some(raw) => Some(
            raw.to_str()
                .ok_or_else(|| FieldError::not_unicode(spec.key))?
                .to_string(),
        ),
        None => None,
    };

    let value = match (raw, spec.default) {
        (Some(value), _) => value,
        (None, FieldDefault::Value(default)) => default.to_string(),
        (None, FieldDefault::Required) => return Err(FieldError::missing(spec.key)),
        (None, FieldDefault::Absent) => {
            return Ok(match spec.kind {
                FieldKind::OptionalList => BoundValue::OptionalList(None),
                _ => BoundValue::OptionalString(None),
            });
        }
    };

    match spec.kind {
        FieldKind::String => Ok(BoundValue::String(value)),
        FieldKind::Bool => parse_bool(&value)
            .map(BoundValue::Bool)
            .ok_or_else(|| FieldError::invalid(spec.key, value, "a boolean")),
        FieldKind::OptionalString => Ok(BoundValue::OptionalString(Some(value))),
        FieldKind::OptionalList => Ok(BoundValue::OptionalList(Some(split_list(&value)))),
    }
}

// Every schema key is bound before assembly, so a miss here is a schema bug.
fn take(bound: &mut HashMap<&'static str, BoundValue>, key: &str) -> BoundValue {
    match bound.remove(key) {
        Some(value) => value,
        None => unreachable!("{key} is not in the settings schema"),
    }
}

impl BoundValue {
    fn into_string(self) -> String {
        match self {
            BoundValue::String(value) => value,
            other => unreachable!("expected a string, schema bound {other:?}"),
        }
    }

    fn into_bool(self) -> bool {
        match self {
            BoundValue::Bool(value) => value,
            other => unreachable!("expected a bool, schema bound {other:?}"),
        }
    }

    fn into_optional_string(self) -> Option<String> {
        match self {
            BoundValue::OptionalString(value) => value,
            other => unreachable!("expected an optional string, schema bound {other:?}"),
        }
    }

    fn into_optional_list(self) -> Option<Vec<String>> {
        match self {
            BoundValue::OptionalList(value) => value,
            other => unreachable!("expected an optional list, schema bound {other:?}"),
        }
    }
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
