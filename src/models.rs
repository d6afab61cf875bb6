// src/models.rs

//! Plain data shared across the crate: option metadata, credentials and service kinds.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

// --- OPTION METADATA ---

/// The declared value type of a configurable option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionValueKind {
    /// A single string.
    String,
    /// A comma separated list of strings.
    CommaDelimitedList,
    /// `<key>=<value>` pairs.
    KeyValuePairs,
    /// A 32-bit integer.
    Int,
    /// `true` or `false`.
    Bool,
}

/// Post-processing applied to a resolved string value before it is handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueProcessor {
    /// The value is used exactly as resolved.
    Verbatim,
    /// The value names an IAM role; short names are expanded to the role ARN and
    /// missing values are chosen through the role selector instead of a plain prompt.
    RoleArn,
}

/// Static metadata for one configurable setting.
///
/// Descriptors are declared once as `static` items and shared read-only for the
/// lifetime of the process. The long `switch` is the unique key.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct OptionDescriptor {
    /// Long switch, e.g. `--function-name`.
    pub switch: &'static str,
    /// Optional short alias, e.g. `-fn`.
    pub short_switch: Option<&'static str>,
    /// Display name used in prompts.
    pub name: &'static str,
    /// One-line help text.
    pub description: &'static str,
    /// Declared value type.
    pub kind: OptionValueKind,
    /// Post-processing applied to resolved strings.
    pub processor: ValueProcessor,
}

impl OptionDescriptor {
    /// The key used for this option in the project defaults file (`--region` -> `region`).
    pub fn defaults_key(&self) -> &'static str {
        self.switch.trim_start_matches('-')
    }
}

/// An explicit value supplied for an option on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// A string value.
    String(String),
    /// An already split list.
    List(Vec<String>),
    /// Parsed key/value pairs.
    Map(HashMap<String, String>),
    /// An integer value.
    Int(i32),
    /// A boolean value.
    Bool(bool),
}

impl OptionValue {
    /// The string value, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The list value, if this is one.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    /// The map value, if this is one.
    pub fn as_map(&self) -> Option<&HashMap<String, String>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// The integer value, if this is one.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The boolean value, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

// --- CREDENTIALS ---

/// Key material for signing requests. The secret parts are never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessKeys {
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Session token for temporary credentials.
    pub session_token: Option<String>,
}

impl fmt::Debug for AccessKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKeys")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Where a set of credentials came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CredentialSource {
    /// Handed in by the embedding caller.
    Explicit,
    /// A profile named through `--profile` or the project defaults.
    Profile {
        /// The profile name.
        name: String,
    },
    /// The SDK default chain, used when no profile is named anywhere.
    DefaultChain,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit => write!(f, "explicit"),
            Self::Profile { name } => write!(f, "profile '{}'", name),
            Self::DefaultChain => write!(f, "default chain"),
        }
    }
}

/// An opaque credential handle, resolved once per command instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// How the credentials were found.
    pub source: CredentialSource,
    /// The key material.
    pub keys: AccessKeys,
}

impl Credentials {
    /// Credentials supplied directly by an embedding caller.
    pub fn explicit(keys: AccessKeys) -> Self {
        Self {
            source: CredentialSource::Explicit,
            keys,
        }
    }
}

// --- SERVICE CLIENTS ---

/// The services a command can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    /// The compute-function service.
    Function,
    /// The stack-orchestration service.
    Stack,
    /// The object-storage service.
    Storage,
    /// The identity service.
    Identity,
}

impl ServiceKind {
    /// The service name used in endpoints and messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Function => "lambda",
            Self::Stack => "cloudformation",
            Self::Storage => "s3",
            Self::Identity => "iam",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
