// src/core/credentials.rs

//! Named-profile and default-chain credential resolution.

use aws_config::default_provider::credentials::DefaultCredentialsChain;
use aws_credential_types::Credentials as SdkCredentials;
use aws_credential_types::provider::ProvideCredentials;
use aws_credential_types::provider::error::CredentialsError;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::ENV_SHARED_CREDENTIALS_FILE;
use crate::models::{AccessKeys, CredentialSource, Credentials};

lazy_static! {
    // The whole header is the profile name. `[profile x]` only means `x` in the config file.
    static ref SECTION_RE: Regex =
        Regex::new(r"^\[\s*([^\]]+?)\s*\]$").expect("valid section regex");
    static ref PROPERTY_RE: Regex =
        Regex::new(r"^([^=]+?)\s*=\s*(.*)$").expect("valid property regex");
}

/// Failures while resolving credentials.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// The named profile is not in the store.
    #[error("Profile {profile} cannot be found")]
    ProfileNotFound {
        /// The profile that was asked for.
        profile: String,
    },
    /// The profile exists but holds no static keys.
    #[error("Cannot create AWS credentials for profile {profile}")]
    CredentialsUnbuildable {
        /// The profile that was asked for.
        profile: String,
    },
    /// No provider in the default chain found credentials.
    #[error(
        "Unable to find credentials through the default chain. Set AWS_ACCESS_KEY_ID/AWS_SECRET_ACCESS_KEY or configure a profile."
    )]
    NoAmbientCredentials,
    /// A provider in the default chain failed.
    #[error("The default credential chain failed: {source}")]
    AmbientProvider {
        /// The provider error.
        #[source]
        source: CredentialsError,
    },
    /// The async runtime for the default chain could not start.
    #[error("Failed to start the credential runtime: {source}")]
    Runtime {
        /// The runtime error.
        #[source]
        source: std::io::Error,
    },
    /// The profile store could not be read.
    #[error("Failed to read profile store '{path}': {source}")]
    Io {
        /// The store that failed.
        path: String,
        /// The read error.
        #[source]
        source: std::io::Error,
    },
}

type CredentialResult<T> = Result<T, CredentialError>;

// --- Profile store ---

/// One named section of a profile store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredProfile {
    /// Section name.
    pub name: String,
    /// Lower-cased keys and their values.
    pub properties: HashMap<String, String>,
}

impl StoredProfile {
    /// The static keys held by the profile, if it carries both an access key id and
    /// a secret. Profiles that only reference other mechanisms (role assumption,
    /// SSO, external processes) cannot be materialized here.
    pub fn access_keys(&self) -> Option<AccessKeys> {
        let non_empty = |key: &str| {
            self.properties
                .get(key)
                .filter(|v| !v.is_empty())
                .cloned()
        };
        Some(AccessKeys {
            access_key_id: non_empty("aws_access_key_id")?,
            secret_access_key: non_empty("aws_secret_access_key")?,
            session_token: non_empty("aws_session_token"),
        })
    }
}

/// Looks up named profiles. `location` overrides where the store is read from.
pub trait ProfileStore {
    /// Returns the named profile, or `None` when the store lacks it.
    fn find_profile(&self, name: &str, location: Option<&Path>) -> CredentialResult<Option<StoredProfile>>;
}

/// The INI-style shared credentials file (`~/.aws/credentials` by default).
#[derive(Debug, Clone, Default)]
pub struct SharedCredentialsFile {
    default_path: Option<PathBuf>,
}

impl SharedCredentialsFile {
    /// Uses `AWS_SHARED_CREDENTIALS_FILE` when set, otherwise `~/.aws/credentials`.
    pub fn discover() -> Self {
        Self::discover_with(|key| std::env::var(key).ok())
    }

    fn discover_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default_path = lookup(ENV_SHARED_CREDENTIALS_FILE)
            .filter(|p| !p.is_empty())
            .map(|p| PathBuf::from(shellexpand::tilde(&p).into_owned()))
            .or_else(|| dirs::home_dir().map(|home| home.join(".aws").join("credentials")));
        Self { default_path }
    }

    /// A store that always reads the given file unless a location override is passed.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            default_path: Some(path.into()),
        }
    }
}

impl ProfileStore for SharedCredentialsFile {
    fn find_profile(&self, name: &str, location: Option<&Path>) -> CredentialResult<Option<StoredProfile>> {
        let Some(path) = location.or(self.default_path.as_deref()) else {
            return Ok(None);
        };
        if !path.is_file() {
            log::debug!("Profile store '{}' does not exist.", path.display());
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(|source| CredentialError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(parse_profiles(&content).remove(name))
    }
}

/// Parses INI content into profiles. Later sections with the same name are merged,
/// later keys overwrite earlier ones.
pub fn parse_profiles(content: &str) -> HashMap<String, StoredProfile> {
    let mut profiles: HashMap<String, StoredProfile> = HashMap::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(caps) = SECTION_RE.captures(line) {
            let (_, [name]) = caps.extract();
            let name = name.to_string();
            profiles
                .entry(name.clone())
                .or_insert_with(|| StoredProfile {
                    name: name.clone(),
                    properties: HashMap::new(),
                });
            current = Some(name);
            continue;
        }
        if let (Some(section), Some(caps)) = (&current, PROPERTY_RE.captures(line))
            && let Some(profile) = profiles.get_mut(section)
        {
            let (_, [key, value]) = caps.extract();
            profile
                .properties
                .insert(key.trim().to_lowercase(), value.trim().to_string());
        }
    }

    profiles
}

/// Materializes credentials for a named profile. No fallback happens once a profile
/// has been named: a missing or unusable profile is an error.
pub fn resolve_profile(
    store: &dyn ProfileStore,
    profile: &str,
    location: Option<&Path>,
) -> CredentialResult<Credentials> {
    let stored = store
        .find_profile(profile, location)?
        .ok_or_else(|| CredentialError::ProfileNotFound {
            profile: profile.to_string(),
        })?;
    let keys = stored
        .access_keys()
        .ok_or_else(|| CredentialError::CredentialsUnbuildable {
            profile: profile.to_string(),
        })?;
    Ok(Credentials {
        source: CredentialSource::Profile {
            name: profile.to_string(),
        },
        keys,
    })
}

// --- Ambient chain ---

/// Credential discovery used when no profile has been named anywhere.
pub trait AmbientCredentials {
    /// Finds credentials without a profile name.
    fn resolve(&self) -> CredentialResult<Credentials>;
}

/// The SDK default provider chain: environment variables, the shared config and
/// credentials files (`AWS_PROFILE` or `default`), web identity tokens, container
/// credentials, then instance metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultChain;

impl AmbientCredentials for DefaultChain {
    fn resolve(&self) -> CredentialResult<Credentials> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|source| CredentialError::Runtime { source })?;
        let loaded = runtime.block_on(async {
            let chain = DefaultCredentialsChain::builder().build().await;
            chain.provide_credentials().await
        });
        from_provider(loaded)
    }
}

/// Maps the outcome of an SDK credential provider into the crate's model.
fn from_provider(loaded: Result<SdkCredentials, CredentialsError>) -> CredentialResult<Credentials> {
    match loaded {
        Ok(credentials) => {
            log::debug!("Using credentials from the default chain.");
            Ok(Credentials {
                source: CredentialSource::DefaultChain,
                keys: AccessKeys {
                    access_key_id: credentials.access_key_id().to_string(),
                    secret_access_key: credentials.secret_access_key().to_string(),
                    session_token: credentials.session_token().map(str::to_string),
                },
            })
        }
        Err(CredentialsError::CredentialsNotLoaded(_)) => Err(CredentialError::NoAmbientCredentials),
        Err(source) => Err(CredentialError::AmbientProvider { source }),
    }
}
