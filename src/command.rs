// src/command.rs

//! The per-command owner of every lazily resolved piece of configuration.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::core::arg_parser::{self, ArgParseError, ParsedOptions};
use crate::core::clients::{
    ClientConfig, ClientConnector, EndpointConnector, ServiceClient, user_agent,
};
use crate::core::commons::non_empty;
use crate::core::credentials::{
    AmbientCredentials, DefaultChain, ProfileStore, SharedCredentialsFile, resolve_profile,
};
use crate::core::defaults::{ResolvedDefaults, resolve_location};
use crate::core::options::{PROFILE, PROFILE_LOCATION, PROJECT_LOCATION, REGION};
use crate::core::prompt::{ConsoleLineReader, LineReader, PromptCache};
use crate::core::resolver::{ResolutionError, ResolutionResult};
use crate::core::roles::{ConsoleRoleSelector, IdentityService, RoleSelector};
use crate::constants::FALLBACK_IDENTITY_REGION;
use crate::models::{Credentials, OptionDescriptor, ServiceKind};

/// A deployment command. `Ok(false)` and `Err(_)` both map to a failing exit code.
pub trait Command {
    /// Runs the command. `Ok(true)` is success.
    fn execute(&mut self) -> anyhow::Result<bool>;
}

/// The common settings every command accepts. Explicit values only; resolution
/// against defaults and prompts happens on access.
#[derive(Debug, Clone, Default)]
pub struct CommandSettings {
    /// `--region`.
    pub region: Option<String>,
    /// `--profile`.
    pub profile: Option<String>,
    /// `--profile-location`.
    pub profile_location: Option<String>,
    /// `--project-location`.
    pub project_location: Option<String>,
    /// Credentials handed in by an embedding caller. They win over everything else.
    pub credentials: Option<Rc<Credentials>>,
}

/// The external collaborators a command talks to.
pub struct Collaborators {
    /// Reads prompted answers.
    pub line_reader: Box<dyn LineReader>,
    /// Chooses a role when none is configured.
    pub role_selector: Box<dyn RoleSelector>,
    /// Looks up and lists roles. Optional.
    pub identity: Option<Box<dyn IdentityService>>,
    /// Store for named profiles.
    pub profiles: Box<dyn ProfileStore>,
    /// Credentials used when no profile is named.
    pub ambient: Box<dyn AmbientCredentials>,
    /// Builds service clients.
    pub connector: Box<dyn ClientConnector>,
}

impl Collaborators {
    /// Terminal prompts, the shared credentials file, the SDK default credential chain
    /// and the endpoint connector. No identity service is attached.
    pub fn console() -> Self {
        Self {
            line_reader: Box::new(ConsoleLineReader),
            role_selector: Box::new(ConsoleRoleSelector),
            identity: None,
            profiles: Box::new(SharedCredentialsFile::discover()),
            ambient: Box::new(DefaultChain),
            connector: Box::new(EndpointConnector),
        }
    }

    /// Attaches the identity service used for role expansion and role selection.
    pub fn with_identity(mut self, identity: Box<dyn IdentityService>) -> Self {
        self.identity = Some(identity);
        self
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("identity", &self.identity.is_some())
            .finish_non_exhaustive()
    }
}

/// State owned by one command instance.
///
/// Defaults, credentials and clients are filled on first access and then kept for
/// the lifetime of the instance, even if `settings` change afterwards. Nothing here
/// is shared between command instances.
#[derive(Debug)]
pub struct CommandContext {
    /// Explicit values for the common options.
    pub settings: CommandSettings,
    /// Prompts are only attempted when this is set. Off by default so embedders
    /// never block on console input.
    pub enable_interactive: bool,
    working_directory: PathBuf,
    pub(crate) services: Collaborators,
    pub(crate) defaults: Option<ResolvedDefaults>,
    pub(crate) prompts: PromptCache,
    credentials: Option<Rc<Credentials>>,
    clients: HashMap<ServiceKind, Rc<ServiceClient>>,
}

impl CommandContext {
    /// A context with no explicit settings and prompting disabled.
    pub fn new(working_directory: impl Into<PathBuf>, services: Collaborators) -> Self {
        Self {
            settings: CommandSettings::default(),
            enable_interactive: false,
            working_directory: working_directory.into(),
            services,
            defaults: None,
            prompts: PromptCache::new(),
            credentials: None,
            clients: HashMap::new(),
        }
    }

    /// Tokenizes `args` against the declared options and fills the common settings.
    /// The parsed values are returned for the command's own options.
    pub fn from_args(
        working_directory: impl Into<PathBuf>,
        services: Collaborators,
        options: &[&'static OptionDescriptor],
        args: &[String],
    ) -> Result<(Self, ParsedOptions), ArgParseError> {
        let parsed = arg_parser::parse_arguments(options, args)?;
        let mut context = Self::new(working_directory, services);
        let explicit = |option: &OptionDescriptor| parsed.find_string(option).map(str::to_string);
        context.settings.region = explicit(&REGION);
        context.settings.profile = explicit(&PROFILE);
        context.settings.profile_location = explicit(&PROFILE_LOCATION);
        context.settings.project_location = explicit(&PROJECT_LOCATION);
        Ok((context, parsed))
    }

    /// Directory relative locations are resolved against.
    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    /// Answers given so far.
    pub fn prompt_cache(&self) -> &PromptCache {
        &self.prompts
    }

    /// True once the defaults file has been read.
    pub fn defaults_loaded(&self) -> bool {
        self.defaults.is_some()
    }

    // --- Credentials ---

    /// Resolves credentials once: explicit, then a named profile, then the ambient
    /// chain. Later calls return the same handle.
    pub fn credentials(&mut self) -> ResolutionResult<Rc<Credentials>> {
        if let Some(credentials) = &self.credentials {
            return Ok(Rc::clone(credentials));
        }

        let resolved = match &self.settings.credentials {
            Some(explicit) => {
                log::debug!("Using credentials supplied by the caller.");
                Rc::clone(explicit)
            }
            None => Rc::new(self.resolve_stored_credentials()?),
        };
        log::debug!("Credentials resolved from {}.", resolved.source);
        self.credentials = Some(Rc::clone(&resolved));
        Ok(resolved)
    }

    fn resolve_stored_credentials(&mut self) -> ResolutionResult<Credentials> {
        let Some(profile) = self.explicit_or_default(|s| &s.profile, &PROFILE)? else {
            log::debug!("No profile configured. Falling back to ambient credentials.");
            return Ok(self.services.ambient.resolve()?);
        };
        let location = self
            .explicit_or_default(|s| &s.profile_location, &PROFILE_LOCATION)?
            .map(|l| resolve_location(self.working_directory(), &l));

        Ok(resolve_profile(
            self.services.profiles.as_ref(),
            &profile,
            location.as_deref(),
        )?)
    }

    /// An explicit setting, else its non-empty string default. Never prompts.
    fn explicit_or_default(
        &mut self,
        setting: impl Fn(&CommandSettings) -> &Option<String>,
        option: &OptionDescriptor,
    ) -> ResolutionResult<Option<String>> {
        if let Some(value) = non_empty(setting(&self.settings).as_deref()) {
            return Ok(Some(value.to_string()));
        }
        Ok(self.defaults()?.get_string(option).map(str::to_string))
    }

    // --- Service clients ---

    /// Returns the client for a service, building it on first use.
    pub fn client(&mut self, kind: ServiceKind) -> ResolutionResult<Rc<ServiceClient>> {
        if let Some(client) = self.clients.get(&kind) {
            return Ok(Rc::clone(client));
        }

        let explicit_region = self.settings.region.clone();
        let region = match self.string_value_or_default(explicit_region.as_deref(), &REGION, true)? {
            Some(region) => region,
            None if kind == ServiceKind::Identity => FALLBACK_IDENTITY_REGION.to_string(),
            None => return Err(ResolutionError::UnresolvedRegion { service: kind }),
        };

        let config = ClientConfig {
            kind,
            region,
            credentials: self.credentials()?,
            user_agent: user_agent(),
        };
        let client = Rc::new(self.services.connector.connect(config)?);
        self.clients.insert(kind, Rc::clone(&client));
        Ok(client)
    }

    /// The function service client.
    pub fn function_client(&mut self) -> ResolutionResult<Rc<ServiceClient>> {
        self.client(ServiceKind::Function)
    }

    /// The stack service client.
    pub fn stack_client(&mut self) -> ResolutionResult<Rc<ServiceClient>> {
        self.client(ServiceKind::Stack)
    }

    /// The storage service client.
    pub fn storage_client(&mut self) -> ResolutionResult<Rc<ServiceClient>> {
        self.client(ServiceKind::Storage)
    }

    /// The identity service client. Falls back to a fixed region.
    pub fn identity_client(&mut self) -> ResolutionResult<Rc<ServiceClient>> {
        self.client(ServiceKind::Identity)
    }

    /// Installs a pre-built client, e.g. one configured by a host application.
    /// It replaces any client of the same kind.
    pub fn set_client(&mut self, client: ServiceClient) {
        self.clients.insert(client.kind(), Rc::new(client));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULTS_FILENAME;
    use crate::core::credentials::CredentialError;
    use crate::core::options::{FUNCTION_NAME, build_line_options};
    use crate::models::CredentialSource;
    use crate::test_support::{Fixture, keys};
    use std::fs;
    use tempfile::TempDir;

    const PROFILES: &str = "
[deploy]
aws_access_key_id = AKIADEPLOY
aws_secret_access_key = secret

[sso-only]
sso_start_url = https://example.awsapps.com/start
";

    fn project(defaults: Option<&str>) -> TempDir {
        let dir = TempDir::new().unwrap();
        if let Some(content) = defaults {
            fs::write(dir.path().join(DEFAULTS_FILENAME), content).unwrap();
        }
        dir
    }

    // --- Credentials ---

    #[test]
    fn test_explicit_credentials_win_over_profile_and_ambient() {
        let dir = project(Some(r#"{ "profile": "deploy" }"#));
        let (mut ctx, counters) = Fixture {
            profiles: PROFILES,
            ..Default::default()
        }
        .build(dir.path());
        let explicit = Rc::new(Credentials::explicit(keys("AKIAEXPLICIT")));
        ctx.settings.credentials = Some(Rc::clone(&explicit));
        ctx.settings.profile = Some("deploy".to_string());

        let resolved = ctx.credentials().unwrap();
        assert!(Rc::ptr_eq(&resolved, &explicit));
        assert_eq!(counters.ambient.get(), 0);
    }

    #[test]
    fn test_unknown_profile_fails_without_ambient_fallback() {
        let dir = project(None);
        let (mut ctx, counters) = Fixture {
            profiles: PROFILES,
            ..Default::default()
        }
        .build(dir.path());
        ctx.settings.profile = Some("missing".to_string());

        let err = ctx.credentials().unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::Credentials(CredentialError::ProfileNotFound { ref profile }) if profile == "missing"
        ));
        assert_eq!(counters.ambient.get(), 0);
    }

    #[test]
    fn test_profile_without_keys_is_unbuildable() {
        let dir = project(None);
        let (mut ctx, counters) = Fixture {
            profiles: PROFILES,
            ..Default::default()
        }
        .build(dir.path());
        ctx.settings.profile = Some("sso-only".to_string());

        assert!(matches!(
            ctx.credentials(),
            Err(ResolutionError::Credentials(CredentialError::CredentialsUnbuildable { .. }))
        ));
        assert_eq!(counters.ambient.get(), 0);
    }

    #[test]
    fn test_profile_from_defaults() {
        let dir = project(Some(r#"{ "profile": "deploy" }"#));
        let (mut ctx, _) = Fixture {
            profiles: PROFILES,
            ..Default::default()
        }
        .build(dir.path());

        let credentials = ctx.credentials().unwrap();
        assert_eq!(
            credentials.source,
            CredentialSource::Profile {
                name: "deploy".to_string()
            }
        );
        assert_eq!(credentials.keys.access_key_id, "AKIADEPLOY");
    }

    #[test]
    fn test_profile_location_reaches_the_store() {
        let dir = project(None);
        let store = dir.path().join("creds");
        fs::write(&store, PROFILES).unwrap();

        let mut services = Fixture::default().build(dir.path()).0.services;
        services.profiles = Box::new(SharedCredentialsFile::at(dir.path().join("absent")));
        let mut ctx = CommandContext::new(dir.path(), services);
        ctx.settings.profile = Some("deploy".to_string());
        ctx.settings.profile_location = Some(store.display().to_string());

        assert_eq!(ctx.credentials().unwrap().keys.access_key_id, "AKIADEPLOY");
    }

    #[test]
    fn test_relative_profile_location_from_defaults_uses_working_directory() {
        let dir = project(Some(r#"{ "profile": "deploy", "profile-location": "creds" }"#));
        fs::write(dir.path().join("creds"), PROFILES).unwrap();

        let mut services = Fixture::default().build(dir.path()).0.services;
        services.profiles = Box::new(SharedCredentialsFile::at(dir.path().join("absent")));
        let mut ctx = CommandContext::new(dir.path(), services);

        let credentials = ctx.credentials().unwrap();
        assert_eq!(credentials.keys.access_key_id, "AKIADEPLOY");
    }

    #[test]
    fn test_credentials_are_resolved_once() {
        let dir = project(None);
        let (mut ctx, counters) = Fixture {
            profiles: PROFILES,
            ..Default::default()
        }
        .build(dir.path());

        let first = ctx.credentials().unwrap();
        assert_eq!(first.source, CredentialSource::DefaultChain);

        // Later changes to the settings do not re-resolve.
        ctx.settings.profile = Some("deploy".to_string());
        let second = ctx.credentials().unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(counters.ambient.get(), 1);
    }

    // --- Clients ---

    #[test]
    fn test_clients_are_memoized() {
        let dir = project(None);
        let (mut ctx, counters) = Fixture::default().build(dir.path());
        ctx.settings.region = Some("us-west-2".to_string());

        let first = ctx.function_client().unwrap();
        let second = ctx.function_client().unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(counters.builds.get(), 1);

        // Region changes after the first build are ignored.
        ctx.settings.region = Some("eu-west-1".to_string());
        assert_eq!(ctx.function_client().unwrap().region(), "us-west-2");

        let storage = ctx.storage_client().unwrap();
        assert_eq!(counters.builds.get(), 2);
        assert!(Rc::ptr_eq(storage.credentials(), first.credentials()));
        assert_eq!(counters.ambient.get(), 1);
    }

    #[test]
    fn test_region_from_defaults() {
        let dir = project(Some(r#"{ "region": "ca-central-1" }"#));
        let (mut ctx, _) = Fixture::default().build(dir.path());

        let client = ctx.stack_client().unwrap();
        assert_eq!(client.region(), "ca-central-1");
        assert_eq!(client.user_agent(), user_agent());
    }

    #[test]
    fn test_unresolved_region_fails_except_for_identity() {
        let dir = project(None);
        let (mut ctx, counters) = Fixture::default().build(dir.path());

        for kind in [ServiceKind::Function, ServiceKind::Stack, ServiceKind::Storage] {
            assert!(matches!(
                ctx.client(kind),
                Err(ResolutionError::UnresolvedRegion { service }) if service == kind
            ));
        }
        assert_eq!(counters.builds.get(), 0);
        // No credentials are looked up for a client that cannot be built.
        assert_eq!(counters.ambient.get(), 0);

        assert_eq!(
            ctx.identity_client().unwrap().region(),
            FALLBACK_IDENTITY_REGION
        );
    }

    #[test]
    fn test_invalid_region_surfaces_client_error() {
        let dir = project(None);
        let (mut ctx, _) = Fixture::default().build(dir.path());
        ctx.settings.region = Some("moon-base".to_string());

        assert!(matches!(
            ctx.function_client(),
            Err(ResolutionError::Client(_))
        ));
    }

    #[test]
    fn test_injected_client_is_used() {
        let dir = project(None);
        let (mut ctx, counters) = Fixture::default().build(dir.path());
        let config = ClientConfig {
            kind: ServiceKind::Function,
            region: "sa-east-1".to_string(),
            credentials: Rc::new(Credentials::explicit(keys("AKIAHOST"))),
            user_agent: user_agent(),
        };
        ctx.set_client(ServiceClient::new(config, "https://host.example"));

        let client = ctx.function_client().unwrap();
        assert_eq!(client.endpoint(), "https://host.example");
        assert_eq!(counters.builds.get(), 0);
        assert_eq!(counters.ambient.get(), 0);
    }

    // --- Construction ---

    #[test]
    fn test_from_args_fills_common_settings() {
        let dir = project(None);
        let services = Fixture::default().build(dir.path()).0.services;
        let args: Vec<String> = [
            "--region",
            "us-east-2",
            "--profile",
            "deploy",
            "-pl",
            "src/app",
            "-fn",
            "orders",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let (ctx, parsed) = CommandContext::from_args(
            dir.path(),
            services,
            &build_line_options(&[&FUNCTION_NAME]),
            &args,
        )
        .unwrap();
        assert_eq!(ctx.settings.region.as_deref(), Some("us-east-2"));
        assert_eq!(ctx.settings.profile.as_deref(), Some("deploy"));
        assert_eq!(ctx.settings.project_location.as_deref(), Some("src/app"));
        assert_eq!(ctx.settings.profile_location, None);
        assert_eq!(parsed.find_string(&FUNCTION_NAME), Some("orders"));
        assert!(!ctx.enable_interactive);
        assert!(!ctx.defaults_loaded());
    }
}
