// src/test_support.rs

// Scripted collaborators shared by the unit tests.

use std::cell::Cell;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::rc::Rc;

use crate::command::{Collaborators, CommandContext};
use crate::core::clients::{ClientConfig, ClientConnector, ClientError, EndpointConnector, ServiceClient};
use crate::core::credentials::{
    AmbientCredentials, CredentialError, ProfileStore, StoredProfile, parse_profiles,
};
use crate::core::prompt::{LineReader, PromptError};
use crate::core::roles::{IdentityService, RoleError, RoleSelector, RoleSummary};
use crate::models::{AccessKeys, CredentialSource, Credentials};

pub(crate) type Counter = Rc<Cell<usize>>;

fn bump(counter: &Counter) {
    counter.set(counter.get() + 1);
}

pub(crate) fn keys(id: &str) -> AccessKeys {
    AccessKeys {
        access_key_id: id.to_string(),
        secret_access_key: format!("{}-secret", id),
        session_token: None,
    }
}

struct ScriptedReader {
    answers: VecDeque<String>,
    calls: Counter,
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, _prompt: &str) -> Result<String, PromptError> {
        bump(&self.calls);
        Ok(self.answers.pop_front().unwrap_or_default())
    }
}

struct StubIdentity {
    roles: HashMap<String, String>,
    lookups: Counter,
}

impl IdentityService for StubIdentity {
    fn role_arn(&self, _client: &ServiceClient, role_name: &str) -> Result<String, RoleError> {
        bump(&self.lookups);
        self.roles
            .get(role_name)
            .cloned()
            .ok_or_else(|| RoleError::NotFound {
                role: role_name.to_string(),
            })
    }

    fn list_roles(&self, _client: &ServiceClient) -> Result<Vec<RoleSummary>, RoleError> {
        Ok(self
            .roles
            .iter()
            .map(|(name, arn)| RoleSummary {
                name: name.clone(),
                arn: arn.clone(),
            })
            .collect())
    }

    fn create_role(&self, _client: &ServiceClient, role_name: &str) -> Result<String, RoleError> {
        Ok(format!("arn:aws:iam::123:role/{}", role_name))
    }
}

struct ScriptedRoleSelector {
    answer: Option<String>,
    calls: Counter,
}

impl RoleSelector for ScriptedRoleSelector {
    fn select_role(
        &mut self,
        identity: &dyn IdentityService,
        client: &ServiceClient,
    ) -> Result<Option<String>, RoleError> {
        bump(&self.calls);
        identity.list_roles(client)?;
        Ok(self.answer.clone())
    }
}

struct StubProfiles {
    profiles: HashMap<String, StoredProfile>,
}

impl ProfileStore for StubProfiles {
    fn find_profile(
        &self,
        name: &str,
        _location: Option<&Path>,
    ) -> Result<Option<StoredProfile>, CredentialError> {
        Ok(self.profiles.get(name).cloned())
    }
}

struct CountingAmbient {
    calls: Counter,
}

impl AmbientCredentials for CountingAmbient {
    fn resolve(&self) -> Result<Credentials, CredentialError> {
        bump(&self.calls);
        Ok(Credentials {
            source: CredentialSource::DefaultChain,
            keys: keys("AKIAAMBIENT"),
        })
    }
}

struct CountingConnector {
    builds: Counter,
}

impl ClientConnector for CountingConnector {
    fn connect(&self, config: ClientConfig) -> Result<ServiceClient, ClientError> {
        bump(&self.builds);
        EndpointConnector.connect(config)
    }
}

/// Call counters for every scripted collaborator.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub(crate) prompts: Counter,
    pub(crate) role_lookups: Counter,
    pub(crate) role_selections: Counter,
    pub(crate) ambient: Counter,
    pub(crate) builds: Counter,
}

/// Declarative setup for a `CommandContext` backed by scripted collaborators.
#[derive(Debug, Default)]
pub(crate) struct Fixture {
    pub(crate) answers: Vec<&'static str>,
    pub(crate) roles: Vec<(&'static str, &'static str)>,
    pub(crate) selected_role: Option<&'static str>,
    pub(crate) profiles: &'static str,
    pub(crate) without_identity: bool,
}

impl Fixture {
    pub(crate) fn build(self, working_directory: &Path) -> (CommandContext, Counters) {
        let counters = Counters::default();
        let identity: Option<Box<dyn IdentityService>> = (!self.without_identity).then(|| {
            Box::new(StubIdentity {
                roles: self
                    .roles
                    .iter()
                    .map(|(n, a)| (n.to_string(), a.to_string()))
                    .collect(),
                lookups: Rc::clone(&counters.role_lookups),
            }) as Box<dyn IdentityService>
        });
        let services = Collaborators {
            line_reader: Box::new(ScriptedReader {
                answers: self.answers.iter().map(|a| a.to_string()).collect(),
                calls: Rc::clone(&counters.prompts),
            }),
            role_selector: Box::new(ScriptedRoleSelector {
                answer: self.selected_role.map(str::to_string),
                calls: Rc::clone(&counters.role_selections),
            }),
            identity,
            profiles: Box::new(StubProfiles {
                profiles: parse_profiles(self.profiles),
            }),
            ambient: Box::new(CountingAmbient {
                calls: Rc::clone(&counters.ambient),
            }),
            connector: Box::new(CountingConnector {
                builds: Rc::clone(&counters.builds),
            }),
        };
        (CommandContext::new(working_directory, services), counters)
    }
}
