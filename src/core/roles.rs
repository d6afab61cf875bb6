// src/core/roles.rs

//! Role name expansion and interactive role selection.

use dialoguer::{Input, Select, theme::ColorfulTheme};
use thiserror::Error;

use crate::constants::IAM_ARN_PREFIX;
use crate::core::clients::ServiceClient;
use crate::core::prompt::{PromptError, map_dialoguer_error, normalize_answer};

const CREATE_NEW_ROLE_LABEL: &str = "*** Create new IAM Role ***";

/// Failures while expanding or choosing a role.
#[derive(Error, Debug)]
pub enum RoleError {
    /// The identity service has no role by that name.
    #[error("Role '{role}' cannot be found.")]
    NotFound {
        /// The name that was looked up.
        role: String,
    },
    /// The identity service call failed.
    #[error("Identity service error: {message}")]
    Service {
        /// What the service reported.
        message: String,
    },
    /// The role chooser failed.
    #[error(transparent)]
    Prompt(#[from] PromptError),
}

/// A role as listed by the identity service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSummary {
    /// Short role name.
    pub name: String,
    /// Full role ARN.
    pub arn: String,
}

/// The identity-service operations the configuration core depends on.
pub trait IdentityService {
    /// Looks up a role by its short name and returns its ARN.
    fn role_arn(&self, client: &ServiceClient, role_name: &str) -> Result<String, RoleError>;

    /// Lists roles that a function may assume.
    fn list_roles(&self, client: &ServiceClient) -> Result<Vec<RoleSummary>, RoleError>;

    /// Creates a role a function may assume and returns its ARN.
    fn create_role(&self, client: &ServiceClient, role_name: &str) -> Result<String, RoleError>;
}

/// Expands a short role name into its ARN. Values already in ARN form are returned
/// unchanged without calling the identity service.
pub fn expand_role_name(
    identity: &dyn IdentityService,
    client: &ServiceClient,
    value: &str,
) -> Result<String, RoleError> {
    if value.starts_with(IAM_ARN_PREFIX) {
        return Ok(value.to_string());
    }
    log::debug!("Expanding role name '{}' through {}.", value, client.kind());
    identity.role_arn(client, value)
}

/// Interactive helper that picks an existing role or creates a new one.
pub trait RoleSelector {
    /// Returns the chosen role ARN, or `None` when the user aborts.
    fn select_role(
        &mut self,
        identity: &dyn IdentityService,
        client: &ServiceClient,
    ) -> Result<Option<String>, RoleError>;
}

/// Offers the existing roles in a terminal menu, with an entry to create a new one.
#[derive(Debug, Default)]
pub struct ConsoleRoleSelector;

impl RoleSelector for ConsoleRoleSelector {
    fn select_role(
        &mut self,
        identity: &dyn IdentityService,
        client: &ServiceClient,
    ) -> Result<Option<String>, RoleError> {
        let roles = identity.list_roles(client)?;
        let mut items: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
        items.push(CREATE_NEW_ROLE_LABEL);

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Select IAM Role that Lambda will assume when executing the function")
            .items(&items)
            .default(0)
            .interact_opt()
            .map_err(map_dialoguer_error)?;

        match selection {
            None => Ok(None),
            Some(index) => match roles.get(index) {
                Some(role) => Ok(Some(role.arn.clone())),
                None => {
                    let name = Input::<String>::with_theme(&ColorfulTheme::default())
                        .with_prompt("Enter name of the new IAM Role")
                        .allow_empty(true)
                        .interact_text()
                        .map_err(map_dialoguer_error)?;
                    match normalize_answer(&name) {
                        Some(name) => identity.create_role(client, &name).map(Some),
                        None => Ok(None),
                    }
                }
            },
        }
    }
}
