// src/core/clients.rs

//! Region- and credential-scoped service clients.

use lazy_static::lazy_static;
use regex::Regex;
use std::rc::Rc;
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::USER_AGENT_PRODUCT;
use crate::models::{Credentials, ServiceKind};

lazy_static! {
    static ref REGION_RE: Regex =
        Regex::new(r"^[a-z]{2}(-[a-z]+)+-\d+$").expect("valid region regex");
}

static USER_AGENT: OnceLock<String> = OnceLock::new();

/// Failures while building a service client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The region name is not well formed.
    #[error("'{region}' is not a valid region name for the {service} client.")]
    InvalidRegion {
        /// The rejected region.
        region: String,
        /// The service the client was for.
        service: ServiceKind,
    },
    /// The connector could not build the client.
    #[error("Failed to construct the {service} client: {message}")]
    Construction {
        /// The service the client was for.
        service: ServiceKind,
        /// What went wrong.
        message: String,
    },
}

/// The user agent attached to every client, computed once per process.
pub fn user_agent() -> &'static str {
    USER_AGENT.get_or_init(|| {
        let agent = format!("{}/{}", USER_AGENT_PRODUCT, env!("CARGO_PKG_VERSION"));
        log::debug!("Client user agent set to '{}'.", agent);
        agent
    })
}

/// Everything needed to build a client for one service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// The service the client talks to.
    pub kind: ServiceKind,
    /// The resolved region.
    pub region: String,
    /// Credentials shared by every client of the command.
    pub credentials: Rc<Credentials>,
    /// The process-wide user agent.
    pub user_agent: &'static str,
}

/// A region- and credential-scoped handle to one service.
#[derive(Debug)]
pub struct ServiceClient {
    config: ClientConfig,
    endpoint: String,
}

impl ServiceClient {
    /// Wraps a configuration and the endpoint it connects to.
    pub fn new(config: ClientConfig, endpoint: impl Into<String>) -> Self {
        Self {
            config,
            endpoint: endpoint.into(),
        }
    }

    /// The service this client talks to.
    pub fn kind(&self) -> ServiceKind {
        self.config.kind
    }

    /// The region the client is scoped to.
    pub fn region(&self) -> &str {
        &self.config.region
    }

    /// The credentials the client signs with.
    pub fn credentials(&self) -> &Rc<Credentials> {
        &self.config.credentials
    }

    /// The user agent sent with every request.
    pub fn user_agent(&self) -> &'static str {
        self.config.user_agent
    }

    /// The service endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// The transport seam: turns a resolved configuration into a usable client.
pub trait ClientConnector {
    /// Builds a client from a resolved configuration.
    fn connect(&self, config: ClientConfig) -> Result<ServiceClient, ClientError>;
}

/// Validates the region name and credentials, then derives the public endpoint for the service.
#[derive(Debug, Default)]
pub struct EndpointConnector;

impl ClientConnector for EndpointConnector {
    fn connect(&self, config: ClientConfig) -> Result<ServiceClient, ClientError> {
        if !REGION_RE.is_match(&config.region) {
            return Err(ClientError::InvalidRegion {
                region: config.region,
                service: config.kind,
            });
        }
        if config.credentials.keys.access_key_id.is_empty() {
            return Err(ClientError::Construction {
                service: config.kind,
                message: format!("credentials from {} have no access key id", config.credentials.source),
            });
        }
        let endpoint = endpoint_for(config.kind, &config.region);
        log::debug!(
            "Constructed {} client for region '{}' ({}).",
            config.kind,
            config.region,
            endpoint
        );
        Ok(ServiceClient::new(config, endpoint))
    }
}

/// The public endpoint of a service in a region. The identity service is global
/// within a partition.
pub fn endpoint_for(kind: ServiceKind, region: &str) -> String {
    let domain = if region.starts_with("cn-") {
        "amazonaws.com.cn"
    } else {
        "amazonaws.com"
    };
    match kind {
        ServiceKind::Identity => format!("https://{}.{}", kind.name(), domain),
        _ => format!("https://{}.{}.{}", kind.name(), region, domain),
    }
}
