// src/constants.rs

//! Fixed names and values.

/// The name of the project-level defaults file (inside the project location).
pub const DEFAULTS_FILENAME: &str = "aws-lambda-tools-defaults.json";

/// Prefix that marks a value as an already-canonical IAM ARN.
pub const IAM_ARN_PREFIX: &str = "arn:aws:iam::";

/// Region used by the identity client when no region can be resolved.
pub const FALLBACK_IDENTITY_REGION: &str = "us-east-1";

/// Product token placed in front of the crate version in the client user agent.
pub const USER_AGENT_PRODUCT: &str = "lambda-config";

/// Overrides the location of the shared credentials file.
pub const ENV_SHARED_CREDENTIALS_FILE: &str = "AWS_SHARED_CREDENTIALS_FILE";
