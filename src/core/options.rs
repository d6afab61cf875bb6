// src/core/options.rs

//! The static catalogue of options understood by deployment commands.

use crate::models::{OptionDescriptor, OptionValueKind, ValueProcessor};

macro_rules! option {
    ($ident:ident, $switch:expr, $short:expr, $name:expr, $desc:expr, $kind:ident) => {
        option!($ident, $switch, $short, $name, $desc, $kind, Verbatim);
    };
    ($ident:ident, $switch:expr, $short:expr, $name:expr, $desc:expr, $kind:ident, $proc:ident) => {
        #[doc = $desc]
        pub static $ident: OptionDescriptor = OptionDescriptor {
            switch: $switch,
            short_switch: $short,
            name: $name,
            description: $desc,
            kind: OptionValueKind::$kind,
            processor: ValueProcessor::$proc,
        };
    };
}

// --- Common options ---

option!(
    REGION,
    "--region",
    None,
    "AWS Region",
    "The region to connect to AWS services, if not set region will be detected from the environment",
    String
);
option!(
    PROFILE,
    "--profile",
    None,
    "AWS Profile",
    "Profile to use to look up AWS credentials, if not set environment credentials will be used",
    String
);
option!(
    PROFILE_LOCATION,
    "--profile-location",
    None,
    "AWS Profile Location",
    "Optional override to the search location for profiles, points at a shared credentials file",
    String
);
option!(
    PROJECT_LOCATION,
    "--project-location",
    Some("-pl"),
    "Project Location",
    "The location of the project, if not set the current directory will be assumed",
    String
);

// --- Function options ---

option!(
    FUNCTION_NAME,
    "--function-name",
    Some("-fn"),
    "Function Name",
    "AWS Lambda function name",
    String
);
option!(
    FUNCTION_DESCRIPTION,
    "--function-description",
    Some("-fd"),
    "Function Description",
    "AWS Lambda function description",
    String
);
option!(
    FUNCTION_HANDLER,
    "--function-handler",
    Some("-fh"),
    "Handler",
    "Handler for the function <assembly>::<type>::<method>",
    String
);
option!(
    FUNCTION_RUNTIME,
    "--function-runtime",
    Some("-frun"),
    "Runtime",
    "The runtime environment for the Lambda function",
    String
);
option!(
    FUNCTION_ROLE,
    "--function-role",
    Some("-frole"),
    "Function Role",
    "The IAM role that Lambda assumes when it executes your function",
    String,
    RoleArn
);
option!(
    FUNCTION_MEMORY_SIZE,
    "--function-memory-size",
    Some("-fms"),
    "Memory Size",
    "The amount of memory, in MB, your Lambda function is given",
    Int
);
option!(
    FUNCTION_TIMEOUT,
    "--function-timeout",
    Some("-ft"),
    "Timeout",
    "The function execution timeout in seconds",
    Int
);
option!(
    FUNCTION_PUBLISH,
    "--function-publish",
    Some("-fp"),
    "Publish",
    "Publish a new version as an atomic operation",
    Bool
);
option!(
    FUNCTION_SUBNETS,
    "--function-subnets",
    Some("-fsub"),
    "Subnets",
    "Comma delimited list of subnet ids if your function references resources in a VPC",
    CommaDelimitedList
);
option!(
    FUNCTION_SECURITY_GROUPS,
    "--function-security-groups",
    Some("-fsec"),
    "Security Groups",
    "Comma delimited list of security group ids if your function references resources in a VPC",
    CommaDelimitedList
);
option!(
    ENVIRONMENT_VARIABLES,
    "--environment-variables",
    Some("-ev"),
    "Environment Variables",
    "Environment variables set for the function. Format is <key1>=<value1>;<key2>=<value2>",
    KeyValuePairs
);
option!(
    KMS_KEY_ARN,
    "--kms-key",
    Some("-kk"),
    "KMS Key ARN",
    "KMS Key ARN of a customer key used to encrypt the function's environment variables",
    String
);

// --- Packaging and deployment options ---

option!(
    CONFIGURATION,
    "--configuration",
    Some("-c"),
    "Build Configuration",
    "Configuration to build with, for example Release or Debug",
    String
);
option!(
    FRAMEWORK,
    "--framework",
    Some("-f"),
    "Framework",
    "Target framework to compile, for example netcoreapp1.0",
    String
);
option!(
    S3_BUCKET,
    "--s3-bucket",
    Some("-sb"),
    "S3 Bucket",
    "S3 bucket to upload the build output",
    String
);
option!(
    S3_PREFIX,
    "--s3-prefix",
    Some("-sp"),
    "S3 Key Prefix",
    "S3 prefix for the build output",
    String
);
option!(
    STACK_NAME,
    "--stack-name",
    Some("-sn"),
    "CloudFormation Stack Name",
    "CloudFormation stack name for an AWS Serverless application",
    String
);
option!(
    CLOUDFORMATION_TEMPLATE,
    "--template",
    Some("-t"),
    "CloudFormation Template",
    "Path to the CloudFormation template",
    String
);
option!(
    TEMPLATE_PARAMETERS,
    "--template-parameters",
    Some("-tp"),
    "CloudFormation Template Parameters",
    "CloudFormation template parameters. Format is <key1>=<value1>;<key2>=<value2>",
    KeyValuePairs
);
option!(
    DISABLE_INTERACTIVE,
    "--disable-interactive",
    None,
    "Disable Interactive",
    "When set to true missing required parameters will not be prompted for",
    Bool
);

/// Options accepted by every command.
pub static COMMON_OPTIONS: &[&OptionDescriptor] =
    &[&REGION, &PROFILE, &PROFILE_LOCATION, &PROJECT_LOCATION];

/// Every option in the catalogue, used for switch lookups.
pub static ALL_OPTIONS: &[&OptionDescriptor] = &[
    &REGION,
    &PROFILE,
    &PROFILE_LOCATION,
    &PROJECT_LOCATION,
    &FUNCTION_NAME,
    &FUNCTION_DESCRIPTION,
    &FUNCTION_HANDLER,
    &FUNCTION_RUNTIME,
    &FUNCTION_ROLE,
    &FUNCTION_MEMORY_SIZE,
    &FUNCTION_TIMEOUT,
    &FUNCTION_PUBLISH,
    &FUNCTION_SUBNETS,
    &FUNCTION_SECURITY_GROUPS,
    &ENVIRONMENT_VARIABLES,
    &KMS_KEY_ARN,
    &CONFIGURATION,
    &FRAMEWORK,
    &S3_BUCKET,
    &S3_PREFIX,
    &STACK_NAME,
    &CLOUDFORMATION_TEMPLATE,
    &TEMPLATE_PARAMETERS,
    &DISABLE_INTERACTIVE,
];

/// Combines the common options with a command's own options, common ones first.
pub fn build_line_options(
    specific: &[&'static OptionDescriptor],
) -> Vec<&'static OptionDescriptor> {
    let mut options = Vec::with_capacity(COMMON_OPTIONS.len() + specific.len());
    options.extend_from_slice(COMMON_OPTIONS);
    for &option in specific {
        if !options.iter().any(|o| o.switch == option.switch) {
            options.push(option);
        }
    }
    options
}

/// Finds a descriptor by its long or short switch.
pub fn find_option(switch: &str) -> Option<&'static OptionDescriptor> {
    ALL_OPTIONS
        .iter()
        .copied()
        .find(|o| o.switch == switch || o.short_switch == Some(switch))
}
