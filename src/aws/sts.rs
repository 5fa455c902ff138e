use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::{debug, info};

use super::{AccountId, Credentials, RoleArn};
use crate::process::{CommandRunner, CommandSpec};

/// Response of `aws sts get-caller-identity`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallerIdentity {
    pub account: AccountId,
    pub arn: String,
    pub user_id: String,
}

/// Response of `aws sts assume-role`; only the credentials are kept
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AssumeRoleResponse {
    credentials: Credentials,
}

/// Session name recorded in CloudTrail for an assumption made for `env`
pub fn session_name(env: &str) -> String {
    format!("{env}-session")
}

/// `aws sts get-caller-identity --profile <profile>`
pub fn caller_identity_command(aws_command: &str, profile: &str) -> Result<CommandSpec> {
    Ok(CommandSpec::from_command_line(aws_command)?
        .args(["sts", "get-caller-identity", "--profile", profile])
        .args(["--output", "json"]))
}

/// Look up the identity behind `profile`.
///
/// Fails without side effects when the CLI exits non-zero, e.g. because the
/// SSO session expired.
pub async fn get_caller_identity<R: CommandRunner>(
    runner: &R,
    aws_command: &str,
    profile: &str,
) -> Result<CallerIdentity> {
    info!("Getting AWS caller identity using profile: {}", profile);

    let spec = caller_identity_command(aws_command, profile)?;
    let output = runner.run(&spec).await?;
    if !output.success() {
        bail!(
            "Failed to get AWS account ID for profile '{}': {}",
            profile,
            output.failure_detail()
        );
    }

    let identity: CallerIdentity = serde_json::from_str(&output.stdout)
        .context("Unexpected response from `aws sts get-caller-identity`")?;
    debug!("Account: {}", identity.account);
    debug!("Caller ARN: {}", identity.arn);
    Ok(identity)
}

/// Request temporary credentials for `role_arn` using `profile` as the
/// source identity.
pub async fn assume_role<R: CommandRunner>(
    runner: &R,
    aws_command: &str,
    profile: &str,
    role_arn: &RoleArn,
    session_name: &str,
) -> Result<Credentials> {
    info!("Calling AWS STS AssumeRole for {}", role_arn);
    debug!("Profile: {}", profile);
    debug!("Session name: {}", session_name);

    let spec = CommandSpec::from_command_line(aws_command)?
        .args(["sts", "assume-role", "--role-arn", role_arn.as_str()])
        .args(["--role-session-name", session_name])
        .args(["--profile", profile, "--output", "json"]);

    let output = runner.run(&spec).await?;
    if !output.success() {
        bail!(
            "Failed to assume role {}: {}",
            role_arn,
            output.failure_detail()
        );
    }

    let response: AssumeRoleResponse = serde_json::from_str(&output.stdout)
        .context("Unexpected response from `aws sts assume-role`")?;

    info!("Successfully obtained AWS credentials");
    Ok(response.credentials)
}
