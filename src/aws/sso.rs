use anyhow::{Result, bail};
use tracing::info;

use super::sts::{self, CallerIdentity};
use crate::process::{CommandRunner, CommandSpec};

/// State of the SSO session behind a profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Active(CallerIdentity),
    Inactive { reason: String },
}

/// Run the interactive `aws sso login` browser flow for `profile`.
pub async fn login<R: CommandRunner>(runner: &R, aws_command: &str, profile: &str) -> Result<()> {
    info!("Starting AWS SSO login for profile: {}", profile);

    let spec = CommandSpec::from_command_line(aws_command)?
        .args(["sso", "login", "--profile", profile])
        .interactive();

    let output = runner.run(&spec).await?;
    if !output.success() {
        bail!(
            "AWS SSO login failed for profile '{}': {}",
            profile,
            output.failure_detail()
        );
    }

    info!("AWS SSO login completed for profile: {}", profile);
    Ok(())
}

/// Check whether `profile` currently has a usable SSO session.
///
/// A failed identity lookup is reported as [`SessionStatus::Inactive`];
/// only a failure to start the AWS CLI at all is an error.
pub async fn check_session<R: CommandRunner>(
    runner: &R,
    aws_command: &str,
    profile: &str,
) -> Result<SessionStatus> {
    let spec = sts::caller_identity_command(aws_command, profile)?;
    let output = runner.run(&spec).await?;

    if !output.success() {
        return Ok(SessionStatus::Inactive {
            reason: output.failure_detail(),
        });
    }

    match serde_json::from_str::<CallerIdentity>(&output.stdout) {
        Ok(identity) => Ok(SessionStatus::Active(identity)),
        Err(e) => Ok(SessionStatus::Inactive {
            reason: format!("unexpected response from `aws sts get-caller-identity`: {e}"),
        }),
    }
}
