//! CDK CLI driver.
//!
//! Runs `cdk bootstrap`, `cdk deploy` and `cdk destroy` inside the CDK app
//! directory. Success is decided by the exit code alone; output goes straight
//! to the terminal.

use anyhow::{Result, bail};
use std::{fmt, path::Path};
use tracing::{debug, info};

use crate::constants::{AWS_PROFILE_VAR, CDK_ENV_VAR};
use crate::process::{CommandRunner, CommandSpec};

/// CDK subcommands this tool drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CdkAction {
    Bootstrap,
    Deploy,
    Destroy,
}

impl CdkAction {
    pub fn subcommand(self) -> &'static str {
        match self {
            Self::Bootstrap => "bootstrap",
            Self::Deploy => "deploy",
            Self::Destroy => "destroy",
        }
    }

    /// Flags that stop the CDK from prompting for confirmation
    fn non_interactive_flags(self) -> &'static [&'static str] {
        match self {
            Self::Bootstrap => &[],
            Self::Deploy => &["--require-approval", "never"],
            Self::Destroy => &["--force"],
        }
    }

    fn takes_stack(self) -> bool {
        !matches!(self, Self::Bootstrap)
    }
}

impl fmt::Display for CdkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subcommand())
    }
}

/// One CDK run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdkRequest {
    pub action: CdkAction,
    /// Stack filter for deploy/destroy; all stacks of the app when `None`
    pub stack: Option<String>,
    pub profile: String,
    /// Exported as `CDK_ENV` for apps that select their configuration by name
    pub env: Option<String>,
}

impl CdkRequest {
    /// Build the CDK invocation, scoped to `infra_dir`.
    pub fn command(&self, cdk_command: &str, infra_dir: &Path) -> Result<CommandSpec> {
        let mut spec = CommandSpec::from_command_line(cdk_command)?
            .arg(self.action.subcommand())
            .current_dir(infra_dir)
            .env(AWS_PROFILE_VAR, &self.profile)
            .interactive();

        if self.action.takes_stack() {
            if let Some(stack) = &self.stack {
                spec = spec.arg(stack);
            }
        }
        spec = spec.args(self.action.non_interactive_flags().iter().copied());

        if let Some(env) = &self.env {
            spec = spec.env(CDK_ENV_VAR, env);
        }
        Ok(spec)
    }
}

/// Run `request` from the CDK app in `infra_dir`.
pub async fn run<R: CommandRunner>(
    runner: &R,
    cdk_command: &str,
    infra_dir: &Path,
    request: &CdkRequest,
) -> Result<()> {
    if !infra_dir.is_dir() {
        bail!(
            "CDK app directory not found: {}. Set infra_dir in the config file",
            infra_dir.display()
        );
    }

    let spec = request.command(cdk_command, infra_dir)?;
    info!("Running CDK {} with profile {}", request.action, request.profile);
    debug!("CDK command: {}", spec);

    let output = runner.run(&spec).await?;
    if !output.success() {
        bail!(
            "CDK {} failed ({}). Check AWS credentials or environment",
            request.action,
            output.failure_detail()
        );
    }

    info!("CDK {} completed", request.action);
    Ok(())
}
