use anyhow::{Result, bail};
use clap::Args;

use super::AppContext;
use crate::{
    aws,
    process::{CommandRunner, CommandSpec},
};

#[derive(Debug, Clone, Args)]
pub struct IdentityCommand {
    #[arg(short = 'p', long, help = "AWS profile to check")]
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct WhoamiCommand {}

impl IdentityCommand {
    pub async fn execute<R: CommandRunner>(self, ctx: &AppContext<R>) -> Result<()> {
        let profile = self
            .profile
            .as_deref()
            .unwrap_or(&ctx.settings.default_profile);

        let identity =
            aws::sts::get_caller_identity(&ctx.runner, &ctx.settings.aws_command, profile).await?;

        println!("Profile: {profile}");
        println!("Account: {}", identity.account);
        println!("Arn:     {}", identity.arn);
        println!("UserId:  {}", identity.user_id);
        Ok(())
    }
}

impl WhoamiCommand {
    /// Show the identity of whatever credentials the current shell exports,
    /// e.g. the ones direnv loaded from the credentials file.
    pub async fn execute<R: CommandRunner>(self, ctx: &AppContext<R>) -> Result<()> {
        let spec = CommandSpec::from_command_line(&ctx.settings.aws_command)?
            .args(["sts", "get-caller-identity"])
            .interactive();

        let output = ctx.runner.run(&spec).await?;
        if !output.success() {
            bail!(
                "No usable AWS identity in this shell ({}). Run `cdkrole assume-role` and reload direnv",
                output.failure_detail()
            );
        }
        Ok(())
    }
}
