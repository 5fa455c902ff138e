use anyhow::{Result, bail};
use clap::Args;

use super::AppContext;
use crate::{
    aws::{self, sso::SessionStatus},
    process::CommandRunner,
};

#[derive(Debug, Clone, Args)]
pub struct SsoLoginCommand {
    #[arg(short = 'p', long, help = "AWS SSO profile to log in with")]
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct SsoCheckCommand {
    #[arg(short = 'p', long, help = "AWS SSO profile to check")]
    pub profile: Option<String>,
}

impl SsoLoginCommand {
    pub async fn execute<R: CommandRunner>(self, ctx: &AppContext<R>) -> Result<()> {
        let profile = self
            .profile
            .as_deref()
            .unwrap_or(&ctx.settings.default_profile);

        println!("Please complete authentication in the browser window.");
        aws::sso::login(&ctx.runner, &ctx.settings.aws_command, profile).await?;
        println!("AWS SSO login succeeded for profile: {profile}");
        Ok(())
    }
}

impl SsoCheckCommand {
    pub async fn execute<R: CommandRunner>(self, ctx: &AppContext<R>) -> Result<()> {
        let profile = self
            .profile
            .as_deref()
            .unwrap_or(&ctx.settings.default_profile);

        match aws::sso::check_session(&ctx.runner, &ctx.settings.aws_command, profile).await? {
            SessionStatus::Active(identity) => {
                println!(
                    "SSO session for profile {profile} is active (account {})",
                    identity.account
                );
                Ok(())
            }
            SessionStatus::Inactive { reason } => {
                println!("SSO session for profile {profile} is not active: {reason}");
                bail!("Run `cdkrole sso-login --profile {profile}` to start a new session")
            }
        }
    }
}
