use anyhow::Result;
use clap::Args;

use super::AppContext;
use crate::{
    cdk::{self, CdkAction, CdkRequest},
    process::CommandRunner,
};

#[derive(Debug, Clone, Args)]
pub struct BootstrapCommand {
    #[arg(short = 'p', long, help = "AWS profile exported as AWS_PROFILE")]
    pub profile: Option<String>,
    #[arg(short = 'e', long, help = "Environment exported as CDK_ENV")]
    pub env: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct DeployCommand {
    #[arg(short = 's', long, help = "Stack to deploy (default: every stack of the app)")]
    pub stack: Option<String>,
    #[arg(short = 'p', long, help = "AWS profile exported as AWS_PROFILE")]
    pub profile: Option<String>,
    #[arg(short = 'e', long, help = "Environment exported as CDK_ENV")]
    pub env: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct DestroyCommand {
    #[arg(short = 's', long, help = "Stack to destroy (default: every stack of the app)")]
    pub stack: Option<String>,
    #[arg(short = 'p', long, help = "AWS profile exported as AWS_PROFILE")]
    pub profile: Option<String>,
    #[arg(short = 'e', long, help = "Environment exported as CDK_ENV")]
    pub env: Option<String>,
}

impl BootstrapCommand {
    pub async fn execute<R: CommandRunner>(self, ctx: &AppContext<R>) -> Result<()> {
        println!("Bootstrapping AWS CDK environment...");
        run(ctx, CdkAction::Bootstrap, None, self.profile, self.env).await?;
        println!("CDK bootstrap completed successfully.");
        Ok(())
    }
}

impl DeployCommand {
    pub async fn execute<R: CommandRunner>(self, ctx: &AppContext<R>) -> Result<()> {
        println!("Deploying CDK app...");
        run(ctx, CdkAction::Deploy, self.stack, self.profile, self.env).await?;
        println!("CDK deploy completed successfully.");
        Ok(())
    }
}

impl DestroyCommand {
    pub async fn execute<R: CommandRunner>(self, ctx: &AppContext<R>) -> Result<()> {
        println!("Destroying CDK stacks...");
        run(ctx, CdkAction::Destroy, self.stack, self.profile, self.env).await?;
        println!("CDK destroy completed successfully.");
        Ok(())
    }
}

async fn run<R: CommandRunner>(
    ctx: &AppContext<R>,
    action: CdkAction,
    stack: Option<String>,
    profile: Option<String>,
    env: Option<String>,
) -> Result<()> {
    let settings = &ctx.settings;
    let profile = profile.unwrap_or_else(|| {
        settings
            .profile_for(settings.env_or_default(env.as_deref()))
            .to_string()
    });

    let request = CdkRequest {
        action,
        stack,
        profile,
        env,
    };
    cdk::run(&ctx.runner, &settings.cdk_command, &settings.infra_dir, &request).await
}
