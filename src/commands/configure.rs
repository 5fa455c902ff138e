use anyhow::Result;
use clap::Args;

use super::AppContext;
use crate::config;

#[derive(Debug, Clone, Args)]
pub struct ConfigureCommand {
    #[arg(
        short = 'e',
        long,
        help = "Edit the profile and role overrides of this environment instead of the defaults"
    )]
    pub env: Option<String>,
}

impl ConfigureCommand {
    pub async fn execute<R>(self, ctx: &AppContext<R>) -> Result<()> {
        config::configure_interactive(&ctx.config_path, self.env.as_deref()).await
    }
}
