//! Chat command - interactive REPL mode.

use anyhow::Result;
use clap::Args;

use super::repl::Repl;
use super::{Context, build_service};

/// Arguments for the chat command.
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Resume an existing session
    #[arg(short, long)]
    pub session: Option<String>,
}

/// Run the chat command (REPL).
pub async fn run(args: ChatArgs, ctx: &Context) -> Result<()> {
    let service = build_service(&ctx.config.config)?;
    service.start()?;

    let result = match Repl::new(&service, args.session, ctx.verbose) {
        Ok(mut repl) => repl.run().await,
        Err(e) => Err(e),
    };

    service.shutdown().await;
    result
}
