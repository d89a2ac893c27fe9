//! Ask command - one-shot prompt.

use anyhow::Result;
use clap::Args;
use console::Style;

use super::{Context, build_service};

/// Arguments for the ask command.
#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question or prompt to send
    #[arg(required = true)]
    pub prompt: String,

    /// Send under an explicit session id (history is not kept between runs)
    #[arg(short, long)]
    pub session: Option<String>,
}

/// Run the ask command.
pub async fn run(args: AskArgs, ctx: &Context) -> Result<()> {
    let service = build_service(&ctx.config.config)?;
    let dim = Style::new().dim();

    if ctx.verbose {
        eprintln!(
            "{}",
            dim.apply_to(format!("Model: {}", service.model_name()))
        );
        if let Some(ref session) = args.session {
            eprintln!("{}", dim.apply_to(format!("Session: {}", session)));
        }
    }

    let reply = service.send(args.session.as_deref(), &args.prompt).await?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&reply)?);
        return Ok(());
    }

    println!("{}", reply.response);
    if ctx.verbose {
        eprintln!("{}", dim.apply_to(format!("Session: {}", reply.session_id)));
        if let Some(ref room) = reply.room_name {
            eprintln!("{}", dim.apply_to(format!("Room: {}", room)));
        }
    }

    Ok(())
}
