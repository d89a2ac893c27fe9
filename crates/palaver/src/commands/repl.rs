//! REPL (Read-Eval-Print Loop) implementation for interactive chat.

use anyhow::Result;
use console::{Style, Term, style};
use palaver_chat::ChatService;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

/// REPL state.
pub struct Repl<'a> {
    service: &'a ChatService,
    session_id: Option<String>,
    editor: Editor<(), DefaultHistory>,
    term: Term,
    verbose: bool,
}

impl<'a> Repl<'a> {
    /// Create a new REPL instance.
    pub fn new(service: &'a ChatService, session_id: Option<String>, verbose: bool) -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .auto_add_history(true)
            .build();

        let editor = Editor::with_config(config)?;

        Ok(Self {
            service,
            session_id,
            editor,
            term: Term::stdout(),
            verbose,
        })
    }

    /// Run the REPL loop.
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        loop {
            let prompt = self.format_prompt();

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        match self.handle_slash_command(line) {
                            Ok(ControlFlow::Continue) => continue,
                            Ok(ControlFlow::Exit) => break,
                            Err(e) => {
                                self.print_error(&format!("Command error: {}", e));
                                continue;
                            }
                        }
                    }

                    if let Err(e) = self.send_message(line).await {
                        self.print_error(&format!("{}", e));
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!();
                    self.print_dim("(Interrupted - type /quit to exit)");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(e) => {
                    self.print_error(&format!("Input error: {}", e));
                    break;
                }
            }
        }

        self.print_dim("Goodbye!");
        Ok(())
    }

    async fn send_message(&mut self, message: &str) -> Result<()> {
        let reply = self
            .service
            .send(self.session_id.as_deref(), message)
            .await?;

        if reply.new_session {
            if let Some(ref room) = reply.room_name {
                self.print_dim(&format!("[{}]", room));
            }
            if self.verbose {
                self.print_dim(&format!("Session: {}", reply.session_id));
            }
            self.session_id = Some(reply.session_id);
        }

        println!("{}", reply.response);
        println!();
        Ok(())
    }

    fn handle_slash_command(&mut self, input: &str) -> Result<ControlFlow> {
        let cmd = input[1..].split_whitespace().next().unwrap_or("");

        match cmd {
            "quit" | "q" | "exit" => {
                return Ok(ControlFlow::Exit);
            }
            "help" | "h" | "?" => {
                self.print_help();
            }
            "clear" | "cls" => {
                self.term.clear_screen()?;
            }
            "new" => {
                self.session_id = None;
                self.print_dim("Started new session");
            }
            "session" => {
                if let Some(ref id) = self.session_id {
                    println!("Current session: {}", id);
                } else {
                    self.print_dim("No active session (will create on first message)");
                }
            }
            "stats" => {
                self.print_stats();
            }
            "" => {
                self.print_dim("Type /help for available commands");
            }
            _ => {
                self.print_error(&format!("Unknown command: /{}", cmd));
                self.print_dim("Type /help for available commands");
            }
        }

        Ok(ControlFlow::Continue)
    }

    fn print_welcome(&self) {
        let dim = Style::new().dim();
        println!();
        println!("{}", style("Palaver Chat").bold().cyan());
        println!("{}", dim.apply_to("─".repeat(40)));
        println!(
            "{}",
            dim.apply_to(format!("Model: {}", self.service.model_name()))
        );
        println!(
            "{}",
            dim.apply_to("Use /help for commands, Ctrl+D to exit.")
        );
        println!();
    }

    fn print_help(&self) {
        let dim = Style::new().dim();
        println!();
        println!("{}", style("Available Commands").bold());
        println!("{}", dim.apply_to("─".repeat(40)));
        println!("  {}  - Exit the REPL", style("/quit, /q").cyan());
        println!("  {}  - Show this help", style("/help, /h, /?").cyan());
        println!("  {}  - Clear the screen", style("/clear").cyan());
        println!("  {}  - Start a new session", style("/new").cyan());
        println!("  {}  - Show current session ID", style("/session").cyan());
        println!("  {}  - Show session cache stats", style("/stats").cyan());
        println!();
    }

    fn print_stats(&self) {
        let stats = self.service.stats();
        let dim = Style::new().dim();
        println!("Sessions cached: {}", stats.size);
        println!(
            "  {}",
            dim.apply_to(format!(
                "ttl {}s, sweep every {}s, reclaimer {}",
                stats.ttl.as_secs(),
                stats.sweep_interval.as_secs(),
                if stats.reclaimer_running { "running" } else { "stopped" }
            ))
        );
        println!(
            "  {}",
            dim.apply_to(format!(
                "hits {}, created {}, evicted {}, factory failures {}",
                stats.hits, stats.created, stats.evicted, stats.factory_failures
            ))
        );
    }

    fn format_prompt(&self) -> String {
        format!("{} ", style("palaver>").cyan().bold())
    }

    fn print_dim(&self, msg: &str) {
        let dim = Style::new().dim();
        println!("{}", dim.apply_to(msg));
    }

    fn print_error(&self, msg: &str) {
        let red = Style::new().red();
        println!("{} {}", red.apply_to("Error:"), msg);
    }
}

/// Control flow for the REPL.
pub enum ControlFlow {
    Continue,
    Exit,
}
