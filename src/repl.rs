use std::io::{self, IsTerminal, Write};

use anyhow::{Context, Result};
use colored::*;
use rustyline::{DefaultEditor, error::ReadlineError};

use crate::http::HttpClient;
use crate::notify::Notifier;
use crate::request::{HttpMethod, JsonPane, RequestConfig, Side};
use crate::session::ComparisonSession;
use crate::view::{TerminalRenderer, ViewTab};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Method,
    Url,
    Pane(JsonPane),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetMethod { side: Side, method: HttpMethod },
    SetUrl { side: Side, url: String },
    /// `text` is None when the value should be read in multi-line mode.
    SetPane { side: Side, pane: JsonPane, text: Option<String> },
    Format { side: Side, pane: JsonPane },
    Copy,
    Run,
    View(ViewTab),
    Show(Option<Side>),
    Status,
    Help,
    Clear,
    Exit,
    Empty,
}

fn parse_target(target: &str) -> Result<(Side, Field)> {
    let (side, field) = target
        .split_once('.')
        .with_context(|| format!("Expected <a|b>.<field>, got '{target}'"))?;
    let side = side.parse::<Side>()?;
    let field = match field.to_ascii_lowercase().as_str() {
        "method" => Field::Method,
        "url" => Field::Url,
        other => Field::Pane(other.parse::<JsonPane>()?),
    };
    Ok((side, field))
}

/// Parses one input line. Values keep their inner spacing.
pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "help" | "h" | "?" => Ok(Command::Help),
        "exit" | "quit" | "q" => Ok(Command::Exit),
        "clear" => Ok(Command::Clear),
        "copy" => Ok(Command::Copy),
        "run" | "r" => Ok(Command::Run),
        "status" => Ok(Command::Status),
        "show" => {
            if rest.is_empty() {
                Ok(Command::Show(None))
            } else {
                Ok(Command::Show(Some(rest.parse::<Side>()?)))
            }
        }
        "view" => {
            if rest.is_empty() {
                anyhow::bail!("Usage: view <diff|a|b>");
            }
            Ok(Command::View(rest.parse::<ViewTab>()?))
        }
        "format" | "fmt" => {
            if rest.is_empty() {
                anyhow::bail!("Usage: format <a|b>.<params|headers|body>");
            }
            match parse_target(rest)? {
                (side, Field::Pane(pane)) => Ok(Command::Format { side, pane }),
                _ => anyhow::bail!("Only params, headers and body can be formatted"),
            }
        }
        "set" => {
            let (target, value) = match rest.split_once(char::is_whitespace) {
                Some((target, value)) => (target, value.trim()),
                None => (rest, ""),
            };
            if target.is_empty() {
                anyhow::bail!("Usage: set <a|b>.<field> [value]");
            }
            match parse_target(target)? {
                (side, Field::Method) => {
                    if value.is_empty() {
                        anyhow::bail!("Usage: set {side}.method <GET|POST|PUT|DELETE|PATCH|HEAD>");
                    }
                    Ok(Command::SetMethod {
                        side,
                        method: value.parse::<HttpMethod>()?,
                    })
                }
                (side, Field::Url) => Ok(Command::SetUrl {
                    side,
                    url: value.to_string(),
                }),
                (side, Field::Pane(pane)) => Ok(Command::SetPane {
                    side,
                    pane,
                    text: (!value.is_empty()).then(|| value.to_string()),
                }),
            }
        }
        _ => anyhow::bail!("Unknown command: {word}. Type 'help' for a list of commands."),
    }
}

pub struct Repl<'n> {
    editor: DefaultEditor,
    session: ComparisonSession,
    client: HttpClient,
    renderer: TerminalRenderer,
    notifier: &'n dyn Notifier,
    color: bool,
}

impl<'n> Repl<'n> {
    pub fn new(
        session: ComparisonSession,
        client: HttpClient,
        renderer: TerminalRenderer,
        notifier: &'n dyn Notifier,
        color: bool,
    ) -> Result<Self> {
        let editor = DefaultEditor::new().context("Failed to create line editor")?;
        Ok(Self {
            editor,
            session,
            client,
            renderer,
            notifier,
            color,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Only show welcome message in interactive mode
        if io::stdin().is_terminal() {
            self.print_welcome();
        }

        loop {
            let line = match self.read_line() {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    eprintln!("{}: {}", "Error".red().bold(), e);
                    if !io::stdin().is_terminal() {
                        break;
                    }
                    continue;
                }
            };

            match parse_command(&line) {
                Ok(Command::Exit) => break,
                Ok(Command::Empty) => continue,
                Ok(cmd) => {
                    if let Err(e) = self.execute(cmd).await {
                        eprintln!("{}: {}", "Error".red().bold(), e);
                    }
                }
                Err(e) => eprintln!("{}: {}", "Error".red().bold(), e),
            }
        }

        if io::stdin().is_terminal() {
            println!("{}", "Goodbye!".green());
        }
        Ok(())
    }

    fn print_welcome(&self) {
        println!("{}", "Welcome to abcompare interactive mode!".green().bold());
        println!("Type {} for help, {} to exit.", "help".cyan(), "exit".cyan());
        println!(
            "Edit a request with {} then compare with {}.",
            "set a.url https://...".yellow(),
            "run".yellow()
        );
        println!();
    }

    /// Returns None on EOF or Ctrl+C.
    fn read_line(&mut self) -> Result<Option<String>> {
        if io::stdin().is_terminal() {
            let prompt = format!("{} ", "abcompare>".green().bold());
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let _ = self.editor.add_history_entry(line.as_str());
                    Ok(Some(line))
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
                Err(e) => anyhow::bail!("Failed to read input: {}", e),
            }
        } else {
            let mut line = String::new();
            match io::stdin().read_line(&mut line) {
                Ok(0) => Ok(None),
                Ok(_) => Ok(Some(line)),
                Err(e) => anyhow::bail!("Failed to read input: {}", e),
            }
        }
    }

    fn read_multiline(&mut self) -> Result<String> {
        println!("{}", "Enter JSON (press Ctrl+D when done):".yellow());

        let mut text = String::new();
        loop {
            print!("> ");
            io::stdout().flush()?;

            let mut line = String::new();
            match io::stdin().read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => text.push_str(&line),
                Err(e) => anyhow::bail!("Error reading input: {}", e),
            }
        }
        println!();
        Ok(text.trim_end().to_string())
    }

    async fn execute(&mut self, cmd: Command) -> Result<()> {
        let editor = &mut self.session.editor;
        match cmd {
            Command::SetMethod { side, method } => editor.set_method(side, method),
            Command::SetUrl { side, url } => editor.set_url(side, url),
            Command::SetPane { side, pane, text } => {
                let text = match text {
                    Some(text) => text,
                    None => self.read_multiline()?,
                };
                self.session.editor.set_pane(side, pane, text);
            }
            Command::Format { side, pane } => {
                if editor.format_pane(side, pane, self.notifier) {
                    self.print_pane(side, pane);
                }
            }
            Command::Copy => editor.copy_a_to_b(self.notifier),
            Command::Run => {
                println!("{}", "Testing...".yellow());
                self.session.run_compare(&self.client, self.notifier).await;
                println!("{}", self.session.view.render(&self.renderer, self.color));
            }
            Command::View(tab) => {
                self.session.view.select_tab(tab);
                println!("{}", self.session.view.render(&self.renderer, self.color));
            }
            Command::Show(side) => {
                let sides = match side {
                    Some(side) => vec![side],
                    None => vec![Side::A, Side::B],
                };
                for side in sides {
                    self.print_config(side, self.session.editor.config(side));
                }
            }
            Command::Status => {
                println!("{}", self.session.view.render_status_cards(self.color));
            }
            Command::Help => self.print_help(),
            Command::Clear => {
                print!("\x1B[2J\x1B[1;1H");
                io::stdout().flush()?;
            }
            Command::Exit | Command::Empty => {}
        }
        Ok(())
    }

    fn print_pane(&self, side: Side, pane: JsonPane) {
        println!("{}", self.session.editor.config(side).pane(pane));
    }

    fn print_config(&self, side: Side, config: &RequestConfig) {
        println!("{} ({})", side.label().cyan().bold(), side);
        println!("  {} {}", config.method.to_string().yellow(), config.url.blue());
        for pane in [JsonPane::Params, JsonPane::Headers, JsonPane::Body] {
            println!("  {}:", pane.name().cyan());
            for line in config.pane(pane).lines() {
                println!("    {line}");
            }
        }
    }

    fn print_help(&self) {
        println!("{}", "abcompare Interactive Mode Help".green().bold());
        println!();
        println!("{}", "Editing:".cyan().bold());
        println!("  {} {}        - Set the HTTP method", "set".yellow(), "a.method POST".blue());
        println!("  {} {} - Set the URL", "set".yellow(), "b.url https://...".blue());
        println!("  {} {}  - Set params/headers/body", "set".yellow(), "a.params {...}".blue());
        println!("  {} {}            - Multi-line input, end with Ctrl+D", "set".yellow(), "a.body".blue());
        println!("  {} {}         - Pretty-print a JSON pane", "format".yellow(), "a.headers".blue());
        println!("  {}                      - Copy A's config to B (keeps B's URL)", "copy".yellow());
        println!();
        println!("{}", "Comparing:".cyan().bold());
        println!("  {}                       - Send both requests and show the result", "run".yellow());
        println!("  {} {}           - Switch between diff, A and B views", "view".yellow(), "diff|a|b".blue());
        println!("  {}                    - Show both status cards", "status".yellow());
        println!("  {} {}                - Show the current configs", "show".yellow(), "[a|b]".blue());
        println!();
        println!("{}", "Other:".cyan().bold());
        println!("  {}                      - Show this help", "help".yellow());
        println!("  {}                     - Clear screen", "clear".yellow());
        println!("  {}                      - Exit abcompare", "exit".yellow());
        println!();
    }
}
