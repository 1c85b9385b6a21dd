use abcompare::args::{CommandLineArgs, OutputFormat};
use abcompare::repl::Repl;
use abcompare::{
    ComparisonSession, ConfigEditor, ConsoleNotifier, HttpClient, IniFile, TerminalRenderer,
};

use anyhow::Result;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cmd_args = CommandLineArgs::get();
    init_tracing(cmd_args.verbose());

    if !cmd_args.color() {
        colored::control::set_override(false);
    }

    let ini_file = IniFile::load(cmd_args.config())?;
    let client = HttpClient::new(&ini_file.client)?;

    let mut editor = ConfigEditor::new(ini_file.config_a, ini_file.config_b);
    cmd_args.apply_to(&mut editor);
    let mut session = ComparisonSession::new(editor);
    let renderer = TerminalRenderer::new(cmd_args.width(), cmd_args.color());
    let notifier = ConsoleNotifier;

    if cmd_args.interactive() {
        let mut repl = Repl::new(session, client, renderer, &notifier, cmd_args.color())?;
        repl.run().await?;
        return Ok(ExitCode::SUCCESS);
    }

    session.view.select_tab(cmd_args.view());
    session.run_compare(&client, &notifier).await;

    let Some(results) = session.view.results() else {
        return Ok(ExitCode::FAILURE);
    };

    match cmd_args.output() {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(results)?),
        OutputFormat::Text => println!("{}", session.view.render(&renderer, cmd_args.color())),
    }

    if cmd_args.exit_code() && !results.bodies_match() {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}
