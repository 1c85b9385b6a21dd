use crate::editor::ConfigEditor;
use crate::ini::DEFAULT_INI_FILE_PATH;
use crate::request::{HttpMethod, JsonPane, Side};
use crate::view::{DEFAULT_COLUMN_WIDTH, ViewTab};

pub use clap::Parser;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CommandLineArgs {
    #[clap(short = 'c', long, default_value = DEFAULT_INI_FILE_PATH, help = "config file path")]
    config: String,
    #[clap(long, help = "URL of the original server (A)")]
    a_url: Option<String>,
    #[clap(long, help = "URL of the other server (B)")]
    b_url: Option<String>,
    #[clap(short = 'X', long, value_parser = parse_method, help = "HTTP method for both requests")]
    method: Option<HttpMethod>,
    #[clap(long, value_parser = parse_method, help = "HTTP method for A")]
    a_method: Option<HttpMethod>,
    #[clap(long, value_parser = parse_method, help = "HTTP method for B")]
    b_method: Option<HttpMethod>,
    #[clap(long, help = "query params JSON for both requests")]
    params: Option<String>,
    #[clap(long, help = "headers JSON for both requests")]
    headers: Option<String>,
    #[clap(long, help = "body JSON for both requests")]
    body: Option<String>,
    #[clap(long, help = "query params JSON for A")]
    a_params: Option<String>,
    #[clap(long, help = "query params JSON for B")]
    b_params: Option<String>,
    #[clap(long, help = "headers JSON for A")]
    a_headers: Option<String>,
    #[clap(long, help = "headers JSON for B")]
    b_headers: Option<String>,
    #[clap(long, help = "body JSON for A")]
    a_body: Option<String>,
    #[clap(long, help = "body JSON for B")]
    b_body: Option<String>,
    #[clap(short = 'i', long, help = "Edit and run comparisons interactively")]
    interactive: bool,
    #[clap(long, default_value = "diff", value_parser = parse_view, help = "view to print: diff, a or b")]
    view: ViewTab,
    #[clap(short = 'o', long, value_enum, default_value = "text", help = "output format")]
    output: OutputFormat,
    #[clap(short = 'w', long, default_value_t = DEFAULT_COLUMN_WIDTH, help = "column width of the diff")]
    width: usize,
    #[clap(long, help = "Disable colored output")]
    no_color: bool,
    #[clap(long, help = "Exit with status 1 when the responses differ")]
    exit_code: bool,
    #[clap(
        short = 'v',
        long,
        help = "Print verbose message",
        default_value = "false"
    )]
    verbose: bool,
}

fn parse_view(s: &str) -> Result<ViewTab, String> {
    s.parse::<ViewTab>().map_err(|e| e.to_string())
}

fn parse_method(s: &str) -> Result<HttpMethod, String> {
    s.parse::<HttpMethod>().map_err(|e| e.to_string())
}

impl CommandLineArgs {
    pub fn get() -> Self {
        CommandLineArgs::parse()
    }

    pub fn config(&self) -> &str {
        &self.config
    }

    pub fn interactive(&self) -> bool {
        self.interactive
    }

    pub fn view(&self) -> ViewTab {
        self.view
    }

    pub fn output(&self) -> OutputFormat {
        self.output
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn color(&self) -> bool {
        !self.no_color
    }

    pub fn exit_code(&self) -> bool {
        self.exit_code
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Layers command-line overrides on top of the loaded configs.
    /// Side-specific flags win over the shared ones.
    pub fn apply_to(&self, editor: &mut ConfigEditor) {
        for side in [Side::A, Side::B] {
            let (url, method, params, headers, body) = match side {
                Side::A => (&self.a_url, self.a_method, &self.a_params, &self.a_headers, &self.a_body),
                Side::B => (&self.b_url, self.b_method, &self.b_params, &self.b_headers, &self.b_body),
            };
            if let Some(url) = url {
                editor.set_url(side, url.clone());
            }
            if let Some(method) = method.or(self.method) {
                editor.set_method(side, method);
            }
            let panes = [
                (JsonPane::Params, params.as_ref().or(self.params.as_ref())),
                (JsonPane::Headers, headers.as_ref().or(self.headers.as_ref())),
                (JsonPane::Body, body.as_ref().or(self.body.as_ref())),
            ];
            for (pane, text) in panes {
                if let Some(text) = text {
                    editor.set_pane(side, pane, text.clone());
                }
            }
        }
    }
}
