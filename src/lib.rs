pub mod args;
pub mod decoder;
pub mod editor;
pub mod http;
pub mod ini;
pub mod notify;
pub mod repl;
pub mod request;
pub mod response;
pub mod runner;
pub mod session;
pub mod utils;
pub mod view;

pub use editor::ConfigEditor;
pub use http::{HttpClient, HttpConnectionProfile, PreparedRequest, prepare_request};
pub use ini::{ClientProfile, IniFile};
pub use notify::{ConsoleNotifier, MemoryNotifier, Notification, Notifier};
pub use request::{HttpMethod, JsonPane, RequestConfig, Side};
pub use response::{ContentKind, ExecutionResult};
pub use runner::{DisplayFormat, PairedResults, run_pair};
pub use session::ComparisonSession;
pub use view::{ComparisonView, DocumentRenderer, TerminalRenderer, ViewTab};
