use anyhow::Result;
use tracing::{info, warn};

use crate::editor::ConfigEditor;
use crate::http::HttpClient;
use crate::notify::{Notification, Notifier};
use crate::request::RequestConfig;
use crate::runner::{PairedResults, run_pair};
use crate::view::ComparisonView;

/// The configs captured when a run was triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTicket {
    pub id: u64,
    pub config_a: RequestConfig,
    pub config_b: RequestConfig,
}

/// In-memory state of one comparison page: the editor owns the configs,
/// the view owns the latest results.
#[derive(Debug, Default)]
pub struct ComparisonSession {
    pub editor: ConfigEditor,
    pub view: ComparisonView,
    runs_started: u64,
}

impl ComparisonSession {
    pub fn new(editor: ConfigEditor) -> Self {
        ComparisonSession {
            editor,
            view: ComparisonView::default(),
            runs_started: 0,
        }
    }

    /// Snapshots both configs. Edits made afterwards don't affect this run.
    pub fn begin_run(&mut self) -> RunTicket {
        self.runs_started += 1;
        let (config_a, config_b) = self.editor.snapshot();
        RunTicket {
            id: self.runs_started,
            config_a,
            config_b,
        }
    }

    /// Stores the outcome of a run. The latest completion wins, even when it
    /// belongs to an older ticket.
    pub fn complete_run(
        &mut self,
        ticket: &RunTicket,
        outcome: Result<PairedResults>,
        notifier: &dyn Notifier,
    ) {
        match outcome {
            Ok(results) => {
                if ticket.id != self.runs_started {
                    warn!(ticket = ticket.id, latest = self.runs_started, "stale run completed");
                }
                info!(
                    status_a = results.result_a.status,
                    status_b = results.result_b.status,
                    "comparison finished"
                );
                self.view.show(results);
                notifier.notify(Notification::success(
                    "Compare finished",
                    Some("Both requests completed."),
                ));
            }
            Err(e) => {
                warn!("comparison failed: {e:#}");
                notifier.notify(Notification::error(
                    "Request failed",
                    Some("Check your settings."),
                ));
            }
        }
    }

    pub async fn run_compare(&mut self, client: &HttpClient, notifier: &dyn Notifier) {
        let ticket = self.begin_run();
        let outcome = run_pair(client, ticket.config_a.clone(), ticket.config_b.clone()).await;
        self.complete_run(&ticket, outcome, notifier);
    }
}
