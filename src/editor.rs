use tracing::debug;

use crate::notify::{Notification, Notifier};
use crate::request::{HttpMethod, JsonPane, RequestConfig, Side};
use crate::utils::format_json;

/// The two named request slots and the edits the user can make to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEditor {
    config_a: RequestConfig,
    config_b: RequestConfig,
}

impl Default for ConfigEditor {
    fn default() -> Self {
        ConfigEditor::new(
            RequestConfig::default_for(Side::A),
            RequestConfig::default_for(Side::B),
        )
    }
}

impl ConfigEditor {
    pub fn new(config_a: RequestConfig, config_b: RequestConfig) -> Self {
        ConfigEditor { config_a, config_b }
    }

    pub fn config(&self, side: Side) -> &RequestConfig {
        match side {
            Side::A => &self.config_a,
            Side::B => &self.config_b,
        }
    }

    pub fn config_mut(&mut self, side: Side) -> &mut RequestConfig {
        match side {
            Side::A => &mut self.config_a,
            Side::B => &mut self.config_b,
        }
    }

    pub fn set_method(&mut self, side: Side, method: HttpMethod) {
        self.config_mut(side).method = method;
    }

    pub fn set_url(&mut self, side: Side, url: impl Into<String>) {
        self.config_mut(side).url = url.into();
    }

    /// Stores pane text as-is; malformed JSON is only reported at run time.
    pub fn set_pane(&mut self, side: Side, pane: JsonPane, text: impl Into<String>) {
        *self.config_mut(side).pane_mut(pane) = text.into();
    }

    /// Pretty-prints a pane in place. Invalid JSON leaves the text alone.
    pub fn format_pane(&mut self, side: Side, pane: JsonPane, notifier: &dyn Notifier) -> bool {
        let slot = self.config_mut(side).pane_mut(pane);
        match format_json(slot) {
            Ok(formatted) => {
                *slot = formatted;
                notifier.notify(Notification::success("JSON Formatted", None));
                true
            }
            Err(e) => {
                debug!(side = %side, pane = pane.name(), "format failed: {e}");
                notifier.notify(Notification::error(
                    "Invalid JSON",
                    Some("The text is not valid JSON."),
                ));
                false
            }
        }
    }

    /// Copies every field of A into B, keeping B's own url.
    pub fn copy_a_to_b(&mut self, notifier: &dyn Notifier) {
        let url_b = std::mem::take(&mut self.config_b.url);
        self.config_b = RequestConfig {
            url: url_b,
            ..self.config_a.clone()
        };
        notifier.notify(Notification::success(
            "Config copied",
            Some("Copied A's config to B."),
        ));
    }

    pub fn snapshot(&self) -> (RequestConfig, RequestConfig) {
        (self.config_a.clone(), self.config_b.clone())
    }
}
