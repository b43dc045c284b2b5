//! Editor hand-off
//!
//! Opening a chart in the online editor is best-effort message passing: the
//! report opens the editor window and keeps posting the specification on a fixed
//! interval until the editor answers or the attempts run out. Any message whose
//! source is the opened window counts as the answer.

use reportviz_core::SpecDocument;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::MissedTickBehavior;

use crate::host::{BrowsingContext, Document, ListenerId, MessageEvent};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandoffConfig {
    /// Editor page opened in the new window
    #[serde(default = "default_editor_url")]
    pub editor_url: String,

    /// Origin the specification is posted to
    #[serde(default = "default_editor_origin")]
    pub editor_origin: String,

    /// Delay between two posts in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Maximum number of posts before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_editor_url() -> String { "https://vega.github.io/editor/".to_string() }
fn default_editor_origin() -> String { "https://vega.github.io".to_string() }
fn default_interval_ms() -> u64 { 250 }
fn default_max_attempts() -> u32 { 40 }

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            editor_url: default_editor_url(),
            editor_origin: default_editor_origin(),
            interval_ms: default_interval_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl HandoffConfig {
    /// Retry period, never zero
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

/// Payload understood by the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorMessage {
    pub mode: String,
    /// Specification as JSON text
    pub spec: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renderer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

impl EditorMessage {
    pub fn vega_lite(spec: &SpecDocument) -> Self {
        Self {
            mode: "vega-lite".to_string(),
            spec: spec.to_json_string(),
            renderer: None,
            config: None,
        }
    }
}

/// Terminal state of a hand-off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffOutcome {
    Acknowledged { attempts: u32 },
    TimedOut { attempts: u32 },
}

/// Removes the message listener once the hand-off ends, however it ends
struct ListenerGuard {
    document: Rc<dyn Document>,
    listener: ListenerId,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.document.remove_listener(self.listener);
    }
}

/// Per-click hand-off state
pub struct ExportChannel {
    target: Option<Rc<dyn BrowsingContext>>,
    guard: ListenerGuard,
    inbox: UnboundedReceiver<MessageEvent>,
    message: Value,
    origin: String,
    interval: Duration,
    max_attempts: u32,
}

impl ExportChannel {
    /// Open the editor window and start listening for its answer
    pub fn open(document: Rc<dyn Document>, spec: &SpecDocument, config: &HandoffConfig) -> Self {
        let target = document.open_window(&config.editor_url);
        if target.is_none() {
            log::warn!("Editor window at {} was blocked", config.editor_url);
        }
        let (listener, inbox) = document.listen_messages();
        let message = serde_json::to_value(EditorMessage::vega_lite(spec)).unwrap_or(Value::Null);

        Self {
            target,
            guard: ListenerGuard { document, listener },
            inbox,
            message,
            origin: config.editor_origin.clone(),
            interval: config.interval(),
            max_attempts: config.max_attempts,
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.target.is_none()
    }

    /// Post until acknowledged or out of attempts. Dropping the future, or the
    /// channel before it runs, cancels the hand-off and removes the listener.
    pub async fn run(self) -> HandoffOutcome {
        let ExportChannel {
            target,
            guard,
            mut inbox,
            message,
            origin,
            interval,
            max_attempts,
        } = self;

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut attempts = 0u32;

        let outcome = loop {
            tokio::select! {
                biased;
                Some(event) = inbox.recv() => {
                    if is_acknowledgement(target.as_deref(), &event) {
                        break HandoffOutcome::Acknowledged { attempts };
                    }
                }
                _ = ticker.tick() => {
                    if attempts >= max_attempts {
                        break HandoffOutcome::TimedOut { attempts };
                    }
                    attempts += 1;
                    // posting into a blocked popup is a no-op
                    if let Some(target) = &target {
                        target.post_message(&message, &origin);
                    }
                }
            }
        };

        drop(guard);
        match outcome {
            HandoffOutcome::Acknowledged { attempts } => {
                log::info!("Editor acknowledged the specification after {} posts", attempts)
            }
            HandoffOutcome::TimedOut { attempts } => {
                log::warn!("Editor did not answer after {} posts", attempts)
            }
        }
        outcome
    }
}

fn is_acknowledgement(target: Option<&dyn BrowsingContext>, event: &MessageEvent) -> bool {
    match (target, event.source) {
        (Some(target), Some(source)) => target.id() == source,
        _ => false,
    }
}
