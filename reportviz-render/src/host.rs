//! Host environment traits
//!
//! The charting engine and the DOM are consumed only through these traits. A
//! webview bridge implements them for a real report page; tests implement them in
//! memory. Everything here runs on one thread, so the async traits are `?Send`.

use async_trait::async_trait;
use reportviz_core::{ImageFormat, SpecDocument};
use serde_json::Value;
use std::rc::Rc;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::controls::ControlAction;
use crate::error::HostError;

/// Handle for a registered listener
pub type ListenerId = u64;

/// Identity of a browsing context (window or tab)
pub type ContextId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiEvent {
    Click,
    Change,
}

/// Content handed to the host's file-save facility
#[derive(Debug, Clone, PartialEq)]
pub enum FilePayload {
    DataUrl(String),
    Text { mime: String, body: String },
}

/// An already rendered image element
#[derive(Debug, Clone, PartialEq)]
pub enum ElementImage {
    Raster { src: String },
    Svg(String),
}

/// A cross-window message as received by the report window
#[derive(Debug, Clone, PartialEq)]
pub struct MessageEvent {
    pub source: Option<ContextId>,
    pub data: Value,
}

/// Charting engine that turns a specification into a live view
#[async_trait(?Send)]
pub trait RenderEngine {
    async fn embed(&self, target: &str, spec: &SpecDocument) -> Result<Rc<dyn View>, HostError>;
}

/// A live chart inside a target element
#[async_trait(?Send)]
pub trait View {
    /// Encode the current rendering as a data URL
    async fn to_image_url(&self, format: ImageFormat) -> Result<String, HostError>;

    fn signal(&self, name: &str) -> Option<Value>;

    fn add_signal_listener(&self, name: &str, action: ControlAction) -> ListenerId;

    fn remove_signal_listener(&self, id: ListenerId);

    /// Release engine resources; the view is unusable afterwards
    fn finalize(&self);
}

/// DOM and browser facilities of the report window
pub trait Document {
    fn has_element(&self, id: &str) -> bool;

    fn is_checked(&self, id: &str) -> bool;

    fn add_listener(&self, element_id: &str, event: UiEvent, action: ControlAction) -> ListenerId;

    fn remove_listener(&self, id: ListenerId);

    fn set_disabled(&self, element_id: &str, disabled: bool);

    fn save_file(&self, name: &str, payload: FilePayload) -> Result<(), HostError>;

    fn element_image(&self, id: &str) -> Option<ElementImage>;

    /// Open a new window; `None` when the popup was blocked
    fn open_window(&self, url: &str) -> Option<Rc<dyn BrowsingContext>>;

    /// Subscribe to window messages until the listener is removed
    fn listen_messages(&self) -> (ListenerId, UnboundedReceiver<MessageEvent>);
}

/// Another window reachable by message passing
pub trait BrowsingContext {
    fn id(&self) -> ContextId;

    fn post_message(&self, message: &Value, target_origin: &str);
}
