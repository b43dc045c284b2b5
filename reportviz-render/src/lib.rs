/*!
reportviz render layer

Attaches compiled specifications to a host page through the [`host`] traits, keeps
one live view per chart target, and serves the report's controls: scale toggles,
image exports, the editor hand-off, hexbin node lists and table downloads.
*/

pub mod controls;
pub mod error;
pub mod export;
pub mod handoff;
pub mod host;
pub mod report;
pub mod selection;
pub mod session;

pub use controls::{ControlAction, ControlIds};
pub use error::{HostError, RenderError, RenderResult};
pub use handoff::{EditorMessage, ExportChannel, HandoffConfig, HandoffOutcome};
pub use host::{
    BrowsingContext, ContextId, Document, ElementImage, FilePayload, ListenerId, MessageEvent,
    RenderEngine, UiEvent, View,
};
pub use report::{ActionOutcome, RenderSummary, Report, ReportOptions};
pub use selection::{NodeItem, NodeRow, SelectionQuery, NODE_LIST_FILE};
pub use session::RenderSession;
