//! Report coordinator
//!
//! Owns one [`RenderSession`] per chart and routes control actions coming back
//! from the host to sessions, exports and selection queries.

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use reportviz_core::compile::SELECTION_PARAM;
use reportviz_core::{
    CompileOptions, ImageFormat, PlotDescriptor, ReportData, ScaleMode, DEFAULT_OVERFLOW_CAP,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::controls::{download_helper_button, table_button, ControlAction};
use crate::error::{RenderError, RenderResult};
use crate::export;
use crate::handoff::{ExportChannel, HandoffConfig, HandoffOutcome};
use crate::host::{Document, FilePayload, ListenerId, RenderEngine, UiEvent};
use crate::selection::{SelectionQuery, NODE_LIST_FILE};
use crate::session::RenderSession;

const TSV_MIME: &str = "text/tab-separated-values";

/// Settings shared by every session of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportOptions {
    #[serde(default)]
    pub compile: CompileOptions,
    #[serde(default)]
    pub handoff: HandoffConfig,
    /// Cap the bin indices were built with
    #[serde(default = "default_overflow_cap")]
    pub overflow_cap: usize,
}

fn default_overflow_cap() -> usize { DEFAULT_OVERFLOW_CAP }

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            compile: CompileOptions::default(),
            handoff: HandoffConfig::default(),
            overflow_cap: default_overflow_cap(),
        }
    }
}

/// Counts from one [`Report::render_all`] pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Charts attached to their target
    pub rendered: usize,
    /// Download helpers bound to their button
    pub helpers: usize,
    /// Unsupported or malformed descriptors
    pub skipped: usize,
    /// Charts that failed to attach
    pub failed: usize,
}

/// Result of a dispatched action
pub enum ActionOutcome {
    Rebound { mode: ScaleMode },
    Saved { file: String },
    SelectionUpdated { has_selection: bool },
    /// Hand-off task for the host event loop to drive
    Handoff(LocalBoxFuture<'static, HandoffOutcome>),
    /// The action had nothing to act on
    Skipped { reason: String },
}

impl fmt::Debug for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionOutcome::Rebound { mode } => f.debug_struct("Rebound").field("mode", mode).finish(),
            ActionOutcome::Saved { file } => f.debug_struct("Saved").field("file", file).finish(),
            ActionOutcome::SelectionUpdated { has_selection } => f
                .debug_struct("SelectionUpdated")
                .field("has_selection", has_selection)
                .finish(),
            ActionOutcome::Handoff(_) => f.write_str("Handoff(..)"),
            ActionOutcome::Skipped { reason } => {
                f.debug_struct("Skipped").field("reason", reason).finish()
            }
        }
    }
}

pub struct Report {
    engine: Rc<dyn RenderEngine>,
    document: Rc<dyn Document>,
    data: ReportData,
    options: ReportOptions,
    sessions: BTreeMap<String, RenderSession>,
    static_listeners: Vec<ListenerId>,
}

impl Report {
    pub fn new(
        engine: Rc<dyn RenderEngine>,
        document: Rc<dyn Document>,
        data: ReportData,
        options: ReportOptions,
    ) -> Self {
        Self {
            engine,
            document,
            data,
            options,
            sessions: BTreeMap::new(),
            static_listeners: Vec::new(),
        }
    }

    pub fn data(&self) -> &ReportData {
        &self.data
    }

    pub fn session(&self, plot: &str) -> Option<&RenderSession> {
        self.sessions.get(plot)
    }

    pub fn sessions(&self) -> impl Iterator<Item = &RenderSession> {
        self.sessions.values()
    }

    /// Render every dataset in name order, isolating failures per plot
    pub async fn render_all(&mut self) -> RenderSummary {
        let mut summary = RenderSummary::default();
        let parsed: Vec<(String, _)> = self
            .data
            .descriptors()
            .map(|(name, result)| (name.to_string(), result))
            .collect();

        for (name, result) in parsed {
            let descriptor = match result {
                Ok(descriptor) => descriptor,
                Err(e) => {
                    log::warn!("Skipping dataset '{}': {}", name, e);
                    summary.skipped += 1;
                    continue;
                }
            };

            if let PlotDescriptor::DownloadHelper(helper) = &descriptor {
                if self.bind_download_helper(&helper.id, helper.format) {
                    summary.helpers += 1;
                }
                continue;
            }

            let id = descriptor.id().to_string();
            match self.render_plot(descriptor).await {
                Ok(()) => summary.rendered += 1,
                Err(e) => {
                    log::warn!("Failed to render '{}' ({}): {}", id, name, e);
                    summary.failed += 1;
                }
            }
        }

        let tables: Vec<String> = self.data.tables.keys().cloned().collect();
        for name in tables {
            let button = table_button(&name);
            if self.document.has_element(&button) {
                let action = ControlAction::DownloadTable { name };
                let id = self.document.add_listener(&button, UiEvent::Click, action);
                self.static_listeners.push(id);
            }
        }

        log::info!(
            "Rendered {} charts, bound {} download helpers, skipped {}, failed {}",
            summary.rendered,
            summary.helpers,
            summary.skipped,
            summary.failed
        );
        summary
    }

    async fn render_plot(&mut self, descriptor: PlotDescriptor) -> RenderResult<()> {
        let mut session = RenderSession::new(descriptor, &self.options.compile)?;
        if self.sessions.values().any(|s| s.target() == session.target())
            || self.sessions.contains_key(session.id())
        {
            return Err(RenderError::TargetInUse {
                target: session.target().to_string(),
            });
        }
        session.attach(&*self.engine, &*self.document).await?;
        self.sessions.insert(session.id().to_string(), session);
        Ok(())
    }

    fn bind_download_helper(&mut self, element: &str, format: ImageFormat) -> bool {
        let button = download_helper_button(element, format);
        if !self.document.has_element(&button) {
            log::debug!("No download button {} for image '{}'", button, element);
            return false;
        }
        let action = ControlAction::DownloadElementImage {
            element: element.to_string(),
            format,
        };
        let id = self.document.add_listener(&button, UiEvent::Click, action);
        self.static_listeners.push(id);
        true
    }

    /// Handle an action raised by a bound control
    pub async fn dispatch(&mut self, action: ControlAction) -> RenderResult<ActionOutcome> {
        match self.handle(action).await {
            Err(e) if e.is_degraded() => {
                log::warn!("{}", e);
                Ok(ActionOutcome::Skipped { reason: e.to_string() })
            }
            other => other,
        }
    }

    async fn handle(&mut self, action: ControlAction) -> RenderResult<ActionOutcome> {
        match action {
            ControlAction::ToggleScale { plot } => {
                let session = self
                    .sessions
                    .get_mut(&plot)
                    .ok_or_else(|| RenderError::unknown_plot(plot.as_str()))?;
                if !session.supports_log() {
                    return Ok(ActionOutcome::Skipped {
                        reason: format!("plot '{}' has a fixed scale", plot),
                    });
                }
                let toggle = session.controls().scale_toggle.clone();
                let mode = if self.document.has_element(&toggle) {
                    ScaleMode::from_checked(self.document.is_checked(&toggle))
                } else {
                    session.mode().toggled()
                };
                session.rebind(&*self.engine, &*self.document, mode).await?;
                Ok(ActionOutcome::Rebound { mode })
            }

            ControlAction::ExportImage { plot, format } => {
                let view = self
                    .attached_session(&plot)?
                    .view()
                    .cloned()
                    .ok_or_else(|| RenderError::export_unavailable("no live view"))?;
                let file = export::export_view_image(&*view, &*self.document, format).await?;
                Ok(ActionOutcome::Saved { file })
            }

            ControlAction::OpenInEditor { plot } => {
                let spec = self.attached_session(&plot)?.current_spec();
                let channel =
                    ExportChannel::open(Rc::clone(&self.document), &spec, &self.options.handoff);
                Ok(ActionOutcome::Handoff(channel.run().boxed_local()))
            }

            ControlAction::SelectionChanged { plot } => {
                let session = self.attached_session(&plot)?;
                let signal = session.view().and_then(|view| view.signal(SELECTION_PARAM));
                let has_selection = SelectionQuery::has_selection(signal.as_ref());
                if let Some(button) = session.controls().node_list.as_deref() {
                    self.document.set_disabled(button, !has_selection);
                }
                Ok(ActionOutcome::SelectionUpdated { has_selection })
            }

            ControlAction::DownloadNodeList { plot } => {
                let session = self.attached_session(&plot)?;
                let PlotDescriptor::Hexbin(hexbin) = session.descriptor() else {
                    return Ok(ActionOutcome::Skipped {
                        reason: format!("plot '{}' has no node list", plot),
                    });
                };
                let marks = session
                    .view()
                    .and_then(|view| view.signal(SELECTION_PARAM))
                    .map(|signal| SelectionQuery::selected_marks(&signal))
                    .unwrap_or_default();
                let rows = SelectionQuery::new(self.options.overflow_cap).resolve(hexbin, &marks);
                log::info!("Exporting {} node rows from '{}'", rows.len(), plot);
                self.save_text(NODE_LIST_FILE, SelectionQuery::to_tsv(&rows))
            }

            ControlAction::DownloadElementImage { element, format } => {
                let file = export::export_element_image(&*self.document, &element, format)?;
                Ok(ActionOutcome::Saved { file })
            }

            ControlAction::DownloadTable { name } => {
                let table = self
                    .data
                    .table(&name)
                    .ok_or_else(|| RenderError::UnknownTable { name: name.clone() })?;
                let body = table.to_tsv();
                self.save_text(&format!("{}.tsv", name), body)
            }
        }
    }

    fn attached_session(&self, plot: &str) -> RenderResult<&RenderSession> {
        self.sessions
            .get(plot)
            .ok_or_else(|| RenderError::unknown_plot(plot))
    }

    fn save_text(&self, name: &str, body: String) -> RenderResult<ActionOutcome> {
        let payload = FilePayload::Text {
            mime: TSV_MIME.to_string(),
            body,
        };
        self.document.save_file(name, payload)?;
        Ok(ActionOutcome::Saved { file: name.to_string() })
    }

    /// Detach every session and drop all report-level listeners
    pub fn teardown(&mut self) {
        for session in self.sessions.values_mut() {
            session.detach(&*self.document);
        }
        self.sessions.clear();
        for id in self.static_listeners.drain(..) {
            self.document.remove_listener(id);
        }
    }
}
