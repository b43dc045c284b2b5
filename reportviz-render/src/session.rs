//! Render sessions
//!
//! A [`RenderSession`] owns at most one live view for one DOM target. Every
//! re-render embeds the new document first and only then swaps views: the old
//! view is finalized, its listeners removed, and fresh listeners registered for
//! the new one. A rebind that fails or is dropped mid-embed leaves the previous
//! view and listeners in place.

use reportviz_core::{
    compile::SELECTION_PARAM, CompileOptions, CompiledPlot, ImageFormat, PlotDescriptor, PlotKind,
    ScaleMode, SpecDocument,
};
use std::rc::Rc;

use crate::controls::{ControlAction, ControlIds};
use crate::error::{RenderError, RenderResult};
use crate::host::{Document, ListenerId, RenderEngine, UiEvent, View};

pub struct RenderSession {
    descriptor: PlotDescriptor,
    controls: ControlIds,
    compiled: CompiledPlot,
    mode: ScaleMode,
    view: Option<Rc<dyn View>>,
    view_listeners: Vec<ListenerId>,
    signal_listener: Option<ListenerId>,
    toggle_listener: Option<ListenerId>,
}

impl RenderSession {
    pub fn new(descriptor: PlotDescriptor, options: &CompileOptions) -> RenderResult<Self> {
        let compiled = CompiledPlot::new(&descriptor, options)?;
        let controls = ControlIds::for_plot(descriptor.kind(), descriptor.id());
        Ok(Self {
            descriptor,
            controls,
            compiled,
            mode: ScaleMode::Linear,
            view: None,
            view_listeners: Vec::new(),
            signal_listener: None,
            toggle_listener: None,
        })
    }

    pub fn id(&self) -> &str {
        self.descriptor.id()
    }

    pub fn kind(&self) -> PlotKind {
        self.descriptor.kind()
    }

    pub fn descriptor(&self) -> &PlotDescriptor {
        &self.descriptor
    }

    pub fn controls(&self) -> &ControlIds {
        &self.controls
    }

    pub fn target(&self) -> &str {
        &self.controls.target
    }

    pub fn mode(&self) -> ScaleMode {
        self.mode
    }

    pub fn supports_log(&self) -> bool {
        self.compiled.supports_log()
    }

    pub fn view(&self) -> Option<&Rc<dyn View>> {
        self.view.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.view.is_some()
    }

    /// Document for the currently displayed scale mode
    pub fn current_spec(&self) -> SpecDocument {
        self.compiled.at(self.mode)
    }

    /// Initial render into the session's target
    pub async fn attach(
        &mut self,
        engine: &dyn RenderEngine,
        document: &dyn Document,
    ) -> RenderResult<()> {
        if !document.has_element(&self.controls.target) {
            return Err(RenderError::missing_target(self.id(), self.target()));
        }

        let has_toggle = self.supports_log() && document.has_element(&self.controls.scale_toggle);
        let mode = if has_toggle {
            ScaleMode::from_checked(document.is_checked(&self.controls.scale_toggle))
        } else {
            ScaleMode::Linear
        };

        self.rebind(engine, document, mode).await?;

        if has_toggle && self.toggle_listener.is_none() {
            let action = ControlAction::ToggleScale { plot: self.id().to_string() };
            self.toggle_listener =
                Some(document.add_listener(&self.controls.scale_toggle, UiEvent::Change, action));
        }

        log::info!("Rendered {} plot '{}' ({})", self.kind(), self.id(), self.mode);
        Ok(())
    }

    /// Re-render at `mode` and move every view-scoped listener to the new view
    pub async fn rebind(
        &mut self,
        engine: &dyn RenderEngine,
        document: &dyn Document,
        mode: ScaleMode,
    ) -> RenderResult<()> {
        let spec = self.compiled.at(mode);
        let view = engine.embed(&self.controls.target, &spec).await?;

        self.release_view(document);
        self.mode = mode;
        self.install_view(view, document);

        log::debug!("Rebound '{}' in {} mode", self.id(), mode);
        Ok(())
    }

    /// Finalize the view and remove all listeners
    pub fn detach(&mut self, document: &dyn Document) {
        self.release_view(document);
        if let Some(id) = self.toggle_listener.take() {
            document.remove_listener(id);
        }
    }

    fn release_view(&mut self, document: &dyn Document) {
        for id in self.view_listeners.drain(..) {
            document.remove_listener(id);
        }
        if let Some(view) = self.view.take() {
            if let Some(id) = self.signal_listener.take() {
                view.remove_signal_listener(id);
            }
            view.finalize();
        }
    }

    fn install_view(&mut self, view: Rc<dyn View>, document: &dyn Document) {
        let plot = self.id().to_string();

        for format in [ImageFormat::Png, ImageFormat::Svg] {
            let button = self.controls.export_button(format);
            if document.has_element(button) {
                let action = ControlAction::ExportImage { plot: plot.clone(), format };
                self.view_listeners.push(document.add_listener(button, UiEvent::Click, action));
            }
        }

        if document.has_element(&self.controls.editor) {
            let action = ControlAction::OpenInEditor { plot: plot.clone() };
            self.view_listeners
                .push(document.add_listener(&self.controls.editor, UiEvent::Click, action));
        }

        if let Some(button) = self.controls.node_list.as_deref() {
            // a fresh view starts without a selection
            document.set_disabled(button, true);
            if document.has_element(button) {
                let action = ControlAction::DownloadNodeList { plot: plot.clone() };
                self.view_listeners.push(document.add_listener(button, UiEvent::Click, action));
            }
            let action = ControlAction::SelectionChanged { plot };
            self.signal_listener = Some(view.add_signal_listener(SELECTION_PARAM, action));
        }

        self.view = Some(view);
    }
}
