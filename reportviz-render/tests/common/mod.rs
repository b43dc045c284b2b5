//! In-memory host used by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use reportviz_core::{ImageFormat, SpecDocument};
use reportviz_render::{
    BrowsingContext, ContextId, ControlAction, Document, ElementImage, FilePayload, HostError,
    ListenerId, MessageEvent, RenderEngine, UiEvent, View,
};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;
use tokio::sync::mpsc::{self, UnboundedSender};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Default)]
pub struct FakeEngine {
    pub views: RefCell<Vec<Rc<FakeView>>>,
    fail_next: Cell<bool>,
}

impl FakeEngine {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn fail_next_embed(&self) {
        self.fail_next.set(true);
    }

    pub fn embed_count(&self) -> usize {
        self.views.borrow().len()
    }

    pub fn last_view(&self) -> Rc<FakeView> {
        Rc::clone(self.views.borrow().last().expect("at least one embed"))
    }
}

#[async_trait(?Send)]
impl RenderEngine for FakeEngine {
    async fn embed(&self, target: &str, spec: &SpecDocument) -> Result<Rc<dyn View>, HostError> {
        if self.fail_next.replace(false) {
            return Err(HostError::embed(format!("cannot embed into {}", target)));
        }
        let view = Rc::new(FakeView::new(target, spec.clone()));
        self.views.borrow_mut().push(Rc::clone(&view));
        Ok(view as Rc<dyn View>)
    }
}

pub struct FakeView {
    pub target: String,
    pub spec: SpecDocument,
    pub finalized: Cell<bool>,
    pub fail_encoding: Cell<bool>,
    signals: RefCell<HashMap<String, Value>>,
    signal_listeners: RefCell<BTreeMap<ListenerId, (String, ControlAction)>>,
    next_listener: Cell<ListenerId>,
}

impl FakeView {
    fn new(target: &str, spec: SpecDocument) -> Self {
        Self {
            target: target.to_string(),
            spec,
            finalized: Cell::new(false),
            fail_encoding: Cell::new(false),
            signals: RefCell::new(HashMap::new()),
            signal_listeners: RefCell::new(BTreeMap::new()),
            next_listener: Cell::new(1),
        }
    }

    pub fn set_signal(&self, name: &str, value: Value) {
        self.signals.borrow_mut().insert(name.to_string(), value);
    }

    pub fn signal_listener_count(&self) -> usize {
        self.signal_listeners.borrow().len()
    }

    /// Actions the engine would raise for a change of `name`
    pub fn signal_actions(&self, name: &str) -> Vec<ControlAction> {
        self.signal_listeners
            .borrow()
            .values()
            .filter(|(signal, _)| signal == name)
            .map(|(_, action)| action.clone())
            .collect()
    }
}

#[async_trait(?Send)]
impl View for FakeView {
    async fn to_image_url(&self, format: ImageFormat) -> Result<String, HostError> {
        if self.fail_encoding.get() {
            return Err(HostError::encoding("renderer cannot encode"));
        }
        Ok(format!("data:{};base64,AAAA", format.mime_type()))
    }

    fn signal(&self, name: &str) -> Option<Value> {
        self.signals.borrow().get(name).cloned()
    }

    fn add_signal_listener(&self, name: &str, action: ControlAction) -> ListenerId {
        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        self.signal_listeners
            .borrow_mut()
            .insert(id, (name.to_string(), action));
        id
    }

    fn remove_signal_listener(&self, id: ListenerId) {
        self.signal_listeners.borrow_mut().remove(&id);
    }

    fn finalize(&self) {
        self.finalized.set(true);
    }
}

pub struct FakeContext {
    id: ContextId,
    pub posted: RefCell<Vec<(Value, String)>>,
}

impl FakeContext {
    pub fn post_count(&self) -> usize {
        self.posted.borrow().len()
    }
}

impl BrowsingContext for FakeContext {
    fn id(&self) -> ContextId {
        self.id
    }

    fn post_message(&self, message: &Value, target_origin: &str) {
        self.posted
            .borrow_mut()
            .push((message.clone(), target_origin.to_string()));
    }
}

#[derive(Default)]
pub struct FakeDocument {
    elements: RefCell<HashSet<String>>,
    checked: RefCell<HashSet<String>>,
    disabled: RefCell<HashMap<String, bool>>,
    listeners: RefCell<BTreeMap<ListenerId, (String, UiEvent, ControlAction)>>,
    next_listener: Cell<ListenerId>,
    images: RefCell<HashMap<String, ElementImage>>,
    pub saved: RefCell<Vec<(String, FilePayload)>>,
    block_popups: Cell<bool>,
    pub windows: RefCell<Vec<Rc<FakeContext>>>,
    message_senders: RefCell<BTreeMap<ListenerId, UnboundedSender<MessageEvent>>>,
}

impl FakeDocument {
    pub fn with_elements(ids: &[&str]) -> Rc<Self> {
        let doc = Self::default();
        doc.next_listener.set(1);
        doc.elements
            .borrow_mut()
            .extend(ids.iter().map(|id| id.to_string()));
        Rc::new(doc)
    }

    pub fn set_checked(&self, id: &str, checked: bool) {
        if checked {
            self.checked.borrow_mut().insert(id.to_string());
        } else {
            self.checked.borrow_mut().remove(id);
        }
    }

    pub fn set_image(&self, id: &str, image: ElementImage) {
        self.elements.borrow_mut().insert(id.to_string());
        self.images.borrow_mut().insert(id.to_string(), image);
    }

    pub fn block_popups(&self) {
        self.block_popups.set(true);
    }

    pub fn is_disabled(&self, id: &str) -> bool {
        self.disabled.borrow().get(id).copied().unwrap_or(false)
    }

    pub fn listeners_on(&self, id: &str, event: UiEvent) -> usize {
        self.listeners
            .borrow()
            .values()
            .filter(|(element, ev, _)| element == id && *ev == event)
            .count()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Action bound to the first listener of `id`, as a click would deliver it
    pub fn action_for(&self, id: &str, event: UiEvent) -> Option<ControlAction> {
        self.listeners
            .borrow()
            .values()
            .find(|(element, ev, _)| element == id && *ev == event)
            .map(|(_, _, action)| action.clone())
    }

    pub fn message_listener_count(&self) -> usize {
        self.message_senders.borrow().len()
    }

    /// Deliver a window message to every live message listener
    pub fn deliver_message(&self, source: Option<ContextId>, data: Value) {
        for sender in self.message_senders.borrow().values() {
            let _ = sender.send(MessageEvent { source, data: data.clone() });
        }
    }

    /// Sender of the most recent message listener, for messages sent from other tasks
    pub fn message_sender(&self) -> UnboundedSender<MessageEvent> {
        self.message_senders
            .borrow()
            .values()
            .last()
            .cloned()
            .expect("a message listener")
    }

    pub fn saved_files(&self) -> Vec<String> {
        self.saved.borrow().iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn saved_text(&self, name: &str) -> Option<String> {
        self.saved.borrow().iter().rev().find_map(|(n, payload)| match payload {
            FilePayload::Text { body, .. } if n == name => Some(body.clone()),
            _ => None,
        })
    }

    fn next_id(&self) -> ListenerId {
        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        id
    }
}

impl Document for FakeDocument {
    fn has_element(&self, id: &str) -> bool {
        self.elements.borrow().contains(id)
    }

    fn is_checked(&self, id: &str) -> bool {
        self.checked.borrow().contains(id)
    }

    fn add_listener(&self, element_id: &str, event: UiEvent, action: ControlAction) -> ListenerId {
        let id = self.next_id();
        self.listeners
            .borrow_mut()
            .insert(id, (element_id.to_string(), event, action));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().remove(&id);
        self.message_senders.borrow_mut().remove(&id);
    }

    fn set_disabled(&self, element_id: &str, disabled: bool) {
        self.disabled
            .borrow_mut()
            .insert(element_id.to_string(), disabled);
    }

    fn save_file(&self, name: &str, payload: FilePayload) -> Result<(), HostError> {
        self.saved.borrow_mut().push((name.to_string(), payload));
        Ok(())
    }

    fn element_image(&self, id: &str) -> Option<ElementImage> {
        self.images.borrow().get(id).cloned()
    }

    fn open_window(&self, _url: &str) -> Option<Rc<dyn BrowsingContext>> {
        if self.block_popups.get() {
            return None;
        }
        let context = Rc::new(FakeContext {
            id: 100 + self.windows.borrow().len() as ContextId,
            posted: RefCell::new(Vec::new()),
        });
        self.windows.borrow_mut().push(Rc::clone(&context));
        Some(context as Rc<dyn BrowsingContext>)
    }

    fn listen_messages(&self) -> (ListenerId, mpsc::UnboundedReceiver<MessageEvent>) {
        let id = self.next_id();
        let (tx, rx) = mpsc::unbounded_channel();
        self.message_senders.borrow_mut().insert(id, tx);
        (id, rx)
    }
}
