//! # Page View-Model
//!
//! A small, shared-handle model of the parts of the reservation page the
//! widgets touch. Widgets receive [`Element`] handles at construction instead
//! of querying a live document, so every widget can be driven and inspected
//! without a browser.
//!
//! ## Conventions
//!
//! - Visibility follows Bootstrap: an element is hidden while it carries the
//!   [`HIDDEN_CLASS`] class.
//! - Events are dispatched on a single element; there is no bubbling.
//! - [`Element::outer_html`] escapes text and attribute values.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Bootstrap utility class that hides an element.
pub const HIDDEN_CLASS: &str = "d-none";

const VOID_TAGS: [&str; 4] = ["input", "br", "hr", "img"];

/// The event types the page reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Change,
}

/// State of a single dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    kind: EventKind,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Cancels the element's default action (navigation, form submission).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stops the remaining listeners of this dispatch from running.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Callback registered with [`Element::add_event_listener`].
pub type Listener = Arc<dyn Fn(&Element, &mut Event) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Auto,
    Smooth,
}

struct Node {
    tag: String,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    text: String,
    value: String,
    children: Vec<Element>,
    listeners: Vec<(EventKind, Listener)>,
    scroll_requests: Vec<ScrollBehavior>,
}

/// A cheaply clonable handle to a page element.
///
/// Clones share state: a write through one handle is visible through all.
#[derive(Clone)]
pub struct Element {
    node: Arc<Mutex<Node>>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            node: Arc::new(Mutex::new(Node {
                tag: tag.to_ascii_lowercase(),
                attributes: Vec::new(),
                classes: Vec::new(),
                text: String::new(),
                value: String::new(),
                children: Vec::new(),
                listeners: Vec::new(),
                scroll_requests: Vec::new(),
            })),
        }
    }

    fn node(&self) -> MutexGuard<'_, Node> {
        self.node.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_id(self, id: &str) -> Self {
        self.with_attribute("id", id)
    }

    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_class(self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            self.add_class(class);
        }
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.set_text_content(text);
        self
    }

    pub fn with_value(self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn with_child(self, child: Element) -> Self {
        self.append_child(child);
        self
    }

    pub fn tag(&self) -> String {
        self.node().tag.clone()
    }

    pub fn id(&self) -> Option<String> {
        self.attribute("id")
    }

    /// A handle that does not keep the element alive.
    pub fn downgrade(&self) -> WeakElement {
        WeakElement {
            node: Arc::downgrade(&self.node),
        }
    }

    /// Whether both handles point at the same element.
    pub fn ptr_eq(&self, other: &Element) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        let node = self.node();
        if name == "class" {
            return (!node.classes.is_empty()).then(|| node.classes.join(" "));
        }
        node.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        if name == "class" {
            let mut node = self.node();
            node.classes = value.split_whitespace().map(str::to_string).collect();
            return;
        }

        let mut node = self.node();
        match node.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => node.attributes.push((name.to_string(), value.to_string())),
        }
    }

    /// Reads a `data-*` attribute, e.g. `data("target-time")`.
    pub fn data(&self, name: &str) -> Option<String> {
        self.attribute(&format!("data-{name}"))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.node().classes.iter().any(|existing| existing == class)
    }

    pub fn add_class(&self, class: &str) {
        let mut node = self.node();
        if !node.classes.iter().any(|existing| existing == class) {
            node.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&self, class: &str) {
        self.node().classes.retain(|existing| existing != class);
    }

    pub fn is_hidden(&self) -> bool {
        self.has_class(HIDDEN_CLASS)
    }

    pub fn set_hidden(&self, hidden: bool) {
        if hidden {
            self.add_class(HIDDEN_CLASS);
        } else {
            self.remove_class(HIDDEN_CLASS);
        }
    }

    /// Own text followed by the text of all descendants.
    pub fn text_content(&self) -> String {
        let (mut text, children) = {
            let node = self.node();
            (node.text.clone(), node.children.clone())
        };
        for child in children {
            text.push_str(&child.text_content());
        }
        text
    }

    /// Replaces all children with the given text.
    pub fn set_text_content(&self, text: &str) {
        let mut node = self.node();
        node.children.clear();
        node.text = text.to_string();
    }

    pub fn value(&self) -> String {
        self.node().value.clone()
    }

    pub fn set_value(&self, value: &str) {
        self.node().value = value.to_string();
    }

    pub fn children(&self) -> Vec<Element> {
        self.node().children.clone()
    }

    pub fn append_child(&self, child: Element) {
        self.node().children.push(child);
    }

    /// Removes `child` if it is a direct child. Returns whether anything was removed.
    pub fn remove_child(&self, child: &Element) -> bool {
        let mut node = self.node();
        let before = node.children.len();
        node.children.retain(|existing| !existing.ptr_eq(child));
        node.children.len() != before
    }

    pub fn contains_child(&self, child: &Element) -> bool {
        self.node().children.iter().any(|existing| existing.ptr_eq(child))
    }

    /// Removes text and children.
    pub fn clear(&self) {
        let mut node = self.node();
        node.children.clear();
        node.text.clear();
    }

    /// All descendants in document order, excluding `self`.
    pub fn descendants(&self) -> Vec<Element> {
        let mut found = Vec::new();
        for child in self.children() {
            found.push(child.clone());
            found.extend(child.descendants());
        }
        found
    }

    pub fn find_all(&self, predicate: impl Fn(&Element) -> bool) -> Vec<Element> {
        self.descendants()
            .into_iter()
            .filter(|element| predicate(element))
            .collect()
    }

    pub fn find_first(&self, predicate: impl Fn(&Element) -> bool) -> Option<Element> {
        self.descendants()
            .into_iter()
            .find(|element| predicate(element))
    }

    pub fn add_event_listener<F>(&self, kind: EventKind, listener: F)
    where
        F: Fn(&Element, &mut Event) + Send + Sync + 'static,
    {
        self.node().listeners.push((kind, Arc::new(listener)));
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.node()
            .listeners
            .iter()
            .filter(|(registered, _)| *registered == kind)
            .count()
    }

    /// Runs every listener registered for `kind`, in registration order, until
    /// one of them stops propagation.
    pub fn dispatch(&self, kind: EventKind) -> Event {
        let listeners: Vec<Listener> = self
            .node()
            .listeners
            .iter()
            .filter(|(registered, _)| *registered == kind)
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        let mut event = Event::new(kind);
        for listener in listeners {
            listener(self, &mut event);
            if event.propagation_stopped() {
                break;
            }
        }
        event
    }

    pub fn click(&self) -> Event {
        self.dispatch(EventKind::Click)
    }

    pub fn scroll_into_view(&self, behavior: ScrollBehavior) {
        self.node().scroll_requests.push(behavior);
    }

    pub fn scroll_requests(&self) -> Vec<ScrollBehavior> {
        self.node().scroll_requests.clone()
    }

    pub fn inner_html(&self) -> String {
        let (text, children) = {
            let node = self.node();
            (node.text.clone(), node.children.clone())
        };

        let mut html = escape_html(&text);
        for child in children {
            html.push_str(&child.outer_html());
        }
        html
    }

    pub fn outer_html(&self) -> String {
        let (tag, mut attributes) = {
            let node = self.node();
            (node.tag.clone(), node.attributes.clone())
        };
        if let Some(classes) = self.attribute("class") {
            attributes.insert(0, ("class".to_string(), classes));
        }

        let mut html = format!("<{tag}");
        for (name, value) in attributes {
            html.push_str(&format!(" {name}=\"{}\"", escape_html(&value)));
        }
        html.push('>');

        if VOID_TAGS.contains(&tag.as_str()) {
            return html;
        }

        html.push_str(&self.inner_html());
        html.push_str(&format!("</{tag}>"));
        html
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node();
        f.debug_struct("Element")
            .field("tag", &node.tag)
            .field("attributes", &node.attributes)
            .field("classes", &node.classes)
            .field("children_len", &node.children.len())
            .finish()
    }
}

/// Non-owning counterpart of [`Element`], for listeners and timers that must
/// not keep a removed element alive.
#[derive(Clone)]
pub struct WeakElement {
    node: Weak<Mutex<Node>>,
}

impl WeakElement {
    pub fn upgrade(&self) -> Option<Element> {
        self.node.upgrade().map(|node| Element { node })
    }
}

/// The root of a page view-model.
#[derive(Debug, Clone)]
pub struct Document {
    body: Element,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            body: Element::new("body"),
        }
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    /// Appends `element` to the body and hands it back.
    pub fn append(&self, element: Element) -> Element {
        self.body.append_child(element.clone());
        element
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<Element> {
        self.body
            .find_first(|element| element.id().as_deref() == Some(id))
    }

    /// `input[name="{name}"]`
    pub fn input_by_name(&self, name: &str) -> Option<Element> {
        self.body.find_first(|element| {
            element.tag() == "input" && element.attribute("name").as_deref() == Some(name)
        })
    }

    pub fn query_all(&self, predicate: impl Fn(&Element) -> bool) -> Vec<Element> {
        self.body.find_all(predicate)
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
