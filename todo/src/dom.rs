//! A small element tree standing in for the browser DOM.
//!
//! Rendering produces an [`Element`] tree; user interaction arrives as
//! [`DomEvent`]s addressed to an element by [`Target`]. Elements carry the
//! [`Handler`]s that turn those events into [`TodoAction`]s.

use crate::types::TodoAction;
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

/// Elements rendered without a closing tag
const VOID_ELEMENTS: [&str; 1] = ["input"];

/// Attributes whose presence alone means "true"
const BOOLEAN_ATTRIBUTES: [&str; 1] = ["checked"];

/// The kind of a [`DomEvent`], used to look up handlers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Mouse click (or keyboard activation)
    Click,
    /// Text input value changed
    Input,
    /// Key released
    KeyUp,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Click => "click",
            Self::Input => "input",
            Self::KeyUp => "keyup",
        })
    }
}

/// A user interaction delivered to one element
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomEvent {
    /// Element was clicked
    Click,
    /// Input value changed to `value`
    Input {
        /// New value of the input
        value: String,
    },
    /// Key named `key` was released
    KeyUp {
        /// Key name, e.g. `Enter` or `g`
        key: String,
    },
}

impl DomEvent {
    /// `Input` event with the given value
    #[must_use]
    pub fn input(value: impl Into<String>) -> Self {
        Self::Input {
            value: value.into(),
        }
    }

    /// `KeyUp` event for the given key name
    #[must_use]
    pub fn key_up(key: impl Into<String>) -> Self {
        Self::KeyUp { key: key.into() }
    }

    /// The kind of this event
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Click => EventKind::Click,
            Self::Input { .. } => EventKind::Input,
            Self::KeyUp { .. } => EventKind::KeyUp,
        }
    }
}

/// How an element reacts to an event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Handler {
    /// Send a fixed action
    Dispatch(TodoAction),
    /// Copy the event's value into the element and send `UpdateDraft`
    BindDraft,
    /// Send `CreateTodo` with the element's current value and the released key
    SubmitDraft,
}

/// Address of an element
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// Element with this `id` attribute
    Id(String),
    /// Element with this `name` attribute
    Name(String),
}

impl Target {
    /// Target by `id`
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Target by `name`
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Name(name) => write!(f, "[name={name}]"),
        }
    }
}

/// A child of an element
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// Nested element
    Element(Element),
    /// Text content
    Text(String),
}

/// One element of the rendered tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    children: Vec<Node>,
    handlers: Vec<(EventKind, Handler)>,
}

impl Element {
    /// Creates an empty element
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            children: Vec::new(),
            handlers: Vec::new(),
        }
    }

    /// Sets the `id` attribute
    #[must_use]
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_attr("id", id)
    }

    /// Sets an attribute
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sets a boolean attribute when `on` is true
    #[must_use]
    pub fn with_flag(self, name: &str, on: bool) -> Self {
        if on { self.with_attr(name, "") } else { self }
    }

    /// Adds a class
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Adds a class when `on` is true
    #[must_use]
    pub fn with_class_if(self, class: &str, on: bool) -> Self {
        if on { self.with_class(class) } else { self }
    }

    /// Appends a text node
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Appends a child element
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Appends several child elements
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children.into_iter().map(Node::Element));
        self
    }

    /// Registers a handler for an event kind
    #[must_use]
    pub fn on(mut self, kind: EventKind, handler: Handler) -> Self {
        self.handlers.push((kind, handler));
        self
    }

    /// Tag name
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attribute value, if present
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Overwrites an attribute in place
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// `id` attribute, if present
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// `value` attribute, empty when absent
    #[must_use]
    pub fn value(&self) -> &str {
        self.attr("value").unwrap_or_default()
    }

    /// Whether the `checked` flag is set
    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.attributes.contains_key("checked")
    }

    /// Whether the element carries `class`
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Handler registered for `kind`, if any
    #[must_use]
    pub fn handler(&self, kind: EventKind) -> Option<&Handler> {
        self.handlers
            .iter()
            .find(|(registered, _)| *registered == kind)
            .map(|(_, handler)| handler)
    }

    /// Child elements (text nodes skipped)
    pub fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Concatenated text of this element and all descendants
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }

    /// First element (depth-first, self included) matching `predicate`
    pub fn find(&self, predicate: &impl Fn(&Self) -> bool) -> Option<&Self> {
        if predicate(self) {
            return Some(self);
        }
        self.child_elements().find_map(|child| child.find(predicate))
    }

    /// Mutable variant of [`Element::find`]
    pub fn find_mut(&mut self, predicate: &impl Fn(&Self) -> bool) -> Option<&mut Self> {
        if predicate(self) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(element) => element.find_mut(predicate),
            Node::Text(_) => None,
        })
    }

    /// All elements (depth-first, self included) matching `predicate`
    #[must_use]
    pub fn find_all(&self, predicate: &impl Fn(&Self) -> bool) -> Vec<&Self> {
        let mut found = Vec::new();
        self.collect_matching(predicate, &mut found);
        found
    }

    fn collect_matching<'a>(&'a self, predicate: &impl Fn(&Self) -> bool, found: &mut Vec<&'a Self>) {
        if predicate(self) {
            found.push(self);
        }
        for child in self.child_elements() {
            child.collect_matching(predicate, found);
        }
    }

    /// Element with the given `id`
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Self> {
        self.find(&|e: &Self| e.id() == Some(id))
    }

    /// Element with the given `name`
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Self> {
        self.find(&|e: &Self| e.attr("name") == Some(name))
    }

    /// First element with the given tag
    #[must_use]
    pub fn find_by_tag(&self, tag: &str) -> Option<&Self> {
        self.find(&|e: &Self| e.tag == tag)
    }

    /// Element addressed by `target`
    #[must_use]
    pub fn find_target(&self, target: &Target) -> Option<&Self> {
        match target {
            Target::Id(id) => self.find_by_id(id),
            Target::Name(name) => self.find_by_name(name),
        }
    }

    /// Mutable element addressed by `target`
    pub fn find_target_mut(&mut self, target: &Target) -> Option<&mut Self> {
        match target {
            Target::Id(id) => self.find_mut(&|e: &Self| e.id() == Some(id.as_str())),
            Target::Name(name) => self.find_mut(&|e: &Self| e.attr("name") == Some(name.as_str())),
        }
    }

    /// Serializes the tree as HTML
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&self.classes.join(" ")));
        }
        for (name, value) in &self.attributes {
            if BOOLEAN_ATTRIBUTES.contains(&name.as_str()) {
                let _ = write!(out, " {name}");
            } else {
                let _ = write!(out, " {name}=\"{}\"", escape(value));
            }
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return;
        }

        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(&escape(text)),
                Node::Element(element) => element.write_html(out),
            }
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

/// Escapes text for HTML content and attribute values
fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Filter;

    fn sample() -> Element {
        Element::new("div")
            .with_class("box")
            .with_child(Element::new("h1").with_text("Title"))
            .with_child(
                Element::new("input")
                    .with_attr("name", "field")
                    .with_attr("value", "a<b")
                    .with_flag("checked", true)
                    .on(EventKind::Input, Handler::BindDraft),
            )
            .with_child(
                Element::new("button")
                    .with_id("go")
                    .with_class_if("active", false)
                    .with_text("Go & stop")
                    .on(EventKind::Click, Handler::Dispatch(Filter::Active.into())),
            )
    }

    #[test]
    fn finds_elements_by_id_name_and_tag() {
        let root = sample();

        assert_eq!(root.find_by_id("go").map(Element::tag), Some("button"));
        assert_eq!(root.find_by_name("field").map(Element::value), Some("a<b"));
        assert_eq!(root.find_by_tag("h1").map(Element::text).as_deref(), Some("Title"));
        assert!(root.find_by_id("missing").is_none());
        assert_eq!(root.find_all(&|e: &Element| e.tag() != "div").len(), 3);
    }

    #[test]
    fn text_is_collected_recursively() {
        assert_eq!(sample().text(), "TitleGo & stop");
    }

    #[test]
    fn classes_flags_and_handlers() {
        let root = sample();
        let input = root.find_by_name("field");
        let button = root.find_by_id("go");

        assert!(root.has_class("box"));
        assert!(input.is_some_and(Element::is_checked));
        assert!(button.is_some_and(|b| !b.has_class("active")));
        assert_eq!(
            button.and_then(|b| b.handler(EventKind::Click)),
            Some(&Handler::Dispatch(TodoAction::SetFilter {
                filter: Filter::Active
            }))
        );
        assert!(button.and_then(|b| b.handler(EventKind::KeyUp)).is_none());
    }

    #[test]
    fn set_attr_through_target() {
        let mut root = sample();
        if let Some(input) = root.find_target_mut(&Target::name("field")) {
            input.set_attr("value", "typed");
        }
        assert_eq!(
            root.find_target(&Target::name("field")).map(Element::value),
            Some("typed")
        );
    }

    #[test]
    fn html_is_escaped_and_void_elements_are_not_closed() {
        let html = sample().to_html();
        assert_eq!(
            html,
            "<div class=\"box\"><h1>Title</h1>\
             <input checked name=\"field\" value=\"a&lt;b\">\
             <button id=\"go\">Go &amp; stop</button></div>"
        );
        assert_eq!(sample().to_string(), html);
    }

    #[test]
    fn event_kinds_and_targets_display() {
        assert_eq!(DomEvent::key_up("Enter").kind(), EventKind::KeyUp);
        assert_eq!(DomEvent::input("x").kind().to_string(), "input");
        assert_eq!(Target::id("all-todos").to_string(), "#all-todos");
        assert_eq!(Target::name("new-todo").to_string(), "[name=new-todo]");
    }
}
