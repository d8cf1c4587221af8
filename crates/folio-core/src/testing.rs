#![forbid(unsafe_code)]

//! In-memory DOM and intersection watcher for deterministic tests.
//!
//! [`FakeDom`] is an arena of elements that follows the browser semantics the
//! behaviors depend on:
//!
//! - queries return document order (depth-first, pre-order);
//! - scoped queries exclude the scope element itself;
//! - `focus()` on a non-focusable element is ignored;
//! - [`FakeDom::tab_navigate`] performs the browser's default Tab action over
//!   the sequential tab order.
//!
//! Every focus request is recorded so tests can assert on `preventScroll`.

use ahash::AHashMap;

use crate::dom::{Dom, FocusOptions};
use crate::observe::{IntersectionWatcher, WatchOptions};
use crate::selector::{Selector, SelectorSubject};

/// Arena handle for a [`FakeDom`] element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Raw arena index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Description of an element to append.
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    tag: String,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
}

impl ElementSpec {
    /// An element with the given tag name.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Set the `id` attribute.
    #[must_use]
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Add a class.
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// Set the `href` attribute.
    #[must_use]
    pub fn href(self, href: &str) -> Self {
        self.attr("href", href)
    }

    /// Set an arbitrary attribute.
    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }
}

#[derive(Debug, Clone)]
struct FakeNode {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attrs: AHashMap<String, String>,
    classes: Vec<String>,
}

/// A recorded focus request that the element accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusRecord {
    pub node: NodeId,
    pub prevent_scroll: bool,
}

/// In-memory document.
#[derive(Debug, Clone, Default)]
pub struct FakeDom {
    nodes: Vec<FakeNode>,
    roots: Vec<NodeId>,
    active: Option<NodeId>,
    focus_log: Vec<FocusRecord>,
    ignored_focus: usize,
}

#[derive(Clone, Copy)]
struct NodeRef<'a> {
    dom: &'a FakeDom,
    id: NodeId,
}

impl SelectorSubject for NodeRef<'_> {
    fn tag_name(&self) -> String {
        self.dom.node(self.id).tag.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.dom.node(self.id).attrs.get(name).cloned()
    }

    fn has_class(&self, class: &str) -> bool {
        self.dom.node(self.id).classes.iter().any(|c| c == class)
    }

    fn parent(&self) -> Option<Self> {
        self.dom.node(self.id).parent.map(|id| NodeRef { dom: self.dom, id })
    }
}

impl FakeDom {
    /// An empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&self, id: NodeId) -> &FakeNode {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut FakeNode {
        &mut self.nodes[id.0]
    }

    /// Append an element under `parent` (or as a new root) and return it.
    pub fn append(&mut self, parent: Option<NodeId>, spec: ElementSpec) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(FakeNode {
            tag: spec.tag,
            parent,
            children: Vec::new(),
            attrs: spec.attrs.into_iter().collect(),
            classes: spec.classes,
        });
        match parent {
            Some(p) => self.node_mut(p).children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Every element in document order.
    #[must_use]
    pub fn document_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        out
    }

    /// Whether `node` is a strict descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.node(node).parent;
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.node(id).parent;
        }
        false
    }

    fn tabindex(&self, id: NodeId) -> Option<i32> {
        self.node(id)
            .attrs
            .get("tabindex")
            .and_then(|v| v.trim().parse().ok())
    }

    /// Whether `focus()` on this element would succeed.
    #[must_use]
    pub fn is_focusable(&self, id: NodeId) -> bool {
        if self.tabindex(id).is_some() {
            return true;
        }
        let node = self.node(id);
        match node.tag.as_str() {
            "a" | "area" => node.attrs.contains_key("href"),
            "button" | "input" | "select" | "textarea" => !node.attrs.contains_key("disabled"),
            _ => false,
        }
    }

    /// Whether the element takes part in sequential (Tab) navigation.
    #[must_use]
    pub fn is_tabbable(&self, id: NodeId) -> bool {
        self.is_focusable(id) && self.tabindex(id).is_none_or(|t| t >= 0)
    }

    /// The browser's default Tab action: move focus to the next (or
    /// previous) tabbable element in document order. Past either end focus
    /// leaves the document.
    pub fn tab_navigate(&mut self, backward: bool) {
        let mut order: Vec<NodeId> = self
            .document_order()
            .into_iter()
            .filter(|&id| self.is_tabbable(id))
            .collect();
        if backward {
            order.reverse();
        }
        let next = match self.active {
            Some(current) => {
                let current_pos = self.document_position(current);
                order.into_iter().find(|&id| {
                    let pos = self.document_position(id);
                    if backward { pos < current_pos } else { pos > current_pos }
                })
            }
            None => order.into_iter().next(),
        };
        self.active = next;
    }

    fn document_position(&self, id: NodeId) -> usize {
        self.document_order()
            .iter()
            .position(|&n| n == id)
            .unwrap_or(usize::MAX)
    }

    /// Drop focus (as if the user clicked empty page space).
    pub fn blur(&mut self) {
        self.active = None;
    }

    /// Focus requests that were accepted, oldest first.
    #[must_use]
    pub fn focus_log(&self) -> &[FocusRecord] {
        &self.focus_log
    }

    /// Number of focus requests ignored because the element was not focusable.
    #[must_use]
    pub fn ignored_focus_requests(&self) -> usize {
        self.ignored_focus
    }

    /// Classes on an element, in insertion order.
    #[must_use]
    pub fn classes(&self, id: NodeId) -> &[String] {
        &self.node(id).classes
    }
}

impl Dom for FakeDom {
    type Node = NodeId;

    fn query_all(&self, scope: Option<&NodeId>, selector: &Selector) -> Vec<NodeId> {
        self.document_order()
            .into_iter()
            .filter(|&id| scope.is_none_or(|&s| self.is_descendant(id, s)))
            .filter(|&id| selector.matches(&NodeRef { dom: self, id }))
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.document_order()
            .into_iter()
            .find(|&n| self.node(n).attrs.get("id").is_some_and(|v| v == id))
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.node(*node).attrs.get(name).cloned()
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        self.node_mut(*node)
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        let classes = &mut self.node_mut(*node).classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        self.node_mut(*node).classes.retain(|c| c != class);
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.node(*node).classes.iter().any(|c| c == class)
    }

    fn active_element(&self) -> Option<NodeId> {
        self.active
    }

    fn focus(&mut self, node: &NodeId, options: FocusOptions) {
        if !self.is_focusable(*node) {
            self.ignored_focus += 1;
            return;
        }
        self.active = Some(*node);
        self.focus_log.push(FocusRecord {
            node: *node,
            prevent_scroll: options.prevent_scroll,
        });
    }
}

/// Intersection watcher that records registrations.
#[derive(Debug, Clone)]
pub struct RecordingWatcher<N> {
    options: WatchOptions,
    observed: Vec<N>,
    observe_calls: usize,
    unobserve_calls: usize,
}

impl<N: Clone + PartialEq> RecordingWatcher<N> {
    /// A watcher created with `options`.
    #[must_use]
    pub fn new(options: WatchOptions) -> Self {
        Self {
            options,
            observed: Vec::new(),
            observe_calls: 0,
            unobserve_calls: 0,
        }
    }

    /// The options the watcher was created with.
    #[must_use]
    pub fn options(&self) -> WatchOptions {
        self.options
    }

    /// Whether `node` is currently registered.
    #[must_use]
    pub fn is_observing(&self, node: &N) -> bool {
        self.observed.contains(node)
    }

    /// Currently registered elements, in registration order.
    #[must_use]
    pub fn observed(&self) -> &[N] {
        &self.observed
    }

    /// Total `observe` calls, including repeats.
    #[must_use]
    pub fn observe_calls(&self) -> usize {
        self.observe_calls
    }

    /// Total `unobserve` calls, including repeats.
    #[must_use]
    pub fn unobserve_calls(&self) -> usize {
        self.unobserve_calls
    }
}

impl<N: Clone + PartialEq> IntersectionWatcher<N> for RecordingWatcher<N> {
    fn observe(&mut self, node: &N) {
        self.observe_calls += 1;
        if !self.observed.contains(node) {
            self.observed.push(node.clone());
        }
    }

    fn unobserve(&mut self, node: &N) {
        self.unobserve_calls += 1;
        self.observed.retain(|n| n != node);
    }
}
