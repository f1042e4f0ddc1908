//! Queries over a parsed bookmark document.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parse a bookmark file leniently. Malformed markup never fails.
pub(crate) fn parse(html: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(html)
}

/// Lowercase local name of an element node.
fn element_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

/// Whether an element names a folder. Only `<H3>` does; `<H1>` is the
/// document title in exported files and must not become a tag.
pub fn is_folder_heading(tag_name: &str) -> bool {
    tag_name.eq_ignore_ascii_case("h3")
}

pub(crate) fn attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == attr_name)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

fn parent(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take();
    let parent = weak.as_ref().and_then(|w| w.upgrade());
    node.parent.set(weak);
    parent
}

fn first_element_child(node: &Handle) -> Option<Handle> {
    node.children
        .borrow()
        .iter()
        .find(|child| element_name(child).is_some())
        .cloned()
}

/// Concatenated text of all descendant text nodes.
pub(crate) fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    let mut stack = vec![node.clone()];
    while let Some(current) = stack.pop() {
        if let NodeData::Text { contents } = &current.data {
            text.push_str(&contents.borrow());
        }
        stack.extend(current.children.borrow().iter().rev().cloned());
    }
    text
}

/// All elements named `tag_name`, in document order.
pub(crate) fn elements_named(root: &Handle, tag_name: &str) -> Vec<Handle> {
    let mut found = Vec::new();
    let mut stack = vec![root.clone()];
    while let Some(current) = stack.pop() {
        if element_name(&current) == Some(tag_name) {
            found.push(current.clone());
        }
        stack.extend(current.children.borrow().iter().rev().cloned());
    }
    found
}

/// Name of the closest folder containing `node`.
///
/// Walks up the ancestors and stops at the first container whose first
/// element child is a folder heading.
pub(crate) fn folder_name(node: &Handle) -> Option<String> {
    let mut current = parent(node);
    while let Some(container) = current {
        if let Some(heading) = first_element_child(&container) {
            if element_name(&heading).is_some_and(is_folder_heading) {
                let name = text_content(&heading)
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join("-");
                return Some(name);
            }
        }
        current = parent(&container);
    }
    None
}
