// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A simple reference-counted DOM.
//!
//! This is sufficient as a static parse tree, but don't build a
//! web browser using it. :)

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tendril::StrTendril;

use crate::driver::ParseResult;
use crate::tokenizer::Attribute;
use crate::tree_builder::{AppendNode, AppendText, NodeOrText, TreeSink};
use crate::LocalName;

/// The different kinds of nodes in the DOM.
#[derive(Debug)]
pub enum NodeData {
    /// The `Document` itself.
    Document,

    /// A `DOCTYPE` with name, public id, and system id.
    Doctype {
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    },

    /// A text node.
    Text { contents: RefCell<StrTendril> },

    /// A comment.
    Comment { contents: StrTendril },

    /// An element with attributes.
    Element {
        name: LocalName,
        attrs: RefCell<Vec<Attribute>>,

        /// The form this element was associated with when it was created.
        form_owner: RefCell<Option<WeakHandle>>,
    },
}

/// A DOM node.
pub struct Node {
    /// Represents this node's data.
    pub data: NodeData,
    /// Parent node.
    pub parent: Cell<Option<WeakHandle>>,
    /// Child nodes of this node.
    pub children: RefCell<Vec<Handle>>,
}

impl Node {
    /// Create a new node from its contents.
    pub fn new(data: NodeData) -> Rc<Self> {
        Rc::new(Node {
            data,
            parent: Cell::new(None),
            children: RefCell::new(Vec::new()),
        })
    }

    /// The element name, if this is an element.
    pub fn element_name(&self) -> Option<&LocalName> {
        match self.data {
            NodeData::Element { ref name, .. } => Some(name),
            _ => None,
        }
    }

    /// The form this element belongs to, if any.
    pub fn form_owner(&self) -> Option<Handle> {
        match self.data {
            NodeData::Element { ref form_owner, .. } => {
                form_owner.borrow().as_ref().and_then(Weak::upgrade)
            },
            _ => None,
        }
    }

    fn parent(&self) -> Option<Handle> {
        let weak = self.parent.take();
        let parent = weak.as_ref().and_then(Weak::upgrade);
        self.parent.set(weak);
        parent
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Node")
            .field("data", &self.data)
            .field("children", &self.children)
            .finish()
    }
}

/// Reference to a DOM node.
pub type Handle = Rc<Node>;

/// Weak reference to a DOM node, used for parent pointers.
pub type WeakHandle = Weak<Node>;

fn get_parent_and_index(target: &Handle) -> Option<(Handle, usize)> {
    let parent = target.parent()?;
    let i = parent
        .children
        .borrow()
        .iter()
        .position(|child| Rc::ptr_eq(child, target))?;
    Some((parent, i))
}

fn remove_from_parent(target: &Handle) {
    if let Some((parent, i)) = get_parent_and_index(target) {
        parent.children.borrow_mut().remove(i);
    }
    target.parent.set(None);
}

/// Append to an existing text node. Returns false if `prev` is not text.
fn append_to_existing_text(prev: &Handle, text: &str) -> bool {
    match prev.data {
        NodeData::Text { ref contents } => {
            contents.borrow_mut().push_slice(text);
            true
        },
        _ => false,
    }
}

fn append(new_parent: &Handle, child: Handle) {
    remove_from_parent(&child);
    child.parent.set(Some(Rc::downgrade(new_parent)));
    new_parent.children.borrow_mut().push(child);
}

fn new_text(text: StrTendril) -> Handle {
    Node::new(NodeData::Text {
        contents: RefCell::new(text),
    })
}

/// The DOM itself; the result of parsing.
pub struct RcDom {
    /// The `Document` itself.
    pub document: Handle,
}

impl Default for RcDom {
    fn default() -> RcDom {
        RcDom {
            document: Node::new(NodeData::Document),
        }
    }
}

impl RcDom {
    /// The root `html` element, once one has been created.
    pub fn root_element(&self) -> Option<Handle> {
        self.document
            .children
            .borrow()
            .iter()
            .find(|child| child.element_name().is_some())
            .cloned()
    }
}

impl TreeSink for RcDom {
    type Handle = Handle;

    fn create_root_element(&mut self, attrs: Vec<Attribute>) -> Handle {
        let root = self.create_element(local_name!("html"), attrs);
        append(&self.document, root.clone());
        root
    }

    fn create_element(&mut self, name: LocalName, attrs: Vec<Attribute>) -> Handle {
        Node::new(NodeData::Element {
            name,
            attrs: RefCell::new(attrs),
            form_owner: RefCell::new(None),
        })
    }

    fn append(&mut self, parent: &Handle, child: NodeOrText<Handle>) {
        // Append to an existing Text node if we have one.
        if let AppendText(ref text) = child {
            if let Some(last) = parent.children.borrow().last() {
                if append_to_existing_text(last, text) {
                    return;
                }
            }
        }

        append(
            parent,
            match child {
                AppendText(text) => new_text(text),
                AppendNode(node) => node,
            },
        );
    }

    fn insert_before(&mut self, parent: &Handle, sibling: &Handle, child: NodeOrText<Handle>) {
        let child = match child {
            AppendText(text) => {
                let children = parent.children.borrow();
                let i = children.iter().position(|c| Rc::ptr_eq(c, sibling));
                if let Some(i) = i.filter(|&i| i > 0) {
                    if append_to_existing_text(&children[i - 1], &text) {
                        return;
                    }
                }
                new_text(text)
            },
            AppendNode(node) => node,
        };

        remove_from_parent(&child);
        let mut children = parent.children.borrow_mut();
        let i = children
            .iter()
            .position(|c| Rc::ptr_eq(c, sibling))
            .unwrap_or(children.len());
        child.parent.set(Some(Rc::downgrade(parent)));
        children.insert(i, child);
    }

    fn parent_element(&self, target: &Handle) -> Option<Handle> {
        target.parent().filter(|parent| parent.element_name().is_some())
    }

    fn detach_from_parent(&mut self, target: &Handle) {
        remove_from_parent(target);
    }

    fn has_children(&self, target: &Handle) -> bool {
        !target.children.borrow().is_empty()
    }

    fn shallow_clone(&mut self, target: &Handle) -> Handle {
        match target.data {
            NodeData::Element {
                ref name,
                ref attrs,
                ..
            } => self.create_element(name.clone(), attrs.borrow().clone()),
            NodeData::Text { ref contents } => new_text(contents.borrow().clone()),
            NodeData::Comment { ref contents } => Node::new(NodeData::Comment {
                contents: contents.clone(),
            }),
            NodeData::Doctype {
                ref name,
                ref public_id,
                ref system_id,
            } => Node::new(NodeData::Doctype {
                name: name.clone(),
                public_id: public_id.clone(),
                system_id: system_id.clone(),
            }),
            NodeData::Document => Node::new(NodeData::Document),
        }
    }

    fn reparent_children(&mut self, node: &Handle, new_parent: &Handle) {
        let mut children = node.children.borrow_mut();
        let mut new_children = new_parent.children.borrow_mut();
        for child in children.iter() {
            child.parent.set(Some(Rc::downgrade(new_parent)));
        }
        new_children.append(&mut children);
    }

    fn append_comment(&mut self, parent: &Handle, text: StrTendril) {
        append(parent, Node::new(NodeData::Comment { contents: text }));
    }

    fn append_comment_to_document(&mut self, text: StrTendril) {
        append(&self.document, Node::new(NodeData::Comment { contents: text }));
    }

    fn append_doctype_to_document(
        &mut self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        append(
            &self.document,
            Node::new(NodeData::Doctype {
                name,
                public_id,
                system_id,
            }),
        );
    }

    fn add_attrs_if_missing(&mut self, target: &Handle, attrs: Vec<Attribute>) {
        let mut existing = match target.data {
            NodeData::Element { ref attrs, .. } => attrs.borrow_mut(),
            _ => return,
        };

        let existing_names: Vec<LocalName> = existing.iter().map(|e| e.name.clone()).collect();
        existing.extend(
            attrs
                .into_iter()
                .filter(|attr| !existing_names.contains(&attr.name)),
        );
    }

    fn associate_with_form(&mut self, target: &Handle, form: &Handle) {
        if let NodeData::Element { ref form_owner, .. } = target.data {
            *form_owner.borrow_mut() = Some(Rc::downgrade(form));
        }
    }
}

impl ParseResult for RcDom {
    type Sink = RcDom;

    fn get_result(sink: RcDom) -> RcDom {
        sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(node: &Handle) -> String {
        match node.data {
            NodeData::Text { ref contents } => contents.borrow().to_string(),
            _ => panic!("not a text node"),
        }
    }

    #[test]
    fn adjacent_text_is_merged() {
        let mut dom = RcDom::default();
        let root = dom.create_root_element(vec![]);
        dom.append(&root, AppendText("foo".into()));
        dom.append(&root, AppendText("bar".into()));
        let children = root.children.borrow();
        assert_eq!(children.len(), 1);
        assert_eq!(text_of(&children[0]), "foobar");
    }

    #[test]
    fn insert_before_merges_with_previous_text() {
        let mut dom = RcDom::default();
        let root = dom.create_root_element(vec![]);
        let table = dom.create_element(local_name!("table"), vec![]);
        dom.append(&root, AppendText("a".into()));
        dom.append(&root, AppendNode(table.clone()));
        dom.insert_before(&root, &table, AppendText("b".into()));

        let children = root.children.borrow();
        assert_eq!(children.len(), 2);
        assert_eq!(text_of(&children[0]), "ab");
        assert!(Rc::ptr_eq(&children[1], &table));
    }

    #[test]
    fn append_moves_attached_node() {
        let mut dom = RcDom::default();
        let root = dom.create_root_element(vec![]);
        let div = dom.create_element(local_name!("div"), vec![]);
        let p = dom.create_element(local_name!("p"), vec![]);
        dom.append(&root, AppendNode(div.clone()));
        dom.append(&root, AppendNode(p.clone()));
        dom.append(&div, AppendNode(p.clone()));

        assert_eq!(root.children.borrow().len(), 1);
        assert!(Rc::ptr_eq(&dom.parent_element(&p).unwrap(), &div));
    }

    #[test]
    fn root_has_no_parent_element() {
        let mut dom = RcDom::default();
        let root = dom.create_root_element(vec![]);
        assert!(dom.parent_element(&root).is_none());
        assert!(Rc::ptr_eq(&dom.root_element().unwrap(), &root));
    }

    #[test]
    fn shallow_clone_copies_attributes_only() {
        let mut dom = RcDom::default();
        let attrs = vec![Attribute {
            name: local_name!("class"),
            value: "x".into(),
        }];
        let b = dom.create_element(local_name!("b"), attrs.clone());
        dom.append(&b, AppendText("text".into()));

        let clone = dom.shallow_clone(&b);
        assert!(!dom.has_children(&clone));
        assert_eq!(clone.element_name(), Some(&local_name!("b")));
        match clone.data {
            NodeData::Element { attrs: ref cloned, .. } => assert_eq!(*cloned.borrow(), attrs),
            _ => panic!("clone is not an element"),
        }
    }

    #[test]
    fn missing_attributes_are_added() {
        let mut dom = RcDom::default();
        let attr = |name: LocalName, value: &str| Attribute {
            name,
            value: StrTendril::from_slice(value),
        };
        let root = dom.create_root_element(vec![attr(local_name!("lang"), "en")]);
        dom.add_attrs_if_missing(
            &root,
            vec![attr(local_name!("lang"), "fr"), attr(local_name!("class"), "c")],
        );
        match root.data {
            NodeData::Element { ref attrs, .. } => assert_eq!(
                *attrs.borrow(),
                vec![attr(local_name!("lang"), "en"), attr(local_name!("class"), "c")]
            ),
            _ => panic!("root is not an element"),
        }
    }

    #[test]
    fn reparenting_moves_every_child() {
        let mut dom = RcDom::default();
        let from = dom.create_element(local_name!("div"), vec![]);
        let to = dom.create_element(local_name!("span"), vec![]);
        let i = dom.create_element(local_name!("i"), vec![]);
        dom.append(&from, AppendText("x".into()));
        dom.append(&from, AppendNode(i.clone()));
        dom.reparent_children(&from, &to);

        assert!(!dom.has_children(&from));
        assert_eq!(to.children.borrow().len(), 2);
        let i = to.children.borrow()[1].clone();
        assert!(Rc::ptr_eq(&dom.parent_element(&i).unwrap(), &to));
    }
}
