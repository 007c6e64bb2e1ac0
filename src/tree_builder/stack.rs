// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The stack of open elements and the list of active formatting elements.
//!
//! Both refer to elements through `FrameId`s into one arena, so the
//! adoption agency algorithm can swap an element for its clone in both
//! places without the two copies drifting apart.

use super::tag_sets;
use super::types::{FormatEntry, FrameId};
use crate::LocalName;

/// An element known to the tree builder.
pub(crate) struct Frame<Handle> {
    pub(crate) name: LocalName,
    pub(crate) node: Handle,
    pub(crate) scoping: bool,
    pub(crate) special: bool,
    pub(crate) foster_parenting: bool,
}

impl<Handle> Frame<Handle> {
    pub(crate) fn new(name: LocalName, node: Handle) -> Frame<Handle> {
        Frame {
            scoping: tag_sets::scoping(&name),
            special: tag_sets::special(&name),
            foster_parenting: tag_sets::foster_parenting(&name),
            name,
            node,
        }
    }
}

enum Search {
    Found,
    Stop,
    Next,
}

/// Frames live until the tree builder is dropped; stack and list entries are
/// indices into them, so a frame is never reused or freed mid-parse.
pub(crate) struct ElementStack<Handle> {
    frames: Vec<Frame<Handle>>,
    open: Vec<FrameId>,
    active_formatting: Vec<FormatEntry>,
}

impl<Handle> ElementStack<Handle> {
    pub(crate) fn new() -> ElementStack<Handle> {
        ElementStack {
            frames: Vec::new(),
            open: Vec::with_capacity(64),
            active_formatting: Vec::new(),
        }
    }

    //§ frames
    pub(crate) fn frame(&self, id: FrameId) -> &Frame<Handle> {
        &self.frames[id.0]
    }

    pub(crate) fn add_frame(&mut self, name: LocalName, node: Handle) -> FrameId {
        self.frames.push(Frame::new(name, node));
        FrameId(self.frames.len() - 1)
    }

    /// A new frame for `node`, with the name of an existing frame.
    pub(crate) fn add_clone_of(&mut self, id: FrameId, node: Handle) -> FrameId {
        let name = self.frame(id).name.clone();
        self.add_frame(name, node)
    }

    //§ the-stack-of-open-elements
    pub(crate) fn len(&self) -> usize {
        self.open.len()
    }

    pub(crate) fn push(&mut self, id: FrameId) {
        self.open.push(id);
    }

    /// Pop the current node. The root element is never popped.
    pub(crate) fn pop(&mut self) -> FrameId {
        assert!(self.open.len() > 1, "popped the root element");
        let top = self.open.len() - 1;
        self.open.remove(top)
    }

    pub(crate) fn remove_at(&mut self, pos: usize) -> FrameId {
        assert!(pos > 0, "removed the root element");
        self.open.remove(pos)
    }

    pub(crate) fn insert_at(&mut self, pos: usize, id: FrameId) {
        self.open.insert(pos, id);
    }

    pub(crate) fn replace_at(&mut self, pos: usize, id: FrameId) {
        self.open[pos] = id;
    }

    pub(crate) fn id_at(&self, pos: usize) -> FrameId {
        self.open[pos]
    }

    pub(crate) fn at(&self, pos: usize) -> &Frame<Handle> {
        self.frame(self.open[pos])
    }

    pub(crate) fn current_pos(&self) -> usize {
        assert!(!self.open.is_empty(), "no current node");
        self.open.len() - 1
    }

    pub(crate) fn current_id(&self) -> FrameId {
        self.open[self.current_pos()]
    }

    pub(crate) fn current(&self) -> &Frame<Handle> {
        self.at(self.current_pos())
    }

    pub(crate) fn is_current(&self, name: &LocalName) -> bool {
        !self.open.is_empty() && self.current().name == *name
    }

    pub(crate) fn position_of(&self, id: FrameId) -> Option<usize> {
        self.open.iter().rposition(|&x| x == id)
    }

    pub(crate) fn contains(&self, id: FrameId) -> bool {
        self.position_of(id).is_some()
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &LocalName> + '_ {
        self.open.iter().map(move |&id| &self.frame(id).name)
    }

    /// Walk from the current node down to slot 1 (or slot 0 if
    /// `include_root`), asking `pred` about each frame.
    fn search<F>(&self, include_root: bool, mut pred: F) -> Option<usize>
    where
        F: FnMut(&Frame<Handle>) -> Search,
    {
        let bottom = if include_root { 0 } else { 1 };
        for pos in (bottom..self.open.len()).rev() {
            match pred(self.at(pos)) {
                Search::Found => return Some(pos),
                Search::Stop => return None,
                Search::Next => (),
            }
        }
        None
    }

    /// The nearest element called `name`, without any scope boundary.
    pub(crate) fn find_last(&self, name: &LocalName) -> Option<usize> {
        self.search(false, |f| if f.name == *name { Search::Found } else { Search::Next })
    }

    /// Like `find_last`, but falls back to the root.
    pub(crate) fn find_last_or_root(&self, name: &LocalName) -> usize {
        self.find_last(name).unwrap_or(0)
    }

    pub(crate) fn find_last_in_scope(&self, name: &LocalName) -> Option<usize> {
        self.search(false, |f| {
            if f.name == *name {
                Search::Found
            } else if f.scoping {
                Search::Stop
            } else {
                Search::Next
            }
        })
    }

    pub(crate) fn find_last_in_table_scope(&self, name: &LocalName) -> Option<usize> {
        self.search(false, |f| {
            if f.name == *name {
                Search::Found
            } else if f.name == local_name!("table") {
                Search::Stop
            } else {
                Search::Next
            }
        })
    }

    /// The nearest `h1`..`h6` in scope.
    pub(crate) fn find_last_heading_in_scope(&self) -> Option<usize> {
        self.search(false, |f| {
            if tag_sets::heading(&f.name) {
                Search::Found
            } else if f.scoping {
                Search::Stop
            } else {
                Search::Next
            }
        })
    }

    /// The nearest `td` or `th` in table scope.
    pub(crate) fn find_last_cell_in_table_scope(&self) -> Option<usize> {
        self.search(false, |f| {
            if tag_sets::cell(&f.name) {
                Search::Found
            } else if f.name == local_name!("table") {
                Search::Stop
            } else {
                Search::Next
            }
        })
    }

    /// The nearest `tbody`, `thead` or `tfoot`, or the root.
    pub(crate) fn find_last_table_section_or_root(&self) -> usize {
        self.search(false, |f| {
            if tag_sets::table_section(&f.name) {
                Search::Found
            } else {
                Search::Next
            }
        })
        .unwrap_or(0)
    }

    /// The target of a generic end tag: the nearest element called `name`,
    /// unless a scoping or special element comes first.
    pub(crate) fn find_last_before_special(&self, name: &LocalName) -> Option<usize> {
        self.search(false, |f| {
            if f.name == *name {
                Search::Found
            } else if f.scoping || f.special {
                Search::Stop
            } else {
                Search::Next
            }
        })
    }

    /// Is there no scoping element above `pos`?
    pub(crate) fn in_scope_at(&self, pos: usize) -> bool {
        !(pos + 1..self.open.len()).any(|p| self.at(p).scoping)
    }

    /// The nearest scoping or special element above `pos`.
    pub(crate) fn furthest_block_above(&self, pos: usize) -> Option<usize> {
        (pos + 1..self.open.len()).find(|&p| {
            let frame = self.at(p);
            frame.scoping || frame.special
        })
    }

    /// The previous list item that a new one closes. Only `div` and
    /// `address` may sit between the two.
    pub(crate) fn find_list_item_to_close<F>(&self, is_item: F) -> Option<usize>
    where
        F: Fn(&LocalName) -> bool,
    {
        self.search(true, |f| {
            if is_item(&f.name) {
                Search::Found
            } else if (f.scoping || f.special)
                && f.name != local_name!("div")
                && f.name != local_name!("address")
            {
                Search::Stop
            } else {
                Search::Next
            }
        })
    }

    //§ the-list-of-active-formatting-elements
    pub(crate) fn formatting_len(&self) -> usize {
        self.active_formatting.len()
    }

    pub(crate) fn formatting_entry(&self, pos: usize) -> FormatEntry {
        self.active_formatting[pos]
    }

    pub(crate) fn push_formatting(&mut self, id: FrameId) {
        self.active_formatting.push(FormatEntry::Element(id));
    }

    pub(crate) fn insert_marker(&mut self) {
        self.active_formatting.push(FormatEntry::Marker);
    }

    /// Pop entries up to and including the last marker.
    pub(crate) fn clear_formatting_to_last_marker(&mut self) {
        while let Some(entry) = self.active_formatting.pop() {
            if entry == FormatEntry::Marker {
                break;
            }
        }
    }

    /// The list position and frame of the last element called `name` that
    /// comes after the last marker.
    pub(crate) fn find_formatting_after_last_marker(
        &self,
        name: &LocalName,
    ) -> Option<(usize, FrameId)> {
        for (pos, entry) in self.active_formatting.iter().enumerate().rev() {
            match *entry {
                FormatEntry::Marker => return None,
                FormatEntry::Element(id) if self.frame(id).name == *name => return Some((pos, id)),
                FormatEntry::Element(_) => (),
            }
        }
        None
    }

    pub(crate) fn formatting_position_of(&self, id: FrameId) -> Option<usize> {
        self.active_formatting
            .iter()
            .rposition(|&e| e == FormatEntry::Element(id))
    }

    pub(crate) fn remove_formatting(&mut self, pos: usize) -> FormatEntry {
        self.active_formatting.remove(pos)
    }

    pub(crate) fn insert_formatting(&mut self, pos: usize, id: FrameId) {
        self.active_formatting.insert(pos, FormatEntry::Element(id));
    }

    pub(crate) fn replace_formatting(&mut self, pos: usize, id: FrameId) {
        self.active_formatting[pos] = FormatEntry::Element(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_of(names: &[&str]) -> ElementStack<usize> {
        let mut stack = ElementStack::new();
        for (i, name) in names.iter().enumerate() {
            let id = stack.add_frame(LocalName::from(*name), i);
            stack.push(id);
        }
        stack
    }

    #[test]
    fn p_out_of_scope_behind_each_boundary() {
        for boundary in &["table", "caption", "td", "th", "button", "marquee", "object"] {
            let stack = stack_of(&["html", "body", "p", *boundary, "span"]);
            assert_eq!(stack.find_last_in_scope(&local_name!("p")), None, "{}", boundary);
            assert_eq!(stack.find_last(&local_name!("p")), Some(2));
        }
    }

    #[test]
    fn p_in_scope_behind_ordinary_elements() {
        let stack = stack_of(&["html", "body", "p", "div", "span", "b"]);
        assert_eq!(stack.find_last_in_scope(&local_name!("p")), Some(2));
    }

    #[test]
    fn table_scope_only_stops_at_table() {
        let stack = stack_of(&["html", "body", "table", "tbody", "tr", "td", "button"]);
        assert_eq!(stack.find_last_in_table_scope(&local_name!("tr")), Some(4));
        assert_eq!(stack.find_last_in_table_scope(&local_name!("body")), None);
        assert_eq!(stack.find_last_cell_in_table_scope(), Some(5));
    }

    #[test]
    fn searches_never_report_the_root() {
        let stack = stack_of(&["html", "body"]);
        assert_eq!(stack.find_last(&local_name!("html")), None);
        assert_eq!(stack.find_last_or_root(&local_name!("table")), 0);
        assert_eq!(stack.find_last_table_section_or_root(), 0);
    }

    #[test]
    fn generic_end_tag_stops_at_special() {
        let stack = stack_of(&["html", "body", "span", "div", "em"]);
        assert_eq!(stack.find_last_before_special(&local_name!("span")), None);
        assert_eq!(stack.find_last_before_special(&local_name!("em")), Some(4));
        assert_eq!(stack.furthest_block_above(2), Some(3));
        assert_eq!(stack.furthest_block_above(3), None);
    }

    #[test]
    fn heading_search_matches_any_level() {
        let stack = stack_of(&["html", "body", "h2", "b"]);
        assert_eq!(stack.find_last_heading_in_scope(), Some(2));
    }

    #[test]
    fn list_item_search_passes_div_only() {
        let is_li = |n: &LocalName| *n == local_name!("li");
        let through_div = stack_of(&["html", "body", "ul", "li", "div"]);
        assert_eq!(through_div.find_list_item_to_close(is_li), Some(3));
        let blocked = stack_of(&["html", "body", "ul", "li", "p"]);
        assert_eq!(blocked.find_list_item_to_close(is_li), None);
    }

    #[test]
    fn clear_to_marker_stops_at_marker() {
        let mut stack = stack_of(&["html", "body", "b", "i"]);
        let (b, i) = (stack.id_at(2), stack.id_at(3));
        stack.push_formatting(b);
        stack.insert_marker();
        stack.push_formatting(i);
        assert_eq!(stack.find_formatting_after_last_marker(&local_name!("b")), None);
        assert_eq!(stack.find_formatting_after_last_marker(&local_name!("i")), Some((2, i)));
        stack.clear_formatting_to_last_marker();
        assert_eq!(stack.formatting_len(), 1);
        assert_eq!(stack.formatting_entry(0), FormatEntry::Element(b));
    }

    #[test]
    fn clones_keep_flags() {
        let mut stack = stack_of(&["html", "body", "table"]);
        let clone = stack.add_clone_of(stack.id_at(2), 99);
        assert!(stack.frame(clone).scoping);
        assert!(stack.frame(clone).foster_parenting);
        assert_eq!(stack.frame(clone).node, 99);
    }

    #[test]
    #[should_panic]
    fn popping_the_root_panics() {
        let mut stack = stack_of(&["html"]);
        stack.pop();
    }
}
