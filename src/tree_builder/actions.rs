// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Helpers implementing various parts of the tree construction algorithm.
//!
//! Every method that touches the sink first flushes coalesced text, so the
//! sink sees mutations in document order.

use std::mem;

use tendril::StrTendril;

use super::interface::{AppendNode, AppendText, FatalError, NodeOrText, XmlViolationPolicy};
use super::interface::{ErrorHandler, TreeSink};
use super::tag_sets;
use super::types::*;
use super::TreeBuilder;
use crate::tokenizer::{Attribute, ContentModelFlag, Tag, TokenSinkResult};
use crate::LocalName;

/// Elements that belong to the form open when they are created.
fn form_associated(name: &LocalName) -> bool {
    matches!(
        *name,
        local_name!("input")
            | local_name!("textarea")
            | local_name!("select")
            | local_name!("button")
            | local_name!("fieldset")
            | local_name!("label")
            | local_name!("object")
    )
}

impl<Sink: TreeSink, E: ErrorHandler> TreeBuilder<Sink, E> {
    //§ errors
    pub(super) fn unexpected_start(&mut self, tag: &Tag) {
        let msg = format_if!(
            self.opts.exact_errors,
            "Unexpected start tag.",
            "Unexpected start tag <{}> in insertion mode {:?}.",
            tag.name,
            self.mode
        );
        self.errors.error(msg);
    }

    pub(super) fn unexpected_end(&mut self, tag: &Tag) {
        let msg = format_if!(
            self.opts.exact_errors,
            "Stray end tag.",
            "Stray end tag </{}> in insertion mode {:?}.",
            tag.name,
            self.mode
        );
        self.errors.error(msg);
    }

    /// Report the open elements an operation is about to close.
    pub(super) fn unclosed_elements(&mut self, above: usize) {
        let msg = format_if!(
            self.opts.exact_errors,
            "Unclosed elements.",
            "Unclosed elements: {:?}.",
            self.stack.names().skip(above + 1).collect::<Vec<_>>()
        );
        self.errors.error(msg);
    }

    //§ text
    pub(super) fn flush_pending_text(&mut self) {
        if let Some((id, text)) = self.pending_text.take() {
            let parent = self.stack.frame(id).node.clone();
            self.sink.append(&parent, AppendText(text));
        }
    }

    /// Append text to the current node.
    pub(super) fn append_text(&mut self, text: StrTendril) {
        let current = self.stack.current_id();
        if !self.opts.coalescing_text {
            let parent = self.stack.frame(current).node.clone();
            self.sink.append(&parent, AppendText(text));
            return;
        }

        if let Some((id, ref mut pending)) = self.pending_text {
            if id == current {
                pending.push_tendril(&text);
                return;
            }
        }
        self.flush_pending_text();
        self.pending_text = Some((current, text));
    }

    //§ creating-and-inserting-nodes
    /// Insert at the appropriate place: the foster parent if `foster` is
    /// set and the current node calls for it, the current node otherwise.
    pub(super) fn insert_appropriately(&mut self, child: NodeOrText<Sink::Handle>, foster: bool) {
        if foster && self.stack.current().foster_parenting {
            return self.foster_insert(child);
        }
        match child {
            AppendText(text) => self.append_text(text),
            child => {
                self.flush_pending_text();
                let target = self.stack.current().node.clone();
                self.sink.append(&target, child);
            },
        }
    }

    //§ foster-parenting
    pub(super) fn foster_insert(&mut self, child: NodeOrText<Sink::Handle>) {
        self.flush_pending_text();
        let pos = self.stack.find_last_or_root(&local_name!("table"));
        if pos == 0 {
            let root = self.stack.at(0).node.clone();
            self.sink.append(&root, child);
            return;
        }

        let table = self.stack.at(pos).node.clone();
        match self.sink.parent_element(&table) {
            Some(parent) => self.sink.insert_before(&parent, &table, child),
            None => {
                let below = self.stack.at(pos - 1).node.clone();
                self.sink.append(&below, child);
            },
        }
    }

    pub(super) fn create_root(&mut self, attrs: Vec<Attribute>) {
        self.flush_pending_text();
        let root = self.sink.create_root_element(attrs);
        let id = self.stack.add_frame(local_name!("html"), root);
        self.stack.push(id);
    }

    pub(super) fn add_attrs_to_root(&mut self, attrs: Vec<Attribute>) {
        if attrs.is_empty() {
            return;
        }
        self.flush_pending_text();
        let root = self.stack.at(0).node.clone();
        self.sink.add_attrs_if_missing(&root, attrs);
    }

    fn create_element(&mut self, name: LocalName, attrs: Vec<Attribute>) -> Sink::Handle {
        self.flush_pending_text();
        let elem = self.sink.create_element(name.clone(), attrs);
        if form_associated(&name) {
            if let Some(form) = self.form {
                let form = self.stack.frame(form).node.clone();
                self.sink.associate_with_form(&elem, &form);
            }
        }
        elem
    }

    /// Create an element, insert it and push it.
    pub(super) fn insert_element(&mut self, name: LocalName, attrs: Vec<Attribute>) -> FrameId {
        let elem = self.create_element(name.clone(), attrs);
        self.insert_appropriately(AppendNode(elem.clone()), self.foster_parenting);
        let id = self.stack.add_frame(name, elem);
        self.stack.push(id);
        id
    }

    pub(super) fn insert_element_for(&mut self, tag: &mut Tag) -> FrameId {
        let attrs = mem::take(&mut tag.attrs);
        self.insert_element(tag.name.clone(), attrs)
    }

    /// Insert an element the markup only implied.
    pub(super) fn insert_phantom(&mut self, name: LocalName) -> FrameId {
        self.insert_element(name, vec![])
    }

    /// Insert an element that is closed right away.
    pub(super) fn insert_void(&mut self, name: LocalName, attrs: Vec<Attribute>) {
        let elem = self.create_element(name.clone(), attrs);
        self.insert_appropriately(AppendNode(elem), self.foster_parenting);
        let current = self.stack.current().node.clone();
        self.sink.element_popped(&name, &current);
    }

    pub(super) fn insert_void_for(&mut self, tag: &mut Tag) {
        let attrs = mem::take(&mut tag.attrs);
        self.insert_void(tag.name.clone(), attrs);
    }

    pub(super) fn insert_formatting_for(&mut self, tag: &mut Tag) {
        let id = self.insert_element_for(tag);
        self.stack.push_formatting(id);
    }

    /// Insert an element whose content the tokenizer scans as raw text.
    /// The next end tag pops `pops` elements.
    pub(super) fn insert_raw_text_for(&mut self, tag: &mut Tag, flag: ContentModelFlag, pops: usize) {
        self.insert_element_for(tag);
        self.raw_text_pops = pops;
        self.next_tokenizer_state = Some(TokenSinkResult::RawData(flag, tag.name.clone()));
    }

    /// Insert metadata that belongs in `head`, re-opening `head` if the
    /// streamability policy allows it.
    pub(super) fn insert_into_head(&mut self, tag: &mut Tag, raw: Option<ContentModelFlag>) {
        let msg = format_if!(
            self.opts.exact_errors,
            "Element belongs in head.",
            "<{}> seen after head was closed.",
            tag.name
        );
        self.errors.error(msg);

        let policy = self.opts.streamability;
        let head = match self.head.filter(|_| policy == XmlViolationPolicy::AlterInfoset) {
            Some(head) => head,
            None => {
                match raw {
                    Some(flag) => self.insert_raw_text_for(tag, flag, 1),
                    None => self.insert_void_for(tag),
                }
                return;
            },
        };

        self.flush_pending_text();
        self.stack.push(head);
        match raw {
            Some(flag) => self.insert_raw_text_for(tag, flag, 2),
            None => {
                self.insert_void_for(tag);
                self.pop();
            },
        }
    }

    //§ popping
    /// Pop the current node and tell the sink about the new one.
    pub(super) fn pop(&mut self) -> FrameId {
        self.flush_pending_text();
        let id = self.stack.pop();
        let current = self.stack.current().node.clone();
        self.sink.element_popped(&self.stack.frame(id).name, &current);
        id
    }

    /// Pop elements down to and including the one at `pos`.
    pub(super) fn pop_to(&mut self, pos: usize) {
        while self.stack.len() > pos {
            self.pop();
        }
    }

    /// Remove the element at `pos` from the stack, wherever it is.
    ///
    /// Removing anything but the current node cannot be streamed, so the
    /// streamability policy decides whether this is allowed.
    pub(super) fn remove_from_stack(&mut self, pos: usize) -> Result<(), FatalError> {
        if pos == self.stack.current_pos() {
            self.pop();
            return Ok(());
        }

        let name = self.stack.at(pos).name.clone();
        match self.opts.streamability {
            XmlViolationPolicy::Fatal => {
                self.errors.fatal(format_if!(
                    self.opts.exact_errors,
                    "Misnested element cannot be removed in streaming mode.",
                    "Removing <{}> from the middle of the stack cannot be streamed.",
                    name
                ));
                return Err(FatalError::NotStreamable { name });
            },
            XmlViolationPolicy::AlterInfoset => {
                self.errors.error(format_if!(
                    self.opts.exact_errors,
                    "Misnested element removed out of order.",
                    "<{}> removed from the middle of the stack.",
                    name
                ));
            },
            XmlViolationPolicy::Allow => (),
        }

        self.flush_pending_text();
        self.stack.remove_at(pos);
        let current = self.stack.current().node.clone();
        self.sink.element_popped(&name, &current);
        Ok(())
    }

    //§ closing-elements-that-have-implied-end-tags
    pub(super) fn generate_implied_end_tags(&mut self, except: Option<&LocalName>) {
        loop {
            let name = &self.stack.current().name;
            if !tag_sets::implied_end(name) || Some(name) == except {
                return;
            }
            self.pop();
        }
    }

    /// Pop everything above `pos`, reporting it if that is anything at all.
    pub(super) fn clear_stack_back_to(&mut self, pos: usize) {
        if pos == self.stack.current_pos() {
            return;
        }
        self.unclosed_elements(pos);
        while self.stack.current_pos() > pos {
            self.pop();
        }
    }

    /// Close an open `p` in scope, if there is one.
    pub(super) fn close_p_element_in_scope(&mut self) {
        if let Some(pos) = self.stack.find_last_in_scope(&local_name!("p")) {
            self.close_element_at(pos);
        }
    }

    /// Generate implied end tags except for the element at `pos`, then pop
    /// to it, reporting anything else that was still open.
    pub(super) fn close_element_at(&mut self, pos: usize) {
        let name = self.stack.at(pos).name.clone();
        self.generate_implied_end_tags(Some(&name));
        if pos != self.stack.current_pos() {
            self.unclosed_elements(pos);
        }
        self.pop_to(pos);
    }

    /// Close the cell at `pos` and go back to the row.
    pub(super) fn close_the_cell(&mut self, pos: usize) {
        self.generate_implied_end_tags(None);
        if pos != self.stack.current_pos() {
            self.unclosed_elements(pos);
        }
        self.pop_to(pos);
        self.stack.clear_formatting_to_last_marker();
        self.mode = InRow;
    }

    //§ the-list-of-active-formatting-elements
    pub(super) fn reconstruct_formatting(&mut self) {
        let len = self.stack.formatting_len();
        if len == 0 {
            return;
        }
        let open_or_marker = |tb: &Self, pos: usize| match tb.stack.formatting_entry(pos) {
            FormatEntry::Marker => true,
            FormatEntry::Element(id) => tb.stack.contains(id),
        };
        if open_or_marker(self, len - 1) {
            return;
        }

        let mut first = len - 1;
        while first > 0 && !open_or_marker(self, first - 1) {
            first -= 1;
        }

        for pos in first..len {
            let id = match self.stack.formatting_entry(pos) {
                FormatEntry::Element(id) => id,
                FormatEntry::Marker => continue,
            };
            self.flush_pending_text();
            let original = self.stack.frame(id).node.clone();
            let clone = self.sink.shallow_clone(&original);
            self.insert_appropriately(AppendNode(clone.clone()), true);
            let clone_id = self.stack.add_clone_of(id, clone);
            self.stack.push(clone_id);
            self.stack.replace_formatting(pos, clone_id);
        }
    }

    //§ adoption-agency-algorithm
    /// Recover from a misnested end tag for the formatting element `name`.
    pub(super) fn adoption_agency(&mut self, name: &LocalName) -> Result<(), FatalError> {
        self.flush_pending_text();

        // Each pass either returns or moves the formatting element up the
        // tree; eight passes are enough for any markup seen in practice.
        for pass in 0..8 {
            let (fmt_list_pos, fmt_id) = match self.stack.find_formatting_after_last_marker(name) {
                Some(found) => found,
                None => {
                    if pass == 0 {
                        self.errors.error(format_if!(
                            self.opts.exact_errors,
                            "End tag with no formatting element open.",
                            "</{}> seen but no such formatting element is open.",
                            name
                        ));
                    }
                    return Ok(());
                },
            };

            let fmt_stack_pos = match self.stack.position_of(fmt_id) {
                Some(pos) => pos,
                None => {
                    self.errors.error("Formatting element is no longer open.".into());
                    self.stack.remove_formatting(fmt_list_pos);
                    return Ok(());
                },
            };

            if !self.stack.in_scope_at(fmt_stack_pos) {
                self.errors.error("Formatting element is not in scope.".into());
                return Ok(());
            }

            if fmt_stack_pos != self.stack.current_pos() {
                self.errors.warning(format_if!(
                    self.opts.exact_errors,
                    "End tag violates nesting rules.",
                    "</{}> violates nesting rules.",
                    name
                ));
            }

            let mut fb_pos = match self.stack.furthest_block_above(fmt_stack_pos) {
                Some(pos) => pos,
                None => {
                    self.pop_to(fmt_stack_pos);
                    self.stack.remove_formatting(fmt_list_pos);
                    return Ok(());
                },
            };

            let common_ancestor = self.stack.id_at(fmt_stack_pos - 1);
            let fb_id = self.stack.id_at(fb_pos);
            let fb_node = self.stack.frame(fb_id).node.clone();
            self.sink.detach_from_parent(&fb_node);

            let mut bookmark = fmt_list_pos;
            let mut last_id = fb_id;
            let mut node_pos = fb_pos;
            loop {
                node_pos -= 1;
                if node_pos == fmt_stack_pos {
                    break;
                }

                let mut node_id = self.stack.id_at(node_pos);
                let node_list_pos = match self.stack.formatting_position_of(node_id) {
                    Some(pos) => pos,
                    None => {
                        self.remove_from_stack(node_pos)?;
                        fb_pos -= 1;
                        continue;
                    },
                };

                if last_id == fb_id {
                    bookmark = node_list_pos + 1;
                }

                let node = self.stack.frame(node_id).node.clone();
                if self.sink.has_children(&node) {
                    let clone = self.sink.shallow_clone(&node);
                    node_id = self.stack.add_clone_of(node_id, clone);
                    self.stack.replace_at(node_pos, node_id);
                    self.stack.replace_formatting(node_list_pos, node_id);
                }

                let node = self.stack.frame(node_id).node.clone();
                let last = self.stack.frame(last_id).node.clone();
                self.sink.append(&node, AppendNode(last));
                last_id = node_id;
            }

            let last = self.stack.frame(last_id).node.clone();
            if self.stack.frame(common_ancestor).foster_parenting {
                self.foster_insert(AppendNode(last));
            } else {
                let target = self.stack.frame(common_ancestor).node.clone();
                self.sink.append(&target, AppendNode(last));
            }

            let fmt_node = self.stack.frame(fmt_id).node.clone();
            let clone = self.sink.shallow_clone(&fmt_node);
            let clone_id = self.stack.add_clone_of(fmt_id, clone.clone());
            self.sink.reparent_children(&fb_node, &clone);
            self.sink.append(&fb_node, AppendNode(clone));

            self.stack.remove_formatting(fmt_list_pos);
            if bookmark > fmt_list_pos {
                bookmark -= 1;
            }
            self.stack.insert_formatting(bookmark, clone_id);

            self.remove_from_stack(fmt_stack_pos)?;
            fb_pos -= 1;
            self.stack.insert_at(fb_pos + 1, clone_id);
        }
        Ok(())
    }

    //§ reset-the-insertion-mode-appropriately
    pub(super) fn reset_insertion_mode(&mut self) {
        for pos in (0..self.stack.len()).rev() {
            let mut name = &self.stack.at(pos).name;
            if pos == 0 {
                if let Some(ref context) = self.context {
                    // `td` and `th` contexts fall back to in body.
                    if tag_sets::cell(context) {
                        break;
                    }
                    name = context;
                }
            }

            self.mode = match *name {
                local_name!("select") => InSelect,
                local_name!("td") | local_name!("th") => InCell,
                local_name!("tr") => InRow,
                local_name!("tbody") | local_name!("thead") | local_name!("tfoot") => InTableBody,
                local_name!("caption") => InCaption,
                local_name!("colgroup") => InColumnGroup,
                local_name!("table") => InTable,
                local_name!("head") | local_name!("body") => InBody,
                local_name!("frameset") => InFrameset,
                local_name!("html") if self.head.is_none() => BeforeHead,
                local_name!("html") => AfterHead,
                _ if pos == 0 => InBody,
                _ => continue,
            };
            return;
        }
        self.mode = InBody;
    }
}
