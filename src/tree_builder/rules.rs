// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The tree builder rules, one match per insertion mode and tag kind.
//!
//! A rule set that returns `NotHandled` passes the tag on to the next mode
//! in `rule_chain`.

use std::mem;

use tendril::StrTendril;

use super::interface::{ErrorHandler, FatalError, TreeSink};
use super::tag_sets::*;
use super::types::*;
use super::TreeBuilder;
use crate::tokenizer::ContentModelFlag::{Cdata, Plaintext, Rcdata};
use crate::tokenizer::{Attribute, StartTag, Tag};
use crate::LocalName;

static ISINDEX_PROMPT: &str = "This is a searchable index. Insert your search keywords here: ";

impl<Sink: TreeSink, E: ErrorHandler> TreeBuilder<Sink, E> {
    pub(super) fn start_tag_in(
        &mut self,
        mode: InsertionMode,
        tag: &mut Tag,
    ) -> Result<ProcessResult, FatalError> {
        Ok(match mode {
            //§ the-initial-insertion-mode
            Initial => {
                self.missing_doctype();
                Reprocess(RootElement)
            },

            //§ the-before-html-insertion-mode
            RootElement => {
                if tag.name == local_name!("html") {
                    self.create_root(mem::take(&mut tag.attrs));
                    self.mode = BeforeHead;
                    Done
                } else {
                    self.create_root(vec![]);
                    Reprocess(BeforeHead)
                }
            },

            //§ the-before-head-insertion-mode
            BeforeHead => {
                if tag.name == local_name!("head") {
                    self.head = Some(self.insert_element_for(tag));
                    self.mode = InHead;
                    Done
                } else {
                    self.head = Some(self.insert_phantom(local_name!("head")));
                    Reprocess(InHead)
                }
            },

            //§ parsing-main-inhead
            InHead => match tag.name {
                local_name!("base") | local_name!("link") | local_name!("meta") => {
                    self.insert_void_for(tag);
                    Done
                },

                local_name!("title") => {
                    self.insert_raw_text_for(tag, Rcdata, 1);
                    Done
                },

                local_name!("style") | local_name!("script") => {
                    self.insert_raw_text_for(tag, Cdata, 1);
                    Done
                },

                local_name!("noscript") => {
                    if self.opts.scripting_enabled {
                        self.insert_raw_text_for(tag, Cdata, 1);
                    } else {
                        self.insert_element_for(tag);
                        self.mode = InHeadNoscript;
                    }
                    Done
                },

                local_name!("head") => {
                    self.unexpected_start(tag);
                    Done
                },

                _ => {
                    self.pop();
                    Reprocess(AfterHead)
                },
            },

            //§ parsing-main-inheadnoscript
            InHeadNoscript => match tag.name {
                local_name!("link") | local_name!("meta") => {
                    self.insert_void_for(tag);
                    Done
                },

                local_name!("style") => {
                    self.insert_raw_text_for(tag, Cdata, 1);
                    Done
                },

                local_name!("head") | local_name!("noscript") => {
                    self.unexpected_start(tag);
                    Done
                },

                _ => {
                    self.unexpected_start(tag);
                    self.pop();
                    Reprocess(InHead)
                },
            },

            //§ the-after-head-insertion-mode
            AfterHead => match tag.name {
                local_name!("body") => {
                    self.insert_element_for(tag);
                    self.mode = InBody;
                    Done
                },

                local_name!("frameset") => {
                    self.insert_element_for(tag);
                    self.mode = InFrameset;
                    Done
                },

                local_name!("base") | local_name!("link") | local_name!("meta") => {
                    self.insert_into_head(tag, None);
                    Done
                },

                local_name!("script") | local_name!("style") => {
                    self.insert_into_head(tag, Some(Cdata));
                    Done
                },

                local_name!("title") => {
                    self.insert_into_head(tag, Some(Rcdata));
                    Done
                },

                local_name!("head") => {
                    self.unexpected_start(tag);
                    Done
                },

                _ => {
                    self.insert_phantom(local_name!("body"));
                    Reprocess(InBody)
                },
            },

            //§ parsing-main-inbody
            InBody => self.start_tag_in_body(tag)?,

            //§ parsing-main-intable
            InTable => match tag.name {
                local_name!("caption") => {
                    self.clear_to_table_context();
                    self.stack.insert_marker();
                    self.insert_element_for(tag);
                    self.mode = InCaption;
                    Done
                },

                local_name!("colgroup") => {
                    self.clear_to_table_context();
                    self.insert_element_for(tag);
                    self.mode = InColumnGroup;
                    Done
                },

                local_name!("col") => {
                    self.clear_to_table_context();
                    self.insert_phantom(local_name!("colgroup"));
                    Reprocess(InColumnGroup)
                },

                local_name!("tbody") | local_name!("tfoot") | local_name!("thead") => {
                    self.clear_to_table_context();
                    self.insert_element_for(tag);
                    self.mode = InTableBody;
                    Done
                },

                local_name!("td") | local_name!("th") | local_name!("tr") => {
                    self.clear_to_table_context();
                    self.insert_phantom(local_name!("tbody"));
                    Reprocess(InTableBody)
                },

                local_name!("table") => {
                    self.unexpected_start(tag);
                    match self.stack.find_last_in_table_scope(&local_name!("table")) {
                        None => Done,
                        Some(pos) => {
                            self.close_element_at(pos);
                            self.reset_insertion_mode();
                            Reprocess(self.mode)
                        },
                    }
                },

                _ => {
                    self.unexpected_start(tag);
                    NotHandled
                },
            },

            //§ parsing-main-incaption
            InCaption => {
                if table_structure(&tag.name) {
                    self.unexpected_start(tag);
                    if self.close_caption() {
                        Reprocess(InTable)
                    } else {
                        Done
                    }
                } else {
                    NotHandled
                }
            },

            //§ parsing-main-incolgroup
            InColumnGroup => match tag.name {
                local_name!("col") => {
                    self.insert_void_for(tag);
                    Done
                },

                _ => {
                    if self.stack.current_pos() == 0 {
                        self.unexpected_start(tag);
                        Done
                    } else {
                        self.pop();
                        Reprocess(InTable)
                    }
                },
            },

            //§ parsing-main-intbody
            InTableBody => match tag.name {
                local_name!("tr") => {
                    self.clear_to_table_body_context();
                    self.insert_element_for(tag);
                    self.mode = InRow;
                    Done
                },

                local_name!("td") | local_name!("th") => {
                    self.unexpected_start(tag);
                    self.clear_to_table_body_context();
                    self.insert_phantom(local_name!("tr"));
                    Reprocess(InRow)
                },

                local_name!("caption")
                | local_name!("col")
                | local_name!("colgroup")
                | local_name!("tbody")
                | local_name!("tfoot")
                | local_name!("thead") => {
                    if self.close_table_body() {
                        Reprocess(InTable)
                    } else {
                        self.unexpected_start(tag);
                        Done
                    }
                },

                _ => NotHandled,
            },

            //§ parsing-main-intr
            InRow => match tag.name {
                local_name!("td") | local_name!("th") => {
                    let pos = self.stack.find_last_or_root(&local_name!("tr"));
                    self.clear_stack_back_to(pos);
                    self.insert_element_for(tag);
                    self.mode = InCell;
                    self.stack.insert_marker();
                    Done
                },

                local_name!("caption")
                | local_name!("col")
                | local_name!("colgroup")
                | local_name!("tbody")
                | local_name!("tfoot")
                | local_name!("thead")
                | local_name!("tr") => {
                    if self.close_row() {
                        Reprocess(InTableBody)
                    } else {
                        self.unexpected_start(tag);
                        Done
                    }
                },

                _ => NotHandled,
            },

            //§ parsing-main-intd
            InCell => {
                if table_structure(&tag.name) {
                    match self.stack.find_last_cell_in_table_scope() {
                        Some(pos) => {
                            self.close_the_cell(pos);
                            Reprocess(InRow)
                        },
                        None => {
                            self.unexpected_start(tag);
                            Done
                        },
                    }
                } else {
                    NotHandled
                }
            },

            //§ parsing-main-inselect
            InSelect => match tag.name {
                local_name!("option") => {
                    if self.stack.is_current(&local_name!("option")) {
                        self.pop();
                    }
                    self.insert_element_for(tag);
                    Done
                },

                local_name!("optgroup") => {
                    if self.stack.is_current(&local_name!("option")) {
                        self.pop();
                    }
                    if self.stack.is_current(&local_name!("optgroup")) {
                        self.pop();
                    }
                    self.insert_element_for(tag);
                    Done
                },

                local_name!("select") => {
                    self.unexpected_start(tag);
                    if let Some(pos) = self.stack.find_last_in_table_scope(&local_name!("select")) {
                        self.pop_to(pos);
                        self.reset_insertion_mode();
                    }
                    Done
                },

                _ => {
                    self.unexpected_start(tag);
                    Done
                },
            },

            //§ parsing-main-afterbody
            AfterBody => {
                self.unexpected_start(tag);
                Reprocess(InBody)
            },

            //§ parsing-main-inframeset
            InFrameset => match tag.name {
                local_name!("frameset") => {
                    self.insert_element_for(tag);
                    Done
                },

                local_name!("frame") => {
                    self.insert_void_for(tag);
                    Done
                },

                _ => NotHandled,
            },

            //§ parsing-main-afterframeset
            AfterFrameset => match tag.name {
                local_name!("noframes") => {
                    self.insert_raw_text_for(tag, Cdata, 1);
                    Done
                },

                _ => {
                    self.unexpected_start(tag);
                    Done
                },
            },

            //§ the-after-after-body-insertion-mode
            TrailingEnd => {
                self.unexpected_start(tag);
                Reprocess(self.saved_mode)
            },
        })
    }

    fn start_tag_in_body(&mut self, tag: &mut Tag) -> Result<ProcessResult, FatalError> {
        Ok(match tag.name {
            local_name!("base") | local_name!("link") | local_name!("meta") => {
                self.insert_void_for(tag);
                Done
            },

            local_name!("style") | local_name!("script") => {
                self.insert_raw_text_for(tag, Cdata, 1);
                Done
            },

            local_name!("title") => {
                self.insert_into_head(tag, Some(Rcdata));
                Done
            },

            local_name!("body") => {
                self.unexpected_start(tag);
                if self.stack.len() > 1 && self.stack.at(1).name == local_name!("body") {
                    self.flush_pending_text();
                    let body = self.stack.at(1).node.clone();
                    self.sink.add_attrs_if_missing(&body, mem::take(&mut tag.attrs));
                }
                Done
            },

            local_name!("p")
            | local_name!("div")
            | local_name!("blockquote")
            | local_name!("ol")
            | local_name!("ul")
            | local_name!("dl")
            | local_name!("fieldset")
            | local_name!("address")
            | local_name!("menu")
            | local_name!("center")
            | local_name!("dir") => {
                self.close_p_element_in_scope();
                self.insert_element_for(tag);
                Done
            },

            local_name!("h1")
            | local_name!("h2")
            | local_name!("h3")
            | local_name!("h4")
            | local_name!("h5")
            | local_name!("h6") => {
                self.close_p_element_in_scope();
                if heading(&self.stack.current().name) {
                    self.unexpected_start(tag);
                    self.pop();
                }
                self.insert_element_for(tag);
                Done
            },

            local_name!("pre") | local_name!("listing") => {
                self.close_p_element_in_scope();
                self.insert_element_for(tag);
                self.drop_leading_newline = true;
                Done
            },

            local_name!("form") => {
                if self.form.is_some() {
                    self.unexpected_start(tag);
                } else {
                    self.close_p_element_in_scope();
                    self.form = Some(self.insert_element_for(tag));
                }
                Done
            },

            local_name!("li") => {
                self.close_list_item(|name| *name == local_name!("li"));
                self.insert_element_for(tag);
                Done
            },

            local_name!("dd") | local_name!("dt") => {
                self.close_list_item(|name| matches!(*name, local_name!("dd") | local_name!("dt")));
                self.insert_element_for(tag);
                Done
            },

            local_name!("plaintext") => {
                self.close_p_element_in_scope();
                self.insert_raw_text_for(tag, Plaintext, 1);
                Done
            },

            local_name!("a") => {
                if let Some((_, a)) = self.stack.find_formatting_after_last_marker(&local_name!("a")) {
                    self.unexpected_start(tag);
                    self.adoption_agency(&local_name!("a"))?;
                    if let Some(list_pos) = self.stack.formatting_position_of(a) {
                        self.stack.remove_formatting(list_pos);
                    }
                    if let Some(pos) = self.stack.position_of(a) {
                        self.remove_from_stack(pos)?;
                    }
                }
                self.reconstruct_formatting();
                self.insert_formatting_for(tag);
                Done
            },

            local_name!("b")
            | local_name!("big")
            | local_name!("em")
            | local_name!("font")
            | local_name!("i")
            | local_name!("s")
            | local_name!("small")
            | local_name!("strike")
            | local_name!("strong")
            | local_name!("tt")
            | local_name!("u") => {
                self.reconstruct_formatting();
                self.insert_formatting_for(tag);
                Done
            },

            local_name!("nobr") => {
                self.reconstruct_formatting();
                if self.stack.find_last_in_scope(&local_name!("nobr")).is_some() {
                    self.unexpected_start(tag);
                    self.adoption_agency(&local_name!("nobr"))?;
                    self.reconstruct_formatting();
                }
                self.insert_formatting_for(tag);
                Done
            },

            local_name!("button") => match self.stack.find_last_in_scope(&local_name!("button")) {
                Some(pos) => {
                    self.unexpected_start(tag);
                    self.generate_implied_end_tags(None);
                    self.pop_to(pos);
                    self.stack.clear_formatting_to_last_marker();
                    Reprocess(self.mode)
                },
                None => {
                    self.reconstruct_formatting();
                    self.insert_element_for(tag);
                    self.stack.insert_marker();
                    Done
                },
            },

            local_name!("object") | local_name!("marquee") => {
                self.reconstruct_formatting();
                self.insert_element_for(tag);
                self.stack.insert_marker();
                Done
            },

            local_name!("xmp") => {
                self.reconstruct_formatting();
                self.insert_raw_text_for(tag, Cdata, 1);
                Done
            },

            local_name!("table") => {
                self.close_p_element_in_scope();
                self.insert_element_for(tag);
                self.mode = InTable;
                Done
            },

            local_name!("area")
            | local_name!("basefont")
            | local_name!("bgsound")
            | local_name!("br")
            | local_name!("embed")
            | local_name!("img")
            | local_name!("input")
            | local_name!("param")
            | local_name!("spacer")
            | local_name!("wbr") => {
                self.reconstruct_formatting();
                self.insert_void_for(tag);
                Done
            },

            local_name!("hr") => {
                self.close_p_element_in_scope();
                self.insert_void_for(tag);
                Done
            },

            local_name!("image") => {
                self.unexpected_start(tag);
                let mut img = Tag::new(StartTag, local_name!("img"), mem::take(&mut tag.attrs));
                img.self_closing = tag.self_closing;
                ReprocessAs(img)
            },

            local_name!("isindex") => {
                self.isindex(tag);
                Done
            },

            local_name!("textarea") => {
                self.insert_raw_text_for(tag, Rcdata, 1);
                self.drop_leading_newline = true;
                Done
            },

            local_name!("iframe") | local_name!("noembed") | local_name!("noframes") => {
                self.insert_raw_text_for(tag, Cdata, 1);
                Done
            },

            local_name!("noscript") if self.opts.scripting_enabled => {
                self.insert_raw_text_for(tag, Cdata, 1);
                Done
            },

            local_name!("select") => {
                self.reconstruct_formatting();
                self.insert_element_for(tag);
                self.mode = InSelect;
                Done
            },

            local_name!("caption")
            | local_name!("col")
            | local_name!("colgroup")
            | local_name!("frame")
            | local_name!("frameset")
            | local_name!("head")
            | local_name!("option")
            | local_name!("optgroup")
            | local_name!("tbody")
            | local_name!("td")
            | local_name!("tfoot")
            | local_name!("th")
            | local_name!("thead")
            | local_name!("tr") => {
                self.unexpected_start(tag);
                Done
            },

            _ => {
                self.reconstruct_formatting();
                self.insert_element_for(tag);
                Done
            },
        })
    }

    pub(super) fn end_tag_in(
        &mut self,
        mode: InsertionMode,
        tag: &mut Tag,
    ) -> Result<ProcessResult, FatalError> {
        Ok(match mode {
            Initial => {
                self.missing_doctype();
                Reprocess(RootElement)
            },

            RootElement => {
                self.create_root(vec![]);
                Reprocess(BeforeHead)
            },

            BeforeHead => match tag.name {
                local_name!("head")
                | local_name!("body")
                | local_name!("html")
                | local_name!("p")
                | local_name!("br") => {
                    self.head = Some(self.insert_phantom(local_name!("head")));
                    Reprocess(InHead)
                },
                _ => {
                    self.unexpected_end(tag);
                    Done
                },
            },

            InHead => match tag.name {
                local_name!("head") => {
                    self.pop();
                    self.mode = AfterHead;
                    Done
                },
                local_name!("body") | local_name!("html") | local_name!("p") | local_name!("br") => {
                    self.pop();
                    Reprocess(AfterHead)
                },
                _ => {
                    self.unexpected_end(tag);
                    Done
                },
            },

            InHeadNoscript => match tag.name {
                local_name!("noscript") => {
                    self.pop();
                    self.mode = InHead;
                    Done
                },
                local_name!("p") | local_name!("br") => {
                    self.unexpected_end(tag);
                    self.pop();
                    Reprocess(InHead)
                },
                _ => {
                    self.unexpected_end(tag);
                    Done
                },
            },

            AfterHead => {
                self.insert_phantom(local_name!("body"));
                Reprocess(InBody)
            },

            InBody => self.end_tag_in_body(tag)?,

            InTable => match tag.name {
                local_name!("table") => {
                    match self.stack.find_last_in_table_scope(&local_name!("table")) {
                        Some(pos) => {
                            self.close_element_at(pos);
                            self.reset_insertion_mode();
                        },
                        None => self.unexpected_end(tag),
                    }
                    Done
                },

                local_name!("body")
                | local_name!("caption")
                | local_name!("col")
                | local_name!("colgroup")
                | local_name!("html")
                | local_name!("tbody")
                | local_name!("td")
                | local_name!("tfoot")
                | local_name!("th")
                | local_name!("thead")
                | local_name!("tr") => {
                    self.unexpected_end(tag);
                    Done
                },

                _ => {
                    self.unexpected_end(tag);
                    NotHandled
                },
            },

            InCaption => match tag.name {
                local_name!("caption") => {
                    if !self.close_caption() {
                        self.unexpected_end(tag);
                    }
                    Done
                },

                local_name!("table") => {
                    self.unexpected_end(tag);
                    if self.close_caption() {
                        Reprocess(InTable)
                    } else {
                        Done
                    }
                },

                local_name!("body")
                | local_name!("col")
                | local_name!("colgroup")
                | local_name!("html")
                | local_name!("tbody")
                | local_name!("td")
                | local_name!("tfoot")
                | local_name!("th")
                | local_name!("thead")
                | local_name!("tr") => {
                    self.unexpected_end(tag);
                    Done
                },

                _ => NotHandled,
            },

            InColumnGroup => match tag.name {
                local_name!("colgroup") => {
                    if self.stack.current_pos() == 0 {
                        self.unexpected_end(tag);
                    } else {
                        self.pop();
                        self.mode = InTable;
                    }
                    Done
                },

                local_name!("col") => {
                    self.unexpected_end(tag);
                    Done
                },

                _ => {
                    if self.stack.current_pos() == 0 {
                        self.unexpected_end(tag);
                        Done
                    } else {
                        self.pop();
                        Reprocess(InTable)
                    }
                },
            },

            InTableBody => match tag.name {
                local_name!("tbody") | local_name!("tfoot") | local_name!("thead") => {
                    let pos = self.stack.find_last_or_root(&tag.name);
                    if pos == 0 {
                        self.unexpected_end(tag);
                    } else {
                        self.clear_stack_back_to(pos);
                        self.pop();
                        self.mode = InTable;
                    }
                    Done
                },

                local_name!("table") => {
                    if self.close_table_body() {
                        Reprocess(InTable)
                    } else {
                        self.unexpected_end(tag);
                        Done
                    }
                },

                local_name!("body")
                | local_name!("caption")
                | local_name!("col")
                | local_name!("colgroup")
                | local_name!("html")
                | local_name!("td")
                | local_name!("th")
                | local_name!("tr") => {
                    self.unexpected_end(tag);
                    Done
                },

                _ => NotHandled,
            },

            InRow => match tag.name {
                local_name!("tr") => {
                    if self.close_row() {
                        self.mode = InTableBody;
                    } else {
                        self.unexpected_end(tag);
                    }
                    Done
                },

                local_name!("table") => {
                    if self.close_row() {
                        Reprocess(InTableBody)
                    } else {
                        self.unexpected_end(tag);
                        Done
                    }
                },

                local_name!("tbody") | local_name!("tfoot") | local_name!("thead") => {
                    if self.stack.find_last_in_table_scope(&tag.name).is_some() && self.close_row() {
                        Reprocess(InTableBody)
                    } else {
                        self.unexpected_end(tag);
                        Done
                    }
                },

                local_name!("body")
                | local_name!("caption")
                | local_name!("col")
                | local_name!("colgroup")
                | local_name!("html")
                | local_name!("td")
                | local_name!("th") => {
                    self.unexpected_end(tag);
                    Done
                },

                _ => NotHandled,
            },

            InCell => match tag.name {
                local_name!("td") | local_name!("th") => {
                    match self.stack.find_last_in_table_scope(&tag.name) {
                        Some(pos) => self.close_the_cell(pos),
                        None => self.unexpected_end(tag),
                    }
                    Done
                },

                local_name!("table")
                | local_name!("tbody")
                | local_name!("tfoot")
                | local_name!("thead")
                | local_name!("tr") => {
                    let cell = match self.stack.find_last_in_table_scope(&tag.name) {
                        Some(_) => self.stack.find_last_cell_in_table_scope(),
                        None => None,
                    };
                    match cell {
                        Some(pos) => {
                            self.close_the_cell(pos);
                            Reprocess(InRow)
                        },
                        None => {
                            self.unexpected_end(tag);
                            Done
                        },
                    }
                },

                local_name!("body")
                | local_name!("caption")
                | local_name!("col")
                | local_name!("colgroup")
                | local_name!("html") => {
                    self.unexpected_end(tag);
                    Done
                },

                _ => NotHandled,
            },

            InSelect => match tag.name {
                local_name!("option") => {
                    if self.stack.is_current(&local_name!("option")) {
                        self.pop();
                    } else {
                        self.unexpected_end(tag);
                    }
                    Done
                },

                local_name!("optgroup") => {
                    let len = self.stack.len();
                    if self.stack.is_current(&local_name!("option"))
                        && len > 2
                        && self.stack.at(len - 2).name == local_name!("optgroup")
                    {
                        self.pop();
                    }
                    if self.stack.is_current(&local_name!("optgroup")) {
                        self.pop();
                    } else {
                        self.unexpected_end(tag);
                    }
                    Done
                },

                local_name!("select") => {
                    match self.stack.find_last_in_table_scope(&local_name!("select")) {
                        Some(pos) => {
                            self.pop_to(pos);
                            self.reset_insertion_mode();
                        },
                        None => self.unexpected_end(tag),
                    }
                    Done
                },

                _ => {
                    self.unexpected_end(tag);
                    Done
                },
            },

            AfterBody => {
                if tag.name == local_name!("html") {
                    if self.context.is_some() {
                        self.unexpected_end(tag);
                    } else {
                        self.saved_mode = AfterBody;
                        self.mode = TrailingEnd;
                    }
                    Done
                } else {
                    self.unexpected_end(tag);
                    Reprocess(InBody)
                }
            },

            InFrameset => {
                if tag.name == local_name!("frameset") {
                    if self.stack.current_pos() == 0 {
                        self.unexpected_end(tag);
                    } else {
                        self.pop();
                        if self.context.is_none() && !self.stack.is_current(&local_name!("frameset")) {
                            self.mode = AfterFrameset;
                        }
                    }
                } else {
                    self.unexpected_end(tag);
                }
                Done
            },

            AfterFrameset => {
                if tag.name == local_name!("html") {
                    self.saved_mode = AfterFrameset;
                    self.mode = TrailingEnd;
                } else {
                    self.unexpected_end(tag);
                }
                Done
            },

            TrailingEnd => {
                self.unexpected_end(tag);
                Reprocess(self.saved_mode)
            },
        })
    }

    fn end_tag_in_body(&mut self, tag: &mut Tag) -> Result<ProcessResult, FatalError> {
        Ok(match tag.name {
            local_name!("body") => {
                if self.body_is_open() {
                    self.check_body_end(body_end_ok);
                    self.mode = AfterBody;
                } else {
                    self.unexpected_end(tag);
                }
                Done
            },

            local_name!("html") => {
                if self.body_is_open() {
                    self.check_body_end(html_end_ok);
                    Reprocess(AfterBody)
                } else {
                    self.unexpected_end(tag);
                    Done
                }
            },

            local_name!("div")
            | local_name!("blockquote")
            | local_name!("ul")
            | local_name!("ol")
            | local_name!("pre")
            | local_name!("dl")
            | local_name!("fieldset")
            | local_name!("address")
            | local_name!("center")
            | local_name!("dir")
            | local_name!("listing")
            | local_name!("menu")
            | local_name!("dd")
            | local_name!("dt")
            | local_name!("li") => {
                match self.stack.find_last_in_scope(&tag.name) {
                    Some(pos) => self.close_element_at(pos),
                    None => self.unexpected_end(tag),
                }
                Done
            },

            local_name!("form") => {
                self.form = None;
                match self.stack.find_last_in_scope(&local_name!("form")) {
                    Some(pos) => {
                        self.generate_implied_end_tags(None);
                        if pos == self.stack.current_pos() {
                            self.pop();
                        } else {
                            self.unclosed_elements(pos);
                        }
                    },
                    None => self.unexpected_end(tag),
                }
                Done
            },

            local_name!("p") => {
                match self.stack.find_last_in_scope(&local_name!("p")) {
                    Some(pos) => self.close_element_at(pos),
                    None => {
                        self.unexpected_end(tag);
                        self.insert_void(local_name!("p"), vec![]);
                    },
                }
                Done
            },

            local_name!("h1")
            | local_name!("h2")
            | local_name!("h3")
            | local_name!("h4")
            | local_name!("h5")
            | local_name!("h6") => {
                match self.stack.find_last_heading_in_scope() {
                    Some(pos) => {
                        self.generate_implied_end_tags(None);
                        if pos != self.stack.current_pos() {
                            self.unclosed_elements(pos);
                        }
                        self.pop_to(pos);
                    },
                    None => self.unexpected_end(tag),
                }
                Done
            },

            ref name if formatting(name) => {
                self.adoption_agency(&tag.name)?;
                Done
            },

            local_name!("button") | local_name!("marquee") | local_name!("object") => {
                match self.stack.find_last_in_scope(&tag.name) {
                    Some(pos) => {
                        self.close_element_at(pos);
                        self.stack.clear_formatting_to_last_marker();
                    },
                    None => self.unexpected_end(tag),
                }
                Done
            },

            local_name!("area")
            | local_name!("basefont")
            | local_name!("bgsound")
            | local_name!("br")
            | local_name!("embed")
            | local_name!("hr")
            | local_name!("iframe")
            | local_name!("image")
            | local_name!("img")
            | local_name!("input")
            | local_name!("isindex")
            | local_name!("noembed")
            | local_name!("noframes")
            | local_name!("param")
            | local_name!("select")
            | local_name!("spacer")
            | local_name!("table")
            | local_name!("textarea")
            | local_name!("wbr") => {
                self.unexpected_end(tag);
                Done
            },

            local_name!("noscript") if self.opts.scripting_enabled => {
                self.unexpected_end(tag);
                Done
            },

            _ => {
                match self.stack.find_last_before_special(&tag.name) {
                    Some(pos) => self.close_element_at(pos),
                    None => self.unexpected_end(tag),
                }
                Done
            },
        })
    }

    //§ helpers
    fn body_is_open(&self) -> bool {
        self.stack.len() > 1 && self.stack.at(1).name == local_name!("body")
    }

    /// Report elements left open by `</body>` or `</html>`.
    fn check_body_end(&mut self, may_stay_open: fn(&LocalName) -> bool) {
        if self.stack.names().skip(2).any(|name| !may_stay_open(name)) {
            self.unclosed_elements(1);
        }
    }

    fn clear_to_table_context(&mut self) {
        let pos = self.stack.find_last_or_root(&local_name!("table"));
        self.clear_stack_back_to(pos);
    }

    fn clear_to_table_body_context(&mut self) {
        let pos = self.stack.find_last_table_section_or_root();
        self.clear_stack_back_to(pos);
    }

    /// Close the open `tbody`, `thead` or `tfoot`. False if there is none.
    fn close_table_body(&mut self) -> bool {
        let pos = self.stack.find_last_table_section_or_root();
        if pos == 0 {
            return false;
        }
        self.clear_stack_back_to(pos);
        self.pop();
        true
    }

    /// Close the open `tr`. False if there is none.
    fn close_row(&mut self) -> bool {
        let pos = self.stack.find_last_or_root(&local_name!("tr"));
        if pos == 0 {
            return false;
        }
        self.clear_stack_back_to(pos);
        self.pop();
        true
    }

    /// Close the caption and go back to the table. False if no caption is
    /// in table scope.
    fn close_caption(&mut self) -> bool {
        match self.stack.find_last_in_table_scope(&local_name!("caption")) {
            Some(pos) => {
                self.close_element_at(pos);
                self.stack.clear_formatting_to_last_marker();
                self.mode = InTable;
                true
            },
            None => false,
        }
    }

    fn close_list_item<F>(&mut self, is_item: F)
    where
        F: Fn(&LocalName) -> bool,
    {
        self.close_p_element_in_scope();
        if let Some(pos) = self.stack.find_list_item_to_close(is_item) {
            if pos < self.stack.current_pos() {
                self.unclosed_elements(pos);
            }
            self.pop_to(pos);
        }
    }

    //§ isindex
    fn isindex(&mut self, tag: &mut Tag) {
        self.unexpected_start(tag);
        if self.form.is_some() {
            return;
        }
        self.close_p_element_in_scope();

        let mut attrs = mem::take(&mut tag.attrs);
        let form_attrs: Vec<Attribute> = attrs
            .iter()
            .filter(|a| a.name == local_name!("action"))
            .cloned()
            .collect();
        let prompt = attrs
            .iter()
            .find(|a| a.name == local_name!("prompt"))
            .map(|a| a.value.clone())
            .unwrap_or_else(|| StrTendril::from_slice(ISINDEX_PROMPT));
        attrs.retain(|a| {
            !matches!(
                a.name,
                local_name!("name") | local_name!("action") | local_name!("prompt")
            )
        });
        attrs.push(Attribute {
            name: local_name!("name"),
            value: StrTendril::from_slice("isindex"),
        });

        self.form = Some(self.insert_element(local_name!("form"), form_attrs));
        self.insert_void(local_name!("hr"), vec![]);
        self.insert_phantom(local_name!("p"));
        self.insert_phantom(local_name!("label"));
        self.append_text(prompt);
        self.insert_void(local_name!("input"), attrs);
        self.pop();
        self.pop();
        self.insert_void(local_name!("hr"), vec![]);
        self.pop();
        self.form = None;
    }
}
