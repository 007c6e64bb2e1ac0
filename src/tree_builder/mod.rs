// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The HTML5 tree builder.

pub use self::data::document_mode;
pub use self::interface::{AppendNode, AppendText, NodeOrText};
pub use self::interface::{Diagnostic, ErrorHandler, ErrorLog, LogErrors, Severity};
pub use self::interface::{DoctypeExpectation, DocumentMode, DocumentModeHandler};
pub use self::interface::{FatalError, TreeSink, XmlViolationPolicy};
pub use self::types::InsertionMode;

use std::mem;

use tendril::StrTendril;

use self::stack::ElementStack;
use self::types::*;
use crate::tokenizer::{self, ContentModelFlag, Doctype, Tag, Token, TokenSink, TokenSinkResult};
use crate::tokenizer::{CharacterTokens, CommentToken, DoctypeToken, EOFToken, EndTag, TagToken};
use crate::util::str::is_ascii_whitespace;
use crate::LocalName;

mod actions;
mod data;
mod interface;
mod rules;
mod stack;
mod tag_sets;
mod types;

/// Tree builder options, with an impl for Default.
#[derive(Copy, Clone, Debug)]
pub struct TreeBuilderOpts {
    /// What to do when recovery cannot be expressed as a forward-only
    /// stream of tree mutations.
    pub streamability: XmlViolationPolicy,

    /// Merge adjacent character appends to the same parent into one
    /// `TreeSink::append` call.
    pub coalescing_text: bool,

    /// Is scripting enabled? This decides whether `<noscript>` holds raw
    /// text or markup.
    pub scripting_enabled: bool,

    /// Which doctype to expect, for diagnostics.
    pub doctype_expectation: DoctypeExpectation,

    /// Report more detailed errors, at some performance cost.
    pub exact_errors: bool,
}

impl Default for TreeBuilderOpts {
    fn default() -> TreeBuilderOpts {
        TreeBuilderOpts {
            streamability: XmlViolationPolicy::Allow,
            coalescing_text: false,
            scripting_enabled: true,
            doctype_expectation: DoctypeExpectation::Html,
            exact_errors: false,
        }
    }
}

/// The HTML tree builder.
///
/// Feed it tokens through `TokenSink::process_token`. It keeps only the
/// parser state; the tree itself lives in `sink`.
pub struct TreeBuilder<Sink: TreeSink, E: ErrorHandler = LogErrors> {
    /// Options controlling the behavior of the tree builder.
    opts: TreeBuilderOpts,

    /// Consumer of tree modifications.
    pub sink: Sink,

    /// Consumer of parse errors.
    pub errors: E,

    /// Told the document mode once per document.
    doc_mode_handler: Option<Box<dyn DocumentModeHandler>>,

    /// Stack of open elements and list of active formatting elements.
    stack: ElementStack<Sink::Handle>,

    /// Insertion mode.
    mode: InsertionMode,

    /// The mode to go back to when something shows up after `</html>`.
    saved_mode: InsertionMode,

    /// Form element pointer.
    form: Option<FrameId>,

    /// Head element pointer.
    head: Option<FrameId>,

    /// How many elements the next end tag pops, after a raw text element
    /// was opened.
    raw_text_pops: usize,

    /// Drop a single LF at the start of the next character token.
    drop_leading_newline: bool,

    /// The context element, when parsing a fragment.
    context: Option<LocalName>,

    /// The document mode, once it is known.
    document_mode: Option<DocumentMode>,

    /// The current tag came to the in-body rules from the in-table rules.
    foster_parenting: bool,

    /// A fatal error happened; refuse further tokens.
    aborted: bool,

    /// Character data waiting to be appended to a frame, when coalescing.
    pending_text: Option<(FrameId, StrTendril)>,

    /// What to tell the tokenizer after the current token.
    next_tokenizer_state: Option<TokenSinkResult>,
}

impl<Sink: TreeSink> TreeBuilder<Sink, LogErrors> {
    /// Create a new tree builder which sends tree modifications to a
    /// particular `TreeSink` and logs parse errors.
    pub fn new(sink: Sink, opts: TreeBuilderOpts) -> TreeBuilder<Sink, LogErrors> {
        TreeBuilder::with_error_handler(sink, LogErrors, opts)
    }
}

impl<Sink: TreeSink, E: ErrorHandler> TreeBuilder<Sink, E> {
    /// Create a new tree builder which reports parse errors to `errors`.
    pub fn with_error_handler(sink: Sink, errors: E, opts: TreeBuilderOpts) -> TreeBuilder<Sink, E> {
        TreeBuilder {
            opts,
            sink,
            errors,
            doc_mode_handler: None,
            stack: ElementStack::new(),
            mode: Initial,
            saved_mode: Initial,
            form: None,
            head: None,
            raw_text_pops: 0,
            drop_leading_newline: false,
            context: None,
            document_mode: None,
            foster_parenting: false,
            aborted: false,
            pending_text: None,
            next_tokenizer_state: None,
        }
    }

    /// Create a tree builder for parsing a fragment as if it appeared
    /// inside an element called `context`.
    ///
    /// The fragment is built under a root `html` element; its children are
    /// the parsed content.
    pub fn new_for_fragment(
        sink: Sink,
        errors: E,
        context: LocalName,
        opts: TreeBuilderOpts,
    ) -> TreeBuilder<Sink, E> {
        let mut tb = TreeBuilder::with_error_handler(sink, errors, opts);
        tb.context = Some(context);
        tb.create_root(vec![]);
        tb.reset_insertion_mode();
        tb
    }

    /// Install the callback that is told the document mode.
    pub fn set_document_mode_handler<H>(&mut self, handler: H)
    where
        H: DocumentModeHandler + 'static,
    {
        self.doc_mode_handler = Some(Box::new(handler));
    }

    /// The content model the tokenizer should start in for a fragment.
    pub fn tokenizer_state_for_context(&self) -> ContentModelFlag {
        let context = unwrap_or_return!(self.context.as_ref(), ContentModelFlag::Pcdata);
        match *context {
            local_name!("title") | local_name!("textarea") => ContentModelFlag::Rcdata,
            local_name!("style")
            | local_name!("script")
            | local_name!("xmp")
            | local_name!("iframe")
            | local_name!("noembed")
            | local_name!("noframes") => ContentModelFlag::Cdata,
            local_name!("noscript") if self.opts.scripting_enabled => ContentModelFlag::Cdata,
            local_name!("plaintext") => ContentModelFlag::Plaintext,
            _ => ContentModelFlag::Pcdata,
        }
    }

    /// The current insertion mode.
    pub fn insertion_mode(&self) -> InsertionMode {
        self.mode
    }

    /// The document mode, once a doctype (or its absence) has been seen.
    pub fn document_mode(&self) -> Option<DocumentMode> {
        self.document_mode
    }

    /// Names of the open elements, root first.
    pub fn open_elements(&self) -> Vec<LocalName> {
        self.stack.names().cloned().collect()
    }

    /// Give back the sink and the error handler.
    pub fn unwrap(self) -> (Sink, E) {
        (self.sink, self.errors)
    }

    fn report_document_mode(
        &mut self,
        mode: DocumentMode,
        public_id: Option<&str>,
        system_id: Option<&str>,
        html4_checks: bool,
    ) {
        if self.document_mode.is_some() {
            return;
        }
        self.document_mode = Some(mode);
        if let Some(ref mut handler) = self.doc_mode_handler {
            handler.document_mode(mode, public_id, system_id, html4_checks);
        }
    }

    /// No doctype came before the first real token.
    fn missing_doctype(&mut self) {
        if self.opts.doctype_expectation != DoctypeExpectation::NoDoctypeErrors {
            self.errors.error("Missing doctype.".into());
        }
        self.report_document_mode(DocumentMode::Quirks, None, None, false);
    }

    //§ doctype
    fn process_doctype(&mut self, doctype: Doctype) {
        if self.mode != Initial {
            self.errors.error("Stray doctype.".into());
            return;
        }

        let verdict = data::check_doctype(self.opts.doctype_expectation, &doctype);
        if let Some(msg) = verdict.error {
            self.errors.error(msg.into());
        }
        if let Some(msg) = verdict.warning {
            self.errors.warning(msg.into());
        }

        let Doctype {
            name,
            public_id,
            system_id,
            ..
        } = doctype;
        self.sink.append_doctype_to_document(
            name.unwrap_or_else(StrTendril::new),
            public_id.clone().unwrap_or_else(StrTendril::new),
            system_id.clone().unwrap_or_else(StrTendril::new),
        );
        self.report_document_mode(
            verdict.mode,
            public_id.as_deref(),
            system_id.as_deref(),
            verdict.html4_checks,
        );
        if verdict.html4_checks {
            self.next_tokenizer_state = Some(TokenSinkResult::Html4Errors);
        }
        self.mode = RootElement;
    }

    //§ comments
    fn process_comment(&mut self, text: StrTendril) {
        if !self.sink.wants_comments() {
            return;
        }
        self.flush_pending_text();
        match self.mode {
            Initial | RootElement | TrailingEnd => self.sink.append_comment_to_document(text),
            AfterBody => {
                let root = self.stack.at(0).node.clone();
                self.sink.append_comment(&root, text);
            },
            _ => {
                let target = self.stack.current().node.clone();
                self.sink.append_comment(&target, text);
            },
        }
    }

    //§ tags
    fn process_tag(&mut self, tag: Tag) -> Result<(), FatalError> {
        if tag.kind == EndTag && self.raw_text_pops > 0 {
            for _ in 0..mem::replace(&mut self.raw_text_pops, 0) {
                self.pop();
            }
            return Ok(());
        }

        let mut tag = tag;
        loop {
            match self.step(&mut tag)? {
                Done => return Ok(()),
                NotHandled => {
                    warn!("no rule handled {:?} in insertion mode {:?}", tag, self.mode);
                    return Ok(());
                },
                Reprocess(mode) => self.mode = mode,
                ReprocessAs(new_tag) => tag = new_tag,
            }
        }
    }

    /// Run the rule chain of the current insertion mode on one tag.
    fn step(&mut self, tag: &mut Tag) -> Result<ProcessResult, FatalError> {
        debug!("processing {:?} in insertion mode {:?}", tag, self.mode);

        if tag.kind == tokenizer::StartTag
            && tag.name == local_name!("html")
            && !matches!(self.mode, Initial | RootElement | TrailingEnd)
        {
            self.errors.error(format_if!(
                self.opts.exact_errors,
                "Stray html start tag.",
                "Stray html start tag in insertion mode {:?}.",
                self.mode
            ));
            self.add_attrs_to_root(mem::take(&mut tag.attrs));
            return Ok(Done);
        }

        let chain = rule_chain(self.mode);
        let from_table = chain.contains(&InTable);
        for &mode in chain {
            self.foster_parenting = from_table && mode == InBody;
            let result = match tag.kind {
                tokenizer::StartTag => self.start_tag_in(mode, tag),
                EndTag => self.end_tag_in(mode, tag),
            };
            self.foster_parenting = false;
            match result? {
                NotHandled => continue,
                result => return Ok(result),
            }
        }
        Ok(NotHandled)
    }

    //§ characters
    fn process_characters(&mut self, mut text: StrTendril) {
        if self.drop_leading_newline {
            self.drop_leading_newline = false;
            if text.starts_with('\n') {
                text.pop_front(1);
            }
        }
        if text.is_empty() {
            return;
        }

        if self.raw_text_pops > 0 {
            self.append_text(text);
            return;
        }

        if matches!(self.mode, InBody | InCell | InCaption) {
            self.reconstruct_formatting();
            self.append_text(text);
            return;
        }

        // The start of the run that will be appended as a whole.
        let mut start = 0;
        for (i, c) in text.char_indices() {
            let next = i + c.len_utf8();
            if is_ascii_whitespace(c) {
                match self.mode {
                    Initial | RootElement => {
                        self.flush_run(&text, start, i);
                        start = next;
                    },
                    InSelect => {
                        self.flush_run(&text, start, text.len());
                        return;
                    },
                    AfterBody => {
                        self.flush_run(&text, start, i);
                        start = i;
                        self.reconstruct_formatting();
                    },
                    TrailingEnd if self.saved_mode != AfterFrameset => {
                        self.flush_run(&text, start, i);
                        start = i;
                        self.reconstruct_formatting();
                    },
                    _ => (),
                }
                continue;
            }

            // Non-whitespace may switch modes; run it until it is consumed.
            loop {
                match self.mode {
                    Initial => {
                        self.missing_doctype();
                        self.mode = RootElement;
                    },
                    RootElement => {
                        self.create_root(vec![]);
                        self.mode = BeforeHead;
                    },
                    BeforeHead => {
                        self.flush_run(&text, start, i);
                        start = i;
                        let head = self.insert_phantom(local_name!("head"));
                        self.head = Some(head);
                        self.mode = InHead;
                    },
                    InHead => {
                        self.flush_run(&text, start, i);
                        start = i;
                        self.pop();
                        self.mode = AfterHead;
                    },
                    InHeadNoscript => {
                        self.flush_run(&text, start, i);
                        start = i;
                        self.errors.error("Non-space character inside noscript in head.".into());
                        self.pop();
                        self.mode = InHead;
                    },
                    AfterHead => {
                        self.flush_run(&text, start, i);
                        start = i;
                        self.insert_phantom(local_name!("body"));
                        self.mode = InBody;
                    },
                    InBody | InCell | InCaption => {
                        self.flush_run(&text, start, i);
                        self.reconstruct_formatting();
                        self.flush_run(&text, i, text.len());
                        return;
                    },
                    InTable | InTableBody | InRow => {
                        self.flush_run(&text, start, i);
                        start = next;
                        self.reconstruct_formatting();
                        if self.stack.current().foster_parenting {
                            self.errors.error("Misplaced non-space characters inside a table.".into());
                        }
                        let c = text.subtendril(i as u32, (next - i) as u32);
                        self.insert_appropriately(AppendText(c), true);
                        break;
                    },
                    InColumnGroup => {
                        self.flush_run(&text, start, i);
                        if self.stack.current_pos() == 0 {
                            self.errors.error("Non-space in colgroup when parsing fragment.".into());
                            start = next;
                            break;
                        }
                        start = i;
                        self.pop();
                        self.mode = InTable;
                    },
                    InSelect => {
                        self.flush_run(&text, start, text.len());
                        return;
                    },
                    AfterBody => {
                        self.errors.error("Non-space character after body.".into());
                        self.mode = InBody;
                    },
                    InFrameset | AfterFrameset => {
                        self.flush_run(&text, start, i);
                        start = next;
                        self.errors.error("Non-space in frameset.".into());
                        break;
                    },
                    TrailingEnd => {
                        self.errors.error("Non-space character in page trailer.".into());
                        self.mode = self.saved_mode;
                    },
                }
            }
        }
        self.flush_run(&text, start, text.len());
    }

    /// Append `text[start..end]` to the current node.
    fn flush_run(&mut self, text: &StrTendril, start: usize, end: usize) {
        if end > start {
            self.append_text(text.subtendril(start as u32, (end - start) as u32));
        }
    }

    //§ end-of-file
    fn process_eof(&mut self) {
        if self.mode == Initial {
            self.missing_doctype();
            self.mode = RootElement;
        }
        if self.mode == RootElement {
            self.create_root(vec![]);
            self.mode = BeforeHead;
        }

        if self.mode != TrailingEnd {
            self.generate_implied_end_tags(None);
            let second_is_body = self.stack.len() > 1 && self.stack.at(1).name == local_name!("body");
            let unclosed = match self.context {
                None => self.stack.len() > 2 || (self.stack.len() == 2 && !second_is_body),
                Some(_) => self.stack.len() > 1 && !second_is_body,
            };
            if unclosed {
                self.errors.error(format_if!(
                    self.opts.exact_errors,
                    "End of file seen and there were open elements.",
                    "End of file seen and there were open elements: {:?}.",
                    self.open_elements()
                ));
            }
        }

        self.flush_pending_text();
        self.sink.end();
    }
}

impl<Sink: TreeSink, E: ErrorHandler> TokenSink for TreeBuilder<Sink, E> {
    fn process_token(&mut self, token: Token) -> Result<TokenSinkResult, FatalError> {
        if self.aborted {
            return Err(FatalError::Aborted);
        }

        let result = match token {
            DoctypeToken(doctype) => {
                self.drop_leading_newline = false;
                self.process_doctype(doctype);
                Ok(())
            },
            CommentToken(text) => {
                self.drop_leading_newline = false;
                self.process_comment(text);
                Ok(())
            },
            TagToken(tag) => {
                self.drop_leading_newline = false;
                self.process_tag(tag)
            },
            CharacterTokens(text) => {
                self.process_characters(text);
                Ok(())
            },
            EOFToken => {
                self.process_eof();
                Ok(())
            },
        };

        match result {
            Ok(()) => Ok(self.next_tokenizer_state.take().unwrap_or(TokenSinkResult::Continue)),
            Err(e) => {
                self.aborted = true;
                Err(e)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rcdom::RcDom;
    use crate::tokenizer::{StartTag, TagKind};

    fn tag(kind: TagKind, name: &str) -> Token {
        TagToken(Tag::new(kind, LocalName::from(name), vec![]))
    }

    fn body_child_count(tb: &TreeBuilder<RcDom, ErrorLog>) -> usize {
        tb.stack.at(1).node.children.borrow().len()
    }

    #[test]
    fn reconstruction_is_idempotent() {
        let mut tb = TreeBuilder::with_error_handler(RcDom::default(), ErrorLog::new(), Default::default());
        for token in vec![tag(StartTag, "p"), tag(StartTag, "b"), tag(EndTag, "p")] {
            let _ = tb.process_token(token).unwrap();
        }
        assert_eq!(tb.open_elements(), vec![local_name!("html"), local_name!("body")]);

        tb.reconstruct_formatting();
        let depth = tb.stack.len();
        let children = body_child_count(&tb);
        assert_eq!(depth, 3);

        tb.reconstruct_formatting();
        assert_eq!(tb.stack.len(), depth);
        assert_eq!(body_child_count(&tb), children);
    }

    #[test]
    fn leading_newline_dropped_once() {
        let mut tb = TreeBuilder::with_error_handler(RcDom::default(), ErrorLog::new(), Default::default());
        let _ = tb.process_token(tag(StartTag, "pre")).unwrap();
        assert!(tb.drop_leading_newline);
        let _ = tb.process_token(CharacterTokens("\n".into())).unwrap();
        assert!(!tb.drop_leading_newline);
        let pre = tb.stack.current().node.clone();
        assert!(pre.children.borrow().is_empty());
    }

    #[test]
    fn fragment_mode_follows_context() {
        let tb = TreeBuilder::new_for_fragment(
            RcDom::default(),
            ErrorLog::new(),
            local_name!("tr"),
            Default::default(),
        );
        assert_eq!(tb.insertion_mode(), InRow);

        let td = TreeBuilder::new_for_fragment(
            RcDom::default(),
            ErrorLog::new(),
            local_name!("td"),
            Default::default(),
        );
        assert_eq!(td.insertion_mode(), InBody);
        assert_eq!(td.open_elements(), vec![local_name!("html")]);

        let th = TreeBuilder::new_for_fragment(
            RcDom::default(),
            ErrorLog::new(),
            local_name!("th"),
            Default::default(),
        );
        assert_eq!(th.insertion_mode(), InBody);
    }

    #[test]
    fn context_content_model() {
        let content_model = |name| {
            TreeBuilder::new_for_fragment(RcDom::default(), ErrorLog::new(), name, Default::default())
                .tokenizer_state_for_context()
        };
        assert_eq!(content_model(local_name!("textarea")), ContentModelFlag::Rcdata);
        assert_eq!(content_model(local_name!("xmp")), ContentModelFlag::Cdata);
        assert_eq!(content_model(local_name!("plaintext")), ContentModelFlag::Plaintext);
        assert_eq!(content_model(local_name!("div")), ContentModelFlag::Pcdata);
    }

    #[test]
    fn aborted_builder_refuses_tokens() {
        let opts = TreeBuilderOpts {
            streamability: XmlViolationPolicy::Fatal,
            ..Default::default()
        };
        let mut tb = TreeBuilder::with_error_handler(RcDom::default(), ErrorLog::new(), opts);
        let mut last = Ok(TokenSinkResult::Continue);
        for token in vec![tag(StartTag, "a"), tag(StartTag, "div"), tag(StartTag, "a")] {
            last = tb.process_token(token);
        }
        assert!(matches!(last, Err(FatalError::NotStreamable { .. })));
        assert_eq!(tb.errors.count(Severity::Fatal), 1);
        assert_eq!(tb.process_token(EOFToken), Err(FatalError::Aborted));
    }
}
