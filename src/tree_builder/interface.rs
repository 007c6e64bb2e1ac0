// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The interface between the tree builder and its collaborators: the DOM
//! sink, the diagnostics sink and the document mode callback.

use std::borrow::Cow;

use tendril::StrTendril;
use thiserror::Error;

use crate::tokenizer::Attribute;
use crate::LocalName;

pub use self::NodeOrText::{AppendNode, AppendText};

/// A document's rendering compatibility class, derived from its doctype.
#[derive(PartialEq, Eq, Copy, Clone, Hash, Debug)]
pub enum DocumentMode {
    Quirks,
    LimitedQuirks,
    Standards,
}

/// Which doctype the caller expects, for diagnostics only.
///
/// The computed `DocumentMode` never depends on this.
#[derive(PartialEq, Eq, Copy, Clone, Hash, Debug)]
pub enum DoctypeExpectation {
    Html,
    Html401Strict,
    Html401Transitional,
    /// Detect HTML 4.01 doctypes and turn on the HTML 4 checks for them.
    Auto,
    NoDoctypeErrors,
}

/// What to do when recovery would remove an element that is not the
/// current node, which a streaming consumer has no way to undo.
#[derive(PartialEq, Eq, Copy, Clone, Hash, Debug)]
pub enum XmlViolationPolicy {
    /// Recover silently.
    Allow,
    /// Abort the parse with a fatal error.
    Fatal,
    /// Recover, report it, and re-open `head` for misplaced metadata so a
    /// streaming consumer still sees it inside `head`.
    AlterInfoset,
}

/// The only unrecoverable outcome of tree construction.
#[derive(PartialEq, Eq, Clone, Debug, Error)]
pub enum FatalError {
    #[error("recovering from misnested <{name}> requires removing it from the middle of the stack")]
    NotStreamable { name: LocalName },

    #[error("the tree builder cannot be used after a fatal error")]
    Aborted,
}

/// Something which can be inserted into the DOM.
///
/// Adjacent sibling text nodes are merged into a single node, so
/// the sink may not want to allocate a `Handle` for each.
#[derive(Debug)]
pub enum NodeOrText<Handle> {
    AppendNode(Handle),
    AppendText(StrTendril),
}

/// Types which can be used as a DOM sink by the tree builder.
///
/// The tree builder never owns nodes. It holds `Handle`s and asks the
/// sink to create, move and inspect the nodes behind them.
pub trait TreeSink {
    /// `Handle` is a reference to a DOM node. The tree builder requires
    /// that a `Handle` implements `Clone` to get another reference to
    /// the same node.
    type Handle: Clone;

    /// Create the root `html` element and append it to the document.
    fn create_root_element(&mut self, attrs: Vec<Attribute>) -> Self::Handle;

    /// Create a detached element.
    ///
    /// When creating a form-associated element while a `form` is open, the
    /// tree builder follows up with `associate_with_form`.
    fn create_element(&mut self, name: LocalName, attrs: Vec<Attribute>) -> Self::Handle;

    /// Append a node as the last child of the given node. If this would
    /// produce adjacent sibling text nodes, it should concatenate the text
    /// instead.
    ///
    /// A node which already has a parent is detached from it first.
    fn append(&mut self, parent: &Self::Handle, child: NodeOrText<Self::Handle>);

    /// Insert `child` into `parent` immediately before `sibling`, detaching
    /// it from any previous parent first.
    fn insert_before(
        &mut self,
        parent: &Self::Handle,
        sibling: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    );

    /// The parent element of `target`, if it is attached to an element.
    fn parent_element(&self, target: &Self::Handle) -> Option<Self::Handle>;

    /// Detach the given node from its parent.
    fn detach_from_parent(&mut self, target: &Self::Handle);

    /// Does the node have any children?
    fn has_children(&self, target: &Self::Handle) -> bool;

    /// Create a detached copy of an element with the same name and
    /// attributes and no children.
    fn shallow_clone(&mut self, target: &Self::Handle) -> Self::Handle;

    /// Move all the children of `node` to the end of `new_parent`.
    fn reparent_children(&mut self, node: &Self::Handle, new_parent: &Self::Handle);

    /// Append a comment as the last child of the given node.
    fn append_comment(&mut self, parent: &Self::Handle, text: StrTendril);

    /// Append a comment as the last child of the document.
    fn append_comment_to_document(&mut self, text: StrTendril);

    /// Append a `DOCTYPE` element to the `Document` node.
    fn append_doctype_to_document(
        &mut self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
    }

    /// Add each attribute to the given element, if no attribute with that
    /// name already exists.
    fn add_attrs_if_missing(&mut self, target: &Self::Handle, attrs: Vec<Attribute>);

    /// Associate a form-associated element with the currently open form.
    fn associate_with_form(&mut self, _target: &Self::Handle, _form: &Self::Handle) {}

    /// The element called `name` was popped off the stack of open elements;
    /// `new_current` is the new current node.
    fn element_popped(&mut self, _name: &LocalName, _new_current: &Self::Handle) {}

    /// Should comments be passed to the sink at all?
    fn wants_comments(&self) -> bool {
        true
    }

    /// The parse is complete.
    fn end(&mut self) {}
}

/// How bad a reported condition is.
#[derive(PartialEq, Eq, Copy, Clone, Hash, Debug)]
pub enum Severity {
    Warning,
    Error,
    Fatal,
}

/// One reported condition.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: Cow<'static, str>,
}

/// Receives parse errors. Positions are tracked by whoever owns the
/// tokenizer, not by the tree builder.
pub trait ErrorHandler {
    fn warning(&mut self, msg: Cow<'static, str>);
    fn error(&mut self, msg: Cow<'static, str>);
    fn fatal(&mut self, msg: Cow<'static, str>);
}

/// The default error handler, which sends everything to the `log` crate.
#[derive(Default, Copy, Clone, Debug)]
pub struct LogErrors;

impl ErrorHandler for LogErrors {
    fn warning(&mut self, msg: Cow<'static, str>) {
        warn!("parse warning: {}", msg);
    }

    fn error(&mut self, msg: Cow<'static, str>) {
        warn!("parse error: {}", msg);
    }

    fn fatal(&mut self, msg: Cow<'static, str>) {
        error!("fatal parse error: {}", msg);
    }
}

/// An error handler which keeps everything it is told.
#[derive(Default, Clone, Debug)]
pub struct ErrorLog {
    pub diagnostics: Vec<Diagnostic>,
}

impl ErrorLog {
    pub fn new() -> ErrorLog {
        ErrorLog::default()
    }

    /// Number of diagnostics with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    fn push(&mut self, severity: Severity, message: Cow<'static, str>) {
        self.diagnostics.push(Diagnostic { severity, message });
    }
}

impl ErrorHandler for ErrorLog {
    fn warning(&mut self, msg: Cow<'static, str>) {
        self.push(Severity::Warning, msg);
    }

    fn error(&mut self, msg: Cow<'static, str>) {
        self.push(Severity::Error, msg);
    }

    fn fatal(&mut self, msg: Cow<'static, str>) {
        self.push(Severity::Fatal, msg);
    }
}

/// Told the document mode once per document, together with the raw
/// doctype identifiers and whether the HTML 4 checks were requested.
pub trait DocumentModeHandler {
    fn document_mode(
        &mut self,
        mode: DocumentMode,
        public_id: Option<&str>,
        system_id: Option<&str>,
        html4_checks: bool,
    );
}

impl<F> DocumentModeHandler for F
where
    F: FnMut(DocumentMode, Option<&str>, Option<&str>, bool),
{
    fn document_mode(
        &mut self,
        mode: DocumentMode,
        public_id: Option<&str>,
        system_id: Option<&str>,
        html4_checks: bool,
    ) {
        self(mode, public_id, system_id, html4_checks)
    }
}
