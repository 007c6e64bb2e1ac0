// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use tendril::StrTendril;

use crate::tree_builder::FatalError;
use crate::LocalName;

pub use self::TagKind::{EndTag, StartTag};
pub use self::Token::{CharacterTokens, CommentToken, DoctypeToken, EOFToken, TagToken};

/// A `DOCTYPE` token.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Doctype {
    pub name: Option<StrTendril>,
    pub public_id: Option<StrTendril>,
    pub system_id: Option<StrTendril>,
    /// False when the tokenizer had to recover from a malformed doctype.
    pub correct: bool,
}

impl Doctype {
    pub fn new() -> Doctype {
        Doctype {
            name: None,
            public_id: None,
            system_id: None,
            correct: true,
        }
    }
}

impl Default for Doctype {
    fn default() -> Doctype {
        Doctype::new()
    }
}

/// A tag attribute, with its name already lowercased by the tokenizer.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug)]
pub struct Attribute {
    pub name: LocalName,
    pub value: StrTendril,
}

#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum TagKind {
    StartTag,
    EndTag,
}

/// A tag token.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Tag {
    pub kind: TagKind,
    pub name: LocalName,
    pub self_closing: bool,
    pub attrs: Vec<Attribute>,
}

impl Tag {
    pub fn new(kind: TagKind, name: LocalName, attrs: Vec<Attribute>) -> Tag {
        Tag {
            kind,
            name,
            self_closing: false,
            attrs,
        }
    }

    /// The value of the first attribute called `name`, if any.
    pub fn get_attr(&self, name: &LocalName) -> Option<&StrTendril> {
        self.attrs.iter().find(|a| a.name == *name).map(|a| &a.value)
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Token {
    DoctypeToken(Doctype),
    TagToken(Tag),
    CommentToken(StrTendril),
    CharacterTokens(StrTendril),
    EOFToken,
}

/// Content model the tokenizer should switch to after a start tag.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum ContentModelFlag {
    Pcdata,
    Rcdata,
    Cdata,
    Plaintext,
}

/// Feedback from the token consumer to the tokenizer.
#[derive(PartialEq, Eq, Clone, Debug)]
#[must_use]
pub enum TokenSinkResult {
    Continue,
    /// Scan raw text until the end tag for the given element.
    RawData(ContentModelFlag, LocalName),
    /// The doctype asks for the additional HTML 4 conformance checks.
    Html4Errors,
}

/// Types which can receive tokens from the tokenizer.
pub trait TokenSink {
    /// Process a token.
    ///
    /// An `Err` is fatal: the tokenizer must stop feeding this sink.
    fn process_token(&mut self, token: Token) -> Result<TokenSinkResult, FatalError>;
}
