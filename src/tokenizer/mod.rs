// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The token stream the tree builder consumes.
//!
//! Lexing itself lives outside this crate; any tokenizer that produces
//! these tokens and honors `TokenSinkResult` can drive a `TreeBuilder`.

pub use self::interface::{Attribute, Doctype, Tag, TagKind, Token};
pub use self::interface::{CharacterTokens, CommentToken, DoctypeToken, EOFToken, TagToken};
pub use self::interface::{ContentModelFlag, TokenSink, TokenSinkResult};
pub use self::interface::{EndTag, StartTag};

mod interface;
