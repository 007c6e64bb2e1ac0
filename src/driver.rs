// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! High-level interface to the tree builder.
//!
//! These functions take an already tokenized stream. A tokenizer driving
//! the tree builder itself should call `TokenSink::process_token` and
//! honour the content model it returns.

use crate::tokenizer::{Token, TokenSink, TokenSinkResult};
use crate::tree_builder::{ErrorHandler, FatalError, LogErrors, TreeBuilder, TreeBuilderOpts, TreeSink};
use crate::LocalName;

/// Feed every token to the tree builder, followed by end-of-file if the
/// stream did not end with one.
///
/// Content model switches requested by the tree builder are only logged,
/// since the tokens have already been produced.
pub fn drive<Sink, E, It>(tb: &mut TreeBuilder<Sink, E>, tokens: It) -> Result<(), FatalError>
where
    Sink: TreeSink,
    E: ErrorHandler,
    It: IntoIterator<Item = Token>,
{
    let mut saw_eof = false;
    for token in tokens {
        if saw_eof {
            break;
        }
        saw_eof = token == Token::EOFToken;
        match tb.process_token(token)? {
            TokenSinkResult::Continue => (),
            other => debug!("tree builder requested {:?}", other),
        }
    }
    if !saw_eof {
        match tb.process_token(Token::EOFToken)? {
            TokenSinkResult::Continue => (),
            other => debug!("tree builder requested {:?} at end of input", other),
        }
    }
    Ok(())
}

/// Build a whole document into `sink`.
///
/// ## Example
///
/// ```rust
/// let dom = build_document(RcDom::default(), Default::default(), tokens)?;
/// ```
pub fn build_document<Sink, It>(sink: Sink, opts: TreeBuilderOpts, tokens: It) -> Result<Sink, FatalError>
where
    Sink: TreeSink,
    It: IntoIterator<Item = Token>,
{
    let mut tb = TreeBuilder::new(sink, opts);
    drive(&mut tb, tokens)?;
    Ok(tb.unwrap().0)
}

/// Build a fragment as if it were the contents of a `context` element.
///
/// The fragment's nodes end up as children of the root `html` element.
pub fn build_fragment<Sink, It>(
    sink: Sink,
    context: LocalName,
    opts: TreeBuilderOpts,
    tokens: It,
) -> Result<Sink, FatalError>
where
    Sink: TreeSink,
    It: IntoIterator<Item = Token>,
{
    let mut tb = TreeBuilder::new_for_fragment(sink, LogErrors, context, opts);
    drive(&mut tb, tokens)?;
    Ok(tb.unwrap().0)
}

/// Results which can be extracted from a `TreeSink`.
///
/// Implement this for your parse tree data type so that it
/// can be returned by `parse_document()`.
pub trait ParseResult {
    type Sink: TreeSink + Default;
    fn get_result(sink: Self::Sink) -> Self;
}

/// Build a document into a fresh sink and extract the result.
///
/// ## Example
///
/// ```rust
/// let dom: RcDom = parse_document(tokens, Default::default())?;
/// ```
pub fn parse_document<Output, It>(tokens: It, opts: TreeBuilderOpts) -> Result<Output, FatalError>
where
    Output: ParseResult,
    It: IntoIterator<Item = Token>,
{
    let sink = build_document(Output::Sink::default(), opts, tokens)?;
    Ok(Output::get_result(sink))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rcdom::RcDom;
    use crate::tokenizer::{StartTag, Tag, TagKind};
    use crate::tree_builder::ErrorLog;

    fn tag(kind: TagKind, name: LocalName) -> Token {
        Token::TagToken(Tag::new(kind, name, vec![]))
    }

    #[test]
    fn eof_is_implied() {
        let mut tb = TreeBuilder::with_error_handler(RcDom::default(), ErrorLog::new(), Default::default());
        drive(&mut tb, vec![tag(StartTag, local_name!("p"))]).unwrap();
        let (dom, _) = tb.unwrap();
        let root = dom.root_element().unwrap();
        assert_eq!(root.children.borrow().len(), 2);
    }

    #[test]
    fn tokens_after_eof_are_ignored() {
        let mut tb = TreeBuilder::with_error_handler(RcDom::default(), ErrorLog::new(), Default::default());
        let tokens = vec![
            tag(StartTag, local_name!("div")),
            Token::EOFToken,
            tag(StartTag, local_name!("span")),
        ];
        drive(&mut tb, tokens).unwrap();
        assert_eq!(
            tb.open_elements(),
            vec![local_name!("html"), local_name!("body"), local_name!("div")]
        );
    }

    #[test]
    fn parse_document_returns_the_dom() {
        let dom: RcDom = parse_document(vec![Token::CharacterTokens("hi".into())], Default::default()).unwrap();
        assert!(dom.root_element().is_some());
    }
}
