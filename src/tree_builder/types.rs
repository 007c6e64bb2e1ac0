// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Types used within the tree builder code. Not exported to users.

use crate::tokenizer::Tag;

pub(crate) use self::InsertionMode::*;
pub(crate) use self::ProcessResult::*;

/// The insertion modes of the tree construction state machine.
///
/// <https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode>
#[derive(PartialEq, Eq, Copy, Clone, Hash, Debug)]
pub enum InsertionMode {
    Initial,
    RootElement,
    BeforeHead,
    InHead,
    InHeadNoscript,
    AfterHead,
    InBody,
    InTable,
    InCaption,
    InColumnGroup,
    InTableBody,
    InRow,
    InCell,
    InSelect,
    AfterBody,
    InFrameset,
    AfterFrameset,
    TrailingEnd,
}

/// The modes whose tag rules are consulted, in order, when a tag arrives
/// in `mode`. A rule set that does not handle the tag passes it on to the
/// next one without changing the insertion mode.
pub(crate) fn rule_chain(mode: InsertionMode) -> &'static [InsertionMode] {
    match mode {
        InRow => &[InRow, InTableBody, InTable, InBody],
        InTableBody => &[InTableBody, InTable, InBody],
        InTable => &[InTable, InBody],
        InCaption => &[InCaption, InBody],
        InCell => &[InCell, InBody],
        InFrameset => &[InFrameset, AfterFrameset],
        Initial => &[Initial],
        RootElement => &[RootElement],
        BeforeHead => &[BeforeHead],
        InHead => &[InHead],
        InHeadNoscript => &[InHeadNoscript],
        AfterHead => &[AfterHead],
        InBody => &[InBody],
        InColumnGroup => &[InColumnGroup],
        InSelect => &[InSelect],
        AfterBody => &[AfterBody],
        AfterFrameset => &[AfterFrameset],
        TrailingEnd => &[TrailingEnd],
    }
}

/// Outcome of running one rule set on a tag.
#[derive(PartialEq, Eq, Debug)]
pub(crate) enum ProcessResult {
    /// The tag was consumed.
    Done,
    /// This rule set has nothing to say; try the next one in the chain.
    NotHandled,
    /// Switch to the given mode and process the same tag again.
    Reprocess(InsertionMode),
    /// Process a rewritten tag in the current mode.
    ReprocessAs(Tag),
}

/// An entry in the list of active formatting elements.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub(crate) enum FormatEntry {
    Element(FrameId),
    Marker,
}

/// Index of a frame in the tree builder's frame arena.
#[derive(PartialEq, Eq, Copy, Clone, Hash, Debug)]
pub(crate) struct FrameId(pub(crate) usize);

#[cfg(test)]
mod tests {
    use super::*;

    test_eq!(row_chain_ends_in_body, rule_chain(InRow).last(), Some(&InBody));
    test_eq!(row_chain_len, rule_chain(InRow).len(), 4);
    test_eq!(table_body_skips_row, rule_chain(InTableBody).contains(&InRow), false);
    test_eq!(frameset_falls_to_after_frameset, rule_chain(InFrameset), &[InFrameset, AfterFrameset][..]);
    test_eq!(select_stands_alone, rule_chain(InSelect), &[InSelect][..]);
}
