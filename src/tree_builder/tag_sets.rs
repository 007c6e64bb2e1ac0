// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Various sets of HTML tag names, and macros for declaring them.

use crate::LocalName;

macro_rules! declare_tag_set {
    ($(#[$attr:meta])* $name:ident = $($tag:tt)+) => {
        $(#[$attr])*
        pub fn $name(name: &LocalName) -> bool {
            matches!(*name, $(local_name!($tag))|+)
        }
    };
}

declare_tag_set!(
    /// Elements which stop a search in (non-table) scope.
    scoping = "table" "caption" "td" "th" "button" "marquee" "object"
);

declare_tag_set!(
    /// Elements which stop "unclosed element" recovery and bound the
    /// furthest block search.
    special = "address" "area" "base" "basefont" "bgsound" "blockquote" "body" "br"
        "center" "col" "colgroup" "dd" "dir" "div" "dl" "dt" "embed" "fieldset" "form"
        "frame" "frameset" "h1" "h2" "h3" "h4" "h5" "h6" "head" "hr" "iframe" "image"
        "img" "input" "isindex" "li" "link" "listing" "menu" "meta" "noembed" "noframes"
        "noscript" "ol" "optgroup" "option" "p" "param" "plaintext" "pre" "script"
        "select" "spacer" "style" "tbody" "textarea" "tfoot" "thead" "title" "tr" "ul"
        "wbr"
);

declare_tag_set!(
    /// Insertions into these are redirected to the foster parent.
    foster_parenting = "table" "tbody" "tfoot" "thead" "tr"
);

declare_tag_set!(
    /// End tags for these run the adoption agency algorithm.
    formatting = "a" "b" "big" "em" "font" "i" "nobr" "s" "small" "strike" "strong" "tt" "u"
);

declare_tag_set!(
    /// Popped by "generate implied end tags".
    implied_end = "p" "li" "dd" "dt"
);

declare_tag_set!(heading = "h1" "h2" "h3" "h4" "h5" "h6");

declare_tag_set!(table_section = "tbody" "thead" "tfoot");

declare_tag_set!(cell = "td" "th");

declare_tag_set!(
    /// Table structure that may not simply appear inside a caption or cell.
    table_structure = "caption" "col" "colgroup" "tbody" "td" "tfoot" "th" "thead" "tr"
);

declare_tag_set!(
    /// Elements allowed to stay open when `body` is closed.
    body_end_ok = "dd" "dt" "li" "p"
);

declare_tag_set!(
    /// Elements allowed to stay open when `html` is closed from the body.
    html_end_ok = "dd" "dt" "li" "p" "tbody" "td" "tfoot" "th" "thead" "tr" "body" "html"
);

#[cfg(test)]
mod tests {
    use super::*;

    test_eq!(table_is_scoping, scoping(&local_name!("table")), true);
    test_eq!(object_is_scoping, scoping(&local_name!("object")), true);
    test_eq!(div_is_not_scoping, scoping(&local_name!("div")), false);

    test_eq!(div_is_special, special(&local_name!("div")), true);
    test_eq!(html_is_not_special, special(&local_name!("html")), false);
    test_eq!(b_is_not_special, special(&local_name!("b")), false);
    test_eq!(table_is_not_special, special(&local_name!("table")), false);

    test_eq!(tr_fosters, foster_parenting(&local_name!("tr")), true);
    test_eq!(td_does_not_foster, foster_parenting(&local_name!("td")), false);

    test_eq!(nobr_is_formatting, formatting(&local_name!("nobr")), true);
    test_eq!(span_is_not_formatting, formatting(&local_name!("span")), false);

    test_eq!(unknown_name_in_no_set, special(&LocalName::from("blink")), false);
}
