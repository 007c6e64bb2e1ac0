// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/// ASCII whitespace characters, as defined by
/// tree construction modes that treat them specially.
///
/// Carriage returns never reach the tree builder; the tokenizer
/// normalizes them to line feeds.
pub fn is_ascii_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0B' | '\x0C' | ' ')
}

/// Lowercase ASCII letters only, leaving everything else alone.
pub fn to_ascii_lower(s: &str) -> String {
    s.chars().map(|c| c.to_ascii_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::{is_ascii_whitespace, to_ascii_lower};

    test_eq!(space_is_whitespace, is_ascii_whitespace(' '), true);
    test_eq!(tab_is_whitespace, is_ascii_whitespace('\t'), true);
    test_eq!(lf_is_whitespace, is_ascii_whitespace('\n'), true);
    test_eq!(vt_is_whitespace, is_ascii_whitespace('\x0B'), true);
    test_eq!(ff_is_whitespace, is_ascii_whitespace('\x0C'), true);
    test_eq!(cr_is_not_whitespace, is_ascii_whitespace('\r'), false);
    test_eq!(letter_is_not_whitespace, is_ascii_whitespace('x'), false);
    test_eq!(nbsp_is_not_whitespace, is_ascii_whitespace('\u{a0}'), false);

    test_eq!(
        lower_mixed,
        to_ascii_lower("-//W3C//DTD HTML 4.01//EN"),
        "-//w3c//dtd html 4.01//en"
    );
    test_eq!(lower_nonascii_unchanged, to_ascii_lower("\u{c4}X"), "\u{c4}x");
}
