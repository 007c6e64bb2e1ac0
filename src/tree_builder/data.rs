// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Doctype classification.

use phf::phf_set;

use super::interface::{DoctypeExpectation, DocumentMode};
use crate::tokenizer::Doctype;
use crate::util::str::to_ascii_lower;

// These should all be lowercase, for ASCII-case-insensitive matching.
static QUIRKY_PUBLIC_IDS: phf::Set<&'static str> = phf_set! {
    "+//silmaril//dtd html pro v0r11 19970101//en",
    "-//advasoft ltd//dtd html 3.0 aswedit + extensions//en",
    "-//as//dtd html 3.0 aswedit + extensions//en",
    "-//ietf//dtd html 2.0 level 1//en",
    "-//ietf//dtd html 2.0 level 2//en",
    "-//ietf//dtd html 2.0 strict level 1//en",
    "-//ietf//dtd html 2.0 strict level 2//en",
    "-//ietf//dtd html 2.0 strict//en",
    "-//ietf//dtd html 2.0//en",
    "-//ietf//dtd html 2.1e//en",
    "-//ietf//dtd html 3.0//en",
    "-//ietf//dtd html 3.0//en//",
    "-//ietf//dtd html 3.2 final//en",
    "-//ietf//dtd html 3.2//en",
    "-//ietf//dtd html 3//en",
    "-//ietf//dtd html level 0//en",
    "-//ietf//dtd html level 0//en//2.0",
    "-//ietf//dtd html level 1//en",
    "-//ietf//dtd html level 1//en//2.0",
    "-//ietf//dtd html level 2//en",
    "-//ietf//dtd html level 2//en//2.0",
    "-//ietf//dtd html level 3//en",
    "-//ietf//dtd html level 3//en//3.0",
    "-//ietf//dtd html strict level 0//en",
    "-//ietf//dtd html strict level 0//en//2.0",
    "-//ietf//dtd html strict level 1//en",
    "-//ietf//dtd html strict level 1//en//2.0",
    "-//ietf//dtd html strict level 2//en",
    "-//ietf//dtd html strict level 2//en//2.0",
    "-//ietf//dtd html strict level 3//en",
    "-//ietf//dtd html strict level 3//en//3.0",
    "-//ietf//dtd html strict//en",
    "-//ietf//dtd html strict//en//2.0",
    "-//ietf//dtd html strict//en//3.0",
    "-//ietf//dtd html//en",
    "-//ietf//dtd html//en//2.0",
    "-//ietf//dtd html//en//3.0",
    "-//metrius//dtd metrius presentational//en",
    "-//microsoft//dtd internet explorer 2.0 html strict//en",
    "-//microsoft//dtd internet explorer 2.0 html//en",
    "-//microsoft//dtd internet explorer 2.0 tables//en",
    "-//microsoft//dtd internet explorer 3.0 html strict//en",
    "-//microsoft//dtd internet explorer 3.0 html//en",
    "-//microsoft//dtd internet explorer 3.0 tables//en",
    "-//netscape comm. corp.//dtd html//en",
    "-//netscape comm. corp.//dtd strict html//en",
    "-//o'reilly and associates//dtd html 2.0//en",
    "-//o'reilly and associates//dtd html extended 1.0//en",
    "-//spyglass//dtd html 2.0 extended//en",
    "-//sq//dtd html 2.0 hotmetal + extensions//en",
    "-//sun microsystems corp.//dtd hotjava html//en",
    "-//sun microsystems corp.//dtd hotjava strict html//en",
    "-//w3c//dtd html 3 1995-03-24//en",
    "-//w3c//dtd html 3.2 draft//en",
    "-//w3c//dtd html 3.2 final//en",
    "-//w3c//dtd html 3.2//en",
    "-//w3c//dtd html 3.2s draft//en",
    "-//w3c//dtd html 4.0 frameset//en",
    "-//w3c//dtd html 4.0 transitional//en",
    "-//w3c//dtd html experimental 19960712//en",
    "-//w3c//dtd html experimental 970421//en",
    "-//w3c//dtd w3 html//en",
    "-//w3o//dtd w3 html 3.0//en",
    "-//w3o//dtd w3 html 3.0//en//",
    "-//w3o//dtd w3 html strict 3.0//en//",
    "-//webtechs//dtd mozilla html 2.0//en",
    "-//webtechs//dtd mozilla html//en",
    "-/w3c/dtd html 4.0 transitional/en",
    "html",
};

const HTML401_TRANSITIONAL_LC: &str = "-//w3c//dtd html 4.01 transitional//en";
const HTML401_FRAMESET_LC: &str = "-//w3c//dtd html 4.01 frameset//en";
const IBM_XHTML_SYSTEM_LC: &str = "http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd";

// The HTML 4.01 checks compare identifiers exactly, not case-insensitively.
const HTML401_STRICT_PUBLIC: &str = "-//W3C//DTD HTML 4.01//EN";
const HTML401_STRICT_SYSTEM: &str = "http://www.w3.org/TR/html4/strict.dtd";
const HTML401_TRANSITIONAL_PUBLIC: &str = "-//W3C//DTD HTML 4.01 Transitional//EN";
const HTML401_TRANSITIONAL_SYSTEM: &str = "http://www.w3.org/TR/html4/loose.dtd";

fn is_quirky(name: Option<&str>, public_lc: Option<&str>, system_lc: Option<&str>, correct: bool) -> bool {
    match (public_lc, system_lc) {
        _ if !correct => true,
        _ if !name.map_or(false, |n| n.eq_ignore_ascii_case("html")) => true,
        (Some(p), _) if QUIRKY_PUBLIC_IDS.contains(p) => true,
        (Some(p), None) => p == HTML401_TRANSITIONAL_LC || p == HTML401_FRAMESET_LC,
        (_, Some(s)) => s == IBM_XHTML_SYSTEM_LC,
        (None, None) => false,
    }
}

fn is_limited_quirky(public_lc: Option<&str>, system_lc: Option<&str>) -> bool {
    match public_lc {
        Some("-//w3c//dtd xhtml 1.0 transitional//en") | Some("-//w3c//dtd xhtml 1.0 frameset//en") => true,
        Some(p) if system_lc.is_some() => p == HTML401_TRANSITIONAL_LC || p == HTML401_FRAMESET_LC,
        _ => false,
    }
}

/// Classify a doctype into a document mode.
///
/// `name`, `public_id` and `system_id` are taken as the tokenizer reported
/// them; identifiers are compared ASCII-case-insensitively. `correct` is
/// false when the tokenizer had to recover from a malformed doctype.
pub fn document_mode(
    name: Option<&str>,
    public_id: Option<&str>,
    system_id: Option<&str>,
    correct: bool,
) -> DocumentMode {
    let public_lc = public_id.map(to_ascii_lower);
    let system_lc = system_id.map(to_ascii_lower);
    let (public_lc, system_lc) = (public_lc.as_deref(), system_lc.as_deref());
    if is_quirky(name, public_lc, system_lc, correct) {
        DocumentMode::Quirks
    } else if is_limited_quirky(public_lc, system_lc) {
        DocumentMode::LimitedQuirks
    } else {
        DocumentMode::Standards
    }
}

/// The document mode of a doctype token, plus what to report about it.
#[derive(PartialEq, Eq, Debug)]
pub(crate) struct DoctypeVerdict {
    pub(crate) mode: DocumentMode,
    /// Ask the tokenizer for the additional HTML 4 checks.
    pub(crate) html4_checks: bool,
    pub(crate) error: Option<&'static str>,
    pub(crate) warning: Option<&'static str>,
}

const QUIRKY: &str = "Quirky doctype.";
const ALMOST_STANDARDS: &str = "Almost standards mode doctype.";
const LEGACY: &str = "Legacy doctype.";
const WRONG_HTML4_SYSTEM_ID: &str =
    "The doctype did not contain the system identifier prescribed by the HTML 4.01 specification.";

pub(crate) fn check_doctype(expectation: DoctypeExpectation, doctype: &Doctype) -> DoctypeVerdict {
    let public = doctype.public_id.as_deref();
    let system = doctype.system_id.as_deref();
    let mode = document_mode(doctype.name.as_deref(), public, system, doctype.correct);

    let mut verdict = DoctypeVerdict {
        mode,
        html4_checks: false,
        error: None,
        warning: None,
    };
    let both_absent = public.is_none() && system.is_none();

    match expectation {
        DoctypeExpectation::NoDoctypeErrors => (),

        DoctypeExpectation::Html => {
            verdict.error = match mode {
                DocumentMode::Quirks => Some(QUIRKY),
                DocumentMode::LimitedQuirks => Some(ALMOST_STANDARDS),
                DocumentMode::Standards if !both_absent => Some(LEGACY),
                DocumentMode::Standards => None,
            };
        },

        DoctypeExpectation::Html401Strict => {
            verdict.html4_checks = true;
            match mode {
                DocumentMode::Quirks => verdict.error = Some(QUIRKY),
                DocumentMode::LimitedQuirks => verdict.error = Some(ALMOST_STANDARDS),
                DocumentMode::Standards if public == Some(HTML401_STRICT_PUBLIC) => {
                    if system != Some(HTML401_STRICT_SYSTEM) {
                        verdict.warning = Some(WRONG_HTML4_SYSTEM_ID);
                    }
                },
                DocumentMode::Standards => {
                    verdict.error = Some("The doctype was not the HTML 4.01 Strict doctype.");
                },
            }
        },

        DoctypeExpectation::Html401Transitional => {
            verdict.html4_checks = true;
            match mode {
                DocumentMode::Quirks => verdict.error = Some(QUIRKY),
                DocumentMode::LimitedQuirks
                    if public == Some(HTML401_TRANSITIONAL_PUBLIC) && system.is_some() =>
                {
                    if system != Some(HTML401_TRANSITIONAL_SYSTEM) {
                        verdict.warning = Some(WRONG_HTML4_SYSTEM_ID);
                    }
                },
                DocumentMode::LimitedQuirks => {
                    verdict.error =
                        Some("The doctype was not a non-quirky HTML 4.01 Transitional doctype.");
                },
                DocumentMode::Standards => {
                    verdict.error = Some("The doctype was not the HTML 4.01 Transitional doctype.");
                },
            }
        },

        DoctypeExpectation::Auto => match mode {
            DocumentMode::Quirks => verdict.error = Some(QUIRKY),
            DocumentMode::LimitedQuirks => {
                if public == Some(HTML401_TRANSITIONAL_PUBLIC) {
                    verdict.html4_checks = true;
                    if system != Some(HTML401_TRANSITIONAL_SYSTEM) {
                        verdict.warning = Some(WRONG_HTML4_SYSTEM_ID);
                    }
                } else {
                    verdict.error = Some(ALMOST_STANDARDS);
                }
            },
            DocumentMode::Standards => {
                if public == Some(HTML401_STRICT_PUBLIC) {
                    verdict.html4_checks = true;
                    if system != Some(HTML401_STRICT_SYSTEM) {
                        verdict.warning = Some(WRONG_HTML4_SYSTEM_ID);
                    }
                } else if !both_absent {
                    verdict.error = Some(LEGACY);
                }
            },
        },
    }

    verdict
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree_builder::interface::DocumentMode::{LimitedQuirks, Quirks, Standards};

    fn doctype(name: &str, public: Option<&str>, system: Option<&str>) -> Doctype {
        Doctype {
            name: Some(name.into()),
            public_id: public.map(|s| s.into()),
            system_id: system.map(|s| s.into()),
            correct: true,
        }
    }

    #[test]
    fn every_quirky_public_id_is_quirks_regardless_of_system_id() {
        for id in QUIRKY_PUBLIC_IDS.iter() {
            for system in &[None, Some("http://example.com/x.dtd")] {
                assert_eq!(document_mode(Some("html"), Some(id), *system, true), Quirks, "{}", id);
            }
            let upper = id.to_ascii_uppercase();
            assert_eq!(document_mode(Some("html"), Some(&upper), None, true), Quirks, "{}", upper);
        }
    }

    test_eq!(html5_doctype_is_standards, document_mode(Some("html"), None, None, true), Standards);
    test_eq!(name_is_case_insensitive, document_mode(Some("HtMl"), None, None, true), Standards);
    test_eq!(other_name_is_quirks, document_mode(Some("svg"), None, None, true), Quirks);
    test_eq!(missing_name_is_quirks, document_mode(None, None, None, true), Quirks);
    test_eq!(incorrect_is_quirks, document_mode(Some("html"), None, None, false), Quirks);

    test_eq!(
        html401_transitional_without_system_is_quirks,
        document_mode(Some("html"), Some("-//W3C//DTD HTML 4.01 Transitional//EN"), None, true),
        Quirks
    );
    test_eq!(
        html401_transitional_with_system_is_limited,
        document_mode(
            Some("html"),
            Some("-//W3C//DTD HTML 4.01 Transitional//EN"),
            Some("http://www.w3.org/TR/html4/loose.dtd"),
            true
        ),
        LimitedQuirks
    );
    test_eq!(
        xhtml_frameset_is_limited,
        document_mode(Some("html"), Some("-//W3C//DTD XHTML 1.0 Frameset//EN"), None, true),
        LimitedQuirks
    );
    test_eq!(
        ibm_system_id_is_quirks,
        document_mode(
            Some("html"),
            None,
            Some("http://www.ibm.com/data/dtd/v11/IBMXHTML1-transitional.dtd"),
            true
        ),
        Quirks
    );
    test_eq!(
        html401_strict_is_standards,
        document_mode(Some("html"), Some("-//W3C//DTD HTML 4.01//EN"), None, true),
        Standards
    );

    #[test]
    fn expectation_never_changes_mode() {
        let samples = [
            doctype("html", None, None),
            doctype("html", Some("-//IETF//DTD HTML 2.0//EN"), None),
            doctype("html", Some("-//W3C//DTD XHTML 1.0 Transitional//EN"), None),
            doctype("html", Some("-//W3C//DTD HTML 4.01//EN"), None),
        ];
        let expectations = [
            DoctypeExpectation::Html,
            DoctypeExpectation::Html401Strict,
            DoctypeExpectation::Html401Transitional,
            DoctypeExpectation::Auto,
            DoctypeExpectation::NoDoctypeErrors,
        ];
        for d in samples.iter() {
            let expected = check_doctype(DoctypeExpectation::Html, d).mode;
            for &e in expectations.iter() {
                assert_eq!(check_doctype(e, d).mode, expected);
            }
        }
    }

    #[test]
    fn auto_detects_html401_strict() {
        let d = doctype("HTML", Some("-//W3C//DTD HTML 4.01//EN"), Some("http://www.w3.org/TR/html4/strict.dtd"));
        let verdict = check_doctype(DoctypeExpectation::Auto, &d);
        assert_eq!(verdict.mode, Standards);
        assert!(verdict.html4_checks);
        assert_eq!(verdict.error, None);
        assert_eq!(verdict.warning, None);
    }

    #[test]
    fn auto_warns_on_wrong_transitional_system_id() {
        let d = doctype("html", Some("-//W3C//DTD HTML 4.01 Transitional//EN"), Some("loose.dtd"));
        let verdict = check_doctype(DoctypeExpectation::Auto, &d);
        assert_eq!(verdict.mode, LimitedQuirks);
        assert!(verdict.html4_checks);
        assert_eq!(verdict.warning, Some(WRONG_HTML4_SYSTEM_ID));
    }

    #[test]
    fn html_expectation_reports_legacy_doctypes() {
        let d = doctype("html", None, Some("about:legacy-compat"));
        let verdict = check_doctype(DoctypeExpectation::Html, &d);
        assert_eq!(verdict.error, Some(LEGACY));
        assert!(!verdict.html4_checks);
    }

    #[test]
    fn no_doctype_errors_is_silent() {
        let d = doctype("html", Some("-//IETF//DTD HTML 2.0//EN"), None);
        let verdict = check_doctype(DoctypeExpectation::NoDoctypeErrors, &d);
        assert_eq!(verdict.mode, Quirks);
        assert_eq!(verdict.error, None);
        assert_eq!(verdict.warning, None);
    }

    #[test]
    fn strict_expectation_always_turns_on_html4_checks() {
        let d = doctype("html", None, None);
        let verdict = check_doctype(DoctypeExpectation::Html401Strict, &d);
        assert!(verdict.html4_checks);
        assert_eq!(verdict.error, Some("The doctype was not the HTML 4.01 Strict doctype."));
    }
}
