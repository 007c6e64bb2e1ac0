// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! HTML5 tree construction.
//!
//! Consumes the token stream of an HTML tokenizer and drives an abstract
//! DOM sink to build the document tree, following the WHATWG tree
//! construction algorithm: insertion modes, implied elements, the
//! adoption agency algorithm, foster parenting and doctype-based
//! document mode classification.

#![crate_name = "h5tree"]

#[macro_use]
extern crate log;

// Interned local names and the `local_name!` macro. This must come before
// the module declarations so the macro is in scope for them.
include!(concat!(env!("OUT_DIR"), "/generated.rs"));

pub use tendril::StrTendril;

pub use driver::{build_document, build_fragment, drive, parse_document, ParseResult};

#[macro_use]
mod macros;

mod util {
    pub mod str;
}

pub mod driver;
pub mod rcdom;
pub mod tokenizer;
pub mod tree_builder;
