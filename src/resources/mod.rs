// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Resource modules, one per group of related API operations
//!
//! A resource holds nothing but a borrow of the shared [`Request`]
//! dispatcher and maps each method onto a verb, a path and a split of its
//! parameters into query or body.
//!
//! [`Request`]: crate::request::Request

pub mod activities;

pub use activities::Activities;
