// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Persistent, versioned collection datatypes.
//!
//! The collections in this crate are [persistent data structures][1]: every
//! update produces a new version, and every old version remains valid and
//! unchanged for as long as someone holds on to it. Versions derived from a
//! common ancestor share the bulk of their structure, so keeping many of
//! them around is cheap, and a whole timeline of versions can be retained
//! for undo with [`History`][history::History].
//!
//! Three collections are provided:
//!
//! * [`Vector`][vector::Vector], an ordered, integer-indexed vector backed
//!   by a bit-partitioned 32-way trie with a tail buffer. Indexing, update
//!   and append are effectively constant time.
//! * [`HashMap`][hash::map::HashMap], an unordered map backed by a hash
//!   array mapped trie. Keys are restricted to strings and primitive
//!   integers via the sealed [`MapKey`][hash::MapKey] trait.
//! * [`Queue`][queue::Queue], a FIFO queue built from two persistent stacks
//!   with amortised constant time operations at both ends.
//!
//! Every structure offers its mutating operations in two flavours. Methods
//! taking `&mut self`, like [`Vector::push_back`][vector::GenericVector::push_back]
//! or [`HashMap::insert`][hash::map::GenericHashMap::insert], mutate in place
//! through copy-on-write: nodes shared with other versions are cloned before
//! being written, so clones taken earlier are never disturbed, and a handle
//! nobody else shares is updated without any copying at all. Methods like
//! [`Vector::update`][vector::GenericVector::update] and
//! [`HashMap::without`][hash::map::GenericHashMap::without] are the purely
//! functional flavour: they leave the receiver alone and hand back the new
//! version.
//!
//! Structures are parameterised over their pointer type using the [`archery`]
//! crate. The [`Vector`][vector::Vector], [`HashMap`][hash::map::HashMap] and
//! [`Queue`][queue::Queue] aliases use atomic reference counting and can be
//! shared freely between threads; any version may be read concurrently from
//! any number of threads. See the [`shared_ptr`] module to pick a different
//! pointer kind.
//!
//! [1]: https://en.wikipedia.org/wiki/Persistent_data_structure
//! [`archery`]: https://docs.rs/archery/latest/

#![forbid(rust_2018_idioms)]
#![deny(unsafe_code, nonstandard_style)]
#![warn(unreachable_pub, missing_docs)]

#[macro_use]
mod util;

mod config;
mod nodes;

pub mod hash;
pub mod history;
pub mod queue;
pub mod shared_ptr;
pub mod vector;


pub use crate::hash::map::{GenericHashMap, HashMap};
pub use crate::hash::MapKey;
pub use crate::history::History;
pub use crate::queue::{GenericQueue, Queue};
pub use crate::vector::{GenericVector, Vector};
