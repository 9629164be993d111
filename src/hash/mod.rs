// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Hash-keyed persistent collections.

use std::hash::Hash;

pub mod map;

mod sealed {
    pub trait Sealed {}
}

/// A type usable as a [`GenericHashMap`] key.
///
/// The set of key types is deliberately closed: strings and the primitive
/// integers. Hashing composite or floating point keys is full of aliasing
/// traps, so rather than accepting any `Hash` implementor and misbehaving at
/// runtime, an unsupported key type simply fails to compile. The trait is
/// sealed and cannot be implemented outside this crate.
///
/// [`GenericHashMap`]: ./map/struct.GenericHashMap.html
pub trait MapKey: sealed::Sealed + Hash + Eq {}

macro_rules! impl_map_key {
    ( $( $t:ty ),* ) => {
        $(
            impl sealed::Sealed for $t {}
            impl MapKey for $t {}
        )*
    };
}

impl_map_key!(String, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<'a> sealed::Sealed for &'a str {}
impl<'a> MapKey for &'a str {}
