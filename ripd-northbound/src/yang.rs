//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::borrow::Cow;

// Conversion of native types to YANG-formatted strings.
pub trait ToYang {
    fn to_yang(&self) -> Cow<'static, str>;
}

// Conversion of YANG-formatted strings to native types.
pub trait TryFromYang: Sized {
    fn try_from_yang(value: &str) -> Option<Self>;
}
