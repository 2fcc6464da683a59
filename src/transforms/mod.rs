// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Reusable transforms and the name registry configuration resolves against.

pub mod registry;
pub mod text;

pub use registry::{builtin_text_transforms, TransformRegistry};
pub use text::{
    BlankInput, CaseType, ChangeTextCase, PrefixSuffixAdder, RejectBlank, ReverseText, SkipBlank,
    TrimText,
};
