// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use crate::traits::Transform;
use crate::transforms::text::{
    ChangeTextCase, PrefixSuffixAdder, RejectBlank, ReverseText, SkipBlank, TrimText,
};

/// Named transforms that configuration files refer to by string.
///
/// The same `Arc` is handed to every stage that names it, so transforms must
/// not rely on being used by a single stage.
pub struct TransformRegistry<T> {
    transforms: HashMap<String, Arc<dyn Transform<T>>>,
}

impl<T> Default for TransformRegistry<T> {
    fn default() -> Self {
        Self {
            transforms: HashMap::new(),
        }
    }
}

impl<T: Send + 'static> TransformRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transform, replacing any previous one with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, transform: F) -> &mut Self
    where
        F: Transform<T> + 'static,
    {
        self.register_shared(name, Arc::new(transform))
    }

    pub fn register_shared(
        &mut self,
        name: impl Into<String>,
        transform: Arc<dyn Transform<T>>,
    ) -> &mut Self {
        self.transforms.insert(name.into(), transform);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Transform<T>>> {
        self.transforms.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.transforms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Registry with every built-in text transform.
///
/// - "change_text_case_upper" / "_lower" / "_proper" / "_title" -> [`ChangeTextCase`]
/// - "trim_text" -> [`TrimText`]
/// - "reverse_text" -> [`ReverseText`]
/// - "prefix_suffix_adder" -> [`PrefixSuffixAdder`] wrapping in square brackets
/// - "reject_blank" -> [`RejectBlank`]
/// - "skip_blank" -> [`SkipBlank`]
pub fn builtin_text_transforms() -> TransformRegistry<String> {
    let mut registry = TransformRegistry::new();
    registry
        .register("change_text_case_upper", ChangeTextCase::upper())
        .register("change_text_case_lower", ChangeTextCase::lower())
        .register("change_text_case_proper", ChangeTextCase::proper())
        .register("change_text_case_title", ChangeTextCase::title())
        .register("trim_text", TrimText)
        .register("reverse_text", ReverseText)
        .register(
            "prefix_suffix_adder",
            PrefixSuffixAdder::with_prefix_and_suffix("[", "]"),
        )
        .register("reject_blank", RejectBlank)
        .register("skip_blank", SkipBlank);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ControlSignal;
    use crate::traits::from_fn;

    #[test]
    fn test_builtin_names() {
        let registry = builtin_text_transforms();
        assert_eq!(
            registry.names(),
            vec![
                "change_text_case_lower",
                "change_text_case_proper",
                "change_text_case_title",
                "change_text_case_upper",
                "prefix_suffix_adder",
                "reject_blank",
                "reverse_text",
                "skip_blank",
                "trim_text",
            ]
        );
        assert!(registry.get("token_counter").is_none());
    }

    #[tokio::test]
    async fn test_registered_transform_is_shared() {
        let mut registry = TransformRegistry::<u32>::new();
        registry.register("inc", from_fn(|n: u32| (n + 1, ControlSignal::Continue)));

        let first = registry.get("inc").unwrap();
        let second = registry.get("inc").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.apply(1).await.0, 2);
    }
}
