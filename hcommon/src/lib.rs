//! Shared utilities and strongly-typed common values for workspace crates.
//!
//! ```rust
//! use hcommon::{ChatOptions, MetadataMap};
//!
//! let mut metadata = MetadataMap::new();
//! metadata.insert("id".to_string(), "resp-1".to_string());
//!
//! let defaults = ChatOptions::default().with_model("hunyuan-pro").with_temperature(0.3);
//! let per_call = ChatOptions::default().with_temperature(0.9);
//! let merged = defaults.apply_overrides(&per_call);
//!
//! assert_eq!(merged.model.as_deref(), Some("hunyuan-pro"));
//! assert_eq!(merged.temperature, Some(0.9));
//! assert_eq!(metadata.get("id").map(String::as_str), Some("resp-1"));
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use hcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Auxiliary key/value data attached to generations and tool executions.

    use std::collections::HashMap;

    pub type MetadataMap = HashMap<String, String>;
}

pub mod options {
    //! Layered chat options with explicit override merging.
    //!
    //! A field set on a higher-priority layer replaces the lower one, an unset
    //! field falls through. Enabled tool names are the union of both layers.
    //!
    //! ```rust
    //! use hcommon::ChatOptions;
    //!
    //! let defaults = ChatOptions::default()
    //!     .with_model("hunyuan-lite")
    //!     .with_enabled_tool("weather");
    //! let per_call = ChatOptions::default()
    //!     .with_top_p(0.5)
    //!     .with_enabled_tool("clock");
    //!
    //! let merged = defaults.apply_overrides(&per_call);
    //! assert_eq!(merged.model.as_deref(), Some("hunyuan-lite"));
    //! assert_eq!(merged.top_p, Some(0.5));
    //! assert_eq!(merged.enabled_tools.len(), 2);
    //! ```

    use std::collections::BTreeSet;

    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct ChatOptions {
        pub model: Option<String>,
        pub temperature: Option<f32>,
        pub top_p: Option<f32>,
        pub stop: Option<Vec<String>>,
        pub seed: Option<i64>,
        pub enable_enhancement: Option<bool>,
        pub tool_choice: Option<String>,
        pub stream_moderation: Option<bool>,
        pub enabled_tools: BTreeSet<String>,
        pub proxy_tool_calls: Option<bool>,
    }

    impl ChatOptions {
        pub fn with_model(mut self, model: impl Into<String>) -> Self {
            self.model = Some(model.into());
            self
        }

        pub fn with_temperature(mut self, temperature: f32) -> Self {
            self.temperature = Some(temperature);
            self
        }

        pub fn with_top_p(mut self, top_p: f32) -> Self {
            self.top_p = Some(top_p);
            self
        }

        pub fn with_stop(mut self, stop: Vec<String>) -> Self {
            self.stop = Some(stop);
            self
        }

        pub fn with_seed(mut self, seed: i64) -> Self {
            self.seed = Some(seed);
            self
        }

        pub fn with_enhancement(mut self, enabled: bool) -> Self {
            self.enable_enhancement = Some(enabled);
            self
        }

        pub fn with_tool_choice(mut self, tool_choice: impl Into<String>) -> Self {
            self.tool_choice = Some(tool_choice.into());
            self
        }

        pub fn with_stream_moderation(mut self, enabled: bool) -> Self {
            self.stream_moderation = Some(enabled);
            self
        }

        pub fn with_enabled_tool(mut self, name: impl Into<String>) -> Self {
            self.enabled_tools.insert(name.into());
            self
        }

        pub fn with_enabled_tools<I, S>(mut self, names: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.enabled_tools.extend(names.into_iter().map(Into::into));
            self
        }

        pub fn with_proxy_tool_calls(mut self, proxy: bool) -> Self {
            self.proxy_tool_calls = Some(proxy);
            self
        }

        pub fn is_proxy_tool_calls(&self) -> bool {
            self.proxy_tool_calls.unwrap_or(false)
        }

        /// Returns a copy of `self` with every field set in `overrides` replaced.
        pub fn apply_overrides(&self, overrides: &ChatOptions) -> ChatOptions {
            let mut enabled_tools = self.enabled_tools.clone();
            enabled_tools.extend(overrides.enabled_tools.iter().cloned());

            ChatOptions {
                model: overrides.model.clone().or_else(|| self.model.clone()),
                temperature: overrides.temperature.or(self.temperature),
                top_p: overrides.top_p.or(self.top_p),
                stop: overrides.stop.clone().or_else(|| self.stop.clone()),
                seed: overrides.seed.or(self.seed),
                enable_enhancement: overrides.enable_enhancement.or(self.enable_enhancement),
                tool_choice: overrides
                    .tool_choice
                    .clone()
                    .or_else(|| self.tool_choice.clone()),
                stream_moderation: overrides.stream_moderation.or(self.stream_moderation),
                enabled_tools,
                proxy_tool_calls: overrides.proxy_tool_calls.or(self.proxy_tool_calls),
            }
        }

        /// Checks value ranges accepted by the service.
        pub fn validate(&self) -> Result<(), String> {
            if let Some(model) = &self.model
                && model.trim().is_empty()
            {
                return Err("model must not be empty".to_string());
            }

            if let Some(temperature) = self.temperature
                && !(0.0..=2.0).contains(&temperature)
            {
                return Err("temperature must be in the inclusive range 0.0..=2.0".to_string());
            }

            if let Some(top_p) = self.top_p
                && !(0.0..=1.0).contains(&top_p)
            {
                return Err("top_p must be in the inclusive range 0.0..=1.0".to_string());
            }

            Ok(())
        }
    }
}

pub mod registry {
    //! Generic registry map wrapper used by runtime registries.
    //!
    //! ```rust
    //! use hcommon::Registry;
    //!
    //! let mut registry = Registry::new();
    //! registry.insert("alpha".to_string(), 1_u32);
    //!
    //! assert_eq!(registry.get("alpha"), Some(&1));
    //! assert!(registry.contains_key("alpha"));
    //! ```

    use std::borrow::Borrow;
    use std::collections::HashMap;
    use std::hash::Hash;

    #[derive(Debug, Clone)]
    pub struct Registry<K, V> {
        items: HashMap<K, V>,
    }

    impl<K, V> Default for Registry<K, V>
    where
        K: Eq + Hash,
    {
        fn default() -> Self {
            Self {
                items: HashMap::new(),
            }
        }
    }

    impl<K, V> Registry<K, V>
    where
        K: Eq + Hash,
    {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&mut self, key: K, value: V) -> Option<V> {
            self.items.insert(key, value)
        }

        pub fn get<Q>(&self, key: &Q) -> Option<&V>
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.get(key)
        }

        pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.remove(key)
        }

        pub fn contains_key<Q>(&self, key: &Q) -> bool
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.contains_key(key)
        }

        pub fn values(&self) -> impl Iterator<Item = &V> {
            self.items.values()
        }

        pub fn len(&self) -> usize {
            self.items.len()
        }

        pub fn is_empty(&self) -> bool {
            self.items.is_empty()
        }
    }
}

pub use context::MetadataMap;
pub use future::BoxFuture;
pub use options::ChatOptions;
pub use registry::Registry;
