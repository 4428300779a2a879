//! Directive registry.

use std::collections::HashMap;
use std::fmt;

use super::{BlockDirective, DirectiveInvocation, GenericDirective};
use crate::backend::LayoutBackend;

/// Name→handler table with a mandatory fallback.
pub struct DirectiveRegistry<B: LayoutBackend> {
    handlers: HashMap<String, Box<dyn BlockDirective<B>>>,
    fallback: Box<dyn BlockDirective<B>>,
}

impl<B: LayoutBackend> Default for DirectiveRegistry<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: LayoutBackend> fmt::Debug for DirectiveRegistry<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectiveRegistry")
            .field("names", &self.names())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

impl<B: LayoutBackend> DirectiveRegistry<B> {
    /// Empty registry falling back to [`GenericDirective`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            fallback: Box::new(GenericDirective),
        }
    }

    /// Register a handler under its [`name`](BlockDirective::name).
    #[must_use]
    pub fn with<D: BlockDirective<B> + 'static>(mut self, directive: D) -> Self {
        self.register(directive);
        self
    }

    /// Replace the fallback used for unregistered names.
    #[must_use]
    pub fn with_fallback<D: BlockDirective<B> + 'static>(mut self, directive: D) -> Self {
        self.fallback = Box::new(directive);
        self
    }

    /// Register a handler, returning the one it replaced.
    pub fn register<D: BlockDirective<B> + 'static>(
        &mut self,
        directive: D,
    ) -> Option<Box<dyn BlockDirective<B>>> {
        let name = directive.name().to_owned();
        let previous = self.handlers.insert(name.clone(), Box::new(directive));
        if previous.is_some() {
            tracing::debug!(directive = %name, "Replacing registered directive");
        }
        previous
    }

    /// Whether a handler is registered under `name` (case-sensitive).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Handler for `name`, or the fallback.
    #[must_use]
    pub fn resolve(&self, name: &str) -> &dyn BlockDirective<B> {
        match self.handlers.get(name) {
            Some(handler) => handler.as_ref(),
            None => {
                tracing::debug!(directive = name, "No handler registered, using fallback");
                self.fallback.as_ref()
            }
        }
    }

    pub(crate) fn compose(
        &self,
        backend: &B,
        invocation: &DirectiveInvocation<'_>,
        children: Vec<B::Fragment>,
    ) -> B::Fragment {
        self.resolve(invocation.name)
            .compose(backend, invocation, children)
    }
}
