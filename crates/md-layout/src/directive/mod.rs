//! Name-keyed dispatch for block directives.
//!
//! A [`BlockDirective`] decides how a `BlockDirective` node is composed. Hosts
//! register handlers in a [`DirectiveRegistry`]; names without a handler fall
//! back to [`GenericDirective`], which stacks the children with no
//! decoration. Lookup never fails and never drops content.
//!
//! # Example
//!
//! ```
//! use md_layout::directive::{BlockDirective, DirectiveInvocation, DirectiveRegistry};
//! use md_layout::{LayoutBackend, TextRole, TreeBackend};
//!
//! struct Banner;
//!
//! impl<B: LayoutBackend> BlockDirective<B> for Banner {
//!     fn name(&self) -> &str { "banner" }
//!
//!     fn compose(
//!         &self,
//!         backend: &B,
//!         invocation: &DirectiveInvocation<'_>,
//!         mut children: Vec<B::Fragment>,
//!     ) -> B::Fragment {
//!         children.insert(0, backend.text(&invocation.arguments.join(" "), TextRole::Label));
//!         backend.flow(children)
//!     }
//! }
//!
//! let registry = DirectiveRegistry::<TreeBackend>::new().with(Banner);
//! assert!(registry.contains("banner"));
//! assert!(!registry.contains("Banner"));
//! ```

mod callout;
mod handler;
mod registry;

pub use callout::CalloutDirective;
pub use handler::{BlockDirective, DirectiveInvocation, GenericDirective};
pub use registry::DirectiveRegistry;
