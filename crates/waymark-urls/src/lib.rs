//! Route compilation and matching for waymark.
//!
//! This crate turns route templates into compiled descriptors and finds the
//! descriptor accepting a given path:
//!
//! - [`pattern`]: template compiler (`/blog/{slug}/{id:[0-9]+}`, `*`)
//! - [`registry`]: ordered registry and scoped group builder
//! - [`matcher`]: first-match-wins lookup with token extraction
//! - [`params`], [`location`]: query strings and URL splitting
//! - [`middleware`], [`target`]: what a matched route runs
//!
//! ## Quick Start
//!
//! ```
//! use waymark_urls::{GroupSettings, RouteRegistry, middleware_fn};
//!
//! let mut routes = RouteRegistry::new();
//! routes
//!     .add("/", "home-page")?
//!     .add("/blog/{slug}/{id:[0-9]+}", "blog-article")?;
//!
//! let audit = middleware_fn(|ctx| async move {
//!     ctx.data.insert("audited", true);
//!     Ok(())
//! });
//! routes.group(GroupSettings::new().with_prefix("/v1").with_middleware(audit), |v1| {
//!     v1.add("/users/{id}", "user-page")?;
//!     Ok(())
//! })?;
//!
//! let found = routes.match_path("/blog/hello/42").unwrap();
//! assert_eq!(found.tokens.get("slug"), Some("hello"));
//! assert_eq!(found.tokens.get("id"), Some("42"));
//!
//! let grouped = routes.match_path("/v1/users/7").unwrap();
//! assert_eq!(grouped.descriptor.middleware().len(), 1);
//! # Ok::<(), waymark_urls::CompileError>(())
//! ```

pub mod data;
pub mod descriptor;
pub mod error;
pub mod location;
pub mod matcher;
pub mod middleware;
pub mod params;
pub mod pattern;
pub mod registry;
pub mod target;

pub use data::NavigationData;
pub use descriptor::RouteDescriptor;
pub use error::{CompileError, Result};
pub use location::{ParsedLocation, is_fragment_only, normalize_path, path_segments};
pub use matcher::{RouteMatch, match_path};
pub use middleware::{
	Middleware, NavigationAbort, RouteContext, RouteHandler, SharedMiddleware, StepResult,
	handler_fn, middleware_fn,
};
pub use params::{QueryMap, QueryValue, Tokens};
pub use pattern::{CompiledPattern, Segment, TokenConstraint};
pub use registry::{GroupSettings, RouteGroup, RouteRegistry};
pub use target::{ComponentRef, RouteTarget};
