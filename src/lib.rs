//! # waymark
//!
//! A client-side navigation engine for single-page applications.
//!
//! waymark maps URL paths to renderable components. Routes are compiled once
//! from templates such as `/blog/{slug}/{id:[0-9]+}`, matched in registration
//! order, and driven through an async navigation state machine that runs
//! middleware, follows redirects, optionally waits on a transition gate and
//! finally mounts a freshly constructed component.
//!
//! ## Feature Flags
//!
//! - `pages` (default) - the navigator, lifecycle events and collaborator
//!   traits ([`pages`])
//!
//! Route compilation and matching ([`urls`]) are always available; build
//! with `default-features = false` to leave out the navigator.
//!
//! ## Quick Example
//!
//! ```
//! use waymark::prelude::*;
//!
//! let mut routes = RouteRegistry::new();
//! routes
//!     .add("/", "home-page")?
//!     .add("/blog/{slug}", "blog-article")?
//!     .redirect("/home", "/")?;
//! routes.group(GroupSettings::new().with_prefix("/admin"), |admin| {
//!     admin.add("/users/{id:[0-9]+}", "admin-user")?;
//!     Ok(())
//! })?;
//!
//! let found = routes.match_path("/Admin/Users/42/").unwrap();
//! assert_eq!(found.tokens.get("id"), Some("42"));
//! # Ok::<(), waymark::urls::CompileError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub use waymark_urls as urls;

#[cfg(feature = "pages")]
#[cfg_attr(docsrs, doc(cfg(feature = "pages")))]
pub use waymark_pages as pages;

/// Commonly used types.
pub mod prelude {
	pub use waymark_urls::{
		ComponentRef, GroupSettings, Middleware, NavigationAbort, NavigationData, QueryMap,
		QueryValue, RouteContext, RouteHandler, RouteRegistry, RouteTarget, StepResult, Tokens,
		handler_fn, middleware_fn,
	};

	#[cfg(feature = "pages")]
	pub use waymark_pages::{
		ComponentFactory, ComponentLoader, HistoryMode, LifecycleEvent, LinkActivation,
		LoadError, MountAdapter, NavigationOutcome, NavigationState, NavigationTrigger,
		Navigator, NavigatorSettings, Phase, ScrollBehavior, factory_fn,
	};

	pub use async_trait::async_trait;
}
