//! Navigation middleware and route handlers.
//!
//! Middleware runs before a route's target, in registration order, each
//! step awaited before the next begins. A step that returns
//! [`NavigationAbort`] stops the current navigation attempt; the abort names
//! the URL the navigator should go to instead.

use crate::data::NavigationData;
use crate::params::{QueryMap, Tokens};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Context handed to middleware and route handlers.
///
/// `tokens` and `query` are copies owned by the callee; `data` is a handle
/// to the bag shared by every stage of the attempt.
#[derive(Debug, Clone)]
pub struct RouteContext {
	/// Tokens bound by the matched route.
	pub tokens: Tokens,
	/// Parsed query string.
	pub query: QueryMap,
	/// Shared data bag.
	pub data: NavigationData,
}

impl RouteContext {
	/// Creates a new context.
	pub fn new(tokens: Tokens, query: QueryMap, data: NavigationData) -> Self {
		Self {
			tokens,
			query,
			data,
		}
	}
}

/// Abort raised by middleware or a handler, naming the next navigation target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Navigation aborted, rerouting to '{target}'")]
pub struct NavigationAbort {
	target: String,
}

impl NavigationAbort {
	/// Aborts the current attempt and reroutes to `target`.
	pub fn reroute(target: impl Into<String>) -> Self {
		Self {
			target: target.into(),
		}
	}

	/// Returns the URL to navigate to instead.
	pub fn target(&self) -> &str {
		&self.target
	}
}

impl From<&str> for NavigationAbort {
	fn from(target: &str) -> Self {
		Self::reroute(target)
	}
}

impl From<String> for NavigationAbort {
	fn from(target: String) -> Self {
		Self::reroute(target)
	}
}

/// Result of a middleware step or a route handler.
pub type StepResult = std::result::Result<(), NavigationAbort>;

/// An asynchronous step run before a route's target.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use waymark_urls::{Middleware, NavigationAbort, RouteContext, StepResult};
///
/// struct RequireSession;
///
/// #[async_trait]
/// impl Middleware for RequireSession {
///     async fn process(&self, ctx: RouteContext) -> StepResult {
///         if ctx.data.contains_key("session") {
///             Ok(())
///         } else {
///             Err(NavigationAbort::reroute("/login"))
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Middleware: Send + Sync {
	/// Runs the step.
	async fn process(&self, ctx: RouteContext) -> StepResult;
}

/// Shared middleware reference, as stored in route descriptors.
pub type SharedMiddleware = Arc<dyn Middleware>;

struct FnMiddleware<F>(F);

#[async_trait]
impl<F, Fut> Middleware for FnMiddleware<F>
where
	F: Fn(RouteContext) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = StepResult> + Send + 'static,
{
	async fn process(&self, ctx: RouteContext) -> StepResult {
		(self.0)(ctx).await
	}
}

/// Wraps an async closure as middleware.
///
/// # Example
///
/// ```
/// use waymark_urls::middleware_fn;
///
/// let stamp = middleware_fn(|ctx| async move {
///     ctx.data.insert("visited", true);
///     Ok(())
/// });
/// ```
pub fn middleware_fn<F, Fut>(f: F) -> SharedMiddleware
where
	F: Fn(RouteContext) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = StepResult> + Send + 'static,
{
	Arc::new(FnMiddleware(f))
}

/// A route target that runs code instead of mounting a component.
#[async_trait]
pub trait RouteHandler: Send + Sync {
	/// Handles the navigation.
	async fn handle(&self, ctx: RouteContext) -> StepResult;
}

struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> RouteHandler for FnHandler<F>
where
	F: Fn(RouteContext) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = StepResult> + Send + 'static,
{
	async fn handle(&self, ctx: RouteContext) -> StepResult {
		(self.0)(ctx).await
	}
}

/// Wraps an async closure as a route handler.
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn RouteHandler>
where
	F: Fn(RouteContext) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = StepResult> + Send + 'static,
{
	Arc::new(FnHandler(f))
}
