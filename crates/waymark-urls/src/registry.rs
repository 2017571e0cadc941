//! Route registry and group builder.
//!
//! Routes are compiled when they are registered and kept in registration
//! order, which is also their match priority. Groups are a registration-time
//! convenience only: a group prepends its prefix and middleware to every
//! route added through it and leaves nothing behind once its build closure
//! returns.

use crate::descriptor::RouteDescriptor;
use crate::error::Result;
use crate::matcher::{RouteMatch, match_path};
use crate::middleware::SharedMiddleware;
use crate::target::RouteTarget;
use std::sync::Arc;

/// Ordered collection of compiled routes.
///
/// # Examples
///
/// ```
/// use waymark_urls::{GroupSettings, RouteRegistry};
///
/// let mut routes = RouteRegistry::new();
/// routes
///     .add("/", "home-page")?
///     .add("/blog/{slug}", "blog-article")?
///     .redirect("/home", "/")?;
/// routes.group(GroupSettings::new().with_prefix("/admin"), |admin| {
///     admin.add("/users", "admin-users")?;
///     Ok(())
/// })?;
///
/// let found = routes.match_path("/admin/users").unwrap();
/// assert_eq!(found.descriptor.raw_pattern(), "/admin/users");
/// # Ok::<(), waymark_urls::CompileError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
	routes: Vec<Arc<RouteDescriptor>>,
}

impl RouteRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a route without middleware.
	///
	/// # Errors
	///
	/// Returns the compile error of an invalid template; nothing is stored.
	pub fn add(&mut self, pattern: &str, target: impl Into<RouteTarget>) -> Result<&mut Self> {
		self.add_with_middleware(pattern, target, Vec::new())
	}

	/// Registers a route with route-local middleware.
	pub fn add_with_middleware(
		&mut self,
		pattern: &str,
		target: impl Into<RouteTarget>,
		middleware: Vec<SharedMiddleware>,
	) -> Result<&mut Self> {
		let descriptor = RouteDescriptor::new(pattern, target.into(), middleware)?;
		tracing::debug!(
			pattern = descriptor.raw_pattern(),
			target = ?descriptor.target(),
			middleware = descriptor.middleware().len(),
			"Route registered"
		);
		self.routes.push(Arc::new(descriptor));
		Ok(self)
	}

	/// Registers a route redirecting to `destination`.
	pub fn redirect(&mut self, pattern: &str, destination: &str) -> Result<&mut Self> {
		self.redirect_with_middleware(pattern, destination, Vec::new())
	}

	/// Registers a redirect carrying middleware.
	///
	/// The middleware is stored on the route, but a navigator follows the
	/// redirect as soon as the route matches, before any middleware runs.
	pub fn redirect_with_middleware(
		&mut self,
		pattern: &str,
		destination: &str,
		middleware: Vec<SharedMiddleware>,
	) -> Result<&mut Self> {
		self.add_with_middleware(pattern, RouteTarget::redirect(destination), middleware)
	}

	/// Registers the routes added by `build` under shared settings.
	pub fn group<F>(&mut self, settings: GroupSettings, build: F) -> Result<&mut Self>
	where
		F: FnOnce(&mut RouteGroup<'_>) -> Result<()>,
	{
		let mut group = RouteGroup::root(self).nest(settings);
		build(&mut group)?;
		Ok(self)
	}

	/// Finds the first route accepting `path`.
	pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
		match_path(&self.routes, path)
	}

	/// Returns whether a route was registered with exactly this template.
	pub fn has_route(&self, pattern: &str) -> bool {
		self.routes.iter().any(|route| route.raw_pattern() == pattern)
	}

	/// Returns the registered routes in match order.
	pub fn routes(&self) -> &[Arc<RouteDescriptor>] {
		&self.routes
	}

	/// Iterates over the registered routes in match order.
	pub fn iter(&self) -> impl Iterator<Item = &Arc<RouteDescriptor>> {
		self.routes.iter()
	}

	/// Returns the number of registered routes.
	pub fn len(&self) -> usize {
		self.routes.len()
	}

	/// Returns whether no route is registered.
	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}
}

/// Settings shared by the routes of a group.
#[derive(Clone, Default)]
pub struct GroupSettings {
	prefix: Option<String>,
	middleware: Vec<SharedMiddleware>,
}

impl GroupSettings {
	/// Creates empty settings.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the path prefix.
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	/// Appends a middleware run before every route of the group.
	pub fn with_middleware(mut self, middleware: SharedMiddleware) -> Self {
		self.middleware.push(middleware);
		self
	}
}

impl std::fmt::Debug for GroupSettings {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GroupSettings")
			.field("prefix", &self.prefix)
			.field("middleware", &self.middleware.len())
			.finish()
	}
}

/// Scoped builder registering routes into a [`RouteRegistry`].
pub struct RouteGroup<'a> {
	registry: &'a mut RouteRegistry,
	prefix: String,
	middleware: Vec<SharedMiddleware>,
}

impl<'a> RouteGroup<'a> {
	fn root(registry: &'a mut RouteRegistry) -> Self {
		Self {
			registry,
			prefix: String::new(),
			middleware: Vec::new(),
		}
	}

	fn nest(self, settings: GroupSettings) -> Self {
		let mut group = self;
		if let Some(prefix) = settings.prefix.as_deref().filter(|p| !p.is_empty()) {
			group.prefix = join(&group.prefix, prefix);
		}
		group.middleware.extend(settings.middleware);
		group
	}

	/// Returns the accumulated prefix.
	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	/// Registers a route under the group's prefix and middleware.
	pub fn add(&mut self, pattern: &str, target: impl Into<RouteTarget>) -> Result<&mut Self> {
		self.add_with_middleware(pattern, target, Vec::new())
	}

	/// Registers a route with middleware run after the group's own.
	pub fn add_with_middleware(
		&mut self,
		pattern: &str,
		target: impl Into<RouteTarget>,
		middleware: Vec<SharedMiddleware>,
	) -> Result<&mut Self> {
		let full = join(&self.prefix, pattern);
		let chain = self.chain(middleware);
		self.registry.add_with_middleware(&full, target, chain)?;
		Ok(self)
	}

	/// Registers a redirect under the group's prefix and middleware.
	pub fn redirect(&mut self, pattern: &str, destination: &str) -> Result<&mut Self> {
		let full = join(&self.prefix, pattern);
		let chain = self.chain(Vec::new());
		self.registry
			.redirect_with_middleware(&full, destination, chain)?;
		Ok(self)
	}

	/// Opens a nested group inheriting this group's prefix and middleware.
	pub fn group<F>(&mut self, settings: GroupSettings, build: F) -> Result<&mut Self>
	where
		F: FnOnce(&mut RouteGroup<'_>) -> Result<()>,
	{
		let mut nested = RouteGroup {
			registry: &mut *self.registry,
			prefix: self.prefix.clone(),
			middleware: self.middleware.clone(),
		}
		.nest(settings);
		build(&mut nested)?;
		Ok(self)
	}

	fn chain(&self, local: Vec<SharedMiddleware>) -> Vec<SharedMiddleware> {
		let mut chain = self.middleware.clone();
		chain.extend(local);
		chain
	}
}

/// Joins a prefix and a route, trimming surrounding slashes of the route.
fn join(prefix: &str, route: &str) -> String {
	format!("{}/{}", prefix, route.trim().trim_matches('/'))
}
