//! Route targets.

use crate::location::normalize_path;
use crate::middleware::{RouteContext, RouteHandler, StepResult, handler_fn};
use std::future::Future;
use std::sync::Arc;

/// Reference to a loadable component: a tag name and the file defining it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentRef {
	/// Name under which the component is registered and cached.
	pub tag_name: String,
	/// Module location handed to the component loader.
	pub file: String,
}

impl ComponentRef {
	/// Creates a component reference from explicit parts.
	pub fn new(tag_name: impl Into<String>, file: impl Into<String>) -> Self {
		Self {
			tag_name: tag_name.into(),
			file: file.into(),
		}
	}

	/// Derives a component reference from a module name.
	///
	/// The module name doubles as the tag name. Absolute `http(s)` locations
	/// are used verbatim as the file; anything else resolves to
	/// `./<name>.js`, without doubling an existing `.js` suffix.
	///
	/// # Examples
	///
	/// ```
	/// use waymark_urls::ComponentRef;
	///
	/// let local = ComponentRef::from_module("blog-article");
	/// assert_eq!(local.tag_name, "blog-article");
	/// assert_eq!(local.file, "./blog-article.js");
	///
	/// let suffixed = ComponentRef::from_module("blog-article.js");
	/// assert_eq!(suffixed.file, "./blog-article.js");
	///
	/// let remote = ComponentRef::from_module("https://cdn.example/app.js");
	/// assert_eq!(remote.file, "https://cdn.example/app.js");
	/// ```
	pub fn from_module(module: &str) -> Self {
		let module = module.trim();
		let file = if module.starts_with("http") {
			module.to_string()
		} else {
			let stem = module.strip_suffix(".js").unwrap_or(module).trim();
			format!("./{}.js", stem)
		};

		Self {
			tag_name: module.to_string(),
			file,
		}
	}
}

/// What a matched route resolves to.
///
/// The kind is fixed when the route is compiled, so the navigator never
/// inspects the target's shape at navigation time.
#[derive(Clone)]
pub enum RouteTarget {
	/// Load the component and mount a freshly constructed instance.
	Component(ComponentRef),
	/// Run the handler; nothing is mounted.
	Handler(Arc<dyn RouteHandler>),
	/// Navigate to another URL instead.
	Redirect {
		/// Destination, with surrounding slashes removed.
		destination: String,
	},
}

impl RouteTarget {
	/// Component target from explicit parts.
	pub fn component(tag_name: impl Into<String>, file: impl Into<String>) -> Self {
		Self::Component(ComponentRef::new(tag_name, file))
	}

	/// Handler target from an async closure.
	pub fn handler<F, Fut>(f: F) -> Self
	where
		F: Fn(RouteContext) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = StepResult> + Send + 'static,
	{
		Self::Handler(handler_fn(f))
	}

	/// Redirect target.
	pub fn redirect(destination: &str) -> Self {
		Self::Redirect {
			destination: normalize_path(destination),
		}
	}

	/// Returns the component reference of a component target.
	pub fn as_component(&self) -> Option<&ComponentRef> {
		match self {
			Self::Component(component) => Some(component),
			_ => None,
		}
	}

	/// Returns the destination of a redirect target.
	pub fn redirect_destination(&self) -> Option<&str> {
		match self {
			Self::Redirect { destination } => Some(destination),
			_ => None,
		}
	}

	/// Returns whether the target is a handler.
	pub fn is_handler(&self) -> bool {
		matches!(self, Self::Handler(_))
	}
}

impl std::fmt::Debug for RouteTarget {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Component(component) => f.debug_tuple("Component").field(component).finish(),
			Self::Handler(_) => f.write_str("Handler(..)"),
			Self::Redirect { destination } => f
				.debug_struct("Redirect")
				.field("destination", destination)
				.finish(),
		}
	}
}

impl From<&str> for RouteTarget {
	fn from(module: &str) -> Self {
		Self::Component(ComponentRef::from_module(module))
	}
}

impl From<String> for RouteTarget {
	fn from(module: String) -> Self {
		Self::from(module.as_str())
	}
}

impl From<ComponentRef> for RouteTarget {
	fn from(component: ComponentRef) -> Self {
		Self::Component(component)
	}
}

impl From<Arc<dyn RouteHandler>> for RouteTarget {
	fn from(handler: Arc<dyn RouteHandler>) -> Self {
		Self::Handler(handler)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_string_becomes_component() {
		let target = RouteTarget::from("missing-page");

		let component = target.as_component().unwrap();
		assert_eq!(component.tag_name, "missing-page");
		assert_eq!(component.file, "./missing-page.js");
	}

	#[rstest]
	#[case("/home/", "home")]
	#[case("  /a/b  ", "a/b")]
	#[case("/", "")]
	fn test_redirect_destination_trimmed(#[case] input: &str, #[case] expected: &str) {
		let target = RouteTarget::redirect(input);
		assert_eq!(target.redirect_destination(), Some(expected));
	}

	#[rstest]
	fn test_handler_target() {
		let target = RouteTarget::handler(|_ctx| async { Ok(()) });

		assert!(target.is_handler());
		assert!(target.as_component().is_none());
		assert_eq!(format!("{:?}", target), "Handler(..)");
	}
}
