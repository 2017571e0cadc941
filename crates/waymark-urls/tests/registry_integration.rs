//! Registry, group and matcher integration tests.

use rstest::rstest;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use waymark_urls::{
	GroupSettings, Middleware, NavigationData, QueryMap, QueryValue, RouteContext, RouteHandler,
	RouteRegistry, RouteTarget, SharedMiddleware, Tokens, middleware_fn,
};

/// Middleware appending `label` to the `trail` entry of the data bag.
fn tracer(label: &'static str) -> SharedMiddleware {
	middleware_fn(move |ctx: RouteContext| async move {
		let mut trail = ctx
			.data
			.get("trail")
			.and_then(|value| value.as_str().map(str::to_string))
			.unwrap_or_default();
		trail.push_str(label);
		ctx.data.insert("trail", trail);
		Ok(())
	})
}

async fn run_chain(middleware: &[SharedMiddleware]) -> String {
	let ctx = RouteContext::new(Tokens::new(), QueryMap::new(), NavigationData::new());
	for step in middleware {
		step.process(ctx.clone()).await.unwrap();
	}
	ctx.data
		.get("trail")
		.and_then(|value| value.as_str().map(str::to_string))
		.unwrap_or_default()
}

#[rstest]
fn test_specific_route_before_wildcard_wins() {
	let mut routes = RouteRegistry::new();
	routes
		.add("/users/{id}", "user-detail")
		.unwrap()
		.add("/users/*", "user-fallback")
		.unwrap();

	let found = routes.match_path("/users/42").unwrap();

	assert_eq!(found.descriptor.raw_pattern(), "/users/{id}");
	assert_eq!(found.tokens.get("id"), Some("42"));
}

#[rstest]
fn test_wildcard_registered_first_shadows() {
	let mut routes = RouteRegistry::new();
	routes
		.add("/users/*", "user-fallback")
		.unwrap()
		.add("/users/{id}", "user-detail")
		.unwrap();

	let found = routes.match_path("/users/42").unwrap();

	assert_eq!(found.descriptor.raw_pattern(), "/users/*");
}

#[rstest]
#[case("/docs")]
#[case("/docs/")]
#[case("/docs/guide/install")]
fn test_wildcard_accepts_bare_prefix(#[case] path: &str) {
	let mut routes = RouteRegistry::new();
	routes.add("/docs/*", "docs-page").unwrap();

	let found = routes.match_path(path);

	assert!(found.is_some());
	assert!(routes.match_path("/guide").is_none());
}

#[rstest]
fn test_group_prefix_equivalent_to_full_path() {
	let mut grouped = RouteRegistry::new();
	grouped
		.group(GroupSettings::new().with_prefix("/v1"), |v1| {
			v1.add("/users", "users")?;
			Ok(())
		})
		.unwrap();
	let mut flat = RouteRegistry::new();
	flat.add("/v1/users", "users").unwrap();

	for path in ["/v1/users", "v1/users/", "/V1/Users"] {
		assert!(grouped.match_path(path).is_some(), "grouped: {}", path);
		assert!(flat.match_path(path).is_some(), "flat: {}", path);
	}
	assert!(grouped.match_path("/users").is_none());
	assert_eq!(grouped.routes()[0].pattern().segments(), flat.routes()[0].pattern().segments());
}

#[tokio::test]
async fn test_nested_group_middleware_order() {
	let mut routes = RouteRegistry::new();
	routes
		.group(
			GroupSettings::new()
				.with_prefix("/admin")
				.with_middleware(tracer("a")),
			|admin| {
				admin.group(
					GroupSettings::new()
						.with_prefix("reports")
						.with_middleware(tracer("b")),
					|reports| {
						reports.add_with_middleware("/{year:[0-9]{4}}", "report", vec![tracer("c")])?;
						Ok(())
					},
				)?;
				admin.redirect("/", "/admin/reports/2024")?;
				Ok(())
			},
		)
		.unwrap();

	let report = routes.match_path("/admin/reports/2024").unwrap();
	assert_eq!(report.tokens.get("year"), Some("2024"));
	assert_eq!(run_chain(report.descriptor.middleware()).await, "abc");

	let redirect = routes.match_path("/admin").unwrap();
	assert_eq!(
		redirect.descriptor.target().redirect_destination(),
		Some("admin/reports/2024")
	);
	assert_eq!(run_chain(redirect.descriptor.middleware()).await, "a");
}

#[rstest]
fn test_query_values_grouped_by_key() {
	let query = QueryMap::parse("?a=1&a=2&b=3");

	assert_eq!(query.keys().collect::<Vec<_>>(), vec!["a", "b"]);
	assert_eq!(query.get("a"), Some(&QueryValue::from(vec!["1", "2"])));
	assert_eq!(query.get("b"), Some(&QueryValue::from("3")));
}

#[tokio::test]
async fn test_handler_target_receives_tokens() {
	let calls = Arc::new(AtomicUsize::new(0));
	let seen = Arc::clone(&calls);
	let mut routes = RouteRegistry::new();
	routes
		.add(
			"/logout/{who}",
			RouteTarget::handler(move |ctx: RouteContext| {
				let seen = Arc::clone(&seen);
				async move {
					assert_eq!(ctx.tokens.get("who"), Some("me"));
					seen.fetch_add(1, Ordering::SeqCst);
					Ok(())
				}
			}),
		)
		.unwrap();

	let found = routes.match_path("/logout/me").unwrap();
	let RouteTarget::Handler(handler) = found.descriptor.target() else {
		panic!("expected a handler target");
	};
	let ctx = RouteContext::new(found.tokens.clone(), QueryMap::new(), NavigationData::new());
	handler.handle(ctx).await.unwrap();

	assert_eq!(calls.load(Ordering::SeqCst), 1);
}
