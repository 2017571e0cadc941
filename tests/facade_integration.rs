//! End-to-end check of the facade: routes built through the prelude drive a
//! navigator over in-memory collaborators.

use rstest::rstest;
use std::sync::{Arc, Mutex};
use waymark::prelude::*;

struct StaticLoader;

#[async_trait]
impl ComponentLoader<String> for StaticLoader {
	async fn load(
		&self,
		component: &ComponentRef,
	) -> Result<Arc<dyn ComponentFactory<String>>, LoadError> {
		let tag = component.tag_name.clone();
		Ok(factory_fn(move |tokens: &Tokens, _: &QueryMap, _: &NavigationData| {
			format!("<{} {}>", tag, tokens.values().join(" "))
		}))
	}
}

#[derive(Default)]
struct Page {
	log: Mutex<Vec<String>>,
}

impl Page {
	fn record(&self, entry: String) {
		self.log.lock().unwrap().push(entry);
	}
}

impl MountAdapter<String> for Page {
	fn mount(&self, element: String) {
		self.record(format!("mount {}", element));
	}

	fn history_replace(&self, url: &str) {
		self.record(format!("replace {}", url));
	}

	fn history_push(&self, url: &str) {
		self.record(format!("push {}", url));
	}

	fn scroll_to_fragment(&self, _id: &str, _behavior: ScrollBehavior) -> bool {
		false
	}

	fn scroll_to_top(&self) {}

	fn current_path(&self) -> String {
		"/".to_string()
	}

	fn origin(&self) -> String {
		"https://site.example".to_string()
	}

	fn navigate_external(&self, url: &str) {
		self.record(format!("external {}", url));
	}
}

#[tokio::test]
async fn test_prelude_round_trip() {
	let mut routes = RouteRegistry::new();
	routes
		.add("/", "home-page")
		.unwrap()
		.group(GroupSettings::new().with_prefix("/v1"), |v1| {
			v1.add("/users/{id:[0-9]+}", "user-page")?;
			v1.redirect("/me", "/v1/users/1")?;
			Ok(())
		})
		.unwrap();
	let page = Arc::new(Page::default());
	let loader: Arc<dyn ComponentLoader<String>> = Arc::new(StaticLoader);
	let adapter: Arc<dyn MountAdapter<String>> = page.clone();
	let navigator = Navigator::builder(routes).build(loader, adapter);

	let start = navigator.start("/").await;
	let me = navigator.navigate("/v1/me", HistoryMode::Push).await;
	let away = navigator
		.navigate("https://elsewhere.example/", HistoryMode::Push)
		.await;

	assert!(start.is_loaded());
	assert!(me.is_loaded());
	assert!(matches!(away, NavigationOutcome::External { .. }));
	assert_eq!(
		*page.log.lock().unwrap(),
		vec![
			"mount <home-page >",
			"replace /",
			"mount <user-page 1>",
			"push /v1/users/1",
			"external https://elsewhere.example/",
		]
	);
	assert_eq!(navigator.state(), NavigationState::Idle);
}

#[rstest]
#[case("/v1/users/7", Some("v1/users/{id:[0-9]+}"))]
#[case("/V1/Users/7/", Some("v1/users/{id:[0-9]+}"))]
#[case("/v1/users/seven", None)]
#[case("/v1/docs", Some("v1/docs/*"))]
#[case("/v1/docs/intro", Some("v1/docs/*"))]
fn test_prelude_matching(#[case] path: &str, #[case] expected: Option<&str>) {
	let mut routes = RouteRegistry::new();
	routes
		.group(GroupSettings::new().with_prefix("/v1"), |v1| {
			v1.add("/users/{id:[0-9]+}", "user-page")?;
			v1.add("/docs/*", "docs-page")?;
			Ok(())
		})
		.unwrap();

	let found = routes.match_path(path);

	assert_eq!(
		found.map(|found| found.descriptor.raw_pattern().trim_matches('/').to_string()),
		expected.map(str::to_string)
	);
}
