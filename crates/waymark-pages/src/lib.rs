//! Navigation engine for waymark.
//!
//! This crate drives client-side navigation over a route table built with
//! [`waymark_urls`]:
//!
//! - [`navigator`]: the navigation state machine and its outcomes
//! - [`gate`]: transition gate deferring the mount of the next page
//! - [`events`]: lifecycle event bus (`ready`, `preloading`, `loading`,
//!   `redirecting`, `loaded`)
//! - [`loader`], [`adapter`]: collaborators that load components and touch
//!   the page
//! - [`trigger`]: link activation and history pop handling
//! - [`settings`]: navigator configuration, loadable from TOML
//!
//! The navigator never touches a document itself. Everything page-side goes
//! through a [`MountAdapter`], and components are obtained through a
//! [`ComponentLoader`], so the engine runs the same under a browser binding
//! and in tests.

pub mod adapter;
pub mod error;
pub mod events;
pub mod gate;
pub mod loader;
pub mod navigator;
pub mod settings;
pub mod trigger;

pub use adapter::{HistoryMode, MountAdapter, NavigationState, ScrollBehavior};
pub use error::{LoadError, NavigationError};
pub use events::{
	EventBus, Incoming, LifecycleEvent, Listener, Phase, RouteDetails, RouteSnapshot,
	SubscriptionId,
};
pub use gate::{GateKeeper, GateRelease, TransitionGate};
pub use loader::{ComponentFactory, ComponentLoader, factory_fn};
pub use navigator::{NavigationOutcome, NavigationTask, Navigator, NavigatorBuilder};
pub use settings::{NavigatorSettings, SettingsError, TransitionTimer};
pub use trigger::{LinkActivation, NavigationTrigger};
