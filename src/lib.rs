//! EduFlash Pages - Client Core for the EduFlash Lesson-Sharing Site
//!
//! A WASM-based single-page client built on hash navigation: every page of
//! the site is a markup fragment injected into one mount point, with an
//! optional behavior module attached after injection. The centerpiece is the
//! router / page-lifecycle manager, which turns a location fragment into a
//! rendered page while keeping three guarantees:
//!
//! - **Latest navigation wins**: every navigation carries a sequence number;
//!   a slow fetch that resolves after a newer navigation started is
//!   discarded silently, never rendered.
//! - **Single behavior slot**: at most one behavior module is attached at
//!   any time, and the previous module is fully detached before the next
//!   one's initialization runs.
//! - **No stuck states**: every failure (missing route, fetch error, module
//!   error, module timeout) degrades to a rendered error view; nothing
//!   escapes the navigator as an unhandled rejection.
//!
//! ## Architecture
//!
//! - [`routes`]: declarative route table with pattern matching and fail-fast
//!   startup validation
//! - [`location`]: fragment normalization and query parsing
//! - [`session`] / [`guard`]: session evidence and access decisions for
//!   protected routes
//! - [`content`]: cache-bypassing markup fetches
//! - [`behavior`] / [`lifecycle`]: the behavior-module capability and its
//!   single-slot state machine
//! - [`navigator`]: the navigation entry point tying the steps together
//! - [`surface`]: the mount-point and navigation-chrome seams
//! - [`dom`]: browser-backed implementations of those seams (WASM only)
//! - [`pages`]: the site's page behavior modules
//! - [`api`]: thin JSON data client used by the page modules
//! - [`app`]: boot wiring (initial dispatch + `hashchange` subscription)
//!
//! ## Example
//!
//! ```ignore
//! use eduflash_pages::app::App;
//!
//! // In the wasm entry point:
//! App::bootstrap().mount().expect("mount EduFlash client");
//! ```
//!
//! All browser-only code is gated on `target_arch = "wasm32"`; the router
//! core itself runs (and is tested) natively against the mock seams in
//! [`testing`].

#![warn(missing_docs)]

// Core modules
pub mod location;
pub mod logging;
pub mod platform;
pub mod routes;

// Access control
pub mod guard;
pub mod session;

// Page loading and lifecycle
pub mod behavior;
pub mod content;
pub mod lifecycle;
pub mod navigator;
pub mod surface;

// Browser-backed seam implementations
#[cfg(target_arch = "wasm32")]
pub mod dom;

// Data client and the site's page modules
pub mod api;
pub mod pages;

// Boot wiring
pub mod app;

// Testing utilities (mock seams, usable from integration tests)
pub mod testing;

// Re-export commonly used types
pub use api::{ApiClient, ApiError, LearningPath, Level, PathsDocument, Topic};
pub use behavior::{
	BehaviorError, BehaviorHandle, BehaviorModule, BehaviorRegistry, PageContext,
};
pub use content::{ContentError, ContentSource, HttpContentSource};
pub use guard::{AccessDecision, AccessGuard};
pub use lifecycle::BehaviorLifecycle;
pub use location::Location;
pub use navigator::{NavigationError, NavigationOutcome, Navigator};
pub use routes::{ResolvedRoute, RouteEntry, RouteTable, TableError};
pub use session::SessionStore;
pub use surface::{NavChrome, PageSurface};
