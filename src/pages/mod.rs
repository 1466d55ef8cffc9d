//! Server-rendered media pages.
//!
//! Every configured page variant mounts the same three routes, bound to its own
//! collection: the page itself, `add` and `delete`. Both form actions answer with
//! a redirect back to the page on success so a reload never resubmits.
//!
//! # Usage
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .nest("/csspage", pages::routes(css_page))
//!     .with_state(app_state);
//! ```

mod handler;
mod render;
mod routes;

pub use routes::routes;
