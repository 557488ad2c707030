//! Configuration section definitions.
//!
//! Each module corresponds to a section in `vercout.toml`:
//!
//! | Module       | TOML Section             | Purpose                               |
//! |--------------|--------------------------|---------------------------------------|
//! | `build`      | `[build]`                | Input/output paths, global defaults   |
//! | `prerender`  | `[prerender_manifest]`   | Per-route ISR overrides, preview id   |
//! | `routes`     | `[routes_manifest]`      | Rewrites, redirects, headers          |
//! | `functions`  | `[functions_manifest]`   | Serverless function settings          |

mod build;
mod functions;
mod prerender;
mod routes;

pub use build::BuildConfig;
pub use functions::FunctionsManifestConfig;
pub use prerender::{DynamicRouteOverride, PrerenderManifestConfig, RouteOverride};
pub use routes::RoutesManifestConfig;
