mod cross_join;
mod key_generator;

pub use cross_join::{overview, routes_for_upstream, RouteSummary, UpstreamOverview};
pub use key_generator::{generate_key, KEY_LENGTH};
