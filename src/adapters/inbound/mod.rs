pub mod terminal;

pub use terminal::{render_issued_key, render_overview, render_routes, render_upstreams};
