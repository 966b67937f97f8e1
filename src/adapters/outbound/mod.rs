mod http_resource_client;

pub use http_resource_client::{HttpResourceClient, ADMIN_KEY_HEADER};
