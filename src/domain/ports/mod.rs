mod resource_client;

pub use resource_client::ResourceClient;
