mod mock_server;
mod registry;

pub mod ports;

pub use mock_server::{MockServer, MockServerBuilder};
pub use registry::Registry;
