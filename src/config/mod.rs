mod schema;

pub use schema::{Config, ExportConfig, GatewayConfig, ProviderConfig};
