pub mod api;
pub mod bootstrap;
pub mod error;
pub mod router;
pub mod server;
pub mod state;

pub use bootstrap::build_orchestrator;
pub use server::GatewayServer;
