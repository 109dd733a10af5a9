// Application state for HTTP handlers
use crate::infrastructure::config::GatewayConfig;
use crate::infrastructure::proxy::RequestForwarder;

#[derive(Clone)]
pub struct AppState {
    pub config: GatewayConfig,
    pub forwarder: RequestForwarder,
}
