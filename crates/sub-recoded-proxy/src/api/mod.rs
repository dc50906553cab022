mod handlers;
mod responses;
mod server;

pub use handlers::{handle, is_denied_target, target_param, ApiState};
pub use responses::{error_response, ProxyResponse};
pub use server::ProxyServer;
