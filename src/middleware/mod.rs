pub mod auth;
pub mod auth_gate;
pub mod extract;
pub mod rate_limit;
pub mod response;

pub use auth::{verify_bearer_middleware, AuthUser};
pub use auth_gate::auth_gate_middleware;
pub use extract::extract_filter_params;
pub use rate_limit::{rate_limit_middleware, TokenBucketLimiter};
pub use response::ApiResponse;
