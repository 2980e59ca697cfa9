pub mod client;
pub mod clock;
pub mod error;
pub mod gateway;
pub mod gateway_params;
pub mod rate_gate;
