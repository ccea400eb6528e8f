// Application layer - polling use case and remote-source contract
pub mod history;
pub mod poller;
pub mod telemetry_api;
