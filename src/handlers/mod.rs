pub mod api;
pub mod meta;
pub mod rpc;
pub mod tooling;
