//! Single-account admin surface: login, analytics, uploads, the podcast
//! catalog and editable site sections.

pub mod gateway;
pub mod handlers;

pub use gateway::AdminGateway;
