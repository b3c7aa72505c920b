//! Outbound services. The gateway's only collaborator is the upstream
//! analysis service.

mod upstream;

pub use upstream::{UpstreamClient, UpstreamResponse};
