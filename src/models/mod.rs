//! Models Module
//!
//! Request and response DTOs for the cache server REST API.

mod requests;
mod responses;

pub use requests::PutRequest;
pub use responses::{
    DeleteResponse, ErrorResponse, ExpiredResponse, FlushResponse, GetResponse,
    HealthResponse, PutResponse, StatsResponse, SweepResponse,
};
