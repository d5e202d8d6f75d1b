//! HTTP utility modules
//!
//! Response builders, MIME type detection, and cache control helpers.

pub mod cache;
pub mod mime;
pub mod response;

pub use response::{
    build_404_response, build_405_response, build_413_response, build_options_response,
};
