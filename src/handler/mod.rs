// Handler module entry point
// Request routing and the page/static/health handlers

pub mod pages;
pub mod router;
pub mod static_files;

pub use router::handle_request;
