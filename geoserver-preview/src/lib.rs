// ABOUTME: Library exports for the GeoServer map preview for testing and external use
// ABOUTME: Makes the preview core, renderers, and config available to integration tests and benchmarks

pub mod cli;
pub mod cli_output;
pub mod config;
pub mod constants;
pub mod image_protocols;
pub mod preview;
