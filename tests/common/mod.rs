//! Common test utilities for playlist-dl integration tests

#[allow(dead_code)]
pub mod catalog;
#[allow(dead_code)]
pub mod http;
#[allow(dead_code)]
pub mod stages;
#[allow(dead_code)]
pub mod tools;

#[allow(unused_imports)]
pub use catalog::*;
#[allow(unused_imports)]
pub use http::*;
#[allow(unused_imports)]
pub use stages::*;
#[allow(unused_imports)]
pub use tools::*;
