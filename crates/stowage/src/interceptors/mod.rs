//! Interceptors shipped with the crate.

pub mod logging;

pub use logging::LoggingInterceptor;
