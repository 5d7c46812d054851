//! Core Components
//!
//! HTTP transport, session refresh state and the authenticated client.

pub mod interceptor;
pub mod navigation;
pub mod session;
pub mod transport;

pub use interceptor::*;
pub use navigation::*;
pub use session::*;
pub use transport::*;
