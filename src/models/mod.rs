//! Core data models
//!
//! [`ProxyNode`] is the normalized record every link decoder produces and the
//! generator consumes.
//!
//! ```rust
//! use subclash::models::{CommonProxyOptions, ProxyNode, ProxyType};
//!
//! let node = ProxyNode::Socks5 {
//!     common: CommonProxyOptions::new("local", "127.0.0.1", 1080),
//!     username: None,
//!     password: None,
//! };
//! assert_eq!(node.proxy_type(), ProxyType::Socks5);
//! assert_eq!(node.summary(), "local (socks5) 127.0.0.1:1080");
//! ```

mod proxy;

pub use proxy::*;
