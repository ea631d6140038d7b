//! Proxy share-link parsing and Clash Meta configuration generation.
//!
//! ```rust
//! use subclash::{explode, generate, validate};
//!
//! let node = explode("ss://YWVzLTI1Ni1nY206cGFzcw==@1.2.3.4:8388#MyNode").unwrap();
//! let document = generate(&[node], "🚀 节点选择", None).unwrap();
//! assert!(validate(&document));
//! ```

pub mod generator;
pub mod models;
pub mod parser;
pub mod settings;
pub mod utils;

// Re-export the main proxy types for easier access
pub use models::{ProxyNode, ProxyType};

pub use generator::{
    check, derive_template, generate, validate, ClashDocument, GeneratorError, ValidationFailure,
};
pub use parser::{explode, explode_sub};
pub use settings::{Settings, SettingsError};
