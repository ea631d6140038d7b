pub mod common;
pub mod http;
pub mod hysteria2;
mod plugin;
pub mod socks;
pub mod ss;
pub mod ssr;
pub mod trojan;
pub mod vless;
pub mod vmess;

pub use http::explode_http;
pub use hysteria2::explode_hysteria2;
pub use socks::explode_socks;
pub use ss::explode_ss;
pub use ssr::explode_ssr;
pub use trojan::explode_trojan;
pub use vless::explode_vless;
pub use vmess::explode_vmess;
