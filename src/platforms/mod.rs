//! Concrete feedback platform clients.

pub mod etrusted;
pub mod zenloop;

pub use etrusted::EtrustedClient;
pub use zenloop::ZenloopClient;
