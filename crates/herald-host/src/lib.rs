//! HERALD Host Profiles
//!
//! Data-driven host capability surfaces. A [`HostProfile`] describes which
//! notification APIs an environment exposes and how each one answers; a
//! [`ProfileHost`] serves that description to the negotiator.

mod error;
mod profile;
mod surface;

pub use error::HostProfileError;
pub use profile::{HostProfile, LegacyProfile, ModernProfile, RequestBehavior};
pub use surface::ProfileHost;

pub type Result<T> = std::result::Result<T, HostProfileError>;
