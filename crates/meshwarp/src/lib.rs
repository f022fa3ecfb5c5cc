#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use meshwarp_mesh as mesh;

#[doc(inline)]
pub use meshwarp_deform as deform;

#[doc(inline)]
pub use meshwarp_session as session;
