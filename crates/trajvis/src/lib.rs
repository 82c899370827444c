#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use trajvis_linalg as linalg;

#[doc(inline)]
pub use trajvis_geometry as geometry;

#[doc(inline)]
pub use trajvis_trajectory as trajectory;
