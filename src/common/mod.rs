//! Common algorithms and utilities.

mod f32_array_ext;
mod softmin;

pub use f32_array_ext::F32ArrayExt;
pub use softmin::softmin;
