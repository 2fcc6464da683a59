pub mod transform;

pub use transform::{from_fn, FnTransform, Transform};
