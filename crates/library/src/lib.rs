//! Core pipeline: normalize per-item source folders into canonical output
//! folders, strip them down to the media that matters, then re-bucket the
//! survivors into fixed-capacity shards by terminal classification
//! (video / selected / group).

mod consts;
pub mod error;
pub mod filter;
pub mod materialize;
pub mod pipeline;
mod policy;
pub mod sanitize;
pub mod shard;
pub mod title;

pub use crate::pipeline::{Pipeline, Summary};
pub use crate::policy::RetentionPolicy;
pub use crate::sanitize::sanitize_name;
