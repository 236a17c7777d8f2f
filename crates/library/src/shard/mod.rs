//! Shard allocation and terminal classification.
//!
//! After the materialize/filter pass, every surviving output folder is read
//! back off disk and assigned exactly one terminal classification:
//!
//! - **video** — the folder contains `.mp4`/`.gif` media and is moved, as a
//!   folder, under the shard's `mp4` subdirectory;
//! - **selected** — the folder boiled down to a single file, which is
//!   renamed after the folder and moved into the shard's `selected`
//!   subdirectory;
//! - **group** — two or more files remain and the folder is moved intact
//!   under the shard's `group` subdirectory.
//!
//! Shard directories (`output<N>`) are fixed-capacity containers; the
//! [`ShardAllocator`] advances exactly once per folder regardless of which
//! branch fired, so capacity is respected folder-for-folder. The pass is
//! strictly sequential: each step mutates shared shard-directory state.

mod allocator;
mod folder;
mod stream;

pub use self::allocator::{ShardAllocator, ShardSlot};
pub use self::folder::Terminal;
pub use self::stream::{ClassifyEvent, classify};
