use regex::Regex;
use std::sync::LazyLock;

/// Sidecar descriptor carrying the human-readable wallpaper title.
pub(crate) const DESCRIPTOR_FILE: &str = "project.json";
/// Marker file identifying a packed scene archive.
pub(crate) const ARCHIVE_FILE: &str = "scene.pkg";
/// Prefix for numbered shard directories under the output root.
pub(crate) const SHARD_PREFIX: &str = "output";
/// Shard subdirectory for folders containing video media.
pub(crate) const VIDEO_DIR: &str = "mp4";
/// Shard subdirectory for items reduced to a single representative file.
pub(crate) const SELECTED_DIR: &str = "selected";
/// Shard subdirectory for multi-file folders kept intact.
pub(crate) const GROUP_DIR: &str = "group";
/// Base name (case-folded) reserved for the canonical preview image.
pub(crate) const PRESERVED_STEM: &str = "preview";
/// Extensions that force the video classification.
pub(crate) const VIDEO_EXTENSIONS: [&str; 2] = ["mp4", "gif"];

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Characters forbidden in folder names on common filesystems, replaced
// rather than removed so adjacent words stay separated.
regex!(ILLEGAL_CHARS, r#"[\\/:*?"<>|&]"#);
regex!(CONTROL_CHARS, r"[\x00-\x1F]");
regex!(WHITESPACE, r"\s+");
