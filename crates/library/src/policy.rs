//! Media retention policies.

use crate::sanitize::MAX_NAME_LEN;
use serde::{Deserialize, Serialize};

/// File names dropped outright under the strict policy, regardless of size.
/// These are engine textures that look like media but never are.
const EXCLUDED_NAMES: [&str; 1] = ["waterripplenormal.png"];
/// Substring markers identifying auxiliary textures (case-folded match).
const EXCLUDED_MARKERS: [&str; 1] = ["_mask_"];

/// The rule set deciding which media files survive filtering.
///
/// Two recognized configurations exist. [`Simple`](RetentionPolicy::Simple)
/// is the original image-only rule set; [`Strict`](RetentionPolicy::Strict)
/// supersedes it and is the default: it admits video media, drops known
/// texture junk, lowers the size threshold, and reserves `preview` files
/// for the downstream classification pass.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RetentionPolicy {
    /// Large stills survive, everything else goes.
    Simple,
    /// Stills and videos above a small threshold survive; `preview` files
    /// are left untouched for the classifier.
    #[default]
    Strict,
}

impl RetentionPolicy {
    /// Whether `ext` (case-folded, no leading dot) is in this policy's
    /// accepted media set.
    pub(crate) fn is_media(&self, ext: &str) -> bool {
        match self {
            Self::Simple => matches!(ext, "png" | "jpg" | "jpeg"),
            Self::Strict => matches!(ext, "png" | "jpg" | "jpeg" | "mp4" | "gif"),
        }
    }

    /// Minimum size a media file must *exceed* to be retained.
    ///
    /// Discriminates thumbnail-quality assets from full-resolution media
    /// without inspecting pixel data.
    pub(crate) fn min_size_bytes(&self) -> u64 {
        match self {
            Self::Simple => 500 * 1024,
            Self::Strict => 20 * 1024,
        }
    }

    /// Length cap applied to sanitized folder names.
    pub(crate) fn name_cap(&self) -> Option<usize> {
        match self {
            Self::Simple => None,
            Self::Strict => Some(MAX_NAME_LEN),
        }
    }

    /// Whether files with the reserved `preview` base name are left in
    /// place untouched.
    pub(crate) fn preserves_preview(&self) -> bool {
        matches!(self, Self::Strict)
    }

    /// Whether `name` is on this policy's exclusion lists. The fixed name
    /// set matches exactly; the substring markers match case-insensitively.
    pub(crate) fn excludes(&self, name: &str) -> bool {
        match self {
            Self::Simple => false,
            Self::Strict => {
                let lowered = name.to_lowercase();
                EXCLUDED_NAMES.contains(&name) || EXCLUDED_MARKERS.iter().any(|m| lowered.contains(m))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(RetentionPolicy::Simple, "png", true)]
    #[case(RetentionPolicy::Simple, "JPG", false)] // caller folds case first
    #[case(RetentionPolicy::Simple, "mp4", false)]
    #[case(RetentionPolicy::Simple, "gif", false)]
    #[case(RetentionPolicy::Strict, "mp4", true)]
    #[case(RetentionPolicy::Strict, "gif", true)]
    #[case(RetentionPolicy::Strict, "txt", false)]
    fn media_sets(#[case] policy: RetentionPolicy, #[case] ext: &str, #[case] expected: bool) {
        assert_eq!(policy.is_media(ext), expected);
    }

    #[rstest]
    #[case("waterripplenormal.png", true)]
    #[case("city_MASK_layer.png", true)]
    #[case("city.png", false)]
    fn strict_exclusions(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(RetentionPolicy::Strict.excludes(name), expected);
        assert!(!RetentionPolicy::Simple.excludes(name));
    }

    #[test]
    fn thresholds() {
        assert_eq!(RetentionPolicy::Simple.min_size_bytes(), 512_000);
        assert_eq!(RetentionPolicy::Strict.min_size_bytes(), 20_480);
    }
}
