// File: variants.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use serde::Serialize;
use std::fmt;

/// Label used for the unmodified URL when it shows up in a finding.
pub const ORIGINAL_LABEL: &str = "original";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariantKind {
    TrailingSlash,
    TrailingNull,
    TrailingDot,
    DoubleSlash,
    Backslash,
    EncodedSlash,
    EncodedBackslash,
    DoubleEncodedSlash,
    TripleEncodedSlash,
}

impl VariantKind {
    pub const ALL: [VariantKind; 9] = [
        VariantKind::TrailingSlash,
        VariantKind::TrailingNull,
        VariantKind::TrailingDot,
        VariantKind::DoubleSlash,
        VariantKind::Backslash,
        VariantKind::EncodedSlash,
        VariantKind::EncodedBackslash,
        VariantKind::DoubleEncodedSlash,
        VariantKind::TripleEncodedSlash,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            VariantKind::TrailingSlash => "trailing-slash",
            VariantKind::TrailingNull => "trailing-null",
            VariantKind::TrailingDot => "trailing-dot",
            VariantKind::DoubleSlash => "double-slash",
            VariantKind::Backslash => "backslash",
            VariantKind::EncodedSlash => "encoded-slash",
            VariantKind::EncodedBackslash => "encoded-backslash",
            VariantKind::DoubleEncodedSlash => "double-encoded-slash",
            VariantKind::TripleEncodedSlash => "triple-encoded-slash",
        }
    }

    pub fn apply(&self, base: &str) -> String {
        match self {
            VariantKind::TrailingSlash => format!("{}/", base),
            VariantKind::TrailingNull => format!("{}%00", base),
            VariantKind::TrailingDot => format!("{}/.", base),
            VariantKind::DoubleSlash => format!("{}//", base),
            VariantKind::Backslash => base.replace('/', "\\"),
            VariantKind::EncodedSlash => base.replace('/', "%2f"),
            VariantKind::EncodedBackslash => base.replace('/', "%5c"),
            VariantKind::DoubleEncodedSlash => base.replace('/', "%252f"),
            VariantKind::TripleEncodedSlash => base.replace('/', "%25252f"),
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub kind: VariantKind,
    pub url: String,
}

impl Variant {
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

/// Mutated forms of `base`, in `VariantKind::ALL` order. Mutations that
/// leave the string unchanged are dropped.
pub fn generate_variants(base: &str) -> Vec<Variant> {
    VariantKind::ALL
        .iter()
        .map(|kind| Variant {
            kind: *kind,
            url: kind.apply(base),
        })
        .filter(|variant| variant.url != base)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[test]
    fn test_nine_variants_for_url_with_slash() {
        let base = "http://example.com/admin";
        let variants = generate_variants(base);

        assert_eq!(variants.len(), 9);
        let labels: HashSet<_> = variants.iter().map(|v| v.label()).collect();
        assert_eq!(labels.len(), 9);
        assert!(variants.iter().all(|v| v.url != base));
        assert!(!labels.contains(ORIGINAL_LABEL));
    }

    #[rstest]
    #[case(VariantKind::TrailingSlash, "http://example.com/admin/")]
    #[case(VariantKind::TrailingNull, "http://example.com/admin%00")]
    #[case(VariantKind::TrailingDot, "http://example.com/admin/.")]
    #[case(VariantKind::DoubleSlash, "http://example.com/admin//")]
    #[case(VariantKind::Backslash, "http:\\\\example.com\\admin")]
    #[case(VariantKind::EncodedSlash, "http:%2f%2fexample.com%2fadmin")]
    #[case(VariantKind::EncodedBackslash, "http:%5c%5cexample.com%5cadmin")]
    #[case(VariantKind::DoubleEncodedSlash, "http:%252f%252fexample.com%252fadmin")]
    #[case(
        VariantKind::TripleEncodedSlash,
        "http:%25252f%25252fexample.com%25252fadmin"
    )]
    fn test_variant_transformations(#[case] kind: VariantKind, #[case] expected: &str) {
        assert_eq!(kind.apply("http://example.com/admin"), expected);
    }

    #[test]
    fn test_replacement_variants_skipped_without_slash() {
        let variants = generate_variants("example.com");
        let kinds: Vec<_> = variants.iter().map(|v| v.kind).collect();

        assert_eq!(
            kinds,
            vec![
                VariantKind::TrailingSlash,
                VariantKind::TrailingNull,
                VariantKind::TrailingDot,
                VariantKind::DoubleSlash,
            ]
        );
    }

    #[test]
    fn test_backslash_differs_iff_slash_present() {
        for base in ["a/b", "/", "no-slash", "", "http://h/x"] {
            let changed = VariantKind::Backslash.apply(base) != base;
            assert_eq!(changed, base.contains('/'), "base {:?}", base);
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let base = "https://target.test/api/v1/users";
        assert_eq!(generate_variants(base), generate_variants(base));
    }

    #[test]
    fn test_labels_match_display() {
        for kind in VariantKind::ALL {
            assert_eq!(kind.to_string(), kind.label());
        }
        assert_eq!(
            serde_json::to_string(&VariantKind::DoubleEncodedSlash).unwrap(),
            "\"double-encoded-slash\""
        );
    }
}
