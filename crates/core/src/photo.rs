//! Photo naming rules.
//!
//! Uploaded photos are stored under a per-kind prefix with a filename
//! derived from the content hash, so re-uploading identical bytes lands on
//! the same object and filenames never collide or leak client input.

use sha2::{Digest, Sha256};

/// Which entity a photo belongs to. One photo per owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoKind {
    Organization,
    Customer,
    Product,
}

impl PhotoKind {
    /// Storage prefix segment for this kind.
    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::Organization => "organizations",
            Self::Customer => "customers",
            Self::Product => "products",
        }
    }
}

/// A stored photo's derived naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoName {
    /// Content-hash filename, including the extension.
    pub file_name: String,
    /// Full object path under the storage root.
    pub path: String,
}

/// Derives the storage name for uploaded photo bytes.
///
/// The extension is taken from the client-supplied filename, lowercased;
/// files with no extension get none. The client filename itself is kept
/// only as display metadata by the caller.
#[must_use]
pub fn photo_name(kind: PhotoKind, original_name: &str, content: &[u8]) -> PhotoName {
    let digest = Sha256::digest(content);
    let hash = hex_encode(&digest);

    let file_name = match extension(original_name) {
        Some(ext) => format!("{hash}.{ext}"),
        None => hash,
    };
    let path = format!("photos/{}/{}", kind.segment(), file_name);

    PhotoName { file_name, path }
}

fn extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.contains('/') {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        // Writing to a String cannot fail.
        let _ = write!(out, "{byte:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_content_same_name() {
        let a = photo_name(PhotoKind::Customer, "portrait.PNG", b"bytes");
        let b = photo_name(PhotoKind::Customer, "other.png", b"bytes");
        assert_eq!(a, b);
        assert!(a.path.starts_with("photos/customers/"));
        assert!(a.file_name.ends_with(".png"));
    }

    #[test]
    fn test_different_content_different_name() {
        let a = photo_name(PhotoKind::Product, "logo.jpg", b"one");
        let b = photo_name(PhotoKind::Product, "logo.jpg", b"two");
        assert_ne!(a.file_name, b.file_name);
    }

    #[test]
    fn test_kind_selects_prefix() {
        let name = photo_name(PhotoKind::Organization, "logo.jpg", b"x");
        assert!(name.path.starts_with("photos/organizations/"));
    }

    #[test]
    fn test_no_extension_kept_bare() {
        let name = photo_name(PhotoKind::Customer, "README", b"x");
        assert!(!name.file_name.contains('.'));
    }

    #[test]
    fn test_hidden_file_has_no_extension() {
        let name = photo_name(PhotoKind::Customer, ".gitignore", b"x");
        assert!(!name.file_name.contains('.'));
    }

    #[test]
    fn test_hash_is_hex_sha256() {
        let name = photo_name(PhotoKind::Customer, "a.png", b"");
        // sha256 of empty input
        assert!(name.file_name.starts_with("e3b0c44298fc1c149afbf4c8996fb924"));
    }
}
