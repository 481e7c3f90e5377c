use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use log::{info, warn};
use thiserror::Error;

use crate::session::Identity;
use crate::store::{KEY_PROFILE, Store};

const PNG_SIGNATURE : [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Please choose a PNG image.")]
    NotPng,

    #[error("Couldn't read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub fn is_png(bytes: &[u8]) -> bool {
    bytes.starts_with(&PNG_SIGNATURE)
}

/// Replaces the cached image for `identity` wholesale.
pub fn save_profile_image(store: &mut Store, identity: &Identity, bytes: &[u8]) -> Result<(), ProfileError> {
    if !is_png(bytes) {
        return Err(ProfileError::NotPng);
    }
    store.set(identity.namespace(), KEY_PROFILE, STANDARD.encode(bytes));
    info!("Cached a {} byte profile image for {}", bytes.len(), identity);
    Ok(())
}

pub fn load_profile_image(store: &Store, identity: &Identity) -> Option<Vec<u8>> {
    let encoded = store.get(identity.namespace(), KEY_PROFILE)?;
    match STANDARD.decode(encoded.trim()) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!("Ignoring undecodable profile image for {}: {}", identity, e);
            None
        }
    }
}

pub fn upload_from_path(store: &mut Store, identity: &Identity, path: &Path) -> Result<(), ProfileError> {
    let bytes = std::fs::read(path)
        .map_err(|source| ProfileError::Io { path: path.to_path_buf(), source })?;
    save_profile_image(store, identity, &bytes)
}

pub fn pick_image_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Choose a profile image")
        .add_filter("PNG image", &["png"])
        .pick_file()
}

/// Image bytes plus a URI that changes whenever the bytes do, so the
/// image loader never serves a stale texture.
#[derive(Debug, Clone)]
pub struct Avatar {
    pub uri: String,
    pub bytes: Arc<[u8]>,
}

impl Avatar {
    pub fn load(store: &Store, identity: &Identity, revision: u64) -> Option<Self> {
        let bytes = load_profile_image(store, identity)?;
        Some(Self {
            uri: format!("bytes://profile_{}_{}.png", identity, revision),
            bytes: Arc::from(bytes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FileBackend, Namespace};

    fn png_bytes() -> Vec<u8> {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 13, b'I', b'H', b'D', b'R', 1, 2, 3, 255, 0]);
        bytes
    }

    fn steve() -> Identity {
        Identity::parse("Steve").unwrap()
    }

    #[test]
    fn rejects_non_png() {
        let mut store = Store::in_memory();
        let err = save_profile_image(&mut store, &steve(), b"GIF89a....").unwrap_err();
        assert!(matches!(err, ProfileError::NotPng));
        assert_eq!(load_profile_image(&store, &steve()), None);
    }

    #[test]
    fn round_trip_survives_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = Store::new(Box::new(FileBackend::open(dir.path())));
            save_profile_image(&mut store, &steve(), &png_bytes()).unwrap();
        }
        let store = Store::new(Box::new(FileBackend::open(dir.path())));
        assert_eq!(load_profile_image(&store, &steve()), Some(png_bytes()));
    }

    #[test]
    fn upload_overwrites_wholesale() {
        let mut store = Store::in_memory();
        let mut second = png_bytes();
        second.truncate(10);
        save_profile_image(&mut store, &steve(), &png_bytes()).unwrap();
        save_profile_image(&mut store, &steve(), &second).unwrap();
        assert_eq!(load_profile_image(&store, &steve()), Some(second));
    }

    #[test]
    fn images_are_per_identity() {
        let mut store = Store::in_memory();
        save_profile_image(&mut store, &steve(), &png_bytes()).unwrap();
        let alex = Identity::parse("Alex").unwrap();
        assert_eq!(load_profile_image(&store, &alex), None);
        assert!(store.get(Namespace::Identity("Steve"), KEY_PROFILE).is_some());
    }

    #[test]
    fn upload_from_missing_path_reports_io() {
        let mut store = Store::in_memory();
        let err = upload_from_path(&mut store, &steve(), Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, ProfileError::Io { .. }));
    }

    #[test]
    fn avatar_uri_tracks_revision() {
        let mut store = Store::in_memory();
        save_profile_image(&mut store, &steve(), &png_bytes()).unwrap();
        let a = Avatar::load(&store, &steve(), 1).unwrap();
        let b = Avatar::load(&store, &steve(), 2).unwrap();
        assert_ne!(a.uri, b.uri);
        assert_eq!(&*a.bytes, png_bytes().as_slice());
    }
}
