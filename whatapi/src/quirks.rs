//! Corrections for known upstream JSON bugs.
//!
//! Some endpoints occasionally emit a value of the wrong JSON type in one
//! specific field. The dispatcher first decodes the body as-is; only if that
//! fails, and a [`Quirk`] is registered for the target type, it rewrites the
//! offending fragment and decodes once more.
//!
//! | Target                                      | Fragment                  | Rewritten to             |
//! |---------------------------------------------|---------------------------|--------------------------|
//! | [`ApiResponse<Artist>`](crate::types::Artist)         | `"extendedArtists":false` | `"extendedArtists":{}` |
//! | [`ApiResponse<TopTenTorrents>`](crate::types::TopTenTorrents) | `"artist":false` | `"artist":""`          |

use crate::types::{ApiResponse, Artist, TopTenTorrents};
use std::any::TypeId;
use std::collections::HashMap;

/// A literal fragment replacement applied to the raw response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quirk {
    pub from: &'static str,
    pub to: &'static str,
}

impl Quirk {
    pub const EXTENDED_ARTISTS: Self = Self {
        from: r#""extendedArtists":false"#,
        to: r#""extendedArtists":{}"#,
    };

    pub const TOP_TEN_ARTIST: Self = Self {
        from: r#""artist":false"#,
        to: r#""artist":"""#,
    };

    /// Replace every occurrence of `from` in `body` with `to`.
    pub fn apply(&self, body: &[u8]) -> Vec<u8> {
        let from = self.from.as_bytes();
        let mut out = Vec::with_capacity(body.len());
        let mut rest = body;
        while let Some(pos) = rest.windows(from.len()).position(|w| w == from) {
            out.extend_from_slice(&rest[..pos]);
            out.extend_from_slice(self.to.as_bytes());
            rest = &rest[pos + from.len()..];
        }
        out.extend_from_slice(rest);
        out
    }
}

/// Decode target → correction hook.
#[derive(Debug, Clone)]
pub struct QuirkRegistry {
    hooks: HashMap<TypeId, Quirk>,
}

impl QuirkRegistry {
    /// Registry with no corrections at all.
    pub fn empty() -> Self {
        Self {
            hooks: HashMap::new(),
        }
    }

    /// Attach `quirk` to decode target `T`, replacing any previous hook.
    pub fn register<T: 'static>(&mut self, quirk: Quirk) {
        self.hooks.insert(TypeId::of::<T>(), quirk);
    }

    pub fn get<T: 'static>(&self) -> Option<Quirk> {
        self.hooks.get(&TypeId::of::<T>()).copied()
    }
}

impl Default for QuirkRegistry {
    /// The two known tracker bugs.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register::<ApiResponse<Artist>>(Quirk::EXTENDED_ARTISTS);
        registry.register::<ApiResponse<TopTenTorrents>>(Quirk::TOP_TEN_ARTIST);
        registry
    }
}
