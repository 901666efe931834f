//! Module keys (which domain entity a component is bound to)

use std::str::FromStr;

/// Identifies the domain module a table, form or client call targets.
///
/// The path segment doubles as the REST prefix (`/{module}/page`,
/// `/{module}/save`, ...).
///
/// # Examples
///
/// ```
/// use soundcms_lib::model::ModuleKey;
///
/// let module: ModuleKey = "sound".parse().unwrap();
/// assert_eq!(module, ModuleKey::Sound);
/// assert_eq!(module.path(), "sound");
///
/// let custom = ModuleKey::custom("banner");
/// assert_eq!(custom.path(), "banner");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModuleKey {
    Sound,
    Music,
    Playlist,
    Category,
    Resource,
    Plan,
    /// Any module the backend exposes that has no dedicated variant.
    Custom(String),
}

impl ModuleKey {
    /// Creates a module key from an arbitrary path segment.
    pub fn custom(path: impl Into<String>) -> Self {
        let path = path.into();
        path.parse().unwrap_or(Self::Custom(path))
    }

    /// Returns the REST path segment for this module.
    pub fn path(&self) -> &str {
        match self {
            Self::Sound => "sound",
            Self::Music => "music",
            Self::Playlist => "playlist",
            Self::Category => "category",
            Self::Resource => "resource",
            Self::Plan => "plan",
            Self::Custom(path) => path,
        }
    }

    /// Returns every built-in module.
    pub fn builtin() -> [ModuleKey; 6] {
        [
            Self::Sound,
            Self::Music,
            Self::Playlist,
            Self::Category,
            Self::Resource,
            Self::Plan,
        ]
    }
}

impl FromStr for ModuleKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.trim().to_ascii_lowercase().as_str() {
            "sound" | "sounds" => Self::Sound,
            "music" | "musics" => Self::Music,
            "playlist" | "playlists" => Self::Playlist,
            "category" | "categories" => Self::Category,
            "resource" | "resources" => Self::Resource,
            "plan" | "plans" => Self::Plan,
            other => Self::Custom(other.to_string()),
        };
        Ok(key)
    }
}

impl std::fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
