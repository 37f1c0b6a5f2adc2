use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// The two media pools the service selects from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// Still image pool.
    Photo,
    /// Animated image pool.
    Gif,
}

impl MediaKind {
    /// Returns a stable lowercase name for the pool.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Gif => "gif",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.as_str())
    }
}

/// Outcome of a successful random pick: a file name taken from the pool
/// listing and the path it resolves to under the pool root.
///
/// The name always originates from the directory listing itself, never from
/// client input, so joining it onto the root cannot escape the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSelection {
    file_name: String,
    absolute_path: PathBuf,
}

impl MediaSelection {
    /// Builds a selection by resolving `file_name` against the pool root.
    #[must_use]
    pub fn new(pool_root: &Path, file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let absolute_path = pool_root.join(&file_name);
        Self {
            file_name,
            absolute_path,
        }
    }

    /// Name of the selected file, as it appeared in the pool listing.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    /// Full path of the selected file under the pool root.
    #[must_use]
    pub fn absolute_path(&self) -> &Path {
        self.absolute_path.as_path()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{MediaKind, MediaSelection};

    #[test]
    fn selection_joins_pool_root_and_name() {
        let selection = MediaSelection::new(Path::new("/srv/media/photos"), "a.png");
        assert_eq!(selection.file_name(), "a.png");
        assert_eq!(
            selection.absolute_path(),
            Path::new("/srv/media/photos/a.png")
        );
    }

    #[test]
    fn media_kind_names_are_stable() {
        assert_eq!(MediaKind::Photo.as_str(), "photo");
        assert_eq!(MediaKind::Gif.to_string(), "gif");
    }
}
