use relative_path::{RelativePath, RelativePathBuf};

/// A note on disk, addressed relative to the notes folder.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NoteFile {
    relative_path: RelativePathBuf,
    title: String,
}

impl NoteFile {
    pub fn new(relative_path: RelativePathBuf) -> Self {
        let title = Self::title_of(&relative_path);
        Self {
            relative_path,
            title,
        }
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    /// File name without the `.md` extension.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Folder the note lives in, `None` at the top level.
    pub fn folder(&self) -> Option<&RelativePath> {
        self.relative_path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
    }

    fn title_of(path: &RelativePath) -> String {
        path.file_name()
            .map(|name| name.strip_suffix(".md").unwrap_or(name))
            .unwrap_or("Untitled")
            .to_string()
    }
}

impl From<&str> for NoteFile {
    fn from(path: &str) -> Self {
        Self::new(RelativePathBuf::from(path))
    }
}
