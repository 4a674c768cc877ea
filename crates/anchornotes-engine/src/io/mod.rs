use crate::format::StyledText;
use crate::markdown::MarkdownSerializer;
use crate::models::NoteFile;
use log::debug;
use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid notes directory: {0}")]
    InvalidNotesDir(String),
}

/// Read a note file's raw markdown
pub fn read_file(relative_path: &RelativePath, notes_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(notes_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    Ok(fs::read_to_string(&absolute_path)?)
}

/// Write raw markdown to a note file, creating parent folders
pub fn write_file(
    relative_path: &RelativePath,
    notes_root: &Path,
    content: &str,
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(notes_root);
    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(fs::write(&absolute_path, content)?)
}

/// Load a note into a styled buffer
pub fn read_note(relative_path: &RelativePath, notes_root: &Path) -> Result<StyledText, IoError> {
    read_note_with(&MarkdownSerializer::new(), relative_path, notes_root)
}

pub fn read_note_with(
    serializer: &MarkdownSerializer,
    relative_path: &RelativePath,
    notes_root: &Path,
) -> Result<StyledText, IoError> {
    let markdown = read_file(relative_path, notes_root)?;
    Ok(serializer.deserialize(&markdown))
}

/// Store a styled buffer as a note
pub fn write_note(
    relative_path: &RelativePath,
    notes_root: &Path,
    buffer: &StyledText,
) -> Result<(), IoError> {
    write_note_with(&MarkdownSerializer::new(), relative_path, notes_root, buffer)
}

pub fn write_note_with(
    serializer: &MarkdownSerializer,
    relative_path: &RelativePath,
    notes_root: &Path,
    buffer: &StyledText,
) -> Result<(), IoError> {
    write_file(relative_path, notes_root, &serializer.serialize(buffer))
}

/// Find every `.md` note below the notes folder, sorted by path
pub fn scan_notes(notes_root: &Path) -> Result<Vec<NoteFile>, IoError> {
    validate_notes_dir(notes_root)?;

    let mut files = Vec::new();
    scan_directory_recursive(notes_root, &mut files)?;

    let mut notes: Vec<NoteFile> = files
        .iter()
        .filter_map(|path| {
            let relative = path.strip_prefix(notes_root).ok()?;
            match RelativePathBuf::from_path(relative) {
                Ok(relative) => Some(NoteFile::new(relative)),
                Err(err) => {
                    debug!("skipping {}: {err}", path.display());
                    None
                }
            }
        })
        .collect();
    notes.sort();
    Ok(notes)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == "md"
        {
            files.push(path);
        }
    }

    Ok(())
}

pub fn validate_notes_dir(path: &Path) -> Result<(), IoError> {
    if !path.is_dir() {
        return Err(IoError::InvalidNotesDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{FormatKind, FormatSpan};
    use crate::tests::{create_test_file, create_test_notes_dir};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scan_finds_nested_notes_sorted() {
        let notes_dir = create_test_notes_dir();
        create_test_file(&notes_dir, "b.md", "**b**");
        create_test_file(&notes_dir, "a.md", "a");
        create_test_file(&notes_dir, "journal/today.md", "<big>today</big>");

        let notes = scan_notes(notes_dir.path()).unwrap();

        let paths: Vec<&str> = notes.iter().map(|n| n.relative_path().as_str()).collect();
        assert_eq!(paths, vec!["a.md", "b.md", "journal/today.md"]);
    }

    #[test]
    fn test_scan_ignores_other_files() {
        let notes_dir = create_test_notes_dir();
        create_test_file(&notes_dir, "note.md", "# Note");
        create_test_file(&notes_dir, "image.png", "fake image data");
        create_test_file(&notes_dir, "config.json", "{}");

        let notes = scan_notes(notes_dir.path()).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title(), "note");
    }

    #[test]
    fn test_scan_missing_directory() {
        let result = scan_notes(Path::new("/this/path/does/not/exist"));
        assert!(matches!(result, Err(IoError::InvalidNotesDir(_))));
    }

    #[test]
    fn test_validate_rejects_plain_file() {
        let notes_dir = create_test_notes_dir();
        let file = create_test_file(&notes_dir, "note.md", "");
        assert!(validate_notes_dir(notes_dir.path()).is_ok());
        assert!(matches!(
            validate_notes_dir(&file),
            Err(IoError::InvalidNotesDir(_))
        ));
    }

    #[test]
    fn test_read_note_deserializes() {
        let notes_dir = create_test_notes_dir();
        create_test_file(&notes_dir, "note.md", "**Hello** <small>World</small>");

        let buffer = read_note(RelativePath::new("note.md"), notes_dir.path()).unwrap();
        assert_eq!(buffer.text(), "Hello World");
        assert_eq!(
            buffer.sorted_spans(),
            vec![
                FormatSpan::new(0, 5, FormatKind::Bold),
                FormatSpan::new(6, 11, FormatKind::Small),
            ]
        );
    }

    #[test]
    fn test_read_note_not_found() {
        let notes_dir = create_test_notes_dir();
        let result = read_note(RelativePath::new("missing.md"), notes_dir.path());
        assert!(matches!(result, Err(IoError::NotFound(_))));
    }

    #[test]
    fn test_write_note_creates_folders_and_serializes() {
        let notes_dir = create_test_notes_dir();
        let mut buffer = StyledText::from_text("Hello World");
        buffer
            .add_span(FormatSpan::new(6, 11, FormatKind::Italic))
            .unwrap();

        let path = RelativePath::new("folder/sub/note.md");
        write_note(path, notes_dir.path(), &buffer).unwrap();

        assert_eq!(
            read_file(path, notes_dir.path()).unwrap(),
            "Hello *World*"
        );
        assert_eq!(read_note(path, notes_dir.path()).unwrap(), buffer);
    }

    #[test]
    fn test_write_overwrites_existing() {
        let notes_dir = create_test_notes_dir();
        create_test_file(&notes_dir, "existing.md", "# Original");

        let path = RelativePath::new("existing.md");
        write_file(path, notes_dir.path(), "# Updated").unwrap();
        assert_eq!(read_file(path, notes_dir.path()).unwrap(), "# Updated");
    }
}
