//! Flat-file catalog persistence.
//!
//! Each book is stored as five consecutive lines: id, title, author, issued
//! flag (`0`/`1`) and borrower name. There is no header and no escaping, so a
//! newline inside a title or author corrupts the following records.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tempfile::Builder;
use thiserror::Error;
use tracing::{info, warn};

use crate::{catalog::Catalog, models::Book};

/// Default backing file, resolved against the working directory.
pub const DEFAULT_CATALOG_FILE: &str = "librarybooks.txt";

/// Record-level parse failure, with a 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The id line did not hold an integer.
    #[error("line {line}: invalid book id {value:?}")]
    InvalidId {
        /// Offending line.
        line: usize,
        /// Raw line content.
        value: String,
    },
    /// The issued flag was neither `0` nor `1`.
    #[error("line {line}: invalid issued flag {value:?}")]
    InvalidFlag {
        /// Offending line.
        line: usize,
        /// Raw line content.
        value: String,
    },
    /// Input ended part-way through a record.
    #[error("line {line}: record truncated, missing {field}")]
    Truncated {
        /// Line where the missing field was expected.
        line: usize,
        /// Name of the missing field.
        field: &'static str,
    },
}

/// Books recovered from a backing file.
#[derive(Debug, Default)]
pub struct ParsedRecords {
    /// Records parsed before any error, in file order.
    pub books: Vec<Book>,
    /// The error that stopped parsing, if any.
    pub error: Option<RecordError>,
}

/// Parse the five-line record format.
///
/// Parsing stops at the first malformed record; everything before it is kept.
/// Blank lines where an id is expected are skipped, and a final record whose
/// borrower line is missing is accepted with an empty borrower. `\r\n` line
/// endings are accepted.
pub fn parse_records(content: &str) -> ParsedRecords {
    let mut parsed = ParsedRecords::default();
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line));

    while let Some((id_line, raw_id)) = lines.find(|(_, line)| !line.trim().is_empty()) {
        match parse_record(id_line, raw_id, &mut lines) {
            Ok(book) => parsed.books.push(book),
            Err(err) => {
                parsed.error = Some(err);
                break;
            }
        }
    }

    parsed
}

fn parse_record<'a>(
    id_line: usize,
    raw_id: &str,
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
) -> Result<Book, RecordError> {
    let id = raw_id
        .trim()
        .parse::<i64>()
        .map_err(|_| RecordError::InvalidId {
            line: id_line,
            value: raw_id.to_string(),
        })?;

    let mut next_field = |field: &'static str, offset: usize| {
        lines
            .next()
            .map(|(_, line)| line.to_string())
            .ok_or(RecordError::Truncated {
                line: id_line + offset,
                field,
            })
    };

    let title = next_field("title", 1)?;
    let author = next_field("author", 2)?;
    let flag = next_field("issued flag", 3)?;
    let is_issued = match flag.trim() {
        "0" => false,
        "1" => true,
        _ => {
            return Err(RecordError::InvalidFlag {
                line: id_line + 3,
                value: flag,
            })
        }
    };
    let issued_to = next_field("borrower", 4).unwrap_or_default();

    Ok(Book {
        id,
        title,
        author,
        is_issued,
        issued_to,
    })
}

/// Serialize books in order using the five-line record format.
pub fn write_records<'a, W: Write>(
    mut writer: W,
    books: impl IntoIterator<Item = &'a Book>,
) -> io::Result<()> {
    for book in books {
        writeln!(writer, "{}", book.id)?;
        writeln!(writer, "{}", book.title)?;
        writeln!(writer, "{}", book.author)?;
        writeln!(writer, "{}", u8::from(book.is_issued))?;
        writeln!(writer, "{}", book.issued_to)?;
    }
    writer.flush()
}

/// Loads and writes the catalog backing file.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    /// Create a store for the given backing file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the backing file, returning an empty catalog when it is absent.
    ///
    /// Malformed trailing content is logged and dropped. Other I/O failures
    /// are returned to the caller.
    pub fn load(&self) -> Result<Catalog> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("no catalog at {}; starting empty", self.path.display());
                return Ok(Catalog::new());
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read {}", self.path.display()))
            }
        };

        let parsed = parse_records(&content);
        if let Some(err) = &parsed.error {
            warn!(
                "stopped reading {} after {} books: {err}",
                self.path.display(),
                parsed.books.len()
            );
        }
        info!(
            "loaded {} books from {}",
            parsed.books.len(),
            self.path.display()
        );
        Ok(Catalog::from_books(parsed.books))
    }

    /// Like [`CatalogStore::load`], but any failure yields an empty catalog.
    pub fn load_or_empty(&self) -> Catalog {
        self.load().unwrap_or_else(|err| {
            warn!("failed to load catalog: {err:#}");
            Catalog::new()
        })
    }

    /// Overwrite the backing file with every book in catalog order.
    ///
    /// The records are written to a sibling temporary file first and then
    /// renamed into place. An existing file keeps its permissions; a new one
    /// gets the usual umask-filtered `0666`.
    pub fn save(&self, catalog: &Catalog) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        let existing = fs::metadata(&self.path).ok().map(|meta| meta.permissions());
        let mut staged = staging_builder()
            .tempfile_in(&dir)
            .with_context(|| format!("failed to stage catalog in {}", dir.display()))?;
        // Keep the mode of the file being replaced.
        if let Some(permissions) = existing {
            staged.as_file().set_permissions(permissions).with_context(|| {
                format!("failed to set permissions on {}", self.path.display())
            })?;
        }
        write_records(io::BufWriter::new(staged.as_file_mut()), catalog.iter())
            .context("failed to serialize catalog")?;
        staged
            .persist(&self.path)
            .with_context(|| format!("failed to write {}", self.path.display()))?;

        info!("saved {} books to {}", catalog.len(), self.path.display());
        Ok(())
    }
}

#[cfg(unix)]
fn staging_builder() -> Builder<'static, 'static> {
    use std::os::unix::fs::PermissionsExt;

    let mut builder = Builder::new();
    builder.permissions(fs::Permissions::from_mode(0o666));
    builder
}

#[cfg(not(unix))]
fn staging_builder() -> Builder<'static, 'static> {
    Builder::new()
}
