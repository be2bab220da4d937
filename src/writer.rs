use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::GroupdocResult;
use crate::export::ArtifactKind;
use crate::store::SessionId;

/// Identifies one artifact: the group key plus, for session uploads, the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactTarget {
    pub group_key: String,
    pub session: Option<SessionId>,
}

impl ArtifactTarget {
    pub fn new(group_key: impl Into<String>, session: Option<SessionId>) -> Self {
        Self {
            group_key: group_key.into(),
            session,
        }
    }

    /// File name for the given kind, e.g. `A1.pdf` or `<session>_A1.pdf`
    pub fn file_name(&self, kind: ArtifactKind) -> String {
        let key = sanitize_file_stem(&self.group_key);
        match &self.session {
            Some(session) => format!("{}_{}.{}", session, key, kind.extension()),
            None => format!("{}.{}", key, kind.extension()),
        }
    }
}

/// Writes artifacts into one flat output directory, overwriting older files
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    output_dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn path_for(&self, kind: ArtifactKind, target: &ArtifactTarget) -> PathBuf {
        self.output_dir.join(target.file_name(kind))
    }

    pub fn write(
        &self,
        kind: ArtifactKind,
        target: &ArtifactTarget,
        bytes: &[u8],
    ) -> GroupdocResult<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.path_for(kind, target);
        fs::write(&path, bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "wrote artifact");
        Ok(path)
    }

    /// Read back a previously written artifact
    pub fn read(&self, kind: ArtifactKind, target: &ArtifactTarget) -> GroupdocResult<Vec<u8>> {
        Ok(fs::read(self.path_for(kind, target))?)
    }
}

/// Keep `[A-Za-z0-9._-]` and percent-encode every other byte, so distinct
/// keys never share a file. A leading dot is encoded too; the empty key
/// becomes `%`.
pub fn sanitize_file_stem(key: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    if key.is_empty() {
        return "%".to_string();
    }
    let mut out = String::with_capacity(key.len() * 3);
    for (i, b) in key.bytes().enumerate() {
        match b {
            b'.' if i == 0 => out.push_str("%2E"),
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'-' => out.push(b as char),
            _ => {
                out.push('%');
                out.push(char::from(HEX[(b >> 4) as usize]));
                out.push(char::from(HEX[(b & 0x0F) as usize]));
            }
        }
    }
    out
}
