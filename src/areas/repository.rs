use crate::artifacts::objects::object_id::ObjectId;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path).canonicalize()?;

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    /// Directory holding this repository's packfiles
    pub fn pack_dir(&self) -> PathBuf {
        self.path.join(".git").join("objects").join("pack")
    }

    /// Resolve a pack named by content hash, file name, or path
    ///
    /// A 40-hex argument names `pack-<hash>.pack` in the repository's pack
    /// directory; an argument ending in `.pack` is taken as a path
    /// (relative to the repository); anything else is a bare file name in
    /// the pack directory.
    pub fn find_pack(&self, name: &str) -> anyhow::Result<PathBuf> {
        let candidate = if ObjectId::try_parse(name.to_string()).is_ok() {
            self.pack_dir().join(format!("pack-{name}.pack"))
        } else if name.ends_with(".pack") {
            let path = Path::new(name);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                self.path.join(path)
            }
        } else {
            self.pack_dir().join(format!("{name}.pack"))
        };

        if !candidate.is_file() {
            return Err(anyhow::anyhow!("Pack not found: {}", candidate.display()));
        }

        Ok(candidate)
    }
}
