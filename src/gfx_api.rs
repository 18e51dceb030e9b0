//! The boundary towards the graphics backend.

use {
    crate::{ifs::wl_buffer::WlBuffer, rect::Region, utils::numcell::NumCell},
    std::rc::Rc,
    thiserror::Error,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TextureHandle(pub u64);

/// A buffer whose contents were committed to a surface.
pub struct BufferUpload<'a> {
    pub buffer: &'a Rc<WlBuffer>,
    /// Buffer-space damage of this commit.
    pub damage: &'a Region,
    /// The texture currently backing the surface, if the same buffer was
    /// committed before.
    pub previous: Option<TextureHandle>,
}

#[derive(Debug, Error)]
pub enum BufferImportError {
    #[error("The buffer format is not supported")]
    UnsupportedFormat,
    #[error("The buffer has no storage")]
    NoStorage,
    #[error("{0}")]
    Backend(String),
}

pub trait BufferImporter {
    /// Called once for every committed attach of a buffer.
    fn try_import(&self, upload: &BufferUpload<'_>) -> Result<TextureHandle, BufferImportError>;
}

/// Accepts every buffer.
#[derive(Default)]
pub struct NullImporter {
    next: NumCell<u64>,
}

impl BufferImporter for NullImporter {
    fn try_import(&self, upload: &BufferUpload<'_>) -> Result<TextureHandle, BufferImportError> {
        if let Some(prev) = upload.previous {
            return Ok(prev);
        }
        Ok(TextureHandle(self.next.add_fetch(1)))
    }
}
