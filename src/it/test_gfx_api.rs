use {
    crate::{
        gfx_api::{BufferImportError, BufferImporter, BufferUpload, TextureHandle},
        rect::Region,
        utils::numcell::NumCell,
        wire::WlBufferId,
    },
    std::{
        cell::{Cell, RefCell},
        rc::Rc,
    },
};

/// An importer that records every upload and can be told to reject buffers.
#[derive(Default)]
pub struct TestImporter {
    next: NumCell<u64>,
    pub reject: Cell<bool>,
    pub uploads: RefCell<Vec<TestUpload>>,
}

#[derive(Clone)]
pub struct TestUpload {
    pub buffer: WlBufferId,
    pub damage: Rc<Region>,
    pub reused: bool,
}

impl TestImporter {
    pub fn num_uploads(&self) -> usize {
        self.uploads.borrow().len()
    }

    pub fn last_upload(&self) -> Option<TestUpload> {
        self.uploads.borrow().last().cloned()
    }
}

impl BufferImporter for TestImporter {
    fn try_import(&self, upload: &BufferUpload<'_>) -> Result<TextureHandle, BufferImportError> {
        self.uploads.borrow_mut().push(TestUpload {
            buffer: upload.buffer.id,
            damage: Rc::new(upload.damage.clone()),
            reused: upload.previous.is_some(),
        });
        if self.reject.get() {
            return Err(BufferImportError::UnsupportedFormat);
        }
        match upload.previous {
            Some(prev) => Ok(prev),
            None => Ok(TextureHandle(self.next.add_fetch(1))),
        }
    }
}
