use {
    crate::{
        client::{Client, ClientError},
        object::{Object, WL_BUFFER},
        rect::Rect,
        utils::numcell::NumCell,
        wire::{Event, WlBufferId},
    },
    std::{cell::Cell, rc::Rc},
    thiserror::Error,
};

/// A client buffer.
///
/// Consumers that read the contents hold a [`BufferReader`]. A release
/// requested while readers are outstanding is sent once the last reader is
/// dropped.
pub struct WlBuffer {
    pub id: WlBufferId,
    pub client: Rc<Client>,
    pub rect: Rect,
    readers: NumCell<u32>,
    release_pending: Cell<bool>,
    destroyed: Cell<bool>,
}

impl WlBuffer {
    pub fn new(id: WlBufferId, client: &Rc<Client>, width: i32, height: i32) -> Self {
        Self {
            id,
            client: client.clone(),
            rect: Rect::new_sized(0, 0, width.max(0), height.max(0)).unwrap_or_default(),
            readers: NumCell::new(0),
            release_pending: Cell::new(false),
            destroyed: Cell::new(false),
        }
    }

    pub fn width(&self) -> i32 {
        self.rect.width()
    }

    pub fn height(&self) -> i32 {
        self.rect.height()
    }

    pub fn destroyed(&self) -> bool {
        self.destroyed.get()
    }

    pub fn acquire_reader(self: &Rc<Self>) -> BufferReader {
        self.readers.fetch_add(1);
        BufferReader {
            buffer: self.clone(),
        }
    }

    pub fn readers(&self) -> u32 {
        self.readers.get()
    }

    pub fn is_release_pending(&self) -> bool {
        self.release_pending.get()
    }

    /// Hands the buffer back to the client, or defers that until all readers
    /// are done.
    pub fn release(&self) {
        if self.readers.get() > 0 {
            self.release_pending.set(true);
            return;
        }
        self.send_release();
    }

    fn send_release(&self) {
        self.release_pending.set(false);
        if !self.destroyed.get() {
            self.client.event(Event::BufferRelease { buffer: self.id });
        }
    }

    pub fn destroy(&self) -> Result<(), WlBufferError> {
        self.destroyed.set(true);
        self.client.remove_obj(self)?;
        Ok(())
    }
}

pub struct BufferReader {
    buffer: Rc<WlBuffer>,
}

impl BufferReader {
    pub fn buffer(&self) -> &Rc<WlBuffer> {
        &self.buffer
    }
}

impl Drop for BufferReader {
    fn drop(&mut self) {
        let prev = self.buffer.readers.fetch_sub(1);
        if prev == 1 && self.buffer.release_pending.get() {
            self.buffer.send_release();
        }
    }
}

object_base!(WlBuffer, WL_BUFFER);

impl Object for WlBuffer {}

#[derive(Debug, Error)]
pub enum WlBufferError {
    #[error(transparent)]
    ClientError(Box<ClientError>),
}
efrom!(WlBufferError, ClientError);
