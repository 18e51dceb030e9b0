use {
    crate::{
        client::Client,
        object::{Object, WL_CALLBACK},
        wire::{Event, WlCallbackId},
    },
    std::rc::Rc,
};

pub struct WlCallback {
    pub id: WlCallbackId,
    client: Rc<Client>,
}

impl WlCallback {
    pub fn new(id: WlCallbackId, client: &Rc<Client>) -> Self {
        Self {
            id,
            client: client.clone(),
        }
    }

    /// Fires the callback. Callbacks are one-shot and cease to exist
    /// afterwards.
    pub fn send_done(&self, time: u32) {
        self.client.event(Event::CallbackDone {
            callback: self.id,
            time,
        });
        let _ = self.client.remove_obj(self);
    }
}

object_base!(WlCallback, WL_CALLBACK);

impl Object for WlCallback {}
