use {
    crate::{
        ifs::{
            wl_buffer::WlBuffer, wl_compositor::WlCompositor, wl_subcompositor::WlSubcompositor,
            xdg_wm_base::XdgWmBase,
        },
        object::{Object, ObjectId},
        state::State,
        utils::{copyhashmap::CopyHashMap, errorfmt::ErrorFmt, numcell::NumCell},
        wire::Event,
    },
    std::{
        cell::{Cell, RefCell},
        collections::VecDeque,
        error::Error,
        mem,
        rc::Rc,
    },
    thiserror::Error,
};

linear_ids!(ClientIds, ClientId, u64);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("The client exceeded its object limit")]
    NoMemory,
    #[error("The id {0} is already in use")]
    IdAlreadyInUse(ObjectId),
    #[error("The object id {0} is unknown")]
    UnknownId(ObjectId),
    #[error("The client has been disconnected")]
    Killed,
}

/// The first id handed out to client objects. Id 1 belongs to the display.
const FIRST_CLIENT_ID: u32 = 2;

pub struct Client {
    pub id: ClientId,
    pub state: Rc<State>,
    objects: CopyHashMap<ObjectId, Rc<dyn Object>>,
    next_id: NumCell<u32>,
    events: RefCell<VecDeque<Event>>,
    killed: Cell<bool>,
}

impl Client {
    pub(crate) fn new(id: ClientId, state: &Rc<State>) -> Rc<Self> {
        Rc::new(Self {
            id,
            state: state.clone(),
            objects: Default::default(),
            next_id: NumCell::new(FIRST_CLIENT_ID),
            events: Default::default(),
            killed: Cell::new(false),
        })
    }

    pub fn new_id<T: From<ObjectId>>(&self) -> T {
        ObjectId::from_raw(self.next_id.fetch_add(1)).into()
    }

    pub fn add_client_obj<T: Object>(&self, obj: &Rc<T>) -> Result<(), ClientError> {
        if self.killed.get() {
            return Err(ClientError::Killed);
        }
        let id = obj.id();
        if self.objects.len() >= self.state.config.max_objects_per_client {
            log::warn!(
                "Client {} exceeded its object limit while creating {}@{}",
                self.id,
                obj.interface().name(),
                id,
            );
            self.event(Event::NoMemory);
            return Err(ClientError::NoMemory);
        }
        if self.objects.contains(&id) {
            return Err(ClientError::IdAlreadyInUse(id));
        }
        self.objects.set(id, obj.clone());
        Ok(())
    }

    pub fn remove_obj(&self, obj: &dyn Object) -> Result<(), ClientError> {
        match self.objects.remove(&obj.id()) {
            Some(_) => Ok(()),
            None => Err(ClientError::UnknownId(obj.id())),
        }
    }

    pub fn has_obj(&self, id: ObjectId) -> bool {
        self.objects.contains(&id)
    }

    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }

    pub fn event(&self, event: Event) {
        if self.killed.get() {
            return;
        }
        log::trace!("Client {} <= {:?}", self.id, event);
        self.events.borrow_mut().push_back(event);
    }

    /// Removes all queued events.
    pub fn take_events(&self) -> Vec<Event> {
        mem::take(&mut *self.events.borrow_mut()).into()
    }

    pub fn protocol_error(&self, obj: &dyn Object, code: u32, message: &str) {
        if self.killed.get() {
            return;
        }
        log::error!(
            "Client {} caused a protocol error on {}@{}: {}",
            self.id,
            obj.interface().name(),
            obj.id(),
            message,
        );
        self.events.borrow_mut().push_back(Event::Error {
            object: obj.id(),
            code,
            message: message.to_string(),
        });
        self.killed.set(true);
    }

    /// Posts `err` as a protocol error on `obj` and returns it.
    pub fn fail<E: Error>(&self, obj: &dyn Object, code: u32, err: E) -> E {
        self.protocol_error(obj, code, &ErrorFmt(&err).to_string());
        err
    }

    pub fn is_killed(&self) -> bool {
        self.killed.get()
    }

    pub(crate) fn destroy(&self) {
        for (_, obj) in self.objects.take() {
            obj.break_loops();
        }
        self.killed.set(true);
        self.events.borrow_mut().clear();
    }

    pub fn bind_compositor(self: &Rc<Self>) -> Result<Rc<WlCompositor>, ClientError> {
        let obj = Rc::new(WlCompositor::new(self.new_id(), self));
        self.add_client_obj(&obj)?;
        Ok(obj)
    }

    pub fn bind_subcompositor(self: &Rc<Self>) -> Result<Rc<WlSubcompositor>, ClientError> {
        let obj = Rc::new(WlSubcompositor::new(self.new_id(), self));
        self.add_client_obj(&obj)?;
        Ok(obj)
    }

    pub fn bind_xdg_wm_base(self: &Rc<Self>, version: u32) -> Result<Rc<XdgWmBase>, ClientError> {
        let version = version.clamp(1, self.state.config.xdg_wm_base_version);
        let obj = Rc::new(XdgWmBase::new(self.new_id(), self, version));
        self.add_client_obj(&obj)?;
        Ok(obj)
    }

    /// Creates a buffer as a shared-memory pool would.
    pub fn create_buffer(
        self: &Rc<Self>,
        width: i32,
        height: i32,
    ) -> Result<Rc<WlBuffer>, ClientError> {
        let obj = Rc::new(WlBuffer::new(self.new_id(), self, width, height));
        self.add_client_obj(&obj)?;
        Ok(obj)
    }
}
