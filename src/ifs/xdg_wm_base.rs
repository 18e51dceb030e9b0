use {
    crate::{
        client::{Client, ClientError},
        ifs::{
            wl_surface::{
                WlSurface,
                xdg_surface::{XdgSurface, XdgSurfaceError},
            },
            xdg_positioner::XdgPositioner,
        },
        object::{Object, XDG_WM_BASE},
        utils::copyhashmap::CopyHashMap,
        wire::{Event, XdgSurfaceId, XdgWmBaseId},
    },
    std::{cell::Cell, rc::Rc},
    thiserror::Error,
};

pub(crate) const ROLE: u32 = 0;
const DEFUNCT_SURFACES: u32 = 1;
pub(crate) const INVALID_POPUP_PARENT: u32 = 3;
pub(crate) const INVALID_POSITIONER: u32 = 5;

pub struct XdgWmBase {
    pub id: XdgWmBaseId,
    pub client: Rc<Client>,
    pub version: u32,
    surfaces: CopyHashMap<XdgSurfaceId, Rc<XdgSurface>>,
    ping: Cell<Option<u32>>,
}

impl XdgWmBase {
    pub fn new(id: XdgWmBaseId, client: &Rc<Client>, version: u32) -> Self {
        Self {
            id,
            client: client.clone(),
            version,
            surfaces: Default::default(),
            ping: Cell::new(None),
        }
    }

    pub fn create_positioner(&self) -> Result<Rc<XdgPositioner>, XdgWmBaseError> {
        let pos = Rc::new(XdgPositioner::new(self.client.new_id(), &self.client));
        self.client.add_client_obj(&pos)?;
        Ok(pos)
    }

    pub fn get_xdg_surface(
        self: &Rc<Self>,
        surface: &Rc<WlSurface>,
    ) -> Result<Rc<XdgSurface>, XdgWmBaseError> {
        let xdg = XdgSurface::new(self, self.client.new_id(), surface);
        xdg.install()?;
        if let Err(e) = self.client.add_client_obj(&xdg) {
            surface.set_has_xdg_surface(false);
            return Err(e.into());
        }
        self.surfaces.set(xdg.id, xdg.clone());
        Ok(xdg)
    }

    pub fn surfaces(&self) -> Vec<Rc<XdgSurface>> {
        self.surfaces.values()
    }

    pub(crate) fn remove_surface(&self, id: XdgSurfaceId) {
        self.surfaces.remove(&id);
    }

    /// Sends a ping and returns its serial. The client is expected to answer
    /// with a pong carrying the same serial.
    pub fn ping(&self) -> u32 {
        let serial = self.client.state.next_serial();
        self.ping.set(Some(serial));
        self.client.event(Event::Ping {
            wm_base: self.id,
            serial,
        });
        serial
    }

    pub fn pong(&self, serial: u32) {
        match self.ping.get() {
            Some(ping) if ping == serial => self.ping.set(None),
            Some(ping) => log::debug!(
                "xdg_wm_base@{} answered ping {} with pong {}",
                self.id,
                ping,
                serial
            ),
            None => log::debug!("xdg_wm_base@{} sent an unsolicited pong", self.id),
        }
    }

    /// The serial of a ping that has not been answered yet.
    pub fn pending_ping(&self) -> Option<u32> {
        self.ping.get()
    }

    pub fn destroy(&self) -> Result<(), XdgWmBaseError> {
        if !self.surfaces.is_empty() {
            return Err(self.client.fail(
                self,
                DEFUNCT_SURFACES,
                XdgWmBaseError::DefunctSurfaces(self.surfaces.len()),
            ));
        }
        self.client.remove_obj(self)?;
        Ok(())
    }
}

object_base!(XdgWmBase, XDG_WM_BASE);

impl Object for XdgWmBase {
    fn break_loops(&self) {
        self.surfaces.take();
    }
}

#[derive(Debug, Error)]
pub enum XdgWmBaseError {
    #[error("Tried to destroy xdg_wm_base while {0} xdg_surfaces are still alive")]
    DefunctSurfaces(usize),
    #[error(transparent)]
    ClientError(Box<ClientError>),
    #[error(transparent)]
    XdgSurfaceError(Box<XdgSurfaceError>),
}
efrom!(XdgWmBaseError, ClientError);
efrom!(XdgWmBaseError, XdgSurfaceError);
