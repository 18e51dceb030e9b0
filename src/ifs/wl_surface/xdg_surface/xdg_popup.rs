use {
    crate::{
        client::ClientError,
        ifs::{
            wl_seat::{
                WlSeatGlobal,
                popup_grab::{PopupGrab, PopupGrabListener},
            },
            wl_surface::xdg_surface::{XdgSurface, XdgSurfaceError},
            xdg_positioner::{Positioned, XdgPositioner},
            xdg_wm_base::INVALID_POSITIONER,
        },
        object::{Object, XDG_POPUP},
        rect::Rect,
        utils::{clonecell::CloneCell, event_listener::EventListener},
        wire::{Event, XdgPopupId, XdgPositionerId},
    },
    std::{
        cell::{Cell, RefCell},
        fmt::{Debug, Formatter},
        rc::{Rc, Weak},
    },
    thiserror::Error,
};

const REPOSITIONED_SINCE: u32 = 3;

pub struct XdgPopup {
    pub id: XdgPopupId,
    pub xdg: Rc<XdgSurface>,
    parent: CloneCell<Weak<XdgSurface>>,
    relative_position: Cell<Rect>,
    pos: RefCell<Positioned>,
    grab: CloneCell<Option<Rc<PopupGrab>>>,
    grab_close: EventListener<dyn PopupGrabListener>,
}

impl Debug for XdgPopup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XdgPopup").finish_non_exhaustive()
    }
}

impl XdgPopup {
    pub fn new(
        id: XdgPopupId,
        xdg: &Rc<XdgSurface>,
        parent: &Rc<XdgSurface>,
        pos: Positioned,
    ) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Self>| Self {
            id,
            xdg: xdg.clone(),
            parent: CloneCell::new(Rc::downgrade(parent)),
            relative_position: Cell::new(Default::default()),
            pos: RefCell::new(pos),
            grab: Default::default(),
            grab_close: EventListener::new(weak.clone()),
        })
    }

    pub fn parent(&self) -> Option<Rc<XdgSurface>> {
        self.parent.get().upgrade()
    }

    pub fn positioned(&self) -> Positioned {
        *self.pos.borrow()
    }

    /// Position relative to the window geometry of the parent.
    pub fn relative_position(&self) -> Rect {
        self.relative_position.get()
    }

    pub fn active_grab(&self) -> Option<Rc<PopupGrab>> {
        self.grab.get()
    }

    pub(super) fn update_position(&self) {
        let rel = self.pos.borrow().get_position();
        self.relative_position.set(rel);
        let Some(parent) = self.parent.get().upgrade() else {
            return;
        };
        let (Some(parent_surface), Some(surface)) = (parent.surface(), self.xdg.surface()) else {
            return;
        };
        let (px, py) = parent_surface.position();
        let geo = parent.window_geometry();
        surface.set_position(
            px + geo.x1().saturating_add(rel.x1()) as f32,
            py + geo.y1().saturating_add(rel.y1()) as f32,
        );
    }

    pub fn send_configure(&self) -> u32 {
        let rel = self.relative_position.get();
        self.xdg.client.event(Event::PopupConfigure {
            popup: self.id,
            x: rel.x1(),
            y: rel.y1(),
            width: rel.width(),
            height: rel.height(),
        });
        self.xdg.send_configure_serial()
    }

    pub fn reposition(&self, positioner: &XdgPositioner, token: u32) -> Result<(), XdgPopupError> {
        let pos = positioner.value();
        if !pos.is_complete() {
            return Err(self.xdg.base.client.fail(
                &*self.xdg.base,
                INVALID_POSITIONER,
                XdgPopupError::IncompletePositioner(positioner.id),
            ));
        }
        *self.pos.borrow_mut() = pos;
        self.update_position();
        if self.xdg.version() >= REPOSITIONED_SINCE {
            self.xdg.client.event(Event::PopupRepositioned {
                popup: self.id,
                token,
            });
        }
        self.send_configure();
        Ok(())
    }

    pub fn grab(&self, seat: &Rc<WlSeatGlobal>, serial: u32) {
        if self.grab.get().is_some() {
            log::debug!("xdg_popup@{} already has a grab", self.id);
            return;
        }
        let Some(surface) = self.xdg.surface() else {
            return;
        };
        log::debug!(
            "xdg_popup@{} grabs seat {} with serial {}",
            self.id,
            seat.name(),
            serial
        );
        let grab = PopupGrab::new(self.xdg.client.state.popup_grab_ids.next(), &surface);
        self.grab_close.attach(&grab.close_event);
        self.grab.set(Some(grab.clone()));
        grab.start(seat);
    }

    /// Dismisses the popup. An active grab is closed first.
    pub fn popup_done(&self) {
        if let Some(grab) = self.grab.take() {
            self.grab_close.detach();
            grab.close();
        }
        self.send_popup_done();
    }

    fn send_popup_done(&self) {
        self.xdg.client.event(Event::PopupDone { popup: self.id });
    }

    pub(in crate::ifs::wl_surface) fn committed(&self) {
        self.xdg.committed();
        self.xdg.notify_committed();
    }

    pub fn destroy(&self) -> Result<(), XdgPopupError> {
        self.grab_close.detach();
        if let Some(grab) = self.grab.take() {
            grab.close();
        }
        if let Some(parent) = self.parent.set(Weak::new()).upgrade() {
            parent.remove_popup(self.id);
        }
        self.xdg.role_destroyed();
        self.xdg.client.remove_obj(self)?;
        Ok(())
    }
}

impl PopupGrabListener for XdgPopup {
    fn popup_grab_closed(&self, _grab: &PopupGrab) {
        self.grab_close.detach();
        self.grab.take();
        self.send_popup_done();
    }
}

object_base!(XdgPopup, XDG_POPUP);

impl Object for XdgPopup {
    fn break_loops(&self) {
        self.grab_close.detach();
        self.grab.take();
    }
}

#[derive(Debug, Error)]
pub enum XdgPopupError {
    #[error("xdg_positioner {0} does not have a size and an anchor rectangle")]
    IncompletePositioner(XdgPositionerId),
    #[error(transparent)]
    XdgSurfaceError(Box<XdgSurfaceError>),
    #[error(transparent)]
    ClientError(Box<ClientError>),
}
efrom!(XdgPopupError, XdgSurfaceError);
efrom!(XdgPopupError, ClientError);
