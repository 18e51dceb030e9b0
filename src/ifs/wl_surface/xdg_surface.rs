pub mod xdg_popup;
pub mod xdg_toplevel;

use {
    crate::{
        client::{Client, ClientError},
        config::AckPolicy,
        ifs::{
            wl_surface::{
                Role, SurfaceObserver, WlSurface, WlSurfaceError,
                xdg_surface::{
                    xdg_popup::{XdgPopup, XdgPopupError},
                    xdg_toplevel::{XdgToplevel, XdgToplevelError},
                },
            },
            xdg_positioner::XdgPositioner,
            xdg_wm_base::{INVALID_POPUP_PARENT, INVALID_POSITIONER, ROLE, XdgWmBase},
        },
        object::{Object, XDG_SURFACE},
        rect::Rect,
        utils::{
            clonecell::{CloneCell, UnsafeCellCloneSafe},
            copyhashmap::CopyHashMap,
            event_listener::EventListener,
        },
        wire::{Event, WlSurfaceId, XdgPopupId, XdgPositionerId, XdgSurfaceId},
    },
    std::{
        cell::{Cell, RefCell},
        collections::VecDeque,
        rc::{Rc, Weak},
    },
    thiserror::Error,
};

const NOT_CONSTRUCTED: u32 = 1;
const ALREADY_CONSTRUCTED: u32 = 2;
const UNCONFIGURED_BUFFER: u32 = 3;
const INVALID_SERIAL: u32 = 4;
const INVALID_SIZE: u32 = 5;
const DEFUNCT_ROLE_OBJECT: u32 = 6;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum XdgSurfaceRole {
    None,
    XdgPopup,
    XdgToplevel,
}

impl XdgSurfaceRole {
    fn name(self) -> &'static str {
        match self {
            XdgSurfaceRole::None => "none",
            XdgSurfaceRole::XdgPopup => "xdg_popup",
            XdgSurfaceRole::XdgToplevel => "xdg_toplevel",
        }
    }
}

/// The role object of a descriptor. `None` inside a variant means that the
/// role object has been destroyed.
#[derive(Clone, Default)]
pub enum XdgRole {
    #[default]
    None,
    Toplevel(Option<Rc<XdgToplevel>>),
    Popup(Option<Rc<XdgPopup>>),
}

unsafe impl UnsafeCellCloneSafe for XdgRole {}

impl XdgRole {
    pub fn kind(&self) -> XdgSurfaceRole {
        match self {
            XdgRole::None => XdgSurfaceRole::None,
            XdgRole::Toplevel(_) => XdgSurfaceRole::XdgToplevel,
            XdgRole::Popup(_) => XdgSurfaceRole::XdgPopup,
        }
    }

    fn has_object(&self) -> bool {
        match self {
            XdgRole::None => false,
            XdgRole::Toplevel(t) => t.is_some(),
            XdgRole::Popup(p) => p.is_some(),
        }
    }
}

bitflags! {
    DesktopStates: u32;
        MAXIMIZED = 1 << 0,
        FULLSCREEN = 1 << 1,
        FOCUSED = 1 << 2,
        TILED_LEFT = 1 << 3,
        TILED_RIGHT = 1 << 4,
        TILED_TOP = 1 << 5,
        TILED_BOTTOM = 1 << 6,
}

pub struct XdgSurface {
    pub id: XdgSurfaceId,
    pub client: Rc<Client>,
    base: Rc<XdgWmBase>,
    surface: CloneCell<Option<Rc<WlSurface>>>,
    role: CloneCell<XdgRole>,
    states: Cell<DesktopStates>,
    window_geometry: Cell<Rect>,
    requested_geometry: Cell<Option<Rect>>,
    pending_geometry: Cell<Option<Rect>>,
    sent_serials: RefCell<VecDeque<u32>>,
    acked_serial: Cell<Option<u32>>,
    popups: CopyHashMap<XdgPopupId, Rc<XdgPopup>>,
    surface_destroy: EventListener<dyn SurfaceObserver>,
}

impl XdgSurface {
    pub fn new(wm_base: &Rc<XdgWmBase>, id: XdgSurfaceId, surface: &Rc<WlSurface>) -> Rc<Self> {
        let slf = Rc::new_cyclic(|weak: &Weak<Self>| Self {
            id,
            client: surface.client.clone(),
            base: wm_base.clone(),
            surface: CloneCell::new(Some(surface.clone())),
            role: Default::default(),
            states: Default::default(),
            window_geometry: Default::default(),
            requested_geometry: Cell::new(None),
            pending_geometry: Cell::new(None),
            sent_serials: Default::default(),
            acked_serial: Cell::new(None),
            popups: Default::default(),
            surface_destroy: EventListener::new(weak.clone()),
        });
        slf.surface_destroy.attach(&surface.destroy_event);
        slf
    }

    pub(crate) fn install(self: &Rc<Self>) -> Result<(), XdgSurfaceError> {
        let Some(surface) = self.surface() else {
            return Err(XdgSurfaceError::SurfaceDestroyed(self.id));
        };
        match surface.role() {
            Role::None | Role::Toplevel(_) | Role::Popup(_) => {}
            role => {
                return Err(self.base.client.fail(
                    &*self.base,
                    ROLE,
                    XdgSurfaceError::NonShellRole(surface.id, role.kind().name()),
                ));
            }
        }
        if surface.has_xdg_surface() {
            return Err(self.client.fail(
                &**self,
                ALREADY_CONSTRUCTED,
                XdgSurfaceError::AlreadyAttached(surface.id),
            ));
        }
        surface.set_has_xdg_surface(true);
        Ok(())
    }

    pub fn version(&self) -> u32 {
        self.base.version
    }

    pub fn surface(&self) -> Option<Rc<WlSurface>> {
        self.surface.get()
    }

    pub fn role(&self) -> XdgRole {
        self.role.get()
    }

    pub fn role_kind(&self) -> XdgSurfaceRole {
        self.role.get().kind()
    }

    pub fn toplevel(&self) -> Option<Rc<XdgToplevel>> {
        match self.role.get() {
            XdgRole::Toplevel(tl) => tl,
            _ => None,
        }
    }

    pub fn popup(&self) -> Option<Rc<XdgPopup>> {
        match self.role.get() {
            XdgRole::Popup(p) => p,
            _ => None,
        }
    }

    pub fn states(&self) -> DesktopStates {
        self.states.get()
    }

    /// Changes a compositor-controlled state. The change is sent with the
    /// next configure.
    pub fn set_state(&self, state: DesktopStates, value: bool) {
        let mut states = self.states.get();
        states.set(state, value);
        self.states.set(states);
    }

    /// Surface-local window geometry as of the last commit.
    pub fn window_geometry(&self) -> Rect {
        self.window_geometry.get()
    }

    pub fn requested_geometry(&self) -> Option<Rect> {
        self.requested_geometry.get()
    }

    pub fn popups(&self) -> Vec<Rc<XdgPopup>> {
        self.popups.values()
    }

    pub(super) fn add_popup(&self, popup: &Rc<XdgPopup>) {
        self.popups.set(popup.id, popup.clone());
    }

    pub(super) fn remove_popup(&self, id: XdgPopupId) {
        self.popups.remove(&id);
    }

    pub fn get_toplevel(self: &Rc<Self>) -> Result<Rc<XdgToplevel>, XdgSurfaceError> {
        let surface = self.construct(XdgSurfaceRole::XdgToplevel)?;
        let toplevel = Rc::new(XdgToplevel::new(self.client.new_id(), self));
        self.client.add_client_obj(&toplevel)?;
        if let Err(e) = surface.set_role(Role::Toplevel(Some(toplevel.clone()))) {
            return Err(self.base.client.fail(&*self.base, ROLE, e).into());
        }
        self.role.set(XdgRole::Toplevel(Some(toplevel.clone())));
        self.client.state.policy.get().on_surface_added(self);
        toplevel.send_initial_configure();
        Ok(toplevel)
    }

    pub fn get_popup(
        self: &Rc<Self>,
        parent: Option<&Rc<XdgSurface>>,
        positioner: &Rc<XdgPositioner>,
    ) -> Result<Rc<XdgPopup>, XdgSurfaceError> {
        let surface = self.construct(XdgSurfaceRole::XdgPopup)?;
        let Some(parent) = parent else {
            return Err(self.base.client.fail(
                &*self.base,
                INVALID_POPUP_PARENT,
                XdgSurfaceError::NoPopupParent(self.id),
            ));
        };
        let positioned = positioner.value();
        if !positioned.is_complete() {
            return Err(self.base.client.fail(
                &*self.base,
                INVALID_POSITIONER,
                XdgSurfaceError::IncompletePositioner(positioner.id),
            ));
        }
        let popup = XdgPopup::new(self.client.new_id(), self, parent, positioned);
        self.client.add_client_obj(&popup)?;
        if let Err(e) = surface.set_role(Role::Popup(Some(popup.clone()))) {
            return Err(self.base.client.fail(&*self.base, ROLE, e).into());
        }
        self.role.set(XdgRole::Popup(Some(popup.clone())));
        parent.add_popup(&popup);
        self.client.state.policy.get().on_surface_added(self);
        popup.update_position();
        popup.send_configure();
        Ok(popup)
    }

    fn construct(&self, kind: XdgSurfaceRole) -> Result<Rc<WlSurface>, XdgSurfaceError> {
        let Some(surface) = self.surface() else {
            return Err(self.client.fail(
                self,
                NOT_CONSTRUCTED,
                XdgSurfaceError::SurfaceDestroyed(self.id),
            ));
        };
        let role = self.role.get();
        let old = role.kind();
        if old != XdgSurfaceRole::None && old != kind {
            return Err(self.client.fail(
                self,
                ALREADY_CONSTRUCTED,
                XdgSurfaceError::IncompatibleRole {
                    id: self.id,
                    old,
                    new: kind,
                },
            ));
        }
        if role.has_object() {
            return Err(self.client.fail(
                self,
                ALREADY_CONSTRUCTED,
                XdgSurfaceError::AlreadyConstructed(self.id, kind.name()),
            ));
        }
        Ok(surface)
    }

    /// Called when the role object is destroyed.
    pub(super) fn role_destroyed(self: &Rc<Self>) {
        let role = match self.role.get() {
            XdgRole::Toplevel(_) => XdgRole::Toplevel(None),
            XdgRole::Popup(_) => XdgRole::Popup(None),
            XdgRole::None => XdgRole::None,
        };
        self.role.set(role);
        self.sent_serials.borrow_mut().clear();
        self.acked_serial.set(None);
        if let Some(surface) = self.surface() {
            surface.unset_role_object();
        }
        self.client.state.policy.get().on_surface_removed(self);
    }

    pub fn set_window_geometry(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<(), XdgSurfaceError> {
        if width <= 0 || height <= 0 {
            return Err(self.client.fail(
                self,
                INVALID_SIZE,
                XdgSurfaceError::NonPositiveWidthHeight(width, height),
            ));
        }
        self.pending_geometry.set(Rect::new_sized(x, y, width, height));
        Ok(())
    }

    pub fn ack_configure(&self, serial: u32) -> Result<(), XdgSurfaceError> {
        if !self.role.get().has_object() {
            return Err(self.client.fail(
                self,
                NOT_CONSTRUCTED,
                XdgSurfaceError::NotConstructed(self.id),
            ));
        }
        let mut sent = self.sent_serials.borrow_mut();
        let Some(pos) = sent.iter().position(|s| *s == serial) else {
            drop(sent);
            return Err(self.client.fail(
                self,
                INVALID_SERIAL,
                XdgSurfaceError::UnknownSerial(serial),
            ));
        };
        sent.drain(..=pos);
        self.acked_serial.set(Some(serial));
        Ok(())
    }

    pub fn acked_serial(&self) -> Option<u32> {
        self.acked_serial.get()
    }

    pub fn outstanding_serials(&self) -> Vec<u32> {
        self.sent_serials.borrow().iter().copied().collect()
    }

    /// Whether the client may commit.
    pub fn is_configured(&self) -> bool {
        if self.acked_serial.get().is_none() {
            return false;
        }
        match self.client.state.config.ack_policy {
            AckPolicy::FirstConfigure => true,
            AckPolicy::EveryConfigure => self.sent_serials.borrow().is_empty(),
        }
    }

    pub(super) fn send_configure_serial(&self) -> u32 {
        let serial = self.client.state.next_serial();
        self.sent_serials.borrow_mut().push_back(serial);
        self.client.event(Event::XdgSurfaceConfigure {
            xdg_surface: self.id,
            serial,
        });
        serial
    }

    pub(super) fn validate_commit(&self) -> Result<(), XdgSurfaceError> {
        if !self.is_configured() {
            return Err(self.client.fail(
                self,
                UNCONFIGURED_BUFFER,
                XdgSurfaceError::UnconfiguredBuffer(self.id),
            ));
        }
        Ok(())
    }

    /// Applies the double-buffered descriptor state of a commit.
    pub(super) fn committed(self: &Rc<Self>) {
        if let Some(geometry) = self.pending_geometry.take() {
            self.requested_geometry.set(Some(geometry));
        }
        self.update_geometry();
    }

    pub(super) fn notify_committed(self: &Rc<Self>) {
        self.client.state.policy.get().on_committed(self);
    }

    fn update_geometry(&self) {
        let Some(surface) = self.surface() else {
            return;
        };
        let mut geometry = surface.extents_with_children();
        if let Some(requested) = self.requested_geometry.get() {
            geometry = geometry.intersect(requested);
        }
        if self.window_geometry.replace(geometry) != geometry {
            self.update_popup_positions();
        }
    }

    pub(crate) fn update_popup_positions(&self) {
        for popup in self.popups.values() {
            popup.update_position();
        }
    }

    /// Asks the client to close the window.
    pub fn close(&self) {
        match self.role.get() {
            XdgRole::Toplevel(Some(tl)) => tl.send_close(),
            XdgRole::Popup(Some(popup)) => popup.popup_done(),
            _ => log::error!(
                "Tried to close xdg_surface@{} which has no role object",
                self.id
            ),
        }
    }

    pub fn destroy(&self) -> Result<(), XdgSurfaceError> {
        if self.role.get().has_object() {
            return Err(self.client.fail(
                self,
                DEFUNCT_ROLE_OBJECT,
                XdgSurfaceError::RoleNotYetDestroyed(self.id),
            ));
        }
        self.surface_destroy.detach();
        if let Some(surface) = self.surface.take() {
            surface.set_has_xdg_surface(false);
        }
        self.base.remove_surface(self.id);
        self.client.remove_obj(self)?;
        Ok(())
    }
}

impl SurfaceObserver for XdgSurface {
    fn surface_destroyed(&self, _surface: &Rc<WlSurface>) {
        self.surface.set(None);
    }
}

object_base!(XdgSurface, XDG_SURFACE);

impl Object for XdgSurface {
    fn break_loops(&self) {
        self.role.set(XdgRole::None);
        self.popups.take();
        self.surface.set(None);
    }
}

#[derive(Debug, Error)]
pub enum XdgSurfaceError {
    #[error("Surface {0} cannot be turned into a xdg_surface because it already has an attached xdg_surface")]
    AlreadyAttached(WlSurfaceId),
    #[error("Surface {0} cannot be turned into a xdg_surface because it has the role {1}")]
    NonShellRole(WlSurfaceId, &'static str),
    #[error("The wl_surface of xdg_surface {0} has been destroyed")]
    SurfaceDestroyed(XdgSurfaceId),
    #[error("Surface {} cannot be assigned the role {} because it already has the role {}", .id, .new.name(), .old.name())]
    IncompatibleRole {
        id: XdgSurfaceId,
        old: XdgSurfaceRole,
        new: XdgSurfaceRole,
    },
    #[error("xdg_surface {0} already has an assigned {1}")]
    AlreadyConstructed(XdgSurfaceId, &'static str),
    #[error("xdg_surface {0} has no role yet")]
    NotConstructed(XdgSurfaceId),
    #[error("xdg_popup of xdg_surface {0} has no parent")]
    NoPopupParent(XdgSurfaceId),
    #[error("xdg_positioner {0} does not have a size and an anchor rectangle")]
    IncompletePositioner(XdgPositionerId),
    #[error("Tried to set a non-positive window geometry size {0}x{1}")]
    NonPositiveWidthHeight(i32, i32),
    #[error("Serial {0} was never sent or has already been acked")]
    UnknownSerial(u32),
    #[error("xdg_surface {0} committed before acking a configure")]
    UnconfiguredBuffer(XdgSurfaceId),
    #[error("Cannot destroy xdg_surface {0} because its xdg_toplevel/popup is not yet destroyed")]
    RoleNotYetDestroyed(XdgSurfaceId),
    #[error(transparent)]
    XdgToplevelError(Box<XdgToplevelError>),
    #[error(transparent)]
    XdgPopupError(Box<XdgPopupError>),
    #[error(transparent)]
    WlSurfaceError(Box<WlSurfaceError>),
    #[error(transparent)]
    ClientError(Box<ClientError>),
}
efrom!(XdgSurfaceError, XdgToplevelError);
efrom!(XdgSurfaceError, XdgPopupError);
efrom!(XdgSurfaceError, WlSurfaceError);
efrom!(XdgSurfaceError, ClientError);
