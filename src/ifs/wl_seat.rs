pub mod pointer_owner;
pub mod popup_grab;
pub mod touch_owner;

use {
    crate::{
        client::ClientId,
        ifs::{
            wl_seat::{
                pointer_owner::PointerOwnerHolder, popup_grab::PopupGrab,
                touch_owner::TouchOwnerHolder,
            },
            wl_surface::{Role, WlSurface, WlSurfaceError, cursor::CursorSurface},
        },
        utils::clonecell::CloneCell,
    },
    std::{cell::Cell, rc::Rc},
};

linear_ids!(SeatIds, SeatId, u64);

bitflags! {
    SeatCapabilities: u32;
        POINTER = 1 << 0,
        KEYBOARD = 1 << 1,
        TOUCH = 1 << 2,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ButtonState {
    Released,
    Pressed,
}

/// Receives the input events that the default pointer and touch handling
/// delivers to surfaces.
pub trait InputSink {
    fn pointer_enter(&self, surface: &Rc<WlSurface>, x: f64, y: f64) {
        let _ = (surface, x, y);
    }

    fn pointer_leave(&self, surface: &Rc<WlSurface>) {
        let _ = surface;
    }

    fn pointer_motion(&self, surface: &Rc<WlSurface>, time: u32, x: f64, y: f64) {
        let _ = (surface, time, x, y);
    }

    fn pointer_button(&self, surface: &Rc<WlSurface>, time: u32, button: u32, state: ButtonState) {
        let _ = (surface, time, button, state);
    }

    fn pointer_axis(&self, surface: &Rc<WlSurface>, time: u32, axis: u32, value: f64) {
        let _ = (surface, time, axis, value);
    }

    fn pointer_frame(&self, surface: &Rc<WlSurface>) {
        let _ = surface;
    }

    fn touch_enter(&self, surface: &Rc<WlSurface>, x: f64, y: f64) {
        let _ = (surface, x, y);
    }

    fn touch_down(&self, surface: &Rc<WlSurface>, time: u32, id: i32, x: f64, y: f64) {
        let _ = (surface, time, id, x, y);
    }

    fn touch_up(&self, surface: &Rc<WlSurface>, time: u32, id: i32) {
        let _ = (surface, time, id);
    }

    fn touch_motion(&self, surface: &Rc<WlSurface>, time: u32, id: i32, x: f64, y: f64) {
        let _ = (surface, time, id, x, y);
    }

    fn touch_cancel(&self, surface: &Rc<WlSurface>) {
        let _ = surface;
    }
}

pub struct NoopInputSink;

impl InputSink for NoopInputSink {}

pub struct WlSeatGlobal {
    pub id: SeatId,
    name: String,
    capabilities: Cell<SeatCapabilities>,
    sink: Rc<dyn InputSink>,
    pointer_owner: PointerOwnerHolder,
    touch_owner: TouchOwnerHolder,
    pointer_focus: CloneCell<Option<Rc<WlSurface>>>,
    touch_focus: CloneCell<Option<Rc<WlSurface>>>,
    cursor: CloneCell<Option<Rc<CursorSurface>>>,
}

impl WlSeatGlobal {
    pub fn new(
        id: SeatId,
        name: &str,
        capabilities: SeatCapabilities,
        sink: Rc<dyn InputSink>,
    ) -> Rc<Self> {
        Rc::new(Self {
            id,
            name: name.to_string(),
            capabilities: Cell::new(capabilities),
            sink,
            pointer_owner: Default::default(),
            touch_owner: Default::default(),
            pointer_focus: Default::default(),
            touch_focus: Default::default(),
            cursor: Default::default(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capabilities(&self) -> SeatCapabilities {
        self.capabilities.get()
    }

    pub fn set_capabilities(&self, capabilities: SeatCapabilities) {
        self.capabilities.set(capabilities);
    }

    pub fn pointer_focus(&self) -> Option<Rc<WlSurface>> {
        self.pointer_focus.get()
    }

    pub fn touch_focus(&self) -> Option<Rc<WlSurface>> {
        self.touch_focus.get()
    }

    /// The innermost popup grab of the seat, if one owns pointer or touch
    /// input.
    pub fn active_popup_grab(&self) -> Option<Rc<PopupGrab>> {
        self.pointer_owner
            .popup_grab()
            .or_else(|| self.touch_owner.popup_grab())
    }

    pub fn pointer_enter(self: &Rc<Self>, surface: &Rc<WlSurface>, x: f64, y: f64) {
        self.pointer_owner.enter(self, surface, x, y)
    }

    pub fn pointer_motion(self: &Rc<Self>, time: u32, x: f64, y: f64) {
        self.pointer_owner.motion(self, time, x, y)
    }

    pub fn pointer_button(self: &Rc<Self>, time: u32, button: u32, state: ButtonState) {
        self.pointer_owner.button(self, time, button, state)
    }

    pub fn pointer_axis(self: &Rc<Self>, time: u32, axis: u32, value: f64) {
        self.pointer_owner.axis(self, time, axis, value)
    }

    pub fn pointer_frame(self: &Rc<Self>) {
        self.pointer_owner.frame(self)
    }

    pub fn touch_enter(self: &Rc<Self>, surface: &Rc<WlSurface>, x: f64, y: f64) {
        self.touch_owner.enter(self, surface, x, y)
    }

    pub fn touch_down(self: &Rc<Self>, time: u32, id: i32, x: f64, y: f64) {
        self.touch_owner.down(self, time, id, x, y)
    }

    pub fn touch_up(self: &Rc<Self>, time: u32, id: i32) {
        self.touch_owner.up(self, time, id)
    }

    pub fn touch_motion(self: &Rc<Self>, time: u32, id: i32, x: f64, y: f64) {
        self.touch_owner.motion(self, time, id, x, y)
    }

    pub fn touch_cancel(self: &Rc<Self>) {
        self.touch_owner.cancel(self)
    }

    /// Makes `surface` the cursor image of the seat. `None` hides the
    /// cursor.
    pub fn set_cursor_surface(
        self: &Rc<Self>,
        surface: Option<&Rc<WlSurface>>,
        hotspot_x: i32,
        hotspot_y: i32,
    ) -> Result<(), WlSurfaceError> {
        let Some(surface) = surface else {
            self.set_cursor(None);
            return Ok(());
        };
        if let Some(cursor) = self.cursor.get() {
            if cursor.surface.id == surface.id {
                cursor.set_hotspot(hotspot_x, hotspot_y);
                return Ok(());
            }
        }
        let cursor = CursorSurface::new(self, surface);
        surface.set_role(Role::Cursor(Some(cursor.clone())))?;
        cursor.set_hotspot(hotspot_x, hotspot_y);
        self.set_cursor(Some(cursor));
        Ok(())
    }

    pub fn set_cursor(&self, cursor: Option<Rc<CursorSurface>>) {
        if let Some(old) = self.cursor.set(cursor) {
            let still_set = self
                .cursor
                .get()
                .is_some_and(|c| c.surface.id == old.surface.id);
            if !still_set {
                old.surface.unset_role_object();
            }
        }
    }

    pub fn cursor(&self) -> Option<Rc<CursorSurface>> {
        self.cursor.get()
    }

    /// Drops every reference the seat holds to surfaces of `client`.
    pub fn client_destroyed(&self, client: ClientId) {
        while let Some(grab) = self.active_popup_grab() {
            if grab.focus().client.id != client {
                break;
            }
            grab.close();
        }
        if self.cursor.get().is_some_and(|c| c.surface.client.id == client) {
            self.set_cursor(None);
        }
        if self.pointer_focus.get().is_some_and(|s| s.client.id == client) {
            self.pointer_focus.set(None);
        }
        if self.touch_focus.get().is_some_and(|s| s.client.id == client) {
            self.touch_focus.set(None);
        }
    }

    fn set_pointer_focus(&self, surface: &Rc<WlSurface>, x: f64, y: f64) {
        if let Some(old) = self.pointer_focus.set(Some(surface.clone())) {
            if old.id == surface.id {
                return;
            }
            if !old.is_destroyed() {
                self.sink.pointer_leave(&old);
            }
        }
        self.sink.pointer_enter(surface, x, y);
    }

    fn live_pointer_focus(&self) -> Option<Rc<WlSurface>> {
        self.pointer_focus.get().filter(|s| !s.is_destroyed())
    }

    fn live_touch_focus(&self) -> Option<Rc<WlSurface>> {
        self.touch_focus.get().filter(|s| !s.is_destroyed())
    }
}
