use {
    crate::{
        ifs::{
            wl_seat::{
                ButtonState, POINTER, TOUCH, WlSeatGlobal, pointer_owner::PointerOwner,
                touch_owner::TouchOwner,
            },
            wl_surface::{SurfaceObserver, WlSurface},
        },
        utils::{
            clonecell::CloneCell,
            event_listener::{EventListener, EventSource},
        },
    },
    std::rc::{Rc, Weak},
};

linear_ids!(PopupGrabIds, PopupGrabId, u64);

pub trait PopupGrabListener {
    fn popup_grab_closed(&self, grab: &PopupGrab);
}

/// Routes pointer and touch input of a seat while a popup is open.
///
/// Grabs started while another grab is active form a chain. Closing a grab
/// reactivates its parent.
pub struct PopupGrab {
    pub id: PopupGrabId,
    focus: Rc<WlSurface>,
    seat: CloneCell<Option<Rc<WlSeatGlobal>>>,
    parent: CloneCell<Weak<PopupGrab>>,
    pub close_event: EventSource<dyn PopupGrabListener>,
    parent_close: EventListener<dyn PopupGrabListener>,
    focus_destroy: EventListener<dyn SurfaceObserver>,
}

impl PopupGrab {
    pub fn new(id: PopupGrabId, focus: &Rc<WlSurface>) -> Rc<Self> {
        let slf = Rc::new_cyclic(|weak: &Weak<Self>| Self {
            id,
            focus: focus.clone(),
            seat: Default::default(),
            parent: CloneCell::new(Weak::new()),
            close_event: Default::default(),
            parent_close: EventListener::new(weak.clone()),
            focus_destroy: EventListener::new(weak.clone()),
        });
        slf.focus_destroy.attach(&focus.destroy_event);
        slf
    }

    pub fn focus(&self) -> &Rc<WlSurface> {
        &self.focus
    }

    pub fn is_active(&self) -> bool {
        self.seat.get().is_some()
    }

    pub fn parent(&self) -> Option<Rc<PopupGrab>> {
        self.parent.get().upgrade()
    }

    pub fn start(self: &Rc<Self>, seat: &Rc<WlSeatGlobal>) {
        self.seat.set(Some(seat.clone()));
        if let Some(current) = seat.active_popup_grab() {
            if current.id != self.id {
                self.parent.set(Rc::downgrade(&current));
                self.parent_close.attach(&current.close_event);
            }
        }
        if !self.focus_destroy.is_attached() {
            self.focus_destroy.attach(&self.focus.destroy_event);
        }
        log::debug!(
            "Popup grab {} on wl_surface@{} started on seat {}",
            self.id,
            self.focus.id,
            seat.name(),
        );
        let caps = seat.capabilities();
        if caps.contains(POINTER) {
            seat.pointer_owner.start_grab(self.clone());
            seat.pointer_owner
                .default()
                .enter(seat, &self.focus, 0.0, 0.0);
        }
        if caps.contains(TOUCH) {
            seat.touch_owner.start_grab(self.clone());
            seat.touch_owner.default().enter(seat, &self.focus, 0.0, 0.0);
        }
    }

    /// Ends the grab and reactivates the parent grab, if any. Closing a grab
    /// that is not active does nothing.
    pub fn close(&self) {
        let Some(seat) = self.seat.take() else {
            return;
        };
        log::debug!("Popup grab {} closed", self.id);
        seat.pointer_owner.end_grab();
        seat.touch_owner.end_grab();
        for l in self.close_event.iter() {
            l.popup_grab_closed(self);
        }
        self.parent_close.detach();
        self.focus_destroy.detach();
        if let Some(parent) = self.parent.get().upgrade() {
            parent.start(&seat);
        }
    }

    fn on_focus(&self, focus: Option<Rc<WlSurface>>) -> bool {
        focus.is_some_and(|f| f.id == self.focus.id)
    }
}

impl PopupGrabListener for PopupGrab {
    fn popup_grab_closed(&self, parent: &PopupGrab) {
        self.parent_close.detach();
        match parent.parent.get().upgrade() {
            Some(grandparent) if grandparent.id != self.id => {
                self.parent.set(Rc::downgrade(&grandparent));
                self.parent_close.attach(&grandparent.close_event);
            }
            _ => {
                self.parent.set(Weak::new());
            }
        }
    }
}

impl SurfaceObserver for PopupGrab {
    fn surface_destroyed(&self, _surface: &Rc<WlSurface>) {
        self.close();
    }
}

impl PointerOwner for PopupGrab {
    fn enter(&self, seat: &Rc<WlSeatGlobal>, surface: &Rc<WlSurface>, x: f64, y: f64) {
        seat.pointer_owner.default().enter(seat, surface, x, y)
    }

    fn motion(&self, seat: &Rc<WlSeatGlobal>, time: u32, x: f64, y: f64) {
        seat.pointer_owner.default().motion(seat, time, x, y)
    }

    fn button(&self, seat: &Rc<WlSeatGlobal>, time: u32, button: u32, state: ButtonState) {
        let on_popup = self.on_focus(seat.pointer_focus());
        seat.pointer_owner
            .default()
            .button(seat, time, button, state);
        if state == ButtonState::Pressed && !on_popup {
            self.close();
        }
    }

    fn axis(&self, seat: &Rc<WlSeatGlobal>, time: u32, axis: u32, value: f64) {
        seat.pointer_owner.default().axis(seat, time, axis, value)
    }

    fn frame(&self, seat: &Rc<WlSeatGlobal>) {
        seat.pointer_owner.default().frame(seat)
    }

    fn as_popup_grab(self: Rc<Self>) -> Option<Rc<PopupGrab>> {
        Some(self)
    }
}

impl TouchOwner for PopupGrab {
    fn enter(&self, seat: &Rc<WlSeatGlobal>, surface: &Rc<WlSurface>, x: f64, y: f64) {
        seat.touch_owner.default().enter(seat, surface, x, y)
    }

    fn down(&self, seat: &Rc<WlSeatGlobal>, time: u32, id: i32, x: f64, y: f64) {
        let on_popup = self.on_focus(seat.touch_focus());
        seat.touch_owner.default().down(seat, time, id, x, y);
        if !on_popup {
            self.close();
        }
    }

    fn up(&self, seat: &Rc<WlSeatGlobal>, time: u32, id: i32) {
        seat.touch_owner.default().up(seat, time, id)
    }

    fn motion(&self, seat: &Rc<WlSeatGlobal>, time: u32, id: i32, x: f64, y: f64) {
        seat.touch_owner.default().motion(seat, time, id, x, y)
    }

    fn cancel(&self, seat: &Rc<WlSeatGlobal>) {
        seat.touch_owner.default().cancel(seat)
    }

    fn as_popup_grab(self: Rc<Self>) -> Option<Rc<PopupGrab>> {
        Some(self)
    }
}
