use {
    crate::{
        ifs::{
            wl_seat::{ButtonState, WlSeatGlobal, popup_grab::PopupGrab},
            wl_surface::WlSurface,
        },
        utils::clonecell::CloneCell,
    },
    std::rc::Rc,
};

pub struct PointerOwnerHolder {
    default: Rc<DefaultPointerOwner>,
    owner: CloneCell<Rc<dyn PointerOwner>>,
}

impl Default for PointerOwnerHolder {
    fn default() -> Self {
        let default = Rc::new(DefaultPointerOwner);
        Self {
            owner: CloneCell::new(default.clone()),
            default,
        }
    }
}

impl PointerOwnerHolder {
    pub fn enter(&self, seat: &Rc<WlSeatGlobal>, surface: &Rc<WlSurface>, x: f64, y: f64) {
        self.owner.get().enter(seat, surface, x, y)
    }

    pub fn motion(&self, seat: &Rc<WlSeatGlobal>, time: u32, x: f64, y: f64) {
        self.owner.get().motion(seat, time, x, y)
    }

    pub fn button(&self, seat: &Rc<WlSeatGlobal>, time: u32, button: u32, state: ButtonState) {
        self.owner.get().button(seat, time, button, state)
    }

    pub fn axis(&self, seat: &Rc<WlSeatGlobal>, time: u32, axis: u32, value: f64) {
        self.owner.get().axis(seat, time, axis, value)
    }

    pub fn frame(&self, seat: &Rc<WlSeatGlobal>) {
        self.owner.get().frame(seat)
    }

    /// Handling without any grab.
    pub fn default(&self) -> Rc<dyn PointerOwner> {
        self.default.clone()
    }

    pub fn start_grab(&self, owner: Rc<dyn PointerOwner>) {
        self.owner.set(owner);
    }

    pub fn end_grab(&self) {
        self.owner.set(self.default.clone());
    }

    pub fn popup_grab(&self) -> Option<Rc<PopupGrab>> {
        self.owner.get().as_popup_grab()
    }
}

pub trait PointerOwner {
    fn enter(&self, seat: &Rc<WlSeatGlobal>, surface: &Rc<WlSurface>, x: f64, y: f64);
    fn motion(&self, seat: &Rc<WlSeatGlobal>, time: u32, x: f64, y: f64);
    fn button(&self, seat: &Rc<WlSeatGlobal>, time: u32, button: u32, state: ButtonState);
    fn axis(&self, seat: &Rc<WlSeatGlobal>, time: u32, axis: u32, value: f64);
    fn frame(&self, seat: &Rc<WlSeatGlobal>);

    fn as_popup_grab(self: Rc<Self>) -> Option<Rc<PopupGrab>> {
        None
    }
}

pub struct DefaultPointerOwner;

impl PointerOwner for DefaultPointerOwner {
    fn enter(&self, seat: &Rc<WlSeatGlobal>, surface: &Rc<WlSurface>, x: f64, y: f64) {
        seat.set_pointer_focus(surface, x, y);
    }

    fn motion(&self, seat: &Rc<WlSeatGlobal>, time: u32, x: f64, y: f64) {
        if let Some(focus) = seat.live_pointer_focus() {
            seat.sink.pointer_motion(&focus, time, x, y);
        }
    }

    fn button(&self, seat: &Rc<WlSeatGlobal>, time: u32, button: u32, state: ButtonState) {
        if let Some(focus) = seat.live_pointer_focus() {
            seat.sink.pointer_button(&focus, time, button, state);
        }
    }

    fn axis(&self, seat: &Rc<WlSeatGlobal>, time: u32, axis: u32, value: f64) {
        if let Some(focus) = seat.live_pointer_focus() {
            seat.sink.pointer_axis(&focus, time, axis, value);
        }
    }

    fn frame(&self, seat: &Rc<WlSeatGlobal>) {
        if let Some(focus) = seat.live_pointer_focus() {
            seat.sink.pointer_frame(&focus);
        }
    }
}
