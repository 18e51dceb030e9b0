use {
    crate::{
        ifs::{
            wl_seat::{WlSeatGlobal, popup_grab::PopupGrab},
            wl_surface::WlSurface,
        },
        utils::clonecell::CloneCell,
    },
    std::rc::Rc,
};

pub struct TouchOwnerHolder {
    default: Rc<DefaultTouchOwner>,
    owner: CloneCell<Rc<dyn TouchOwner>>,
}

impl Default for TouchOwnerHolder {
    fn default() -> Self {
        let default = Rc::new(DefaultTouchOwner);
        Self {
            owner: CloneCell::new(default.clone()),
            default,
        }
    }
}

impl TouchOwnerHolder {
    pub fn enter(&self, seat: &Rc<WlSeatGlobal>, surface: &Rc<WlSurface>, x: f64, y: f64) {
        self.owner.get().enter(seat, surface, x, y)
    }

    pub fn down(&self, seat: &Rc<WlSeatGlobal>, time: u32, id: i32, x: f64, y: f64) {
        self.owner.get().down(seat, time, id, x, y)
    }

    pub fn up(&self, seat: &Rc<WlSeatGlobal>, time: u32, id: i32) {
        self.owner.get().up(seat, time, id)
    }

    pub fn motion(&self, seat: &Rc<WlSeatGlobal>, time: u32, id: i32, x: f64, y: f64) {
        self.owner.get().motion(seat, time, id, x, y)
    }

    pub fn cancel(&self, seat: &Rc<WlSeatGlobal>) {
        self.owner.get().cancel(seat)
    }

    pub fn default(&self) -> Rc<dyn TouchOwner> {
        self.default.clone()
    }

    pub fn start_grab(&self, owner: Rc<dyn TouchOwner>) {
        self.owner.set(owner);
    }

    pub fn end_grab(&self) {
        self.owner.set(self.default.clone());
    }

    pub fn popup_grab(&self) -> Option<Rc<PopupGrab>> {
        self.owner.get().as_popup_grab()
    }
}

pub trait TouchOwner {
    fn enter(&self, seat: &Rc<WlSeatGlobal>, surface: &Rc<WlSurface>, x: f64, y: f64);
    fn down(&self, seat: &Rc<WlSeatGlobal>, time: u32, id: i32, x: f64, y: f64);
    fn up(&self, seat: &Rc<WlSeatGlobal>, time: u32, id: i32);
    fn motion(&self, seat: &Rc<WlSeatGlobal>, time: u32, id: i32, x: f64, y: f64);
    fn cancel(&self, seat: &Rc<WlSeatGlobal>);

    fn as_popup_grab(self: Rc<Self>) -> Option<Rc<PopupGrab>> {
        None
    }
}

pub struct DefaultTouchOwner;

impl TouchOwner for DefaultTouchOwner {
    fn enter(&self, seat: &Rc<WlSeatGlobal>, surface: &Rc<WlSurface>, x: f64, y: f64) {
        seat.touch_focus.set(Some(surface.clone()));
        seat.sink.touch_enter(surface, x, y);
    }

    fn down(&self, seat: &Rc<WlSeatGlobal>, time: u32, id: i32, x: f64, y: f64) {
        if let Some(focus) = seat.live_touch_focus() {
            seat.sink.touch_down(&focus, time, id, x, y);
        }
    }

    fn up(&self, seat: &Rc<WlSeatGlobal>, time: u32, id: i32) {
        if let Some(focus) = seat.live_touch_focus() {
            seat.sink.touch_up(&focus, time, id);
        }
    }

    fn motion(&self, seat: &Rc<WlSeatGlobal>, time: u32, id: i32, x: f64, y: f64) {
        if let Some(focus) = seat.live_touch_focus() {
            seat.sink.touch_motion(&focus, time, id, x, y);
        }
    }

    fn cancel(&self, seat: &Rc<WlSeatGlobal>) {
        if let Some(focus) = seat.live_touch_focus() {
            seat.sink.touch_cancel(&focus);
        }
    }
}
