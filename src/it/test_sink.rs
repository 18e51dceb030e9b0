use {
    crate::{
        ifs::{
            wl_seat::{ButtonState, InputSink},
            wl_surface::WlSurface,
        },
        wire::WlSurfaceId,
    },
    std::{cell::RefCell, rc::Rc},
};

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    PointerEnter(WlSurfaceId),
    PointerLeave(WlSurfaceId),
    PointerMotion(WlSurfaceId, f64, f64),
    PointerButton(WlSurfaceId, u32, ButtonState),
    PointerAxis(WlSurfaceId, u32, f64),
    PointerFrame(WlSurfaceId),
    TouchEnter(WlSurfaceId),
    TouchDown(WlSurfaceId, i32),
    TouchUp(WlSurfaceId, i32),
    TouchMotion(WlSurfaceId, i32),
    TouchCancel(WlSurfaceId),
}

#[derive(Default)]
pub struct TestSink {
    pub events: RefCell<Vec<InputEvent>>,
}

impl TestSink {
    pub fn take(&self) -> Vec<InputEvent> {
        self.events.take()
    }

    fn push(&self, event: InputEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl InputSink for TestSink {
    fn pointer_enter(&self, surface: &Rc<WlSurface>, _x: f64, _y: f64) {
        self.push(InputEvent::PointerEnter(surface.id));
    }

    fn pointer_leave(&self, surface: &Rc<WlSurface>) {
        self.push(InputEvent::PointerLeave(surface.id));
    }

    fn pointer_motion(&self, surface: &Rc<WlSurface>, _time: u32, x: f64, y: f64) {
        self.push(InputEvent::PointerMotion(surface.id, x, y));
    }

    fn pointer_button(&self, surface: &Rc<WlSurface>, _time: u32, button: u32, state: ButtonState) {
        self.push(InputEvent::PointerButton(surface.id, button, state));
    }

    fn pointer_axis(&self, surface: &Rc<WlSurface>, _time: u32, axis: u32, value: f64) {
        self.push(InputEvent::PointerAxis(surface.id, axis, value));
    }

    fn pointer_frame(&self, surface: &Rc<WlSurface>) {
        self.push(InputEvent::PointerFrame(surface.id));
    }

    fn touch_enter(&self, surface: &Rc<WlSurface>, _x: f64, _y: f64) {
        self.push(InputEvent::TouchEnter(surface.id));
    }

    fn touch_down(&self, surface: &Rc<WlSurface>, _time: u32, id: i32, _x: f64, _y: f64) {
        self.push(InputEvent::TouchDown(surface.id, id));
    }

    fn touch_up(&self, surface: &Rc<WlSurface>, _time: u32, id: i32) {
        self.push(InputEvent::TouchUp(surface.id, id));
    }

    fn touch_motion(&self, surface: &Rc<WlSurface>, _time: u32, id: i32, _x: f64, _y: f64) {
        self.push(InputEvent::TouchMotion(surface.id, id));
    }

    fn touch_cancel(&self, surface: &Rc<WlSurface>) {
        self.push(InputEvent::TouchCancel(surface.id));
    }
}
