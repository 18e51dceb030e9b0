use {
    crate::{
        ifs::{
            wl_seat::WlSeatGlobal,
            wl_surface::{
                SurfaceRole, WlSurface,
                xdg_surface::{XdgSurface, xdg_toplevel::ResizeEdge},
            },
        },
        policy::ShellPolicy,
        wire::XdgSurfaceId,
    },
    std::{cell::RefCell, rc::Rc},
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PolicyCall {
    Added(XdgSurfaceId),
    Removed(XdgSurfaceId),
    Committed(XdgSurfaceId),
    SetParent(XdgSurfaceId, Option<XdgSurfaceId>),
    Move(XdgSurfaceId, u32),
    Resize(XdgSurfaceId, u32, ResizeEdge),
    WindowMenu(XdgSurfaceId, i32, i32),
    Maximize(XdgSurfaceId, bool),
    Fullscreen(XdgSurfaceId, bool),
    Minimize(XdgSurfaceId),
}

/// Records every callback. Roles listed in `denied` are refused.
#[derive(Default)]
pub struct TestPolicy {
    pub calls: RefCell<Vec<PolicyCall>>,
    pub denied: RefCell<Vec<SurfaceRole>>,
}

impl TestPolicy {
    pub fn take(&self) -> Vec<PolicyCall> {
        self.calls.take()
    }

    fn push(&self, call: PolicyCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl ShellPolicy for TestPolicy {
    fn allow_role(&self, _surface: &Rc<WlSurface>, role: SurfaceRole) -> bool {
        !self.denied.borrow().contains(&role)
    }

    fn on_surface_added(&self, surface: &Rc<XdgSurface>) {
        self.push(PolicyCall::Added(surface.id));
    }

    fn on_surface_removed(&self, surface: &Rc<XdgSurface>) {
        self.push(PolicyCall::Removed(surface.id));
    }

    fn on_committed(&self, surface: &Rc<XdgSurface>) {
        self.push(PolicyCall::Committed(surface.id));
    }

    fn on_set_parent(&self, surface: &Rc<XdgSurface>, parent: Option<&Rc<XdgSurface>>) {
        self.push(PolicyCall::SetParent(surface.id, parent.map(|p| p.id)));
    }

    fn on_move_requested(&self, surface: &Rc<XdgSurface>, _seat: &Rc<WlSeatGlobal>, serial: u32) {
        self.push(PolicyCall::Move(surface.id, serial));
    }

    fn on_resize_requested(
        &self,
        surface: &Rc<XdgSurface>,
        _seat: &Rc<WlSeatGlobal>,
        serial: u32,
        edge: ResizeEdge,
    ) {
        self.push(PolicyCall::Resize(surface.id, serial, edge));
    }

    fn on_show_window_menu(
        &self,
        surface: &Rc<XdgSurface>,
        _seat: &Rc<WlSeatGlobal>,
        _serial: u32,
        x: i32,
        y: i32,
    ) {
        self.push(PolicyCall::WindowMenu(surface.id, x, y));
    }

    fn on_maximize_requested(&self, surface: &Rc<XdgSurface>, maximized: bool) {
        self.push(PolicyCall::Maximize(surface.id, maximized));
    }

    fn on_fullscreen_requested(&self, surface: &Rc<XdgSurface>, fullscreen: bool) {
        self.push(PolicyCall::Fullscreen(surface.id, fullscreen));
    }

    fn on_minimize_requested(&self, surface: &Rc<XdgSurface>) {
        self.push(PolicyCall::Minimize(surface.id));
    }
}
