//! Window management decisions that are made outside of the protocol engine.

use {
    crate::ifs::{
        wl_seat::WlSeatGlobal,
        wl_surface::{
            SurfaceRole, WlSurface,
            xdg_surface::{XdgSurface, xdg_toplevel::ResizeEdge},
        },
    },
    std::rc::Rc,
};

/// Callbacks into the window manager.
///
/// Except for `allow_role`, the return values of the callbacks are not
/// consulted and the engine never waits for the policy.
pub trait ShellPolicy {
    fn allow_role(&self, surface: &Rc<WlSurface>, role: SurfaceRole) -> bool {
        let _ = (surface, role);
        true
    }

    fn on_surface_added(&self, surface: &Rc<XdgSurface>) {
        let _ = surface;
    }

    fn on_surface_removed(&self, surface: &Rc<XdgSurface>) {
        let _ = surface;
    }

    fn on_committed(&self, surface: &Rc<XdgSurface>) {
        let _ = surface;
    }

    fn on_set_parent(&self, surface: &Rc<XdgSurface>, parent: Option<&Rc<XdgSurface>>) {
        let _ = (surface, parent);
    }

    fn on_move_requested(&self, surface: &Rc<XdgSurface>, seat: &Rc<WlSeatGlobal>, serial: u32) {
        let _ = (surface, seat, serial);
    }

    fn on_resize_requested(
        &self,
        surface: &Rc<XdgSurface>,
        seat: &Rc<WlSeatGlobal>,
        serial: u32,
        edge: ResizeEdge,
    ) {
        let _ = (surface, seat, serial, edge);
    }

    fn on_show_window_menu(
        &self,
        surface: &Rc<XdgSurface>,
        seat: &Rc<WlSeatGlobal>,
        serial: u32,
        x: i32,
        y: i32,
    ) {
        let _ = (surface, seat, serial, x, y);
    }

    fn on_maximize_requested(&self, surface: &Rc<XdgSurface>, maximized: bool) {
        let _ = (surface, maximized);
    }

    fn on_fullscreen_requested(&self, surface: &Rc<XdgSurface>, fullscreen: bool) {
        let _ = (surface, fullscreen);
    }

    fn on_minimize_requested(&self, surface: &Rc<XdgSurface>) {
        let _ = surface;
    }
}

pub struct NoopPolicy;

impl ShellPolicy for NoopPolicy {}
