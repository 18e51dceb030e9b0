use {
    crate::{
        client::ClientError,
        ifs::{
            wl_seat::WlSeatGlobal,
            wl_surface::{
                xdg_surface::{
                    FOCUSED, FULLSCREEN, MAXIMIZED, TILED_BOTTOM, TILED_LEFT, TILED_RIGHT,
                    TILED_TOP, XdgSurface, XdgSurfaceError,
                },
            },
        },
        object::{Object, XDG_TOPLEVEL},
        policy::ShellPolicy,
        utils::clonecell::CloneCell,
        wire::{Event, XdgToplevelId},
    },
    smallvec::SmallVec,
    std::{
        cell::{Cell, RefCell},
        fmt::{Debug, Formatter},
        rc::{Rc, Weak},
    },
    thiserror::Error,
};

const INVALID_PARENT: u32 = 1;
const INVALID_SIZE: u32 = 2;

const STATE_MAXIMIZED: u32 = 1;
const STATE_FULLSCREEN: u32 = 2;
const STATE_RESIZING: u32 = 3;
const STATE_ACTIVATED: u32 = 4;
const STATE_TILED_LEFT: u32 = 5;
const STATE_TILED_RIGHT: u32 = 6;
const STATE_TILED_TOP: u32 = 7;
const STATE_TILED_BOTTOM: u32 = 8;

const TILED_SINCE: u32 = 2;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ResizeEdge {
    None = 0,
    Top = 1,
    Bottom = 2,
    Left = 4,
    TopLeft = 5,
    BottomLeft = 6,
    Right = 8,
    TopRight = 9,
    BottomRight = 10,
}

impl ResizeEdge {
    pub fn from_raw(raw: u32) -> Option<Self> {
        let edge = match raw {
            0 => Self::None,
            1 => Self::Top,
            2 => Self::Bottom,
            4 => Self::Left,
            5 => Self::TopLeft,
            6 => Self::BottomLeft,
            8 => Self::Right,
            9 => Self::TopRight,
            10 => Self::BottomRight,
            _ => return None,
        };
        Some(edge)
    }
}

pub struct XdgToplevel {
    pub id: XdgToplevelId,
    pub xdg: Rc<XdgSurface>,
    parent: CloneCell<Weak<XdgToplevel>>,
    title: RefCell<String>,
    app_id: RefCell<String>,
    pending_maximized: Cell<Option<bool>>,
    pending_fullscreen: Cell<Option<bool>>,
    pending_min_size: Cell<(i32, i32)>,
    pending_max_size: Cell<(i32, i32)>,
    min_size: Cell<(i32, i32)>,
    max_size: Cell<(i32, i32)>,
}

impl Debug for XdgToplevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XdgToplevel").finish_non_exhaustive()
    }
}

impl XdgToplevel {
    pub fn new(id: XdgToplevelId, surface: &Rc<XdgSurface>) -> Self {
        Self {
            id,
            xdg: surface.clone(),
            parent: CloneCell::new(Weak::new()),
            title: Default::default(),
            app_id: Default::default(),
            pending_maximized: Cell::new(None),
            pending_fullscreen: Cell::new(None),
            pending_min_size: Cell::new((0, 0)),
            pending_max_size: Cell::new((0, 0)),
            min_size: Cell::new((0, 0)),
            max_size: Cell::new((0, 0)),
        }
    }

    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }

    pub fn app_id(&self) -> String {
        self.app_id.borrow().clone()
    }

    pub fn parent(&self) -> Option<Rc<XdgToplevel>> {
        self.parent.get().upgrade()
    }

    /// Committed minimum size. 0 means unconstrained.
    pub fn min_size(&self) -> (i32, i32) {
        self.min_size.get()
    }

    /// Committed maximum size. 0 means unconstrained.
    pub fn max_size(&self) -> (i32, i32) {
        self.max_size.get()
    }

    pub fn set_min_size(&self, width: i32, height: i32) -> Result<(), XdgToplevelError> {
        if width < 0 || height < 0 {
            return Err(self.xdg.client.fail(
                self,
                INVALID_SIZE,
                XdgToplevelError::NegativeSize(width, height),
            ));
        }
        self.pending_min_size.set((width, height));
        Ok(())
    }

    pub fn set_max_size(&self, width: i32, height: i32) -> Result<(), XdgToplevelError> {
        if width < 0 || height < 0 {
            return Err(self.xdg.client.fail(
                self,
                INVALID_SIZE,
                XdgToplevelError::NegativeSize(width, height),
            ));
        }
        self.pending_max_size.set((width, height));
        Ok(())
    }

    pub fn set_maximized(self: &Rc<Self>) {
        self.pending_maximized.set(Some(true));
        self.policy().on_maximize_requested(&self.xdg, true);
    }

    pub fn unset_maximized(self: &Rc<Self>) {
        self.pending_maximized.set(Some(false));
        self.policy().on_maximize_requested(&self.xdg, false);
    }

    pub fn set_fullscreen(self: &Rc<Self>) {
        self.pending_fullscreen.set(Some(true));
        self.policy().on_fullscreen_requested(&self.xdg, true);
    }

    pub fn unset_fullscreen(self: &Rc<Self>) {
        self.pending_fullscreen.set(Some(false));
        self.policy().on_fullscreen_requested(&self.xdg, false);
    }

    pub fn set_minimized(self: &Rc<Self>) {
        self.policy().on_minimize_requested(&self.xdg);
    }

    pub fn move_(self: &Rc<Self>, seat: &Rc<WlSeatGlobal>, serial: u32) {
        self.policy().on_move_requested(&self.xdg, seat, serial);
    }

    pub fn resize(self: &Rc<Self>, seat: &Rc<WlSeatGlobal>, serial: u32, edge: u32) {
        let Some(edge) = ResizeEdge::from_raw(edge) else {
            log::debug!(
                "Ignoring resize of xdg_toplevel@{} with invalid edge {}",
                self.id,
                edge
            );
            return;
        };
        self.policy()
            .on_resize_requested(&self.xdg, seat, serial, edge);
    }

    pub fn show_window_menu(self: &Rc<Self>, seat: &Rc<WlSeatGlobal>, serial: u32, x: i32, y: i32) {
        self.policy()
            .on_show_window_menu(&self.xdg, seat, serial, x, y);
    }

    pub fn set_parent(
        self: &Rc<Self>,
        parent: Option<&Rc<XdgToplevel>>,
    ) -> Result<(), XdgToplevelError> {
        if let Some(parent) = parent {
            let mut ancestor = Some(parent.clone());
            while let Some(a) = ancestor {
                if a.id == self.id {
                    return Err(self.xdg.client.fail(
                        &**self,
                        INVALID_PARENT,
                        XdgToplevelError::ParentLoop(self.id, parent.id),
                    ));
                }
                ancestor = a.parent();
            }
        }
        self.parent
            .set(parent.map(Rc::downgrade).unwrap_or_default());
        self.policy()
            .on_set_parent(&self.xdg, parent.map(|p| &p.xdg));
        Ok(())
    }

    pub fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }

    pub fn set_app_id(&self, app_id: &str) {
        *self.app_id.borrow_mut() = app_id.to_string();
    }

    pub(super) fn send_initial_configure(&self) {
        self.configure(0, 0);
    }

    /// Sends a configure with the current states. Pending maximize and
    /// fullscreen requests are applied first.
    pub fn configure(&self, width: i32, height: i32) -> u32 {
        if let Some(maximized) = self.pending_maximized.take() {
            self.xdg.set_state(MAXIMIZED, maximized);
        }
        if let Some(fullscreen) = self.pending_fullscreen.take() {
            self.xdg.set_state(FULLSCREEN, fullscreen);
        }
        let states = self.xdg.states();
        let mut list = SmallVec::<[u32; 4]>::new();
        if states.contains(MAXIMIZED) {
            list.push(STATE_MAXIMIZED);
        } else if states.contains(FULLSCREEN) {
            list.push(STATE_FULLSCREEN);
        }
        if (width, height) != (0, 0) && (width, height) != self.xdg.window_geometry().size() {
            list.push(STATE_RESIZING);
        }
        if states.contains(FOCUSED) {
            list.push(STATE_ACTIVATED);
        }
        let tiled = [
            (TILED_LEFT, STATE_TILED_LEFT),
            (TILED_RIGHT, STATE_TILED_RIGHT),
            (TILED_TOP, STATE_TILED_TOP),
            (TILED_BOTTOM, STATE_TILED_BOTTOM),
        ];
        if self.xdg.version() >= TILED_SINCE {
            for (flag, state) in tiled {
                if states.contains(flag) {
                    list.push(state);
                }
            }
        } else if tiled.iter().any(|(flag, _)| states.contains(*flag)) {
            log::debug!(
                "Not sending tiled states to xdg_toplevel@{} with version {}",
                self.id,
                self.xdg.version(),
            );
        }
        self.xdg.client.event(Event::ToplevelConfigure {
            toplevel: self.id,
            width,
            height,
            states: list,
        });
        self.xdg.send_configure_serial()
    }

    pub fn send_close(&self) {
        self.xdg.client.event(Event::ToplevelClose { toplevel: self.id });
    }

    pub(in crate::ifs::wl_surface) fn validate_commit(&self) -> Result<(), XdgToplevelError> {
        self.xdg.validate_commit()?;
        let (min_w, min_h) = self.pending_min_size.get();
        let (max_w, max_h) = self.pending_max_size.get();
        let conflicts = |min: i32, max: i32| min != 0 && max != 0 && min > max;
        if conflicts(min_w, max_w) || conflicts(min_h, max_h) {
            return Err(self.xdg.client.fail(
                self,
                INVALID_SIZE,
                XdgToplevelError::MinGreaterThanMax {
                    min: (min_w, min_h),
                    max: (max_w, max_h),
                },
            ));
        }
        Ok(())
    }

    pub(in crate::ifs::wl_surface) fn committed(&self) {
        self.min_size.set(self.pending_min_size.get());
        self.max_size.set(self.pending_max_size.get());
        self.xdg.committed();
        self.xdg.notify_committed();
    }

    pub fn destroy(&self) -> Result<(), XdgToplevelError> {
        self.xdg.role_destroyed();
        self.xdg.client.remove_obj(self)?;
        Ok(())
    }

    fn policy(&self) -> Rc<dyn ShellPolicy> {
        self.xdg.client.state.policy.get()
    }
}

object_base!(XdgToplevel, XDG_TOPLEVEL);

impl Object for XdgToplevel {}

#[derive(Debug, Error)]
pub enum XdgToplevelError {
    #[error("Size must not be negative, got {0}x{1}")]
    NegativeSize(i32, i32),
    #[error("Minimum size {min:?} is larger than maximum size {max:?}")]
    MinGreaterThanMax { min: (i32, i32), max: (i32, i32) },
    #[error("Making xdg_toplevel {1} the parent of xdg_toplevel {0} would create a loop")]
    ParentLoop(XdgToplevelId, XdgToplevelId),
    #[error(transparent)]
    XdgSurfaceError(Box<XdgSurfaceError>),
    #[error(transparent)]
    ClientError(Box<ClientError>),
}
efrom!(XdgToplevelError, XdgSurfaceError);
efrom!(XdgToplevelError, ClientError);
