use {
    crate::{
        ifs::{
            wl_seat::WlSeatGlobal,
            wl_surface::{
                SurfaceObserver, WlSurface,
                view::{ATTACHED, SurfaceView},
            },
        },
        rect::Rect,
        utils::event_listener::EventListener,
    },
    std::{
        cell::Cell,
        rc::{Rc, Weak},
    },
};

/// A surface used as the cursor image of a seat.
pub struct CursorSurface {
    seat: Weak<WlSeatGlobal>,
    pub surface: Rc<WlSurface>,
    hotspot: Cell<(i32, i32)>,
    pos: Cell<(i32, i32)>,
    extents: Cell<Rect>,
    surface_destroy: EventListener<dyn SurfaceObserver>,
}

impl CursorSurface {
    pub fn new(seat: &Rc<WlSeatGlobal>, surface: &Rc<WlSurface>) -> Rc<Self> {
        let slf = Rc::new_cyclic(|weak: &Weak<Self>| Self {
            seat: Rc::downgrade(seat),
            surface: surface.clone(),
            hotspot: Cell::new((0, 0)),
            pos: Cell::new((0, 0)),
            extents: Cell::new(Default::default()),
            surface_destroy: EventListener::new(weak.clone()),
        });
        slf.surface_destroy.attach(&surface.destroy_event);
        slf.update_extents();
        slf
    }

    fn update_extents(&self) {
        let (pos_x, pos_y) = self.pos.get();
        let (hot_x, hot_y) = self.hotspot.get();
        let (width, height) = self.surface.size();
        let extents = Rect::new_sized(pos_x - hot_x, pos_y - hot_y, width, height);
        self.extents.set(extents.unwrap_or_default());
    }

    pub fn hotspot(&self) -> (i32, i32) {
        self.hotspot.get()
    }

    pub fn set_hotspot(&self, x: i32, y: i32) {
        self.hotspot.set((x, y));
        self.update_extents();
    }

    /// Moves the hotspot against the attach offset of a commit.
    fn dec_hotspot(&self, dx: i32, dy: i32) {
        let (hot_x, hot_y) = self.hotspot.get();
        self.hotspot.set((hot_x - dx, hot_y - dy));
    }

    pub fn set_position(&self, x: i32, y: i32) {
        self.pos.set((x, y));
        self.update_extents();
    }

    pub fn extents(&self) -> Rect {
        self.extents.get()
    }

    pub(super) fn committed(&self, current: &SurfaceView) {
        if current.commit_state.contains(ATTACHED) {
            let (dx, dy) = current.offset;
            self.dec_hotspot(dx, dy);
        }
        self.update_extents();
    }
}

impl SurfaceObserver for CursorSurface {
    fn surface_destroyed(&self, surface: &Rc<WlSurface>) {
        let Some(seat) = self.seat.upgrade() else {
            return;
        };
        if seat.cursor().is_some_and(|c| c.surface.id == surface.id) {
            seat.set_cursor(None);
        }
    }
}
