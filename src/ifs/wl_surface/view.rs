use {
    crate::{
        ifs::wl_buffer::WlBuffer,
        rect::{Rect, Region},
        transform::{Mat3, Transform},
    },
    std::{mem, rc::Rc},
};

bitflags! {
    CommitState: u32;
        ATTACHED = 1 << 0,
        DAMAGED = 1 << 1,
        BUFFER_DAMAGED = 1 << 2,
        BUFFER_TRANSFORM = 1 << 3,
        BUFFER_SCALED = 1 << 4,
        CROPPED = 1 << 5,
        OPAQUE_REGION = 1 << 6,
        INPUT_REGION = 1 << 7,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct PlaneId(pub u32);

/// One generation of surface state.
#[derive(Clone)]
pub struct SurfaceView {
    /// What changed relative to the previous generation.
    pub commit_state: CommitState,
    /// The buffer attached in this generation. Only meaningful if
    /// `ATTACHED` is set; `None` then unmaps the surface.
    pub buffer: Option<Rc<WlBuffer>>,
    pub offset: (i32, i32),
    pub scale: i32,
    pub transform: Transform,
    /// Source rectangle in surface-scaled buffer coordinates.
    pub crop: Option<Rect>,
    pub surface_to_buffer: Mat3,
    pub size: (i32, i32),
    /// Surface-local damage.
    pub surface_damage: Rc<Region>,
    /// Damage in buffer pixels.
    pub buffer_damage: Rc<Region>,
    pub opaque_region: Option<Rc<Region>>,
    /// `None` accepts input everywhere.
    pub input_region: Option<Rc<Region>>,
    pub plane: Option<PlaneId>,
}

impl Default for SurfaceView {
    fn default() -> Self {
        Self {
            commit_state: CommitState::none(),
            buffer: None,
            offset: (0, 0),
            scale: 1,
            transform: Transform::None,
            crop: None,
            surface_to_buffer: Mat3::IDENTITY,
            size: (0, 0),
            surface_damage: Region::empty(),
            buffer_damage: Region::empty(),
            opaque_region: None,
            input_region: None,
            plane: None,
        }
    }
}

impl SurfaceView {
    /// The starting point of the next generation: persistent state is kept,
    /// per-commit state is cleared.
    pub fn inherit(&self) -> Self {
        Self {
            commit_state: CommitState::none(),
            buffer: None,
            surface_damage: Region::empty(),
            buffer_damage: Region::empty(),
            ..self.clone()
        }
    }

    /// Folds a later generation into this one. Used for commits that are
    /// cached until an ancestor commits.
    pub fn merge(&mut self, newer: SurfaceView) {
        let state = newer.commit_state;
        let buffer = match state.contains(ATTACHED) {
            true => newer.buffer.clone(),
            false => self.buffer.take(),
        };
        let surface_damage = self.surface_damage.union(&newer.surface_damage);
        let buffer_damage = self.buffer_damage.union(&newer.buffer_damage);
        let commit_state = self.commit_state | state;
        *self = SurfaceView {
            commit_state,
            buffer,
            surface_damage,
            buffer_damage,
            ..newer
        };
    }

    /// Recomputes the derived fields for a buffer of the given size.
    pub fn resolve(&mut self, buffer_size: Option<(i32, i32)>) {
        let Some(buffer_size) = buffer_size else {
            self.size = (0, 0);
            self.surface_to_buffer = Mat3::IDENTITY;
            return;
        };
        let scale = self.scale.max(1);
        let (tw, th) = self.transform.maybe_swap(buffer_size);
        let mut m = self
            .transform
            .to_buffer(tw as f32, th as f32)
            .compose(&Mat3::scale(scale as f32, scale as f32));
        self.size = match self.crop {
            Some(crop) => {
                m = m.compose(&Mat3::translate(crop.x1() as f32, crop.y1() as f32));
                crop.size()
            }
            None => (tw / scale, th / scale),
        };
        self.surface_to_buffer = m;
    }

    pub fn damage_in_buffer_space(&self) -> Rc<Region> {
        let converted = self.surface_to_buffer.transform_region(&self.surface_damage);
        self.buffer_damage.union(&converted)
    }

    pub fn damage_in_surface_space(&self) -> Rc<Region> {
        if self.buffer_damage.is_empty() {
            return self.surface_damage.clone();
        }
        match self.surface_to_buffer.invert() {
            Some(inv) => {
                let converted = inv.transform_region(&self.buffer_damage);
                self.surface_damage.union(&converted)
            }
            None => self.surface_damage.clone(),
        }
    }

    pub fn surface_rect(&self) -> Rect {
        Rect::new_sized(0, 0, self.size.0, self.size.1).unwrap_or_default()
    }

    pub fn accepts_input_at(&self, x: i32, y: i32) -> bool {
        if !self.surface_rect().contains(x, y) {
            return false;
        }
        match &self.input_region {
            Some(r) => r.contains(x, y),
            None => true,
        }
    }
}

/// The pending, current and previous generations of a surface.
#[derive(Default)]
pub struct ViewSlots {
    pub pending: SurfaceView,
    pub current: Rc<SurfaceView>,
    pub previous: Rc<SurfaceView>,
}

impl ViewSlots {
    /// Removes the pending generation, leaving an inheriting copy behind.
    pub fn take_pending(&mut self) -> SurfaceView {
        let next = self.pending.inherit();
        mem::replace(&mut self.pending, next)
    }

    /// `current` becomes `previous` and `committed` becomes `current`.
    pub fn rotate(self, committed: SurfaceView) -> Self {
        Self {
            pending: self.pending,
            previous: self.current,
            current: Rc::new(committed),
        }
    }
}
