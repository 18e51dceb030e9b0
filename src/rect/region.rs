use {
    crate::rect::Rect,
    smallvec::SmallVec,
    std::{fmt::Debug, rc::Rc},
    wl_shell_algorithms::rect::{
        Container, RectRaw,
        region::{extents, intersect, rects_to_bands, subtract, union},
    },
};

/// An immutable set of pixels stored as banded rectangles.
///
/// Regions are shared through `Rc`; operations return new regions.
#[derive(Clone, Eq, PartialEq, Default)]
pub struct Region {
    rects: Container,
    extents: Rect,
}

impl Debug for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.rects()).finish()
    }
}

impl Region {
    pub fn new(rect: Rect) -> Rc<Self> {
        if rect.is_empty() {
            return Self::empty();
        }
        let mut rects = SmallVec::new();
        rects.push(rect.raw());
        Rc::new(Self {
            rects,
            extents: rect,
        })
    }

    pub fn empty() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn from_rects(rects: &[Rect]) -> Rc<Self> {
        let raw: SmallVec<[RectRaw; 4]> = rects.iter().map(|r| r.raw()).collect();
        Self::from_container(rects_to_bands(&raw))
    }

    fn from_container(rects: Container) -> Rc<Self> {
        Rc::new(Self {
            extents: Rect::from_raw(extents(&rects)),
            rects,
        })
    }

    pub fn union(self: &Rc<Self>, other: &Rc<Self>) -> Rc<Self> {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        Self::from_container(union(&self.rects, &other.rects))
    }

    pub fn union_rect(self: &Rc<Self>, rect: Rect) -> Rc<Self> {
        self.union(&Self::new(rect))
    }

    pub fn subtract(self: &Rc<Self>, other: &Rc<Self>) -> Rc<Self> {
        if self.is_empty() || other.is_empty() {
            return self.clone();
        }
        Self::from_container(subtract(&self.rects, &other.rects))
    }

    pub fn intersect(self: &Rc<Self>, other: &Rc<Self>) -> Rc<Self> {
        if !self.extents.intersects(&other.extents) {
            return Self::empty();
        }
        Self::from_container(intersect(&self.rects, &other.rects))
    }

    pub fn intersect_rect(self: &Rc<Self>, rect: Rect) -> Rc<Self> {
        self.intersect(&Self::new(rect))
    }

    pub fn move_(&self, dx: i32, dy: i32) -> Rc<Self> {
        Rc::new(Self {
            rects: self
                .rects
                .iter()
                .map(|r| Rect::from_raw(*r).move_(dx, dy).raw())
                .collect(),
            extents: self.extents.move_(dx, dy),
        })
    }

    pub fn extents(&self) -> Rect {
        self.extents
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        if !self.extents.contains(x, y) {
            return false;
        }
        self.rects().any(|r| r.contains(x, y))
    }

    pub fn rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.rects.iter().map(|r| Rect::from_raw(*r))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum BuilderOp {
    Add,
    Sub,
}

/// Accumulates add/subtract operations and applies them lazily.
#[derive(Default)]
pub struct RegionBuilder {
    base: Container,
    pending: SmallVec<[RectRaw; 8]>,
    op: Option<BuilderOp>,
}

impl RegionBuilder {
    pub fn add(&mut self, rect: Rect) {
        self.set_op(BuilderOp::Add);
        self.pending.push(rect.raw());
    }

    pub fn sub(&mut self, rect: Rect) {
        self.set_op(BuilderOp::Sub);
        self.pending.push(rect.raw());
    }

    pub fn get(&mut self) -> Rc<Region> {
        self.flush();
        Region::from_container(self.base.clone())
    }

    pub fn clear(&mut self) {
        self.base.clear();
        self.pending.clear();
        self.op = None;
    }

    fn set_op(&mut self, op: BuilderOp) {
        if self.op != Some(op) {
            self.flush();
            self.op = Some(op);
        }
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let pending = rects_to_bands(&self.pending);
        self.base = match self.op {
            Some(BuilderOp::Sub) => subtract(&self.base, &pending),
            _ => union(&self.base, &pending),
        };
        self.pending.clear();
    }
}
