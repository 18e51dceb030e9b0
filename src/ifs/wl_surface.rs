pub mod cursor;
#[cfg(test)]
mod tests;
pub mod view;
pub mod wl_subsurface;
pub mod xdg_surface;

use {
    crate::{
        client::{Client, ClientError},
        gfx_api::{BufferUpload, TextureHandle},
        ifs::{
            wl_buffer::WlBuffer,
            wl_callback::WlCallback,
            wl_region::WlRegion,
            wl_surface::{
                cursor::CursorSurface,
                view::{
                    ATTACHED, BUFFER_DAMAGED, BUFFER_SCALED, BUFFER_TRANSFORM, CROPPED, DAMAGED,
                    INPUT_REGION, OPAQUE_REGION, PlaneId, SurfaceView, ViewSlots,
                },
                wl_subsurface::{WlSubsurface, WlSubsurfaceError},
                xdg_surface::{
                    XdgSurfaceError,
                    xdg_popup::{XdgPopup, XdgPopupError},
                    xdg_toplevel::{XdgToplevel, XdgToplevelError},
                },
            },
        },
        object::{Object, WL_SURFACE},
        rect::{Rect, Region},
        transform::{Mat3, Transform},
        utils::{
            clonecell::{CloneCell, UnsafeCellCloneSafe},
            errorfmt::ErrorFmt,
            event_listener::EventSource,
        },
        wire::WlSurfaceId,
    },
    ahash::AHashMap,
    isnt::std_1::vec::IsntVecExt,
    linearize::{Linearize, LinearizeExt, StaticMap},
    std::{
        cell::{Cell, RefCell},
        fmt::{Debug, Formatter},
        mem,
        rc::{Rc, Weak},
    },
    thiserror::Error,
};

const INVALID_SCALE: u32 = 0;
const INVALID_TRANSFORM: u32 = 1;
const INVALID_SIZE: u32 = 2;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SurfaceRole {
    None,
    Toplevel,
    Popup,
    Subsurface,
    Cursor,
}

impl SurfaceRole {
    pub fn name(self) -> &'static str {
        match self {
            SurfaceRole::None => "none",
            SurfaceRole::Toplevel => "xdg_toplevel",
            SurfaceRole::Popup => "xdg_popup",
            SurfaceRole::Subsurface => "subsurface",
            SurfaceRole::Cursor => "cursor",
        }
    }
}

/// The role of a surface together with the object implementing it.
///
/// The object is `None` once the role object has been destroyed. The surface
/// keeps its role in that case.
#[derive(Clone, Default)]
pub enum Role {
    #[default]
    None,
    Toplevel(Option<Rc<XdgToplevel>>),
    Popup(Option<Rc<XdgPopup>>),
    Subsurface(Option<Rc<WlSubsurface>>),
    Cursor(Option<Rc<CursorSurface>>),
}

unsafe impl UnsafeCellCloneSafe for Role {}

impl Role {
    pub fn kind(&self) -> SurfaceRole {
        match self {
            Role::None => SurfaceRole::None,
            Role::Toplevel(_) => SurfaceRole::Toplevel,
            Role::Popup(_) => SurfaceRole::Popup,
            Role::Subsurface(_) => SurfaceRole::Subsurface,
            Role::Cursor(_) => SurfaceRole::Cursor,
        }
    }

    fn has_object(&self) -> bool {
        match self {
            Role::None => false,
            Role::Toplevel(o) => o.is_some(),
            Role::Popup(o) => o.is_some(),
            Role::Subsurface(o) => o.is_some(),
            Role::Cursor(o) => o.is_some(),
        }
    }

    fn without_object(&self) -> Self {
        match self {
            Role::None => Role::None,
            Role::Toplevel(_) => Role::Toplevel(None),
            Role::Popup(_) => Role::Popup(None),
            Role::Subsurface(_) => Role::Subsurface(None),
            Role::Cursor(_) => Role::Cursor(None),
        }
    }
}

impl Debug for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind().name())?;
        if !self.has_object() && self.kind() != SurfaceRole::None {
            write!(f, " (destroyed)")?;
        }
        Ok(())
    }
}

/// Named slots through which other components reference a surface without
/// owning it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Linearize)]
pub enum SurfaceLink {
    Layer,
    Output,
    Input,
    Compositor,
    Plane,
}

pub trait LinkOwner {
    fn surface_unlinked(&self, surface: &WlSurface, link: SurfaceLink);
}

pub trait SurfaceObserver {
    fn surface_committed(&self, surface: &Rc<WlSurface>) {
        let _ = surface;
    }

    fn surface_destroyed(&self, surface: &Rc<WlSurface>) {
        let _ = surface;
    }

    fn surface_frame(&self, surface: &Rc<WlSurface>, time: u32) {
        let _ = (surface, time);
    }

    fn surface_dirty(&self, surface: &Rc<WlSurface>, damage: &Region) {
        let _ = (surface, damage);
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceGeometry {
    pub x: f32,
    pub y: f32,
    /// Global bounding box.
    pub bbox: Rect,
    /// Surface-local to global.
    pub transform: Mat3,
    pub inverse: Mat3,
}

impl Default for SurfaceGeometry {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            bbox: Rect::default(),
            transform: Mat3::IDENTITY,
            inverse: Mat3::IDENTITY,
        }
    }
}

pub struct SurfaceBuffer {
    pub buffer: Rc<WlBuffer>,
    pub texture: TextureHandle,
}

/// A commit that has been taken out of the pending slot but not yet
/// applied.
pub struct PendingCommit {
    pub view: SurfaceView,
    frames: Vec<Rc<WlCallback>>,
}

impl PendingCommit {
    fn merge(&mut self, newer: PendingCommit) {
        self.view.merge(newer.view);
        self.frames.extend(newer.frames);
    }
}

#[derive(Default)]
pub struct ParentData {
    pub subsurfaces: AHashMap<WlSurfaceId, Rc<WlSubsurface>>,
    /// Bottom to top, as requested since the last commit.
    pub pending_order: Vec<Rc<WlSubsurface>>,
    /// Bottom to top, as of the last commit.
    pub order: Rc<[Rc<WlSubsurface>]>,
}

pub struct WlSurface {
    pub id: WlSurfaceId,
    pub client: Rc<Client>,
    role: CloneCell<Role>,
    views: RefCell<ViewSlots>,
    pending_frames: RefCell<Vec<Rc<WlCallback>>>,
    frame_requests: RefCell<Vec<Rc<WlCallback>>>,
    cached: RefCell<Option<PendingCommit>>,
    buffer: CloneCell<Option<Rc<SurfaceBuffer>>>,
    children: RefCell<Option<Box<ParentData>>>,
    geometry: Cell<SurfaceGeometry>,
    dirty: CloneCell<Rc<Region>>,
    links: RefCell<StaticMap<SurfaceLink, Option<Weak<dyn LinkOwner>>>>,
    mapped: Cell<bool>,
    has_committed: Cell<bool>,
    has_xdg_surface: Cell<bool>,
    destroyed: Cell<bool>,
    pub commit_event: EventSource<dyn SurfaceObserver>,
    pub destroy_event: EventSource<dyn SurfaceObserver>,
    pub frame_event: EventSource<dyn SurfaceObserver>,
    pub dirty_event: EventSource<dyn SurfaceObserver>,
}

impl WlSurface {
    pub fn new(id: WlSurfaceId, client: &Rc<Client>) -> Rc<Self> {
        Rc::new(Self {
            id,
            client: client.clone(),
            role: Default::default(),
            views: Default::default(),
            pending_frames: Default::default(),
            frame_requests: Default::default(),
            cached: Default::default(),
            buffer: Default::default(),
            children: Default::default(),
            geometry: Default::default(),
            dirty: CloneCell::new(Region::empty()),
            links: Default::default(),
            mapped: Cell::new(false),
            has_committed: Cell::new(false),
            has_xdg_surface: Cell::new(false),
            destroyed: Cell::new(false),
            commit_event: Default::default(),
            destroy_event: Default::default(),
            frame_event: Default::default(),
            dirty_event: Default::default(),
        })
    }

    pub fn role(&self) -> Role {
        self.role.get()
    }

    pub fn role_kind(&self) -> SurfaceRole {
        self.role.get().kind()
    }

    /// Binds the surface to `role`.
    ///
    /// Binding the role the surface already has replaces the role object.
    /// A different role can only be bound while the surface has no role, or
    /// while the previous role object is gone and the surface is unmapped.
    pub fn set_role(self: &Rc<Self>, role: Role) -> Result<(), WlSurfaceError> {
        let old = self.role.get();
        let (old_kind, new_kind) = (old.kind(), role.kind());
        if old_kind != new_kind {
            if old_kind != SurfaceRole::None && (old.has_object() || self.mapped.get()) {
                return Err(WlSurfaceError::IncompatibleRole {
                    id: self.id,
                    old: old_kind,
                    new: new_kind,
                });
            }
            if !self.client.state.policy.get().allow_role(self, new_kind) {
                return Err(WlSurfaceError::RoleDenied(self.id, new_kind));
            }
            log::debug!("wl_surface@{} is now a {}", self.id, new_kind.name());
        }
        self.role.set(role);
        Ok(())
    }

    /// Called when the role object is destroyed. The role itself stays.
    pub(crate) fn unset_role_object(&self) {
        let role = self.role.get();
        self.role.set(role.without_object());
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped.get()
    }

    pub fn has_committed(&self) -> bool {
        self.has_committed.get()
    }

    pub(crate) fn has_xdg_surface(&self) -> bool {
        self.has_xdg_surface.get()
    }

    pub(crate) fn set_has_xdg_surface(&self, has: bool) {
        self.has_xdg_surface.set(has);
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    pub fn attach(&self, buffer: Option<&Rc<WlBuffer>>, dx: i32, dy: i32) {
        let views = &mut *self.views.borrow_mut();
        views.pending.buffer = buffer.cloned();
        views.pending.offset = (dx, dy);
        views.pending.commit_state |= ATTACHED;
    }

    pub fn damage(&self, x: i32, y: i32, width: i32, height: i32) {
        let Some(rect) = Rect::new_sized(x, y, width, height) else {
            log::debug!("Ignoring damage with negative size on wl_surface@{}", self.id);
            return;
        };
        let views = &mut *self.views.borrow_mut();
        views.pending.surface_damage = views.pending.surface_damage.union_rect(rect);
        views.pending.commit_state |= DAMAGED;
    }

    pub fn damage_buffer(&self, x: i32, y: i32, width: i32, height: i32) {
        let Some(rect) = Rect::new_sized(x, y, width, height) else {
            log::debug!("Ignoring damage with negative size on wl_surface@{}", self.id);
            return;
        };
        let views = &mut *self.views.borrow_mut();
        views.pending.buffer_damage = views.pending.buffer_damage.union_rect(rect);
        views.pending.commit_state |= BUFFER_DAMAGED;
    }

    pub fn set_opaque_region(&self, region: Option<&Rc<WlRegion>>) {
        let views = &mut *self.views.borrow_mut();
        views.pending.opaque_region = region.map(|r| r.region());
        views.pending.commit_state |= OPAQUE_REGION;
    }

    pub fn set_input_region(&self, region: Option<&Rc<WlRegion>>) {
        let views = &mut *self.views.borrow_mut();
        views.pending.input_region = region.map(|r| r.region());
        views.pending.commit_state |= INPUT_REGION;
    }

    pub fn set_buffer_scale(&self, scale: i32) -> Result<(), WlSurfaceError> {
        if scale < 1 {
            return Err(self
                .client
                .fail(self, INVALID_SCALE, WlSurfaceError::NonPositiveBufferScale(scale)));
        }
        let views = &mut *self.views.borrow_mut();
        views.pending.scale = scale;
        views.pending.commit_state |= BUFFER_SCALED;
        Ok(())
    }

    pub fn set_buffer_transform(&self, transform: i32) -> Result<(), WlSurfaceError> {
        let Some(transform) = Transform::from_wl(transform) else {
            return Err(self.client.fail(
                self,
                INVALID_TRANSFORM,
                WlSurfaceError::UnknownBufferTransform(transform),
            ));
        };
        let views = &mut *self.views.borrow_mut();
        views.pending.transform = transform;
        views.pending.commit_state |= BUFFER_TRANSFORM;
        Ok(())
    }

    /// Restricts the surface to part of the buffer, or shows the whole
    /// buffer again if `crop` is `None`.
    pub fn set_crop(&self, crop: Option<(i32, i32, i32, i32)>) -> Result<(), WlSurfaceError> {
        let crop = match crop {
            None => None,
            Some((x, y, width, height)) => {
                if width <= 0 || height <= 0 {
                    return Err(self.client.fail(
                        self,
                        INVALID_SIZE,
                        WlSurfaceError::NonPositiveCrop(width, height),
                    ));
                }
                Rect::new_sized(x, y, width, height)
            }
        };
        let views = &mut *self.views.borrow_mut();
        views.pending.crop = crop;
        views.pending.commit_state |= CROPPED;
        Ok(())
    }

    pub fn set_plane(&self, plane: Option<PlaneId>) {
        self.views.borrow_mut().pending.plane = plane;
    }

    pub fn frame(&self) -> Result<Rc<WlCallback>, WlSurfaceError> {
        let cb = Rc::new(WlCallback::new(self.client.new_id(), &self.client));
        self.client.add_client_obj(&cb)?;
        self.pending_frames.borrow_mut().push(cb.clone());
        Ok(cb)
    }

    /// A copy of the pending generation.
    pub fn pending(&self) -> SurfaceView {
        self.views.borrow().pending.clone()
    }

    pub fn current(&self) -> Rc<SurfaceView> {
        self.views.borrow().current.clone()
    }

    pub fn previous(&self) -> Rc<SurfaceView> {
        self.views.borrow().previous.clone()
    }

    pub fn buffer(&self) -> Option<Rc<SurfaceBuffer>> {
        self.buffer.get()
    }

    pub fn size(&self) -> (i32, i32) {
        self.views.borrow().current.size
    }

    pub fn commit(self: &Rc<Self>) -> Result<(), WlSurfaceError> {
        let commit = PendingCommit {
            view: self.views.borrow_mut().take_pending(),
            frames: mem::take(&mut *self.pending_frames.borrow_mut()),
        };
        if let Role::Subsurface(Some(ss)) = self.role.get() {
            if ss.is_synchronized() {
                self.cache_commit(commit);
                return Ok(());
            }
        }
        self.apply_commit(commit)
    }

    fn cache_commit(&self, commit: PendingCommit) {
        let cached = &mut *self.cached.borrow_mut();
        match cached {
            Some(cached) => cached.merge(commit),
            None => *cached = Some(commit),
        }
    }

    pub(crate) fn take_cached(&self) -> Option<PendingCommit> {
        self.cached.borrow_mut().take()
    }

    pub fn has_cached_commit(&self) -> bool {
        self.cached.borrow().is_some()
    }

    pub(crate) fn apply_commit(self: &Rc<Self>, commit: PendingCommit) -> Result<(), WlSurfaceError> {
        self.validate_commit()?;
        let mut view = commit.view;
        self.apply_buffer(&mut view);
        let old_size = self.size();
        {
            let views = &mut *self.views.borrow_mut();
            *views = mem::take(views).rotate(view);
        }
        self.frame_requests.borrow_mut().extend(commit.frames);
        self.has_committed.set(true);
        let current = self.current();
        if current.size != old_size {
            let geo = self.geometry.get();
            self.set_geometry(geo.x, geo.y, current.size);
        }
        self.accumulate_damage(&current);
        self.commit_children()?;
        self.role_committed(&current);
        for l in self.commit_event.iter() {
            l.surface_committed(self);
        }
        Ok(())
    }

    fn validate_commit(&self) -> Result<(), WlSurfaceError> {
        match self.role.get() {
            Role::Toplevel(Some(tl)) => tl.validate_commit()?,
            Role::Popup(Some(popup)) => popup.xdg.validate_commit()?,
            _ => {}
        }
        Ok(())
    }

    fn apply_buffer(&self, view: &mut SurfaceView) {
        let old = self.buffer.get();
        let old_size = old.as_ref().map(|b| (b.buffer.width(), b.buffer.height()));
        if !view.commit_state.contains(ATTACHED) {
            view.resolve(old_size);
            return;
        }
        let Some(buffer) = view.buffer.clone() else {
            if let Some(old) = self.buffer.set(None) {
                old.buffer.release();
            }
            self.mapped.set(false);
            view.resolve(None);
            return;
        };
        view.resolve(Some((buffer.width(), buffer.height())));
        let previous = old
            .as_ref()
            .filter(|o| Rc::ptr_eq(&o.buffer, &buffer))
            .map(|o| o.texture);
        let damage = view.damage_in_buffer_space();
        let upload = BufferUpload {
            buffer: &buffer,
            damage: &damage,
            previous,
        };
        match self.client.state.importer.get().try_import(&upload) {
            Ok(texture) => {
                self.buffer.set(Some(Rc::new(SurfaceBuffer {
                    buffer: buffer.clone(),
                    texture,
                })));
                if let Some(old) = old {
                    if !Rc::ptr_eq(&old.buffer, &buffer) {
                        old.buffer.release();
                    }
                }
                self.mapped.set(true);
            }
            Err(e) => {
                log::warn!(
                    "Could not import wl_buffer@{} of wl_surface@{}: {}",
                    buffer.id,
                    self.id,
                    ErrorFmt(e),
                );
                buffer.release();
                view.resolve(old_size);
            }
        }
    }

    fn accumulate_damage(self: &Rc<Self>, current: &SurfaceView) {
        let mut local = current.damage_in_surface_space();
        if current.commit_state.contains(ATTACHED) {
            local = local.union_rect(current.surface_rect());
        }
        if local.is_empty() {
            return;
        }
        let geo = self.geometry.get();
        let global = geo.transform.transform_region(&local).intersect_rect(geo.bbox);
        self.add_dirty(&global);
    }

    fn add_dirty(self: &Rc<Self>, damage: &Rc<Region>) {
        if damage.is_empty() {
            return;
        }
        self.dirty.set(self.dirty.get().union(damage));
        for l in self.dirty_event.iter() {
            l.surface_dirty(self, damage);
        }
    }

    /// Accumulated global damage since the last frame.
    pub fn dirty(&self) -> Rc<Region> {
        self.dirty.get()
    }

    fn commit_children(self: &Rc<Self>) -> Result<(), WlSurfaceError> {
        let order = {
            let children = &mut *self.children.borrow_mut();
            let Some(children) = children else {
                return Ok(());
            };
            if children.order.len() != children.pending_order.len()
                || children
                    .order
                    .iter()
                    .zip(children.pending_order.iter())
                    .any(|(a, b)| !Rc::ptr_eq(a, b))
            {
                children.order = children.pending_order.iter().cloned().collect();
            }
            children.order.clone()
        };
        for child in order.iter() {
            child.parent_committed()?;
        }
        Ok(())
    }

    fn role_committed(self: &Rc<Self>, current: &SurfaceView) {
        match self.role.get() {
            Role::Toplevel(Some(tl)) => tl.committed(),
            Role::Popup(Some(popup)) => popup.committed(),
            Role::Subsurface(Some(ss)) => ss.update_position(),
            Role::Cursor(Some(cursor)) => cursor.committed(current),
            _ => {}
        }
    }

    pub fn geometry(&self) -> SurfaceGeometry {
        self.geometry.get()
    }

    pub fn position(&self) -> (f32, f32) {
        let geo = self.geometry.get();
        (geo.x, geo.y)
    }

    /// Global bounding box.
    pub fn bounding_box(&self) -> Rect {
        self.geometry.get().bbox
    }

    /// Moves the surface. Subsurfaces and popups follow.
    pub fn set_position(self: &Rc<Self>, x: f32, y: f32) {
        let geo = self.geometry.get();
        if geo.x == x && geo.y == y {
            return;
        }
        self.set_geometry(x, y, self.size());
        for ss in self.subsurfaces().iter() {
            ss.update_position();
        }
        match self.role.get() {
            Role::Toplevel(Some(tl)) => tl.xdg.update_popup_positions(),
            Role::Popup(Some(popup)) => popup.xdg.update_popup_positions(),
            _ => {}
        }
    }

    fn set_geometry(self: &Rc<Self>, x: f32, y: f32, (width, height): (i32, i32)) {
        let old = self.geometry.get();
        let transform = Mat3::translate(x, y);
        let bbox = Rect::new_sized(x.floor() as i32, y.floor() as i32, width, height)
            .unwrap_or_default();
        self.geometry.set(SurfaceGeometry {
            x,
            y,
            bbox,
            transform,
            inverse: transform.invert().unwrap_or(Mat3::IDENTITY),
        });
        if old.bbox != bbox {
            let damage = Region::from_rects(&[old.bbox, bbox]);
            self.add_dirty(&damage);
        }
    }

    /// Converts a global point to surface-local coordinates.
    pub fn to_local(&self, x: f32, y: f32) -> (f32, f32) {
        self.geometry.get().inverse.transform_point(x, y)
    }

    pub fn point_in_surface(&self, x: f32, y: f32) -> bool {
        let (lx, ly) = self.to_local(x, y);
        let (w, h) = self.size();
        lx >= 0.0 && ly >= 0.0 && lx < w as f32 && ly < h as f32
    }

    pub fn point_in_input_region(&self, x: f32, y: f32) -> bool {
        if !self.point_in_surface(x, y) {
            return false;
        }
        let (lx, ly) = self.to_local(x, y);
        self.current()
            .accepts_input_at(lx.floor() as i32, ly.floor() as i32)
    }

    /// The topmost mapped surface of this tree that accepts input at the
    /// global point.
    pub fn surface_at(self: &Rc<Self>, x: f32, y: f32) -> Option<Rc<WlSurface>> {
        if !self.mapped.get() {
            return None;
        }
        for ss in self.subsurfaces().iter().rev() {
            if let Some(s) = ss.surface.surface_at(x, y) {
                return Some(s);
            }
        }
        if self.point_in_input_region(x, y) {
            return Some(self.clone());
        }
        None
    }

    /// Surface-local bounding box of the mapped parts of this tree.
    pub fn extents_with_children(&self) -> Rect {
        let mut extents = self.current().surface_rect();
        if !self.mapped.get() {
            extents = Rect::default();
        }
        for ss in self.subsurfaces().iter() {
            let ce = ss.surface.extents_with_children();
            if !ce.is_empty() {
                let (x, y) = ss.position();
                extents = extents.union(ce.move_(x, y));
            }
        }
        extents
    }

    /// Child subsurfaces in committed stacking order, bottom to top.
    pub fn subsurfaces(&self) -> Rc<[Rc<WlSubsurface>]> {
        match &*self.children.borrow() {
            Some(c) => c.order.clone(),
            None => Rc::new([]),
        }
    }

    pub fn pending_subsurfaces(&self) -> Vec<Rc<WlSubsurface>> {
        match &*self.children.borrow() {
            Some(c) => c.pending_order.clone(),
            None => vec![],
        }
    }

    pub(crate) fn add_subsurface(&self, ss: &Rc<WlSubsurface>) {
        let children = &mut *self.children.borrow_mut();
        let children = children.get_or_insert_with(Default::default);
        children.subsurfaces.insert(ss.surface.id, ss.clone());
        children.pending_order.push(ss.clone());
    }

    pub(crate) fn remove_subsurface(&self, ss: &WlSubsurface) {
        let children = &mut *self.children.borrow_mut();
        let Some(children) = children else {
            return;
        };
        children.subsurfaces.remove(&ss.surface.id);
        children.pending_order.retain(|c| c.surface.id != ss.surface.id);
        if children.order.iter().any(|c| c.surface.id == ss.surface.id) {
            children.order = children
                .order
                .iter()
                .filter(|c| c.surface.id != ss.surface.id)
                .cloned()
                .collect();
        }
    }

    /// Moves `ss` directly above or below `sibling` in the pending order.
    /// Returns false if `sibling` is not another child of this surface.
    pub(crate) fn place_subsurface(&self, ss: &WlSubsurface, sibling: WlSurfaceId, above: bool) -> bool {
        let children = &mut *self.children.borrow_mut();
        let Some(children) = children else {
            return false;
        };
        if sibling == ss.surface.id || !children.subsurfaces.contains_key(&sibling) {
            return false;
        }
        let Some(pos) = children
            .pending_order
            .iter()
            .position(|c| c.surface.id == ss.surface.id)
        else {
            return false;
        };
        let node = children.pending_order.remove(pos);
        let Some(sibling_pos) = children
            .pending_order
            .iter()
            .position(|c| c.surface.id == sibling)
        else {
            children.pending_order.insert(pos, node);
            return false;
        };
        let idx = match above {
            true => sibling_pos + 1,
            false => sibling_pos,
        };
        children.pending_order.insert(idx, node);
        true
    }

    pub fn has_child(&self, id: WlSurfaceId) -> bool {
        match &*self.children.borrow() {
            Some(c) => c.subsurfaces.contains_key(&id),
            None => false,
        }
    }

    /// The parent surface if this surface is an attached subsurface.
    pub fn parent_surface(&self) -> Option<Rc<WlSurface>> {
        match self.role.get() {
            Role::Subsurface(Some(ss)) => ss.parent(),
            _ => None,
        }
    }

    /// Clears accumulated damage and fires the queued frame callbacks.
    pub fn flush_frame(self: &Rc<Self>, time: u32) {
        self.dirty.set(Region::empty());
        let frames = mem::take(&mut *self.frame_requests.borrow_mut());
        for frame in frames {
            frame.send_done(time);
        }
        for l in self.frame_event.iter() {
            l.surface_frame(self, time);
        }
    }

    pub fn has_frame_requests(&self) -> bool {
        self.frame_requests.borrow().is_not_empty()
    }

    pub fn link(&self, slot: SurfaceLink, owner: &Rc<dyn LinkOwner>) {
        self.links.borrow_mut()[slot] = Some(Rc::downgrade(owner));
    }

    pub fn unlink(&self, slot: SurfaceLink) {
        self.links.borrow_mut()[slot] = None;
    }

    pub fn is_linked(&self, slot: SurfaceLink) -> bool {
        self.links.borrow()[slot]
            .as_ref()
            .is_some_and(|o| o.strong_count() > 0)
    }

    fn notify_unlinked(&self) {
        for slot in SurfaceLink::variants() {
            let owner = self.links.borrow_mut()[slot].take();
            if let Some(owner) = owner.and_then(|o| o.upgrade()) {
                owner.surface_unlinked(self, slot);
            }
        }
    }

    pub fn destroy(self: &Rc<Self>) -> Result<(), WlSurfaceError> {
        if self.destroyed.replace(true) {
            return Ok(());
        }
        let children = self.children.borrow_mut().take();
        if let Some(children) = children {
            for ss in children.subsurfaces.values() {
                ss.parent_destroyed();
            }
        }
        if let Role::Subsurface(Some(ss)) = self.role.get() {
            ss.surface_destroyed();
        }
        for l in self.destroy_event.iter() {
            l.surface_destroyed(self);
        }
        self.destroy_event.clear();
        if let Some(buffer) = self.buffer.set(None) {
            buffer.buffer.release();
        }
        self.mapped.set(false);
        self.cached.borrow_mut().take();
        self.pending_frames.borrow_mut().clear();
        self.frame_requests.borrow_mut().clear();
        self.notify_unlinked();
        self.role.set(self.role.get().without_object());
        self.client.remove_obj(&**self)?;
        Ok(())
    }

    fn break_loops_(&self) {
        self.children.borrow_mut().take();
        self.role.set(Role::None);
        self.cached.borrow_mut().take();
        self.buffer.set(None);
        self.pending_frames.borrow_mut().clear();
        self.frame_requests.borrow_mut().clear();
        *self.views.borrow_mut() = ViewSlots::default();
        self.commit_event.clear();
        self.destroy_event.clear();
        self.frame_event.clear();
        self.dirty_event.clear();
    }
}

object_base!(WlSurface, WL_SURFACE);

impl Object for WlSurface {
    fn break_loops(&self) {
        self.break_loops_();
    }
}

#[derive(Debug, Error)]
pub enum WlSurfaceError {
    #[error(transparent)]
    ClientError(Box<ClientError>),
    #[error(transparent)]
    XdgSurfaceError(Box<XdgSurfaceError>),
    #[error(transparent)]
    XdgToplevelError(Box<XdgToplevelError>),
    #[error(transparent)]
    XdgPopupError(Box<XdgPopupError>),
    #[error(transparent)]
    WlSubsurfaceError(Box<WlSubsurfaceError>),
    #[error("Buffer scale must be positive, got {0}")]
    NonPositiveBufferScale(i32),
    #[error("Unknown buffer transform {0}")]
    UnknownBufferTransform(i32),
    #[error("Crop size must be positive, got {0}x{1}")]
    NonPositiveCrop(i32, i32),
    #[error("Surface {id} cannot be assigned the role {new_role} because it already has the role {old_role}", new_role = .new.name(), old_role = .old.name())]
    IncompatibleRole {
        id: WlSurfaceId,
        old: SurfaceRole,
        new: SurfaceRole,
    },
    #[error("The shell policy does not allow surface {0} to become a {role}", role = .1.name())]
    RoleDenied(WlSurfaceId, SurfaceRole),
}
efrom!(WlSurfaceError, ClientError);
efrom!(WlSurfaceError, XdgSurfaceError);
efrom!(WlSurfaceError, XdgToplevelError);
efrom!(WlSurfaceError, XdgPopupError);
efrom!(WlSurfaceError, WlSubsurfaceError);
