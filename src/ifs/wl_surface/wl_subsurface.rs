
use {
    crate::{
        client::ClientError,
        ifs::wl_surface::{Role, WlSurface, WlSurfaceError},
        object::{Object, WL_SUBSURFACE},
        utils::clonecell::CloneCell,
        wire::{WlSubsurfaceId, WlSurfaceId},
    },
    std::{
        cell::Cell,
        rc::{Rc, Weak},
    },
    thiserror::Error,
};

pub const BAD_SURFACE: u32 = 0;
pub const BAD_PARENT: u32 = 1;

pub struct WlSubsurface {
    pub id: WlSubsurfaceId,
    pub surface: Rc<WlSurface>,
    parent: CloneCell<Weak<WlSurface>>,
    sync: Cell<bool>,
    position: Cell<(i32, i32)>,
    pending_position: Cell<Option<(i32, i32)>>,
    depth: Cell<u32>,
}

fn update_children_depth(surface: &WlSurface, depth: u32, max: u32) -> Result<(), WlSubsurfaceError> {
    for child in surface.pending_subsurfaces() {
        let depth = depth + 1;
        if depth > max {
            return Err(WlSubsurfaceError::MaxDepthExceeded(max));
        }
        child.depth.set(depth);
        update_children_depth(&child.surface, depth, max)?;
    }
    Ok(())
}

impl WlSubsurface {
    pub fn new(id: WlSubsurfaceId, surface: &Rc<WlSurface>, parent: &Rc<WlSurface>) -> Self {
        Self {
            id,
            surface: surface.clone(),
            parent: CloneCell::new(Rc::downgrade(parent)),
            sync: Cell::new(true),
            position: Cell::new((0, 0)),
            pending_position: Cell::new(None),
            depth: Cell::new(1),
        }
    }

    /// Binds the surface to its parent.
    ///
    /// On success the subsurface sits on top of the parent's pending
    /// stacking order.
    pub fn install(self: &Rc<Self>) -> Result<(), WlSubsurfaceError> {
        let Some(parent) = self.parent() else {
            return Err(WlSubsurfaceError::ParentGone);
        };
        if self.surface.id == parent.id {
            return Err(WlSubsurfaceError::OwnParent(self.surface.id));
        }
        if let Role::Subsurface(Some(_)) = self.surface.role() {
            return Err(WlSubsurfaceError::AlreadyAttached(self.surface.id));
        }
        let mut ancestor = Some(parent.clone());
        while let Some(a) = ancestor {
            if a.id == self.surface.id {
                return Err(WlSubsurfaceError::Ancestor(self.surface.id, parent.id));
            }
            ancestor = a.parent_surface();
        }
        let max = self.surface.client.state.config.max_subsurface_depth;
        let depth = match parent.role() {
            Role::Subsurface(Some(ss)) => ss.depth.get() + 1,
            _ => 1,
        };
        if depth > max {
            return Err(WlSubsurfaceError::MaxDepthExceeded(max));
        }
        update_children_depth(&self.surface, depth, max)?;
        self.surface.set_role(Role::Subsurface(Some(self.clone())))?;
        self.depth.set(depth);
        parent.add_subsurface(self);
        log::debug!(
            "wl_surface@{} is now a child of wl_surface@{} at depth {}",
            self.surface.id,
            parent.id,
            depth,
        );
        Ok(())
    }

    /// The protocol error code for an installation failure.
    pub fn install_error_code(e: &WlSubsurfaceError) -> u32 {
        match e {
            WlSubsurfaceError::Ancestor(..) | WlSubsurfaceError::MaxDepthExceeded(_) => BAD_PARENT,
            _ => BAD_SURFACE,
        }
    }

    pub fn parent(&self) -> Option<Rc<WlSurface>> {
        self.parent.get().upgrade()
    }

    pub fn depth(&self) -> u32 {
        self.depth.get()
    }

    /// The committed offset relative to the parent.
    pub fn position(&self) -> (i32, i32) {
        self.position.get()
    }

    pub fn pending_position(&self) -> Option<(i32, i32)> {
        self.pending_position.get()
    }

    pub fn set_position(&self, x: i32, y: i32) {
        self.pending_position.set(Some((x, y)));
    }

    pub fn place_above(&self, sibling: &WlSurface) -> Result<(), WlSubsurfaceError> {
        self.place(sibling, true)
    }

    pub fn place_below(&self, sibling: &WlSurface) -> Result<(), WlSubsurfaceError> {
        self.place(sibling, false)
    }

    fn place(&self, sibling: &WlSurface, above: bool) -> Result<(), WlSubsurfaceError> {
        let placed = match self.parent() {
            Some(parent) => parent.place_subsurface(self, sibling.id, above),
            None => false,
        };
        if !placed {
            return Err(self.surface.client.fail(
                self,
                BAD_SURFACE,
                WlSubsurfaceError::NotASibling(sibling.id, self.surface.id),
            ));
        }
        Ok(())
    }

    pub fn set_sync(&self) {
        self.sync.set(true);
    }

    pub fn set_desync(&self) -> Result<(), WlSubsurfaceError> {
        if !self.sync.replace(false) {
            return Ok(());
        }
        self.apply_unsynchronized()?;
        Ok(())
    }

    /// Applies cached commits of this subtree that are no longer held back
    /// by a synchronized ancestor.
    fn apply_unsynchronized(&self) -> Result<(), WlSurfaceError> {
        if self.is_synchronized() {
            return Ok(());
        }
        if let Some(commit) = self.surface.take_cached() {
            self.surface.apply_commit(commit)?;
        }
        for child in self.surface.subsurfaces().iter() {
            child.apply_unsynchronized()?;
        }
        Ok(())
    }

    /// Whether commits of the surface are cached until the parent commits.
    pub fn is_synchronized(&self) -> bool {
        let Some(parent) = self.parent() else {
            return false;
        };
        if self.sync.get() {
            return true;
        }
        match parent.role() {
            Role::Subsurface(Some(ss)) => ss.is_synchronized(),
            _ => false,
        }
    }

    /// Called for each child in stacking order when the parent applies a
    /// commit.
    pub(super) fn parent_committed(&self) -> Result<(), WlSurfaceError> {
        if let Some(pos) = self.pending_position.take() {
            self.position.set(pos);
        }
        if let Some(commit) = self.surface.take_cached() {
            self.surface.apply_commit(commit)?;
        }
        self.update_position();
        Ok(())
    }

    pub(super) fn update_position(&self) {
        let Some(parent) = self.parent() else {
            return;
        };
        let (px, py) = parent.position();
        let (x, y) = self.position.get();
        self.surface.set_position(px + x as f32, py + y as f32);
    }

    fn detach(&self) {
        if let Some(parent) = self.parent.set(Weak::new()).upgrade() {
            parent.remove_subsurface(self);
        }
    }

    /// The parent surface is being destroyed.
    pub(super) fn parent_destroyed(&self) {
        self.parent.set(Weak::new());
    }

    /// The child surface is being destroyed.
    pub(super) fn surface_destroyed(&self) {
        self.detach();
    }

    pub fn destroy(&self) -> Result<(), WlSubsurfaceError> {
        self.detach();
        self.surface.unset_role_object();
        if let Some(commit) = self.surface.take_cached() {
            self.surface.apply_commit(commit)?;
        }
        self.surface.client.remove_obj(self)?;
        Ok(())
    }
}

object_base!(WlSubsurface, WL_SUBSURFACE);

impl Object for WlSubsurface {
    fn break_loops(&self) {
        self.parent.set(Weak::new());
    }
}

#[derive(Debug, Error)]
pub enum WlSubsurfaceError {
    #[error("Surface {0} already has an attached `wl_subsurface`")]
    AlreadyAttached(WlSurfaceId),
    #[error("Surface {0} cannot be made its own parent")]
    OwnParent(WlSurfaceId),
    #[error("Surface {0} cannot be made a subsurface of {1} because it's an ancestor of {1}")]
    Ancestor(WlSurfaceId, WlSurfaceId),
    #[error("Subsurfaces cannot be nested deeper than {0} levels")]
    MaxDepthExceeded(u32),
    #[error("The parent surface no longer exists")]
    ParentGone,
    #[error("{0} is not a sibling of {1}")]
    NotASibling(WlSurfaceId, WlSurfaceId),
    #[error(transparent)]
    WlSurfaceError(Box<WlSurfaceError>),
    #[error(transparent)]
    ClientError(Box<ClientError>),
}
efrom!(WlSubsurfaceError, WlSurfaceError);
efrom!(WlSubsurfaceError, ClientError);
