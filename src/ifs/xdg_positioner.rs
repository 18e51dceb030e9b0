#[cfg(test)]
mod tests;

use {
    crate::{
        client::{Client, ClientError},
        object::{Object, XDG_POSITIONER},
        rect::Rect,
        wire::XdgPositionerId,
    },
    std::{cell::RefCell, rc::Rc},
    thiserror::Error,
};

const INVALID_INPUT: u32 = 0;

const NONE: u32 = 0;
const TOP: u32 = 1;
const BOTTOM: u32 = 2;
const LEFT: u32 = 3;
const RIGHT: u32 = 4;
const TOP_LEFT: u32 = 5;
const BOTTOM_LEFT: u32 = 6;
const TOP_RIGHT: u32 = 7;
const BOTTOM_RIGHT: u32 = 8;

bitflags! {
    Edge: u32;
        E_TOP = 1 << 0,
        E_BOTTOM = 1 << 1,
        E_LEFT = 1 << 2,
        E_RIGHT = 1 << 3,
}

impl Edge {
    pub fn from_enum(e: u32) -> Option<Self> {
        let s = match e {
            NONE => Self::none(),
            TOP => E_TOP,
            BOTTOM => E_BOTTOM,
            LEFT => E_LEFT,
            RIGHT => E_RIGHT,
            TOP_LEFT => E_TOP | E_LEFT,
            BOTTOM_LEFT => E_BOTTOM | E_LEFT,
            TOP_RIGHT => E_TOP | E_RIGHT,
            BOTTOM_RIGHT => E_BOTTOM | E_RIGHT,
            _ => return None,
        };
        Some(s)
    }
}

bitflags! {
    CA: u32;
        CA_NONE = 0,
        CA_SLIDE_X = 1,
        CA_SLIDE_Y = 2,
        CA_FLIP_X = 4,
        CA_FLIP_Y = 8,
        CA_RESIZE_X = 16,
        CA_RESIZE_Y = 32,
}

/// A snapshot of a positioner, taken when a popup is created or
/// repositioned.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Positioned {
    pub size_width: i32,
    pub size_height: i32,
    pub ar: Option<Rect>,
    pub anchor: Edge,
    pub gravity: Edge,
    pub ca: CA,
    pub off_x: i32,
    pub off_y: i32,
    pub reactive: bool,
    pub parent_width: i32,
    pub parent_height: i32,
    pub parent_serial: u32,
}

impl Positioned {
    pub fn is_complete(&self) -> bool {
        self.size_height > 0 && self.size_width > 0 && self.ar.is_some()
    }

    /// The popup rectangle relative to the window geometry of the parent.
    pub fn get_position(&self) -> Rect {
        let ar = self.ar.unwrap_or_default();
        let anchor = self.anchor;
        let gravity = self.gravity;

        let mut x1 = self.off_x;
        let mut y1 = self.off_y;

        if anchor.contains(E_LEFT) {
            x1 = x1.saturating_add(ar.x1());
        } else if anchor.contains(E_RIGHT) {
            x1 = x1.saturating_add(ar.x2());
        } else {
            x1 = x1.saturating_add(ar.x1() + ar.width() / 2);
        }

        if anchor.contains(E_TOP) {
            y1 = y1.saturating_add(ar.y1());
        } else if anchor.contains(E_BOTTOM) {
            y1 = y1.saturating_add(ar.y2());
        } else {
            y1 = y1.saturating_add(ar.y1() + ar.height() / 2);
        }

        if gravity.contains(E_LEFT) {
            x1 = x1.saturating_sub(self.size_width);
        } else if !gravity.contains(E_RIGHT) {
            x1 = x1.saturating_sub(self.size_width / 2);
        }

        if gravity.contains(E_TOP) {
            y1 = y1.saturating_sub(self.size_height);
        } else if !gravity.contains(E_BOTTOM) {
            y1 = y1.saturating_sub(self.size_height / 2);
        }

        if self.ca.is_some() && !XdgPositioner::constraint_adjustment_supported() {
            log::debug!("Skipping constraint adjustments {:?}", self.ca);
        }

        Rect::new_sized(x1, y1, self.size_width.max(0), self.size_height.max(0))
            .unwrap_or_default()
    }
}

pub struct XdgPositioner {
    pub id: XdgPositionerId,
    client: Rc<Client>,
    position: RefCell<Positioned>,
}

impl XdgPositioner {
    pub fn new(id: XdgPositionerId, client: &Rc<Client>) -> Self {
        Self {
            id,
            client: client.clone(),
            position: RefCell::new(Default::default()),
        }
    }

    pub fn value(&self) -> Positioned {
        *self.position.borrow()
    }

    /// Whether popups are moved or resized to stay within their constraints.
    /// They are not: constraint adjustments are validated and stored only.
    pub fn constraint_adjustment_supported() -> bool {
        false
    }

    pub fn destroy(&self) -> Result<(), XdgPositionerError> {
        self.client.remove_obj(self)?;
        Ok(())
    }

    pub fn set_size(&self, width: i32, height: i32) -> Result<(), XdgPositionerError> {
        if width <= 0 || height <= 0 {
            return Err(self.client.fail(
                self,
                INVALID_INPUT,
                XdgPositionerError::NonPositiveSize(width, height),
            ));
        }
        let mut position = self.position.borrow_mut();
        position.size_width = width;
        position.size_height = height;
        Ok(())
    }

    pub fn set_anchor_rect(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<(), XdgPositionerError> {
        let rect = match Rect::new_sized(x, y, width, height) {
            Some(r) if width > 0 && height > 0 => r,
            _ => {
                return Err(self.client.fail(
                    self,
                    INVALID_INPUT,
                    XdgPositionerError::NonPositiveAnchorRect(width, height),
                ));
            }
        };
        self.position.borrow_mut().ar = Some(rect);
        Ok(())
    }

    pub fn set_anchor(&self, anchor: u32) -> Result<(), XdgPositionerError> {
        let Some(anchor) = Edge::from_enum(anchor) else {
            return Err(self.client.fail(
                self,
                INVALID_INPUT,
                XdgPositionerError::UnknownAnchor(anchor),
            ));
        };
        self.position.borrow_mut().anchor = anchor;
        Ok(())
    }

    pub fn set_gravity(&self, gravity: u32) -> Result<(), XdgPositionerError> {
        let Some(gravity) = Edge::from_enum(gravity) else {
            return Err(self.client.fail(
                self,
                INVALID_INPUT,
                XdgPositionerError::UnknownGravity(gravity),
            ));
        };
        self.position.borrow_mut().gravity = gravity;
        Ok(())
    }

    pub fn set_constraint_adjustment(&self, ca: u32) -> Result<(), XdgPositionerError> {
        let ca = CA(ca);
        if !ca.is_valid() {
            return Err(self.client.fail(
                self,
                INVALID_INPUT,
                XdgPositionerError::UnknownCa(ca.raw()),
            ));
        }
        self.position.borrow_mut().ca = ca;
        Ok(())
    }

    pub fn set_offset(&self, x: i32, y: i32) {
        let mut position = self.position.borrow_mut();
        position.off_x = x;
        position.off_y = y;
    }

    pub fn set_reactive(&self) {
        self.position.borrow_mut().reactive = true;
    }

    pub fn set_parent_size(&self, width: i32, height: i32) -> Result<(), XdgPositionerError> {
        if width < 0 || height < 0 {
            return Err(self.client.fail(
                self,
                INVALID_INPUT,
                XdgPositionerError::NegativeParentSize,
            ));
        }
        let mut position = self.position.borrow_mut();
        position.parent_width = width;
        position.parent_height = height;
        Ok(())
    }

    pub fn set_parent_configure(&self, serial: u32) {
        self.position.borrow_mut().parent_serial = serial;
    }
}

object_base!(XdgPositioner, XDG_POSITIONER);

impl Object for XdgPositioner {}

#[derive(Debug, Error)]
pub enum XdgPositionerError {
    #[error("Cannot set a non-positive size {0}x{1}")]
    NonPositiveSize(i32, i32),
    #[error("Cannot set an anchor rect with a non-positive size {0}x{1}")]
    NonPositiveAnchorRect(i32, i32),
    #[error("Unknown anchor {0}")]
    UnknownAnchor(u32),
    #[error("Unknown gravity {0}")]
    UnknownGravity(u32),
    #[error("Unknown constraint adjustment {0}")]
    UnknownCa(u32),
    #[error("Cannot set a negative parent size")]
    NegativeParentSize,
    #[error(transparent)]
    ClientError(Box<ClientError>),
}
efrom!(XdgPositionerError, ClientError);
