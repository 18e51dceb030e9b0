use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, Hash, Ord, PartialOrd, Eq, PartialEq)]
pub struct ObjectId(u32);

impl ObjectId {
    pub const NONE: Self = ObjectId(0);

    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

pub trait ObjectBase {
    fn id(&self) -> ObjectId;
    fn interface(&self) -> Interface;
}

pub trait Object: ObjectBase + 'static {
    /// Drops references that could keep reference cycles alive. Called when
    /// the owning client is destroyed.
    fn break_loops(&self) {}
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Interface(pub &'static str);

impl Interface {
    pub fn name(self) -> &'static str {
        self.0
    }
}

pub const WL_BUFFER: Interface = Interface("wl_buffer");
pub const WL_CALLBACK: Interface = Interface("wl_callback");
pub const WL_COMPOSITOR: Interface = Interface("wl_compositor");
pub const WL_REGION: Interface = Interface("wl_region");
pub const WL_SUBCOMPOSITOR: Interface = Interface("wl_subcompositor");
pub const WL_SUBSURFACE: Interface = Interface("wl_subsurface");
pub const WL_SURFACE: Interface = Interface("wl_surface");
pub const XDG_POPUP: Interface = Interface("xdg_popup");
pub const XDG_POSITIONER: Interface = Interface("xdg_positioner");
pub const XDG_SURFACE: Interface = Interface("xdg_surface");
pub const XDG_TOPLEVEL: Interface = Interface("xdg_toplevel");
pub const XDG_WM_BASE: Interface = Interface("xdg_wm_base");

macro_rules! object_base {
    ($oname:ty, $iface:expr) => {
        impl crate::object::ObjectBase for $oname {
            fn id(&self) -> crate::object::ObjectId {
                self.id.into()
            }

            fn interface(&self) -> crate::object::Interface {
                $iface
            }
        }
    };
}
