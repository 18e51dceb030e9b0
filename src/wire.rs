//! Object ids and the events the engine emits towards clients.

use smallvec::SmallVec;

id!(WlBufferId);
id!(WlCallbackId);
id!(WlCompositorId);
id!(WlRegionId);
id!(WlSubcompositorId);
id!(WlSubsurfaceId);
id!(WlSurfaceId);
id!(XdgPopupId);
id!(XdgPositionerId);
id!(XdgSurfaceId);
id!(XdgToplevelId);
id!(XdgWmBaseId);

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event {
    /// Fatal protocol error. The client is disconnected afterwards.
    Error {
        object: crate::object::ObjectId,
        code: u32,
        message: String,
    },
    NoMemory,
    BufferRelease {
        buffer: WlBufferId,
    },
    CallbackDone {
        callback: WlCallbackId,
        time: u32,
    },
    XdgSurfaceConfigure {
        xdg_surface: XdgSurfaceId,
        serial: u32,
    },
    ToplevelConfigure {
        toplevel: XdgToplevelId,
        width: i32,
        height: i32,
        states: SmallVec<[u32; 4]>,
    },
    ToplevelClose {
        toplevel: XdgToplevelId,
    },
    PopupConfigure {
        popup: XdgPopupId,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    PopupRepositioned {
        popup: XdgPopupId,
        token: u32,
    },
    PopupDone {
        popup: XdgPopupId,
    },
    Ping {
        wm_base: XdgWmBaseId,
        serial: u32,
    },
}
