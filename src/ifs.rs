pub mod wl_buffer;
pub mod wl_callback;
pub mod wl_compositor;
pub mod wl_region;
pub mod wl_seat;
pub mod wl_subcompositor;
pub mod wl_surface;
pub mod xdg_positioner;
pub mod xdg_wm_base;
