//! Compositor-side state machines for Wayland surfaces, subsurfaces,
//! xdg-shell windows and popup grabs.

#![allow(
    clippy::len_zero,
    clippy::needless_lifetimes,
    clippy::enum_variant_names,
    clippy::new_without_default,
    clippy::too_many_arguments
)]

#[macro_use]
mod macros;
#[macro_use]
pub mod object;
pub mod client;
pub mod config;
pub mod gfx_api;
pub mod ifs;
#[cfg(test)]
mod it;
pub mod logger;
pub mod policy;
pub mod rect;
pub mod state;
pub mod transform;
pub mod utils;
pub mod wire;
