#![allow(clippy::comparison_chain)]

pub mod rect;
