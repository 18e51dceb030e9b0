pub mod clonecell;
pub mod copyhashmap;
pub mod errorfmt;
pub mod event_listener;
pub mod numcell;
