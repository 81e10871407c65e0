//! Reusable view components shared by admin pages.

pub mod sidebar;

pub use sidebar::{NAV_LINKS, NavLink, SidebarView};
