//! Sidebar navigation.
//!
//! A fixed list of links plus a logout control. On narrow viewports the
//! sidebar collapses behind a CSS-only toggle; that open/closed state never
//! leaves the browser.

/// Link target of the logo and the first nav entry.
pub const HOME_PATH: &str = "/dashboard";

/// Form action of the logout control.
pub const LOGOUT_PATH: &str = "/logout";

/// A sidebar navigation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
}

/// Navigation entries, in display order.
pub const NAV_LINKS: [NavLink; 2] = [
    NavLink {
        href: "/dashboard",
        label: "Dashboard",
    },
    NavLink {
        href: "/product",
        label: "Product",
    },
];

/// Sidebar state for templates.
#[derive(Debug, Clone)]
pub struct SidebarView {
    pub current_path: String,
    pub links: Vec<NavLink>,
    pub home_path: &'static str,
    pub logout_path: &'static str,
}

impl SidebarView {
    /// Sidebar for a page at `current_path`.
    #[must_use]
    pub fn new(current_path: impl Into<String>) -> Self {
        Self {
            current_path: current_path.into(),
            links: NAV_LINKS.to_vec(),
            home_path: HOME_PATH,
            logout_path: LOGOUT_PATH,
        }
    }

    /// Returns `true` if `link` should be highlighted.
    ///
    /// A link is active on its own path and on any path below it, so the
    /// product editor highlights `Product`.
    #[must_use]
    pub fn is_active(&self, link: &NavLink) -> bool {
        let path = self.current_path.as_str();
        path == link.href
            || path
                .strip_prefix(link.href)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_in_order() {
        let labels: Vec<_> = NAV_LINKS.iter().map(|l| l.label).collect();
        assert_eq!(labels, ["Dashboard", "Product"]);
    }

    #[test]
    fn test_active_link() {
        let sidebar = SidebarView::new("/product/edit/p1");
        assert!(!sidebar.is_active(&NAV_LINKS[0]));
        assert!(sidebar.is_active(&NAV_LINKS[1]));

        let sidebar = SidebarView::new("/dashboard");
        assert!(sidebar.is_active(&NAV_LINKS[0]));
        assert!(!sidebar.is_active(&NAV_LINKS[1]));

        // Prefix of a segment is not a match
        let sidebar = SidebarView::new("/products-archive");
        assert!(!sidebar.is_active(&NAV_LINKS[1]));
    }
}
