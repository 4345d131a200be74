use crate::domain::Role;

use super::Screen;

/// Where the app opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartDestination {
    /// The stored role has not been read yet.
    Loading,
    Screen(Screen),
}

impl StartDestination {
    pub fn resolve(is_loading: bool, role: Option<Role>) -> Self {
        match (is_loading, role) {
            (true, _) => StartDestination::Loading,
            (false, Some(role)) => {
                StartDestination::Screen(Screen::home_for(role))
            }
            (false, None) => StartDestination::Screen(Screen::RoleSelection),
        }
    }
}
