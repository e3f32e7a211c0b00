pub mod components;
pub mod consultants;
pub mod login;
pub mod project_wizard;
pub mod projects;
pub mod rate_wizard;

use crossterm::event::KeyCode;

/// Pages reachable after login. The first three mirror the navigation bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    NewProject,
    SavedProjects,
    EditProject,
    Consultants,
    RateEditor,
}

/// Keys shared by every page while no field is being edited
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Open(Page),
    Logout,
    Quit,
}

pub fn navigation_for(key: KeyCode) -> Option<Navigation> {
    match key {
        KeyCode::Char('1') => Some(Navigation::Open(Page::NewProject)),
        KeyCode::Char('2') => Some(Navigation::Open(Page::SavedProjects)),
        KeyCode::Char('3') => Some(Navigation::Open(Page::Consultants)),
        KeyCode::Char('l') | KeyCode::Char('L') => Some(Navigation::Logout),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Navigation::Quit),
        _ => None,
    }
}

pub const NAVIGATION_HELP: &str = "<1> New Project | <2> Saved Projects | <3> Manage Consultants | <L> Logout | <Q> Quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_keys_switch_pages() {
        assert_eq!(navigation_for(KeyCode::Char('2')), Some(Navigation::Open(Page::SavedProjects)));
        assert_eq!(navigation_for(KeyCode::Char('l')), Some(Navigation::Logout));
        assert_eq!(navigation_for(KeyCode::Char('x')), None);
    }

    #[test]
    fn logout_and_quit_ignore_case() {
        assert_eq!(navigation_for(KeyCode::Char('L')), Some(Navigation::Logout));
        assert_eq!(navigation_for(KeyCode::Char('Q')), Some(Navigation::Quit));
        assert_eq!(navigation_for(KeyCode::Char('q')), Some(Navigation::Quit));
    }
}
