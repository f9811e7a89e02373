//! The menu bar: File, Edit, Format and View menus, navigated with the
//! arrow keys while the bar has focus.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    New,
    Open,
    Save,
    Exit,
    Cut,
    Copy,
    Paste,
    Find,
    Replace,
    Undo,
    Redo,
    Font,
    ToggleDarkMode,
}

#[derive(Debug, Clone, Copy)]
pub enum MenuItem {
    Action(MenuAction, &'static str),
    Separator,
}

pub struct Menu {
    pub title: &'static str,
    pub items: Vec<MenuItem>,
}

pub struct MenuBar {
    menus: Vec<Menu>,
    selected_menu: usize,
    selected_item: usize,
}

impl MenuBar {
    pub fn new() -> Self {
        let menus = vec![
            Menu {
                title: "File",
                items: vec![
                    MenuItem::Action(MenuAction::New, "New"),
                    MenuItem::Action(MenuAction::Open, "Open"),
                    MenuItem::Action(MenuAction::Save, "Save"),
                    MenuItem::Separator,
                    MenuItem::Action(MenuAction::Exit, "Exit"),
                ],
            },
            Menu {
                title: "Edit",
                items: vec![
                    MenuItem::Action(MenuAction::Cut, "Cut"),
                    MenuItem::Action(MenuAction::Copy, "Copy"),
                    MenuItem::Action(MenuAction::Paste, "Paste"),
                    MenuItem::Separator,
                    MenuItem::Action(MenuAction::Find, "Find"),
                    MenuItem::Action(MenuAction::Replace, "Replace"),
                    MenuItem::Separator,
                    MenuItem::Action(MenuAction::Undo, "Undo"),
                    MenuItem::Action(MenuAction::Redo, "Redo"),
                ],
            },
            Menu {
                title: "Format",
                items: vec![MenuItem::Action(MenuAction::Font, "Font")],
            },
            Menu {
                title: "View",
                items: vec![MenuItem::Action(
                    MenuAction::ToggleDarkMode,
                    "Toggle Dark Mode",
                )],
            },
        ];

        Self {
            menus,
            selected_menu: 0,
            selected_item: 0,
        }
    }

    pub fn menus(&self) -> &[Menu] {
        &self.menus
    }

    pub fn selected_menu(&self) -> usize {
        self.selected_menu
    }

    pub fn selected_item(&self) -> usize {
        self.selected_item
    }

    /// Reset to the first menu's first item, as when the bar gains focus.
    pub fn open(&mut self) {
        self.selected_menu = 0;
        self.selected_item = 0;
    }

    pub fn next_menu(&mut self) {
        self.selected_menu = (self.selected_menu + 1) % self.menus.len();
        self.selected_item = 0;
    }

    pub fn prev_menu(&mut self) {
        self.selected_menu = if self.selected_menu == 0 {
            self.menus.len() - 1
        } else {
            self.selected_menu - 1
        };
        self.selected_item = 0;
    }

    pub fn next_item(&mut self) {
        let items = &self.menus[self.selected_menu].items;
        let mut idx = self.selected_item;
        loop {
            idx = (idx + 1) % items.len();
            if !matches!(items[idx], MenuItem::Separator) {
                break;
            }
        }
        self.selected_item = idx;
    }

    pub fn prev_item(&mut self) {
        let items = &self.menus[self.selected_menu].items;
        let mut idx = self.selected_item;
        loop {
            idx = if idx == 0 { items.len() - 1 } else { idx - 1 };
            if !matches!(items[idx], MenuItem::Separator) {
                break;
            }
        }
        self.selected_item = idx;
    }

    /// The action under the cursor, if it is not a separator.
    pub fn current_action(&self) -> Option<MenuAction> {
        match self.menus[self.selected_menu].items[self.selected_item] {
            MenuItem::Action(action, _) => Some(action),
            MenuItem::Separator => None,
        }
    }
}

impl Default for MenuBar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_surface() {
        let bar = MenuBar::new();
        let titles: Vec<&str> = bar.menus().iter().map(|m| m.title).collect();
        assert_eq!(titles, vec!["File", "Edit", "Format", "View"]);

        // File: New, Open, Save, separator, Exit
        assert_eq!(bar.menus()[0].items.len(), 5);
        assert!(matches!(bar.menus()[0].items[3], MenuItem::Separator));
    }

    #[test]
    fn test_menu_navigation_wraps() {
        let mut bar = MenuBar::new();
        bar.open();
        assert_eq!(bar.selected_menu(), 0);

        bar.prev_menu();
        assert_eq!(bar.selected_menu(), 3); // wrapped to View

        bar.next_menu();
        assert_eq!(bar.selected_menu(), 0);
    }

    #[test]
    fn test_item_navigation_skips_separators() {
        let mut bar = MenuBar::new();
        bar.open();

        // File menu: New -> Open -> Save -> Exit (separator skipped)
        assert_eq!(bar.current_action(), Some(MenuAction::New));
        bar.next_item();
        bar.next_item();
        assert_eq!(bar.current_action(), Some(MenuAction::Save));
        bar.next_item();
        assert_eq!(bar.current_action(), Some(MenuAction::Exit));

        bar.prev_item();
        assert_eq!(bar.current_action(), Some(MenuAction::Save));
    }

    #[test]
    fn test_switching_menus_resets_item() {
        let mut bar = MenuBar::new();
        bar.open();
        bar.next_item();
        bar.next_menu();
        assert_eq!(bar.selected_item(), 0);
        assert_eq!(bar.current_action(), Some(MenuAction::Cut));
    }
}
