use crate::annotations::tools::Tool;
use crate::session::messages::EditorMsg;

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Character(char),
    Delete,
    Escape,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
    };
    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
        alt: false,
    };

    pub fn control(self) -> bool {
        self.ctrl
    }

    pub fn shift(self) -> bool {
        self.shift
    }
}

/// Single-key tool selection
fn tool_for(c: char) -> Option<Tool> {
    let tool = match c.to_ascii_lowercase() {
        'v' => Tool::Select,
        'a' => Tool::Arrow,
        'l' => Tool::Line,
        'r' => Tool::Rectangle,
        'e' => Tool::Ellipse,
        't' => Tool::Text,
        'n' => Tool::Step,
        'h' => Tool::Highlighter,
        'f' => Tool::FilledRect,
        'm' => Tool::Mosaic,
        'b' => Tool::Blur,
        's' => Tool::Spotlight,
        'g' => Tool::Magnifier,
        _ => return None,
    };
    Some(tool)
}

pub fn handle_key_event(key: Key, modifiers: Modifiers) -> Option<EditorMsg> {
    match key {
        // History shortcuts
        Key::Character(c) if c.eq_ignore_ascii_case(&'z') && modifiers.control() => {
            Some(EditorMsg::undo())
        }
        Key::Character(c) if c.eq_ignore_ascii_case(&'y') && modifiers.control() => {
            Some(EditorMsg::redo())
        }
        // Output shortcuts
        Key::Character(c) if c.eq_ignore_ascii_case(&'c') && modifiers.control() => {
            Some(EditorMsg::copy_to_clipboard())
        }
        Key::Character(c) if c.eq_ignore_ascii_case(&'s') && modifiers.control() => {
            Some(EditorMsg::save())
        }
        Key::Delete => Some(EditorMsg::delete_selected()),
        Key::Escape => Some(EditorMsg::cancel()),
        // Tool keys only without Ctrl, so they never shadow the shortcuts above
        Key::Character(c) if !modifiers.control() => tool_for(c).map(EditorMsg::tool),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_shortcuts() {
        let ctrl = |c| handle_key_event(Key::Character(c), Modifiers::CTRL);
        assert_eq!(ctrl('z'), Some(EditorMsg::undo()));
        assert_eq!(ctrl('Y'), Some(EditorMsg::redo()));
        assert_eq!(ctrl('c'), Some(EditorMsg::copy_to_clipboard()));
        assert_eq!(ctrl('s'), Some(EditorMsg::save()));
        assert_eq!(ctrl('q'), None);
    }

    #[test]
    fn test_tool_keys() {
        let plain = |c| handle_key_event(Key::Character(c), Modifiers::NONE);
        assert_eq!(plain('s'), Some(EditorMsg::tool(Tool::Spotlight)));
        assert_eq!(plain('G'), Some(EditorMsg::tool(Tool::Magnifier)));
        assert_eq!(plain('v'), Some(EditorMsg::tool(Tool::Select)));
        assert_eq!(plain('x'), None);

        let mapped = "valretnhfmbsg".chars().filter_map(tool_for).count();
        assert_eq!(mapped, Tool::ALL.len());
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(
            handle_key_event(Key::Delete, Modifiers::NONE),
            Some(EditorMsg::delete_selected())
        );
        assert_eq!(
            handle_key_event(Key::Escape, Modifiers::CTRL),
            Some(EditorMsg::cancel())
        );
    }
}
