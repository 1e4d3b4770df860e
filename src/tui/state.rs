use crate::action::{ButtonId, SettingsField};
use crate::articles::Topic;
use crate::notify::ToastId;
use ratatui::layout::{Position, Rect};

/// Height of one article card in rows, borders included.
pub const CARD_HEIGHT: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    Articles,
    Draft,
    Settings,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Articles, Page::Draft, Page::Settings];

    pub fn title(self) -> &'static str {
        match self {
            Page::Articles => "Articles",
            Page::Draft => "Draft",
            Page::Settings => "Settings",
        }
    }

    /// Page for a `1`..`3` shortcut.
    pub fn from_digit(c: char) -> Option<Self> {
        let n = c.to_digit(10)? as usize;
        Page::ALL.get(n.checked_sub(1)?).copied()
    }
}

/// Which part of the articles page takes arrow keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArticlesFocus {
    #[default]
    List,
    Sources,
}

/// One selectable line of the settings page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsRow {
    Field(SettingsField),
    Topic(usize),
    Feed(String),
    FeedInput,
    Suggested(String),
    SaveAll,
}

/// Anything the pointer can hit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HitTarget {
    Tab(Page),
    ThemeToggle,
    Button(ButtonId),
    Toast(ToastId),
    TopicChip(Topic),
    SourceChip(usize),
    ArticleCard(usize),
    SettingsRow(usize),
    ModalChoice(bool),
}

/// Screen regions of the last frame, topmost last.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    regions: Vec<(HitTarget, Rect)>,
    /// Rows available to the article list in the last frame.
    pub list_height: u16,
}

impl HitMap {
    pub fn push(&mut self, target: HitTarget, area: Rect) {
        if area.width > 0 && area.height > 0 {
            self.regions.push((target, area));
        }
    }

    pub fn hit(&self, x: u16, y: u16) -> Option<(&HitTarget, Rect)> {
        let pos = Position { x, y };
        self.regions
            .iter()
            .rev()
            .find(|(_, area)| area.contains(pos))
            .map(|(t, a)| (t, *a))
    }

    pub fn regions(&self) -> &[(HitTarget, Rect)] {
        &self.regions
    }

    pub fn area_of(&self, target: &HitTarget) -> Option<Rect> {
        self.regions.iter().rev().find(|(t, _)| t == target).map(|(_, a)| *a)
    }

    pub fn cards(&self) -> Vec<(usize, Rect)> {
        self.regions
            .iter()
            .filter_map(|(t, a)| match t {
                HitTarget::ArticleCard(i) => Some((*i, *a)),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_map_to_pages() {
        assert_eq!(Page::from_digit('1'), Some(Page::Articles));
        assert_eq!(Page::from_digit('3'), Some(Page::Settings));
        assert_eq!(Page::from_digit('0'), None);
        assert_eq!(Page::from_digit('9'), None);
    }

    #[test]
    fn topmost_region_wins() {
        let mut hits = HitMap::default();
        hits.push(HitTarget::ArticleCard(0), Rect::new(0, 0, 40, 4));
        hits.push(HitTarget::Button(ButtonId::GenerateTweet("u".into())), Rect::new(20, 2, 10, 1));
        assert!(matches!(hits.hit(22, 2), Some((HitTarget::Button(_), _))));
        assert!(matches!(hits.hit(1, 1), Some((HitTarget::ArticleCard(0), _))));
        assert!(hits.hit(50, 50).is_none());
        assert_eq!(hits.cards().len(), 1);
    }
}
