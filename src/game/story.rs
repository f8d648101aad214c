//! Story chapters and the unlock rule that gates them.
//!
//! A chapter opens for every 5 upgrade levels bought in total. Story
//! progress survives prestige resets, so the unlocked index only ever
//! moves forward.

use super::notify::Notification;
use super::state::GameState;

/// Upgrade levels needed per chapter.
pub const LEVELS_PER_CHAPTER: u32 = 5;

/// Chapter texts in reading order.
pub const CHAPTERS: &[&str] = &[
    "You start your journey as a humble coin collector.",
    "As your wealth grows, you attract the attention of local merchants.",
    "Your influence spreads, and you begin to shape the economy of your town.",
    "Your financial empire expands to neighboring cities.",
    "You become a legendary figure in the world of commerce and trade.",
];

pub fn chapter_count() -> usize {
    CHAPTERS.len()
}

/// Chapter index the current upgrade levels qualify for.
pub fn qualified_chapter(state: &GameState) -> usize {
    let by_levels = (state.upgrades.total_levels() / LEVELS_PER_CHAPTER) as usize;
    by_levels.min(chapter_count() - 1)
}

/// Unlock the next chapter if the upgrade levels now qualify for it.
///
/// Returns the (possibly unchanged) state and a notification when a new
/// chapter opened. Never moves the story backwards.
pub fn evaluate(state: &GameState) -> (GameState, Option<Notification>) {
    let candidate = qualified_chapter(state);
    if candidate <= state.story.unlocked_chapters {
        return (state.clone(), None);
    }

    let mut next = state.clone();
    next.story.unlocked_chapters = candidate;
    next.story.current_chapter = candidate;
    log::info!("story chapter {} unlocked", candidate + 1);
    (next, Some(Notification::chapter_unlocked()))
}

/// A chapter as the story view lists it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChapterView {
    pub index: usize,
    pub text: &'static str,
    pub is_current: bool,
}

/// Chapters readable so far, oldest first.
pub fn visible_chapters(state: &GameState) -> Vec<ChapterView> {
    let last = state.story.unlocked_chapters.min(chapter_count() - 1);
    CHAPTERS[..=last]
        .iter()
        .copied()
        .enumerate()
        .map(|(index, text)| ChapterView {
            index,
            text,
            is_current: index == state.story.current_chapter,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{Upgrade, UpgradeId};

    fn with_auto_clickers(n: u32) -> GameState {
        let mut state = GameState::new();
        state.upgrades.auto_clicker = Upgrade::after_purchases(UpgradeId::AutoClicker, n);
        state
    }

    #[test]
    fn fresh_state_stays_on_first_chapter() {
        let (next, event) = evaluate(&GameState::new());
        assert_eq!(next.story.unlocked_chapters, 0);
        assert!(event.is_none());
    }

    #[test]
    fn five_levels_unlock_chapter_two() {
        // 1 + 3 + 1 = 5 total levels
        let state = with_auto_clickers(3);
        let (next, event) = evaluate(&state);
        assert_eq!(next.story.unlocked_chapters, 1);
        assert_eq!(next.story.current_chapter, 1);
        assert_eq!(event, Some(Notification::chapter_unlocked()));
    }

    #[test]
    fn second_evaluation_emits_nothing() {
        let (next, _) = evaluate(&with_auto_clickers(3));
        let (again, event) = evaluate(&next);
        assert_eq!(again, next);
        assert!(event.is_none());
    }

    #[test]
    fn unlock_capped_at_last_chapter() {
        let (next, event) = evaluate(&with_auto_clickers(200));
        assert_eq!(next.story.unlocked_chapters, chapter_count() - 1);
        assert!(event.is_some());
    }

    #[test]
    fn never_moves_backwards() {
        // After a prestige the levels drop but the story is kept.
        let mut state = GameState::new();
        state.story.unlocked_chapters = 3;
        state.story.current_chapter = 3;
        let (next, event) = evaluate(&state);
        assert_eq!(next.story.unlocked_chapters, 3);
        assert!(event.is_none());
    }

    #[test]
    fn skipping_chapters_unlocks_highest() {
        // 2 + 13 = 15 levels → chapter index 3 in one step
        let (next, _) = evaluate(&with_auto_clickers(13));
        assert_eq!(next.story.unlocked_chapters, 3);
    }

    #[test]
    fn visible_chapters_marks_current() {
        let mut state = GameState::new();
        state.story.unlocked_chapters = 2;
        state.story.current_chapter = 2;
        let views = visible_chapters(&state);
        assert_eq!(views.len(), 3);
        assert_eq!(views[0].text, CHAPTERS[0]);
        assert!(!views[1].is_current);
        assert!(views[2].is_current);
    }
}
