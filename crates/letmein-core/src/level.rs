//! Level numbering and lock state.

use serde::{Deserialize, Serialize};

/// Number of levels in the game. Levels are numbered `1..=MAX_LEVEL`.
pub const MAX_LEVEL: u32 = 4;

/// Display state of one level selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelButton {
    pub level: u32,
    /// A level is unlocked once every level before it is completed.
    pub unlocked: bool,
    /// Marks the level currently being played.
    pub active: bool,
}

/// True when `level` is within `1..=MAX_LEVEL`.
pub fn is_valid_level(level: u32) -> bool {
    (1..=MAX_LEVEL).contains(&level)
}

/// Highest level the player may select given `levels_completed`.
pub fn highest_unlocked(levels_completed: u32) -> u32 {
    (levels_completed + 1).min(MAX_LEVEL)
}

/// Lock state of every level selector.
pub fn level_buttons(current_level: u32, levels_completed: u32) -> Vec<LevelButton> {
    (1..=MAX_LEVEL)
        .map(|level| LevelButton {
            level,
            unlocked: level <= levels_completed + 1,
            active: level == current_level,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_game_unlocks_only_level_one() {
        let buttons = level_buttons(1, 0);
        assert_eq!(buttons.len(), MAX_LEVEL as usize);
        assert!(buttons[0].unlocked && buttons[0].active);
        assert!(buttons[1..].iter().all(|b| !b.unlocked && !b.active));
    }

    #[test]
    fn test_completed_levels_unlock_next() {
        let buttons = level_buttons(2, 2);
        let unlocked: Vec<u32> = buttons.iter().filter(|b| b.unlocked).map(|b| b.level).collect();
        assert_eq!(unlocked, vec![1, 2, 3]);
        assert_eq!(buttons.iter().filter(|b| b.active).count(), 1);
    }

    #[test]
    fn test_highest_unlocked_is_capped() {
        assert_eq!(highest_unlocked(0), 1);
        assert_eq!(highest_unlocked(3), 4);
        assert_eq!(highest_unlocked(4), MAX_LEVEL);
    }

    #[test]
    fn test_is_valid_level() {
        assert!(!is_valid_level(0));
        assert!(is_valid_level(1));
        assert!(is_valid_level(MAX_LEVEL));
        assert!(!is_valid_level(MAX_LEVEL + 1));
    }
}
