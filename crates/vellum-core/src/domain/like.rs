//! Like state - a single global toggle and counter per post, not
//! per-viewer.

use serde::{Deserialize, Serialize};

/// The `{count, liked}` pair held per content id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeState {
    pub count: u64,
    pub liked: bool,
}

impl LikeState {
    /// Flip `liked` and adjust the counter by one. An involution: applying
    /// it twice restores both fields.
    pub fn toggled(self) -> Self {
        if self.liked {
            Self {
                count: self.count.saturating_sub(1),
                liked: false,
            }
        } else {
            Self {
                count: self.count + 1,
                liked: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_is_an_involution() {
        let state = LikeState {
            count: 7,
            liked: false,
        };
        assert_eq!(state.toggled().toggled(), state);

        let liked = LikeState {
            count: 3,
            liked: true,
        };
        assert_eq!(liked.toggled().toggled(), liked);
    }

    #[test]
    fn toggle_from_default_counts_one() {
        let state = LikeState::default().toggled();
        assert_eq!(state.count, 1);
        assert!(state.liked);
    }
}
