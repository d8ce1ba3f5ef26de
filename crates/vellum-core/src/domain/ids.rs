//! Typed identifiers, one per collection.
//!
//! Which repository owns an id is carried in the type, never inferred from
//! the shape of a string. Publish transitions allocate a fresh `PostId`
//! rather than converting the source id.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id!(
    /// Identifier of a published post.
    PostId
);
define_id!(
    /// Identifier of a draft.
    DraftId
);
define_id!(
    /// Identifier of a scheduled entry.
    ScheduledId
);
define_id!(
    /// Identifier of one history snapshot within a post's log.
    HistoryId
);
define_id!(
    /// Identifier of a comment.
    CommentId
);
