//! Domain entities - the records the engine moves through the
//! Draft -> Scheduled -> Published lifecycle.

mod comment;
mod content;
mod history;
mod ids;
mod like;

pub use comment::{CommentRecord, NewComment};
pub use content::{
    ContentBody, ContentPatch, ContentStatus, DraftRecord, PostRecord, ScheduledRecord,
};
pub use history::{HISTORY_CAPACITY, HistoryDiff, HistoryEntry, VersionView};
pub use ids::{CommentId, DraftId, HistoryId, PostId, ScheduledId};
pub use like::LikeState;
