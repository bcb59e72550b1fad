pub mod journal;
pub mod work_item;

pub use journal::{JournalDetail, JournalEntry};
pub use work_item::{
    Attachment, CustomFieldValue, CustomValue, IssuesVisibility, Member, Named, Project, Role,
    WorkItem,
};
