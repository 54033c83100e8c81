//! Data models for the library backend

/// Copies every `Some` field of a patch onto the target record
macro_rules! merge_fields {
    ($target:expr, $patch:expr; $($field:ident),* $(,)?) => {
        $(
            if let Some(value) = $patch.$field {
                $target.$field = Some(value);
            }
        )*
    };
}

pub mod book;
pub mod book_copy;
pub mod category;
pub mod check_out;
pub mod entity;
pub mod enums;
pub mod notification;
pub mod page;
pub mod patron_account;
pub mod references;
pub mod wait_list;

// Re-export commonly used types
pub use book::{Book, BookPatch};
pub use book_copy::{BookCopy, BookCopyPatch};
pub use category::{Category, CategoryPatch};
pub use check_out::{CheckOut, CheckOutPatch};
pub use entity::{Entity, EntityId, SortField, SortKey};
pub use enums::{CheckOutStatus, NotificationType};
pub use notification::{Notification, NotificationPatch};
pub use page::{Direction, Page, PageRequest, SortOrder};
pub use patron_account::{CardNumber, PatronAccount, PatronAccountPatch};
pub use references::{BookCopyRef, BookRef, LabelSource, PatronAccountRef, PublisherRef, UserRef};
pub use wait_list::{WaitList, WaitListPatch};
