//! Support ticket screens, independent of how they are rendered.

pub mod detail;
pub mod loader;
pub mod paging;
pub mod sort;

pub use detail::{
    DetailEffect, DetailMode, DetailRequest, DetailResponse, DetailScreen, Pending, ThreadState,
    TicketDraft, TicketThread, thread_order, validate_message,
};
pub use loader::{Generation, LoadOutcome, LoadState, TicketList, fetch_sorted_tickets};
pub use paging::Pager;
pub use sort::{Bucket, bucket_counts, compare_tickets, sort_tickets};
