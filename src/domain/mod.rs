mod announcement;
mod data_stores;
mod document;
mod error;
mod listener;
mod member;
mod member_filter;
mod member_name;
mod operation_status;
mod priority;
mod required_text;
mod role;

pub use announcement::*;
pub use data_stores::*;
pub use document::*;
pub use error::*;
pub use listener::*;
pub use member::*;
pub use member_filter::*;
pub use member_name::*;
pub use operation_status::*;
pub use priority::*;
pub use required_text::*;
pub use role::*;
