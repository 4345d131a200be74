mod announcement_view_model;
mod member_view_model;
mod projection;
mod role_view_model;
mod status_slot;

pub use announcement_view_model::*;
pub use member_view_model::*;
pub use projection::*;
pub use role_view_model::*;
pub use status_slot::*;
