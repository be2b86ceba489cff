pub mod user;
pub mod club;
pub mod event;
pub mod transition;

pub use user::*;
pub use club::*;
pub use event::*;
pub use transition::*;
