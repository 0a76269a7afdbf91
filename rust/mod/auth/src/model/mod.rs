mod legacy;
mod session;
mod user;

pub use legacy::*;
pub use session::*;
pub use user::*;
