pub mod extract;
pub mod import;
pub mod users;
