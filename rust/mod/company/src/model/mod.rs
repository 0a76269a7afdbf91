mod company;
mod import;

pub use company::*;
pub use import::*;
