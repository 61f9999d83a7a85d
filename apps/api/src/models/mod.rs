pub mod content;
pub mod site;
pub mod user;
