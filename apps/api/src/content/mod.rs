//! Public read endpoints for the content catalog, the contact form, and
//! admin-editable site sections.

pub mod contact;
pub mod handlers;
pub mod site;
