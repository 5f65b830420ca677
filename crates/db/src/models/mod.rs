//! Row structs mapping database tables onto domain records.

pub mod project;
