pub mod fs;
pub mod metadata;
pub mod naming;
pub mod organizer;
