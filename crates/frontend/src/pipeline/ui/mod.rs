pub mod details;
pub mod list;
pub mod source_picker;
