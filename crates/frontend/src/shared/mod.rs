pub mod dialog_frame;
pub mod dialog_stack;
pub mod icons;
