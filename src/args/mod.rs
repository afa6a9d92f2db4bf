//! Argument handling — raw argv → shift-consumable parsed arguments.

mod cursor;

pub use cursor::ParsedArgs;
