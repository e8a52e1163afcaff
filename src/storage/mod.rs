mod file;

pub use file::{deserialize_project, serialize_project, LoadedProject};
