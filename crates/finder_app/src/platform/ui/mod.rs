pub(crate) mod console;
pub(crate) mod render;
