pub mod decoder;
pub mod emitter;
