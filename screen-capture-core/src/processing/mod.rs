pub mod chunk_buffer;
pub mod container;
pub mod resolution;
