pub mod access;
pub mod directory;
pub mod id_generator;
