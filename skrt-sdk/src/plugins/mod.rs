pub mod discovery;
pub mod merger;
pub mod splitter;
pub mod subjob;
