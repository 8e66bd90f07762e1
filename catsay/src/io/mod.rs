//! Side-effecting boundaries: the `fortune` child process and the image service.

pub mod fortune;
pub mod image;
pub mod process;
