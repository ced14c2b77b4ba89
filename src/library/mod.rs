// Bundled clip library
// Scans the clip store and resolves playback keys to clips

pub mod resolver;
pub mod scanner;

pub use resolver::{AudioResource, ClipResolver};
pub use scanner::ClipScanner;
