/* 📖 # Why have pathable_base as a core library?
pathable_base provides the error type, the Segment key type and the filesystem
abstraction shared by the traversal crate. Keeping them apart from traversal logic
means the error can name the exact segment that failed without a dependency cycle.
*/

pub mod error;
mod error_tests;
pub mod pal;
mod pal_tests;
pub mod segment;
pub mod tracing;

// Re-export commonly used types for convenience
pub use error::{Error as PathableError, Result as PathableResult, ResultExt};
pub use pal::{FilePath, FileStat, FileType, MockPal, Pal, PalHandle, RealPal};
pub use segment::Segment;
