/* 📖 # What is the Platform Abstraction Layer?

The PAL is the single seam between directory traversal and the operating system.
The filesystem accessor asks it four read-only questions (exists, list, read, stat)
and never touches std::fs itself, so the same traversal code runs against RealPal
in production and MockPal in tests.
*/

mod file_path;
pub mod mock;
pub mod real_pal;
mod traits;

pub use file_path::FilePath;
pub use mock::MockPal;
pub use real_pal::RealPal;
pub use traits::{FileStat, FileType, Pal, PalHandle};
