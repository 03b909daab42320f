/* 📖 # Why split pathable into value, accessor and path layers?

- `PathValue` is the pure addressing layer: segments plus separator, with pathlib-style
  derivations and no knowledge of any backing store.
- `NodeAccessor` is the traversal layer: one-step primitives per backend, with the
  segment-by-segment algorithms written once on top of them.
- `Path` binds the two, so user code navigates with values and dereferences through
  whichever accessor the path was built with.

```
use pathable::LookupPath;
use serde_json::json;

let resource = LookupPath::from_lookup(json!({"list": [10, 20]}), ["list"]).unwrap();
assert_eq!(resource.len().unwrap(), 2);
assert_eq!(resource.read_child(1).unwrap(), json!(20));
```
*/

pub mod accessor;
mod accessor_tests;
pub mod cache;
pub mod config;
pub mod parser;
pub mod path;
pub mod path_value;

pub use accessor::{
    FilesystemAccessor, LookupAccessor, LookupNode, Metadata, NodeAccessor, NodeKind,
};
pub use cache::{CacheStats, ResultCache};
pub use config::{CacheConfig, PathableConfig, load_config};
pub use parser::{PathArg, SEPARATOR, canonicalize};
pub use path::{FilesystemPath, LookupPath, Path};
pub use path_value::{InfallibleArg, PathValue};

pub use pathable_base::{
    FilePath, MockPal, PalHandle, PathableError, PathableResult, RealPal, ResultExt, Segment,
};
