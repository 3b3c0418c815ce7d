/*!
# Galaxy 3D Content

Content resource pipeline for the Galaxy 3D engine.

Takes imported content (meshes, textures, materials, shaders) from files on
disk to resources living in a render backend, and keeps track of which asset
each resource came from.

## Architecture

- **GenerationalId / FreeList**: compact ids and the slot-reuse container
  every id-keyed store is built on
- **Content blobs**: binary formats shared by the editor and the runtime
  (`.mesh`, `.tex`, `.mat`, `.sd`, `.mt`)
- **AssetRegistry**: persistent asset identity, RON registry file, and
  memoized asset-to-resource pairing
- **ResourceStore**: per-asset-type dispatch from blob to backend resource
- **RenderBackend**: trait implemented by GPU backends; `HeadlessBackend`
  keeps CPU copies for tools and tests
- **ContentContext**: single owner of the registry and store
*/

// Internal modules
mod error;
mod config;
mod context;
pub mod log;
pub mod utils;
pub mod content;
pub mod asset;
pub mod resource;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Configuration and context
    pub use crate::config::ContentConfig;
    pub use crate::context::ContentContext;

    // Logging sub-module (types and logger slot, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
        pub use crate::log::{set_logger, reset_logger, log, log_detailed};
    }

    // Ids and free lists
    pub mod utils {
        pub use crate::utils::{GenerationalId, FreeList};
    }

    // Blob formats
    pub mod content {
        pub use crate::content::*;
    }

    // Assets, registry and importers
    pub mod asset {
        pub use crate::asset::*;
    }

    // Backend resources
    pub mod resource {
        pub use crate::resource::*;
    }
}
