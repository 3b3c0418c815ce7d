//! Identity and storage primitives shared by the registry and resource stores.

mod generational_id;
mod free_list;

pub use generational_id::GenerationalId;
pub use free_list::FreeList;
