//! Material values: the [`MaterialDef`] appearance descriptor and a named [`MaterialLibrary`]
//! loaded from RON.

mod library;
mod material;

pub use library::{LibraryError, MaterialEntry, MaterialLibrary, MaterialManifest};
pub use material::{MaterialDef, MaterialError};
