//! Filesystem side shared by both protocols.
//!
//! - **`resolver`**: maps untrusted request paths onto the served root
//! - **`descriptor`**: per-directory `00index.txt` / `descript.ion` annotations
//! - **`listing`**: sorted directory enumeration with size markers and labels

pub mod descriptor;
pub mod listing;
pub mod resolver;

pub use descriptor::DescriptorTable;
pub use listing::{Entry, EntryKind, list_directory, size_label};
pub use resolver::{relative_selector, resolve, revalidate};
