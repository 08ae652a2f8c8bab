pub mod files;
pub mod locked_file;
pub mod locks;
pub mod repository;

pub use files::*;
pub use locked_file::*;
pub use locks::*;
pub use repository::*;
