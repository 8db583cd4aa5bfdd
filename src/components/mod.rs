pub mod artwork_box;
pub mod catalog_grid;
pub mod detail_modal;
pub mod format;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use catalog_grid::{CatalogGrid, CatalogGridProps, LIST_ERROR_MESSAGE};
pub use detail_modal::{DetailModal, DetailModalProps, DETAIL_ERROR_MESSAGE};
