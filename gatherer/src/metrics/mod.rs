pub mod catalog;
pub mod registry;

// Re-export the main types for easy access
pub use catalog::{
    Catalog,
    CatalogEntry,
    Catalogs,
    AUTOMATIC,
    INSTANCE_LABEL,
    NAMESPACE,
};
pub use registry::{
    Family,
    MetricRegistry,
};
