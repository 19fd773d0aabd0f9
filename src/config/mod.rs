// Re-export all items from the submodules
mod acquisition_config;

pub use acquisition_config::{
    AcquisitionConfig,
    load_or_default,
};
