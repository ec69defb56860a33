//! Placing files into the output directory and measuring the result

pub mod copier;
pub mod summary;

pub use copier::{
    component_source_dir, copy_file, copy_template_tree, copy_tree, is_excluded, locate_asset,
    materialize, ComponentMaterializer, MaterializeReport, EXCLUDED_NAMES, LAYOUTS_DIR, STATIC_DIR,
};
pub use crate::workspace::THEMES_DIR;
pub use summary::OutputStats;
