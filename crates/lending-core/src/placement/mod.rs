pub mod checks;
pub mod options;

pub use checks::{funding_progress, validate_placement, FundingProgress};
pub use options::{
    build_option_previews, preview_options, OptionPreview, PreviewInput, PreviewOutput,
};
