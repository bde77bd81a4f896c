pub mod aggregate;
pub mod analysis_export;
pub mod dataset;
pub mod decode;
pub mod demo_match;
pub mod filter;
pub mod settings;
pub mod state;
