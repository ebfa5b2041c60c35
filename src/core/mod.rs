pub mod artifact;
pub mod backup;
pub mod classifier;
pub mod extractor;
pub mod locator;
pub mod matcher;
pub mod pipeline;
pub mod resolver;
pub mod transformer;
pub mod writer;
