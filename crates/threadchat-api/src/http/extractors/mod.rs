//! Custom extractors whose rejections use the envelope format.

pub mod json;
