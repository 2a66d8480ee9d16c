pub mod projection;
pub mod svg_output;
