pub mod lite;
pub mod packages;
pub mod tooling;

/// JupyterLab's bundled yarn.
pub const JLPM: &str = "jlpm";
pub const HATCH: &str = "hatch";
