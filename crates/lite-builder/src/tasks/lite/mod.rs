//! JupyterLite build orchestration.

pub mod pipeline;
