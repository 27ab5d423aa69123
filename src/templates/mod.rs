//! Template engine seam, helper function registry and HTML escaping.

mod engine;
mod funcs;
pub mod html;

pub use engine::TemplateEngine;
pub use funcs::{FuncRegistry, HelperFn};
