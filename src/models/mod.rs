mod visitor;

pub use visitor::*;
