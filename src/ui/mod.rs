pub mod charts;
pub mod docs;
pub mod panels;
