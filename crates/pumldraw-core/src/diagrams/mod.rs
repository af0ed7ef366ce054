pub mod activity;
pub mod class;
pub mod deployment;
pub mod er;
pub mod mindmap;
pub mod sequence;
pub mod state;
pub mod usecase;
