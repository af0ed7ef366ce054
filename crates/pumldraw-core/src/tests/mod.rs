mod activity;
mod class;
mod deployment;
mod detect;
mod er;
mod mindmap;
mod sequence;
mod state;
mod usecase;
