mod common;
mod dispatching;
