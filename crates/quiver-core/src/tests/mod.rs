mod common;
mod workloads;
