mod hosts;

pub use hosts::*;
