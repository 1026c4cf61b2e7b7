// Core modules implementing the dynamic value, its pointer syntax, and error modeling.
pub mod data;
pub mod error;
pub mod kind;
pub mod pointer;
pub mod raw;
