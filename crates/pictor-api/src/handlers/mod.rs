//! Request handlers, one module per operation.

pub mod cover;
pub mod optim;
pub mod primitive;
pub mod resize;
pub mod shadow;
