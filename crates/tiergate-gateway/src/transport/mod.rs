//! Transport layer: HTTP event ingress and the command codec that parses
//! message content once before it reaches the dispatcher.

pub mod codec;
pub mod http;
