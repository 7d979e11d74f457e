//! Business logic services (use cases).
//!
//! Services apply business rules and translate repository failures into the
//! typed `MessageError` taxonomy. They depend on traits (ports) -- never on
//! concrete infrastructure implementations.

pub mod message;
