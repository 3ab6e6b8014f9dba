//! Domain layer: pure logic, no I/O.

pub mod agent;
pub mod conversation;
pub mod foundation;
pub mod intent;
