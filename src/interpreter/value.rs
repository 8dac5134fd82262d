/// Runtime values.
///
/// Defines `Value`, a type tag plus a `Payload`, together with its textual
/// rendering and the conformance check used by annotations and parameters.
pub mod core;
/// Function values.
///
/// Closures, native handlers and partial applications share one `Function`
/// shape so the call logic lives in a single place.
pub mod function;
/// Runtime types.
///
/// Primitive types, function signatures, and the struct, enum and trait
/// descriptors kept in the type registry.
pub mod types;
