//! Public library API for reading ESM/ESP plugin files into a scene object model.

/// Plugin parsing: cursor, tags, record and group decoding, and the object store.
pub mod esm;
