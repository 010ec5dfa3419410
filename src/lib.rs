//! Admin Backend Library
//!
//! Este crate es la cara de servicio del backend de administración:
//! - Expone `entry` con `RequestEntry`, por donde pasa cada unidad de trabajo,
//!   y el store SQLite configurado desde el entorno.
//! - Expone `errors` con el error genérico de servicio.
//!
//! El motor de esquema vive en `admin-core`; el store y el catálogo en
//! `admin-persistence`.

pub mod entry;
pub mod errors;

pub use entry::{sqlite_store_from_env, RequestEntry};
pub use errors::ServiceError;
