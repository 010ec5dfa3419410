//! Esquema Diesel del catálogo interno de SQLite. Las tablas de negocio se
//! declaran en `catalog` y se consultan por nombre.

diesel::table! {
    sqlite_master (name) {
        #[sql_name = "type"]
        kind -> Text,
        name -> Text,
        tbl_name -> Text,
    }
}
