//! Datos de referencia (seed) que una tabla debe contener por defecto.

/// Valor de una celda seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedValue {
    Text(String),
    Integer(i64),
    Null,
}

/// Fila seed: pares (columna, valor) en orden de inserción.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedRow {
    values: Vec<(&'static str, SeedValue)>,
}

impl SeedRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, column: &'static str, value: impl Into<String>) -> Self {
        self.values.push((column, SeedValue::Text(value.into())));
        self
    }

    pub fn int(mut self, column: &'static str, value: i64) -> Self {
        self.values.push((column, SeedValue::Integer(value)));
        self
    }

    pub fn null(mut self, column: &'static str) -> Self {
        self.values.push((column, SeedValue::Null));
        self
    }

    pub fn values(&self) -> &[(&'static str, SeedValue)] {
        &self.values
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.iter().map(|(c, _)| *c)
    }

    pub fn get(&self, column: &str) -> Option<&SeedValue> {
        self.values.iter().find(|(c, _)| *c == column).map(|(_, v)| v)
    }
}

/// Regla: si `table` está vacía, insertar `rows()`.
///
/// Las filas deben llevar una clave natural única (o PK explícita) para que
/// dos instancias que observan la tabla vacía a la vez no dupliquen datos.
#[derive(Debug, Clone, Copy)]
pub struct SeedRule {
    pub table: &'static str,
    pub rows: fn() -> Vec<SeedRow>,
}
