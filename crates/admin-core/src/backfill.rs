//! Backfills tipados sobre colecciones de etiquetas codificadas en una
//! columna (p. ej. las secciones a las que un usuario tiene acceso).
//!
//! Cada regla es una función pura `&TagSet -> TagSet`; decodificar y
//! re-codificar queda fuera de la transformación, y una fila que no decodifica
//! se omite sin abortar el lote.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Colección decodificada. Conserva orden y duplicados tal cual se leyeron,
/// así una fila sólo se reescribe si su valor decodificado cambia.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new<I, T>(tags: I) -> Self
        where I: IntoIterator<Item = T>,
              T: Into<String>
    {
        Self(tags.into_iter().map(Into::into).collect())
    }

    pub fn tags(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renombra según `renames` (viejo, nuevo) y elimina duplicados
    /// preservando la primera aparición. Varias etiquetas viejas pueden
    /// fusionarse en una nueva.
    pub fn renamed(&self, renames: &[(&str, &str)]) -> TagSet {
        let mut out: Vec<String> = Vec::with_capacity(self.0.len());
        for tag in &self.0 {
            let mapped = renames.iter()
                                .find(|(old, _)| *old == tag.as_str())
                                .map(|(_, new)| (*new).to_string())
                                .unwrap_or_else(|| tag.clone());
            if !out.contains(&mapped) {
                out.push(mapped);
            }
        }
        TagSet(out)
    }
}

/// Cómo está codificada la colección en la columna.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Arreglo JSON de strings: `["dashboard","leads"]`.
    JsonArray,
    /// Una sola etiqueta como texto plano (p. ej. un rol).
    Scalar,
}

impl Encoding {
    pub fn decode(&self, raw: &str) -> Result<TagSet, String> {
        match self {
            Encoding::JsonArray => serde_json::from_str::<Vec<String>>(raw).map(TagSet)
                                                                          .map_err(|e| format!("invalid tag array: {e}")),
            Encoding::Scalar => {
                let tag = raw.trim();
                if tag.is_empty() {
                    Err("empty scalar tag".to_string())
                } else {
                    Ok(TagSet(vec![tag.to_string()]))
                }
            }
        }
    }

    pub fn encode(&self, tags: &TagSet) -> Result<String, String> {
        match self {
            Encoding::JsonArray => serde_json::to_string(&tags.0).map_err(|e| format!("encode tag array: {e}")),
            Encoding::Scalar => match tags.0.as_slice() {
                [single] => Ok(single.clone()),
                other => Err(format!("scalar encoding needs exactly one tag, got {}", other.len())),
            },
        }
    }
}

pub type TagTransform = fn(&TagSet) -> TagSet;

/// Restringe un backfill a las filas donde `column = equals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowFilter {
    pub column: &'static str,
    pub equals: &'static str,
}

/// Backfill de una columna codificada. `key_column` debe ser entero y único
/// (la PK de la tabla).
///
/// Sin `only_where` el backfill recorre la tabla entera en cada arranque en
/// frío, así que la transformación debe ser correcta para cualquier fila
/// escrita después, no sólo para las heredadas.
#[derive(Clone, Copy)]
pub struct BackfillRule {
    pub table: &'static str,
    pub key_column: &'static str,
    pub column: &'static str,
    pub encoding: Encoding,
    pub transform: TagTransform,
    pub only_where: Option<RowFilter>,
}

impl fmt::Debug for BackfillRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackfillRule")
         .field("table", &self.table)
         .field("key_column", &self.key_column)
         .field("column", &self.column)
         .field("encoding", &self.encoding)
         .field("only_where", &self.only_where)
         .finish_non_exhaustive()
    }
}

/// Fila leída para un backfill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRow {
    pub key: i64,
    pub value: Option<String>,
}

/// Escritura compare-and-set: sólo aplica si la columna aún contiene `old`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedUpdate {
    pub key: i64,
    pub old: String,
    pub new: String,
}
