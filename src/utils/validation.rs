//! Utilidades de validación
//!
//! Helpers para validar payloads y distinguir entre campos ausentes y
//! campos enviados explícitamente como `null`.

use serde::{Deserialize, Deserializer};

/// Convierte `registration_number` en `registrationNumber`.
pub fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Deserializa un campo anulable en tres estados.
///
/// Usar junto con `#[serde(default)]`: un campo ausente queda en `None`,
/// `null` pasa a `Some(None)` y un valor pasa a `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Un string vacío se trata como ausente, igual que en la creación.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
