pub mod auth;
pub mod dashboard;
pub mod lote;
pub mod loteamento;

use serde::{Deserialize, Deserializer};

// Para colunas anuláveis em edições parciais, o payload precisa de três
// estados: campo ausente (não mexe), `null` (limpa) e valor (substitui).
// `Option<Option<T>>` com este deserializer distingue ausente de null;
// o default do serde cobre o caso ausente.
pub fn campo_opcional<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
