// ============================================================================
// QUERY STATE - Resultado asíncrono de tres estados (+ Idle)
// ============================================================================

use crate::services::error::ClientError;

/// Estado de una consulta. Mientras está `Loading` no hay datos "actuales":
/// `previous` solo sirve para mantener la tabla visible durante un refetch.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    Idle,
    Loading { previous: Option<T> },
    Loaded(T),
    Errored(ClientError),
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        QueryState::Idle
    }
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading { .. })
    }

    /// Datos confirmados (solo en `Loaded`)
    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    /// Últimos datos conocidos, incluidos los de antes de un refetch
    pub fn latest(&self) -> Option<&T> {
        match self {
            QueryState::Loaded(data) => Some(data),
            QueryState::Loading { previous } => previous.as_ref(),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ClientError> {
        match self {
            QueryState::Errored(error) => Some(error),
            _ => None,
        }
    }

    /// Transición a `Loading` conservando los datos visibles
    pub fn into_loading(self) -> Self {
        match self {
            QueryState::Loaded(data) => QueryState::Loading { previous: Some(data) },
            QueryState::Loading { previous } => QueryState::Loading { previous },
            QueryState::Idle | QueryState::Errored(_) => QueryState::Loading { previous: None },
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> QueryState<U> {
        match self {
            QueryState::Idle => QueryState::Idle,
            QueryState::Loading { previous } => QueryState::Loading { previous: previous.map(f) },
            QueryState::Loaded(data) => QueryState::Loaded(f(data)),
            QueryState::Errored(error) => QueryState::Errored(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_never_exposes_data() {
        let state = QueryState::Loaded(vec![1, 2]).into_loading();
        assert!(state.is_loading());
        assert_eq!(state.data(), None);
        assert_eq!(state.latest(), Some(&vec![1, 2]));
    }

    #[test]
    fn errored_refetch_starts_empty() {
        let state: QueryState<u8> = QueryState::Errored(ClientError::Unauthorized).into_loading();
        assert_eq!(state, QueryState::Loading { previous: None });
        assert_eq!(QueryState::Loaded(2).map(|v| v * 2), QueryState::Loaded(4));
    }
}
