// ============================================================================
// GRAPHQL CLIENT - Cliente con caché por (operación, variables)
// ============================================================================
// - CacheFirst: devuelve la caché si hay datos; si no, se une a la petición
//   idéntica en curso o lanza una nueva.
// - NetworkOnly: siempre lanza una petición nueva. Solo la petición más
//   reciente de cada clave escribe en la caché.
// - Las mutations no leen ni escriben la caché.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::services::error::ClientError;
use crate::services::graphql::{decode_nodes, decode_root, parse_response, Operation};
use crate::services::transport::{HttpRequest, HttpTransport};
use crate::state::QueryState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPolicy {
    CacheFirst,
    NetworkOnly,
}

/// Clave de caché: nombre de operación + variables serializadas. Los objetos
/// de `serde_json` ordenan sus claves, así que la serialización es canónica.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub operation: &'static str,
    pub variables: String,
}

impl QueryKey {
    pub fn new(operation: &Operation, variables: &Value) -> Self {
        Self {
            operation: operation.name,
            variables: variables.to_string(),
        }
    }
}

pub type SubscriptionId = usize;

type Listener = Rc<dyn Fn(&QueryKey)>;
type SharedFetch = Shared<LocalBoxFuture<'static, Result<Value, ClientError>>>;

struct InFlight {
    generation: u64,
    future: SharedFetch,
}

struct Inner {
    transport: Rc<dyn HttpTransport>,
    endpoint: String,
    cache: RefCell<HashMap<QueryKey, QueryState<Value>>>,
    in_flight: RefCell<HashMap<QueryKey, InFlight>>,
    generation: Cell<u64>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_listener: Cell<SubscriptionId>,
}

/// Cliente GraphQL compartido (los clones comparten caché)
#[derive(Clone)]
pub struct GraphQlClient {
    inner: Rc<Inner>,
}

impl GraphQlClient {
    pub fn new(transport: Rc<dyn HttpTransport>, endpoint: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(Inner {
                transport,
                endpoint: endpoint.into(),
                cache: RefCell::new(HashMap::new()),
                in_flight: RefCell::new(HashMap::new()),
                generation: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
            }),
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub async fn query(
        &self,
        operation: &Operation,
        variables: Value,
        policy: FetchPolicy,
    ) -> Result<Value, ClientError> {
        let key = QueryKey::new(operation, &variables);

        if policy == FetchPolicy::CacheFirst {
            if let Some(data) = self.cached(&key) {
                log::debug!("💾 [GQL] {} servido desde caché", operation.name);
                return Ok(data);
            }
            let joined = self
                .inner
                .in_flight
                .borrow()
                .get(&key)
                .map(|flight| flight.future.clone());
            if let Some(future) = joined {
                log::debug!("🔗 [GQL] {} se une a petición en curso", operation.name);
                return future.await;
            }
        }

        let generation = self.inner.generation.get() + 1;
        self.inner.generation.set(generation);

        let future = Self::execute(
            self.inner.transport.clone(),
            self.inner.endpoint.clone(),
            operation.request_body(&variables),
        )
        .boxed_local()
        .shared();

        self.inner.in_flight.borrow_mut().insert(
            key.clone(),
            InFlight { generation, future: future.clone() },
        );
        self.update_entry(&key, |state| state.into_loading());

        log::debug!("🌐 [GQL] {} (gen {})", operation.name, generation);
        let result = future.await;
        self.settle(&key, generation, &result);
        result
    }

    /// Query decodificando `data.<root>`
    pub async fn query_as<T: DeserializeOwned>(
        &self,
        operation: &Operation,
        variables: Value,
        policy: FetchPolicy,
    ) -> Result<T, ClientError> {
        let data = self.query(operation, variables, policy).await?;
        decode_root(&data, operation.root)
    }

    /// Query decodificando `data.<root>.nodes`
    pub async fn query_nodes<T: DeserializeOwned>(
        &self,
        operation: &Operation,
        variables: Value,
        policy: FetchPolicy,
    ) -> Result<Vec<T>, ClientError> {
        let data = self.query(operation, variables, policy).await?;
        decode_nodes(&data, operation.root)
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Ejecuta una mutation. Devuelve `data.<root>` (normalmente el id creado).
    pub async fn mutate(&self, operation: &Operation, variables: Value) -> Result<Value, ClientError> {
        log::info!("✏️ [GQL] mutation {}", operation.name);
        let data = Self::execute(
            self.inner.transport.clone(),
            self.inner.endpoint.clone(),
            operation.request_body(&variables),
        )
        .await
        .map_err(|e| {
            log::error!("❌ [GQL] {} falló: {}", operation.name, e);
            e
        })?;
        Ok(data.get(operation.root).cloned().unwrap_or(Value::Null))
    }

    /// Mutation que devuelve el id de la entidad creada como escalar
    pub async fn mutate_for_id(&self, operation: &Operation, variables: Value) -> Result<String, ClientError> {
        match self.mutate(operation, variables).await? {
            Value::String(id) if !id.is_empty() => Ok(id),
            _ => Err(ClientError::MissingData(operation.root.to_string())),
        }
    }

    // ========================================================================
    // CACHÉ
    // ========================================================================

    pub fn state(&self, operation: &Operation, variables: &Value) -> QueryState<Value> {
        self.inner
            .cache
            .borrow()
            .get(&QueryKey::new(operation, variables))
            .cloned()
            .unwrap_or_default()
    }

    /// Elimina todas las entradas de una operación
    pub fn invalidate(&self, operation_name: &str) {
        let removed: Vec<QueryKey> = {
            let mut cache = self.inner.cache.borrow_mut();
            let keys: Vec<QueryKey> = cache
                .keys()
                .filter(|k| k.operation == operation_name)
                .cloned()
                .collect();
            for key in &keys {
                cache.remove(key);
            }
            keys
        };
        for key in &removed {
            self.notify(key);
        }
    }

    /// Vacía caché y peticiones en curso (logout). Las respuestas que lleguen
    /// después ya no se guardan.
    pub fn reset(&self) {
        self.inner.in_flight.borrow_mut().clear();
        let removed: Vec<QueryKey> = self.inner.cache.borrow_mut().drain().map(|(k, _)| k).collect();
        log::info!("🧹 [GQL] caché vaciada ({} entradas)", removed.len());
        for key in &removed {
            self.notify(key);
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&QueryKey) + 'static,
    {
        let id = self.inner.next_listener.get();
        self.inner.next_listener.set(id + 1);
        self.inner.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.listeners.borrow_mut().retain(|(listener_id, _)| *listener_id != id);
    }

    // ========================================================================
    // INTERNOS
    // ========================================================================

    fn cached(&self, key: &QueryKey) -> Option<Value> {
        self.inner.cache.borrow().get(key).and_then(|s| s.data().cloned())
    }

    fn settle(&self, key: &QueryKey, generation: u64, result: &Result<Value, ClientError>) {
        let is_latest = {
            let mut in_flight = self.inner.in_flight.borrow_mut();
            match in_flight.get(key) {
                Some(flight) if flight.generation == generation => {
                    in_flight.remove(key);
                    true
                }
                _ => false,
            }
        };
        if !is_latest {
            log::debug!("⏭️ [GQL] respuesta obsoleta de {} descartada", key.operation);
            return;
        }
        let state = match result {
            Ok(data) => QueryState::Loaded(data.clone()),
            Err(error) => QueryState::Errored(error.clone()),
        };
        self.update_entry(key, |_| state);
    }

    fn update_entry<F>(&self, key: &QueryKey, transition: F)
    where
        F: FnOnce(QueryState<Value>) -> QueryState<Value>,
    {
        {
            let mut cache = self.inner.cache.borrow_mut();
            let current = cache.remove(key).unwrap_or_default();
            cache.insert(key.clone(), transition(current));
        }
        self.notify(key);
    }

    /// Los listeners pueden volver a llamar al cliente: no se mantiene ningún borrow
    fn notify(&self, key: &QueryKey) {
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(key);
        }
    }

    async fn execute(
        transport: Rc<dyn HttpTransport>,
        endpoint: String,
        body: Value,
    ) -> Result<Value, ClientError> {
        let response = transport.send(HttpRequest::post_json(endpoint, &body)).await?;
        if !response.ok() {
            return Err(ClientError::from_status(response.status, response.body));
        }
        parse_response(&response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::operations::{CREATE_TAG, ME, TAGS};
    use crate::testing::{DeferredTransport, RecordingTransport};
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;
    use serde_json::json;

    fn tags_body(names: &[&str]) -> Value {
        let nodes: Vec<Value> = names
            .iter()
            .enumerate()
            .map(|(i, n)| json!({ "id": format!("t{}", i), "name": n, "createdAt": "2024-05-01T10:00:00Z" }))
            .collect();
        json!({ "data": { "tags": { "nodes": nodes } } })
    }

    #[test]
    fn cache_first_serves_cached_data() {
        let transport = RecordingTransport::new();
        transport.push_json(200, tags_body(&["smoke"]));
        let client = GraphQlClient::new(Rc::new(transport.clone()), "http://api/graphql");
        let vars = json!({ "filter": { "name": "" } });

        block_on(client.query(&TAGS, vars.clone(), FetchPolicy::CacheFirst)).unwrap();
        let second = block_on(client.query(&TAGS, vars.clone(), FetchPolicy::CacheFirst)).unwrap();

        assert_eq!(transport.requests().len(), 1);
        assert_eq!(second["tags"]["nodes"][0]["name"], "smoke");
        assert!(client.state(&TAGS, &vars).data().is_some());
    }

    #[test]
    fn network_only_always_hits_the_network() {
        let transport = RecordingTransport::new();
        transport.push_json(200, tags_body(&["a"]));
        transport.push_json(200, tags_body(&["a", "b"]));
        let client = GraphQlClient::new(Rc::new(transport.clone()), "http://api/graphql");

        block_on(client.query(&TAGS, json!({}), FetchPolicy::NetworkOnly)).unwrap();
        let data = block_on(client.query(&TAGS, json!({}), FetchPolicy::NetworkOnly)).unwrap();

        assert_eq!(transport.requests().len(), 2);
        assert_eq!(data["tags"]["nodes"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn identical_in_flight_queries_are_shared() {
        let transport = DeferredTransport::new();
        let client = GraphQlClient::new(Rc::new(transport.clone()), "http://api/graphql");
        let results: Rc<RefCell<Vec<Result<Value, ClientError>>>> = Rc::new(RefCell::new(Vec::new()));

        let mut pool = LocalPool::new();
        for _ in 0..2 {
            let client = client.clone();
            let results = results.clone();
            pool.spawner()
                .spawn_local(async move {
                    let r = client.query(&ME, json!({}), FetchPolicy::CacheFirst).await;
                    results.borrow_mut().push(r);
                })
                .unwrap();
        }
        pool.run_until_stalled();
        assert_eq!(transport.pending(), 1);

        transport.resolve_json(0, 200, json!({ "data": { "me": { "id": "u1" } } }));
        pool.run_until_stalled();

        let results = results.borrow();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.as_ref().map(|d| d["me"]["id"] == "u1").unwrap_or(false)));
    }

    #[test]
    fn older_response_does_not_overwrite_newer() {
        let transport = DeferredTransport::new();
        let client = GraphQlClient::new(Rc::new(transport.clone()), "http://api/graphql");
        let vars = json!({ "filter": { "name": "" } });

        let mut pool = LocalPool::new();
        for _ in 0..2 {
            let client = client.clone();
            let vars = vars.clone();
            pool.spawner()
                .spawn_local(async move {
                    let _ = client.query(&TAGS, vars, FetchPolicy::NetworkOnly).await;
                })
                .unwrap();
            pool.run_until_stalled();
        }
        assert_eq!(transport.pending(), 2);

        transport.resolve_json(1, 200, tags_body(&["new"]));
        pool.run_until_stalled();
        transport.resolve_json(0, 200, tags_body(&["old"]));
        pool.run_until_stalled();

        let state = client.state(&TAGS, &vars);
        assert_eq!(state.data().map(|d| d["tags"]["nodes"][0]["name"].clone()), Some(json!("new")));
    }

    #[test]
    fn mutations_bypass_the_cache() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "data": { "createTag": "t9" } }));
        let client = GraphQlClient::new(Rc::new(transport.clone()), "http://api/graphql");

        let id = block_on(client.mutate_for_id(&CREATE_TAG, json!({ "input": { "name": "x" } }))).unwrap();
        assert_eq!(id, "t9");
        assert_eq!(
            client.state(&CREATE_TAG, &json!({ "input": { "name": "x" } })),
            QueryState::Idle
        );
    }

    #[test]
    fn unauthorized_responses_are_typed() {
        let transport = RecordingTransport::new();
        transport.push_json(401, json!({}));
        transport.push_json(200, json!({
            "errors": [{ "message": "not auth", "extensions": { "code": "AUTH_NOT_AUTHENTICATED" } }]
        }));
        let client = GraphQlClient::new(Rc::new(transport), "http://api/graphql");

        let first = block_on(client.query(&ME, json!({}), FetchPolicy::NetworkOnly));
        let second = block_on(client.query(&ME, json!({}), FetchPolicy::NetworkOnly));
        assert_eq!(first, Err(ClientError::Unauthorized));
        assert_eq!(second, Err(ClientError::Unauthorized));
        assert_eq!(client.state(&ME, &json!({})).error(), Some(&ClientError::Unauthorized));
    }

    #[test]
    fn listeners_see_updates_until_unsubscribed() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "data": { "me": { "id": "u1" } } }));
        let client = GraphQlClient::new(Rc::new(transport), "http://api/graphql");
        let seen = Rc::new(Cell::new(0));

        let counter = seen.clone();
        let id = client.subscribe(move |key| {
            assert_eq!(key.operation, "Me");
            counter.set(counter.get() + 1);
        });
        block_on(client.query(&ME, json!({}), FetchPolicy::CacheFirst)).unwrap();
        // Loading + Loaded
        assert_eq!(seen.get(), 2);

        client.unsubscribe(id);
        client.reset();
        assert_eq!(seen.get(), 2);
        assert_eq!(client.state(&ME, &json!({})), QueryState::Idle);
    }

    #[test]
    fn invalidate_evicts_only_that_operation() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "data": { "me": { "id": "u1" } } }));
        transport.push_json(200, tags_body(&["a"]));
        let client = GraphQlClient::new(Rc::new(transport), "http://api/graphql");

        block_on(client.query(&ME, json!({}), FetchPolicy::CacheFirst)).unwrap();
        block_on(client.query(&TAGS, json!({}), FetchPolicy::CacheFirst)).unwrap();
        client.invalidate("Tags");

        assert_eq!(client.state(&TAGS, &json!({})), QueryState::Idle);
        assert!(client.state(&ME, &json!({})).data().is_some());
    }
}
