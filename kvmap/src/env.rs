use async_trait::async_trait;
use kvpouch_asyncmap::{AsyncMap, MapResult, Visitor};

use crate::KVMapConfig;
use crate::kvmap::KVMap;
use crate::namespace::Namespace;

/// A [`KVMap`] bound to the environment its namespace came from.
///
/// Hosts that hand out namespace bindings together with an environment
/// object (secrets, sibling bindings) keep both here. Map behaviour is
/// exactly that of [`KVMap`].
pub struct EnvKVMap<N, E> {
    map: KVMap<N>,
    env: E,
}

impl<N: Namespace, E> EnvKVMap<N, E> {
    pub fn new(ns: N, env: E) -> Self {
        Self::with_config(ns, env, KVMapConfig::default())
    }

    pub fn with_config(ns: N, env: E, config: KVMapConfig) -> Self {
        Self {
            map: KVMap::with_config(ns, config),
            env,
        }
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn namespace(&self) -> &N {
        self.map.namespace()
    }

    /// The environment-free map this binding delegates to.
    pub fn as_kvmap(&self) -> &KVMap<N> {
        &self.map
    }

    pub fn into_parts(self) -> (KVMap<N>, E) {
        (self.map, self.env)
    }
}

#[async_trait]
impl<N, E> AsyncMap for EnvKVMap<N, E>
where
    N: Namespace,
    E: Send + Sync,
{
    async fn clear(&self) -> MapResult<()> {
        self.map.clear().await
    }

    async fn delete(&self, key: &str) -> MapResult<bool> {
        self.map.delete(key).await
    }

    async fn for_each(&self, visitor: &mut dyn Visitor) -> MapResult<()> {
        self.map.for_each(visitor).await
    }

    async fn get(&self, key: &str) -> MapResult<Option<String>> {
        self.map.get(key).await
    }

    async fn has(&self, key: &str) -> MapResult<bool> {
        self.map.has(key).await
    }

    async fn set(&self, key: &str, value: &str) -> MapResult<()> {
        self.map.set(key, value).await
    }

    async fn size(&self) -> MapResult<usize> {
        self.map.size().await
    }
}
