use crate::domain::{ListParams, PrivateNetwork, PrivateNetworks};

use super::{Engine, EngineResult, paginate};

impl Engine {
    pub async fn list_private_networks(&self, params: ListParams) -> EngineResult<PrivateNetworks> {
        let store = self.store.read().await;
        let (meta, private_networks) = paginate(&store.private_networks, params);
        Ok(PrivateNetworks {
            meta,
            private_networks,
        })
    }

    pub async fn read_private_network(&self, network_id: &str) -> EngineResult<PrivateNetwork> {
        let store = self.store.read().await;
        store.find_private_network(network_id).cloned()
    }
}
