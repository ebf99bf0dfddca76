use crate::domain::{DedicatedSubnet, DedicatedSubnets, ListParams};

use super::{Engine, EngineResult, paginate};

impl Engine {
    pub async fn list_dedicated_subnets(&self, params: ListParams) -> EngineResult<DedicatedSubnets> {
        let store = self.store.read().await;
        let (meta, dedicated_subnets) = paginate(&store.dedicated_subnets, params);
        Ok(DedicatedSubnets {
            meta,
            dedicated_subnets,
        })
    }

    pub async fn read_dedicated_subnet(&self, subnet_id: &str) -> EngineResult<DedicatedSubnet> {
        let store = self.store.read().await;
        store.find_dedicated_subnet(subnet_id).cloned()
    }
}
